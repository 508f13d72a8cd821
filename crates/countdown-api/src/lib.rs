//! # Countdown API
//! 
//! HTTP handlers, response envelope, error mapping, and router.

pub mod handlers;
pub mod error;
pub mod response;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
