//! # Countdown Shared
//! 
//! Configuration, telemetry, constants, and pagination types shared by the
//! countdown crates.

pub mod constants;
pub mod types;
pub mod telemetry;
pub mod config;
pub mod error;

pub use types::*;
pub use error::AppError;
