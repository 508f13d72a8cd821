//! # Countdown Core
//! 
//! Domain entities, lifecycle services, timer derivation, and repository
//! traits for the countdown application.

pub mod domain;
pub mod services;
pub mod repositories;
pub mod timer;
pub mod error;

// Re-export domain entities
pub use domain::*;
pub use error::{DomainError, FieldErrors};
