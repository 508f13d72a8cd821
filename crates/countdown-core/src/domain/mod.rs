//! # Countdown Core - Domain Module
//! 
//! Domain entities for the countdown application.

pub mod countdown_session;
pub mod app_setting;
pub mod integer_input;

// Re-export all entities and enums
pub use countdown_session::{CloseSession, CountdownSession, NewSession, SessionOutcome, SessionStatus};
pub use app_setting::{AppSetting, LogoChange, SettingsUpdate};
pub use integer_input::IntegerInput;
