//! Domain services (business logic)

pub mod session_service;
pub mod settings_service;

pub use session_service::SessionService;
pub use settings_service::SettingsService;
