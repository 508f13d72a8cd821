//! PostgreSQL repository implementations

pub mod session_repo_impl;
pub mod settings_repo_impl;

pub use session_repo_impl::PgSessionRepository;
pub use settings_repo_impl::PgSettingsRepository;
