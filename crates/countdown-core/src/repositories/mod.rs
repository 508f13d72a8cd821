//! Repository traits (ports)

pub mod session_repository;
pub mod settings_repository;
pub mod memory;

pub use session_repository::{ArchiveSummary, OpenedSession, SessionRepository};
pub use settings_repository::SettingsRepository;
pub use memory::{InMemorySessionRepository, InMemorySettingsRepository};

#[cfg(test)]
pub use session_repository::MockSessionRepository;
#[cfg(test)]
pub use settings_repository::MockSettingsRepository;
