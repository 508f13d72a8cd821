//! Countdown session repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::Serialize;

use countdown_shared::{Page, Pagination};

use crate::domain::{CountdownSession, NewSession, SessionOutcome};
use crate::error::DomainError;

/// Result of opening a session: the new row and the ids it force-closed.
#[derive(Debug, Clone)]
pub struct OpenedSession {
    pub session: CountdownSession,
    pub closed_session_ids: Vec<i64>,
}

/// Counters over every archived session.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ArchiveSummary {
    pub total: u64,
    pub completed: u64,
    pub overtime: u64,
    /// Mean over overtime sessions only.
    pub average_overtime_seconds: f64,
}

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SessionRepository: Send + Sync {
    async fn find_by_id(&self, id: i64) -> Result<Option<CountdownSession>, DomainError>;
    async fn find_active(&self) -> Result<Option<CountdownSession>, DomainError>;

    /// Closes every active session as completed and inserts `session` as the
    /// new active one, as a single atomic step.
    async fn open_exclusive(
        &self,
        session: &NewSession,
        now: DateTime<Utc>,
    ) -> Result<OpenedSession, DomainError>;

    /// Writes the outcome and `ended_at`; `None` when the id does not exist.
    async fn close(
        &self,
        id: i64,
        outcome: SessionOutcome,
        now: DateTime<Utc>,
    ) -> Result<Option<CountdownSession>, DomainError>;

    /// Terminal sessions only, newest first.
    async fn list_archive(&self, pagination: Pagination) -> Result<Page<CountdownSession>, DomainError>;
    async fn archive_summary(&self) -> Result<ArchiveSummary, DomainError>;
}
