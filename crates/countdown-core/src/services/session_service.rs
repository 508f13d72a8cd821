// ============================================================================
// Countdown Core - Session Lifecycle Service
// File: crates/countdown-core/src/services/session_service.rs
// ============================================================================
//! Opens and closes countdown sessions while keeping at most one active.

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use countdown_shared::{Page, Pagination};

use crate::domain::{CloseSession, CountdownSession, IntegerInput, NewSession};
use crate::error::DomainError;
use crate::repositories::{ArchiveSummary, SessionRepository};

/// Lifecycle controller for countdown sessions
pub struct SessionService {
    session_repo: Arc<dyn SessionRepository>,
    archive_page_size: u32,
    overtime_drift_tolerance_seconds: i64,
}

impl SessionService {
    pub fn new(
        session_repo: Arc<dyn SessionRepository>,
        archive_page_size: u32,
        overtime_drift_tolerance_seconds: i64,
    ) -> Self {
        Self {
            session_repo,
            archive_page_size,
            overtime_drift_tolerance_seconds,
        }
    }

    /// Start a session, closing whichever one is currently active
    pub async fn start_session(
        &self,
        participant_name: &str,
        duration_minutes: impl Into<IntegerInput>,
    ) -> Result<CountdownSession, DomainError> {
        let new_session = NewSession::new(participant_name, duration_minutes).map_err(|e| {
            warn!("Start rejected: {}", e);
            e
        })?;

        let opened = self.session_repo.open_exclusive(&new_session, Utc::now()).await?;

        if !opened.closed_session_ids.is_empty() {
            info!(
                "Force-completed previously active sessions: {:?}",
                opened.closed_session_ids
            );
        }
        info!(
            session_id = opened.session.id,
            duration_minutes = opened.session.duration_minutes,
            "Countdown started for {}",
            opened.session.participant_name
        );

        Ok(opened.session)
    }

    /// Stop a session as completed or overtime.
    ///
    /// The reported overtime is stored as given. Re-closing a session that is
    /// already terminal overwrites its outcome.
    pub async fn stop_session(
        &self,
        session_id: i64,
        request: CloseSession,
    ) -> Result<CountdownSession, DomainError> {
        let outcome = request.into_outcome().map_err(|e| {
            warn!(session_id, "Stop rejected: {}", e);
            e
        })?;

        let existing = self
            .session_repo
            .find_by_id(session_id)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))?;

        let now = Utc::now();
        if existing.status.is_terminal() {
            warn!(
                session_id,
                "Re-closing session already in state {}",
                existing.status.as_str()
            );
        } else {
            let derived = existing.timer_at(now).outcome().overtime_seconds;
            let drift = (i64::from(derived) - i64::from(outcome.overtime_seconds)).abs();
            if drift > self.overtime_drift_tolerance_seconds {
                warn!(
                    session_id,
                    reported = outcome.overtime_seconds,
                    derived,
                    "Reported overtime differs from server clock"
                );
            }
        }

        let closed = self
            .session_repo
            .close(session_id, outcome, now)
            .await?
            .ok_or(DomainError::SessionNotFound(session_id))?;

        info!(
            session_id,
            overtime_seconds = closed.overtime_seconds,
            "Countdown stopped as {}",
            closed.status.as_str()
        );
        Ok(closed)
    }

    pub async fn active_session(&self) -> Result<Option<CountdownSession>, DomainError> {
        self.session_repo.find_active().await
    }

    /// Archived sessions, newest first. Missing page values fall back to page 1
    /// and the configured page size; out-of-range values are clamped.
    pub async fn list_archive(
        &self,
        page: Option<i64>,
        per_page: Option<i64>,
    ) -> Result<Page<CountdownSession>, DomainError> {
        let pagination = Pagination::new(page, per_page, self.archive_page_size);
        self.session_repo.list_archive(pagination).await
    }

    pub async fn archive_summary(&self) -> Result<ArchiveSummary, DomainError> {
        self.session_repo.archive_summary().await
    }
}
