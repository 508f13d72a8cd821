//! In-memory repositories.
//!
//! Used by tests and local demos. The single-active invariant holds because
//! the close-then-insert step runs under one lock.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use parking_lot::Mutex;

use countdown_shared::{Page, Pagination};

use crate::domain::{AppSetting, CountdownSession, NewSession, SessionOutcome, SessionStatus, SettingsUpdate};
use crate::error::DomainError;
use crate::repositories::{ArchiveSummary, OpenedSession, SessionRepository, SettingsRepository};

#[derive(Default)]
struct SessionTable {
    rows: Vec<CountdownSession>,
    next_id: i64,
}

#[derive(Default)]
pub struct InMemorySessionRepository {
    table: Mutex<SessionTable>,
}

impl InMemorySessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn all(&self) -> Vec<CountdownSession> {
        self.table.lock().rows.clone()
    }

    pub fn active_count(&self) -> usize {
        self.table.lock().rows.iter().filter(|s| s.is_active()).count()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CountdownSession>, DomainError> {
        Ok(self.table.lock().rows.iter().find(|s| s.id == id).cloned())
    }

    async fn find_active(&self) -> Result<Option<CountdownSession>, DomainError> {
        Ok(self.table.lock().rows.iter().find(|s| s.is_active()).cloned())
    }

    async fn open_exclusive(
        &self,
        session: &NewSession,
        now: DateTime<Utc>,
    ) -> Result<OpenedSession, DomainError> {
        let mut table = self.table.lock();

        let mut closed_session_ids = Vec::new();
        for row in table.rows.iter_mut().filter(|s| s.is_active()) {
            row.status = SessionStatus::Completed;
            row.ended_at = Some(now);
            row.updated_at = now;
            closed_session_ids.push(row.id);
        }

        table.next_id += 1;
        let created = CountdownSession {
            id: table.next_id,
            participant_name: session.participant_name.clone(),
            duration_minutes: session.duration_minutes,
            status: SessionStatus::Active,
            overtime_seconds: 0,
            started_at: now,
            ended_at: None,
            created_at: now,
            updated_at: now,
        };
        table.rows.push(created.clone());

        Ok(OpenedSession { session: created, closed_session_ids })
    }

    async fn close(
        &self,
        id: i64,
        outcome: SessionOutcome,
        now: DateTime<Utc>,
    ) -> Result<Option<CountdownSession>, DomainError> {
        let mut table = self.table.lock();
        let Some(row) = table.rows.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };

        row.status = outcome.status;
        row.overtime_seconds = outcome.overtime_seconds;
        row.ended_at = Some(now);
        row.updated_at = now;
        Ok(Some(row.clone()))
    }

    async fn list_archive(&self, pagination: Pagination) -> Result<Page<CountdownSession>, DomainError> {
        let table = self.table.lock();
        let mut archived: Vec<&CountdownSession> =
            table.rows.iter().filter(|s| s.is_archived()).collect();
        archived.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));

        let total = archived.len() as u64;
        let data = archived
            .into_iter()
            .skip(usize::try_from(pagination.offset()).unwrap_or(usize::MAX))
            .take(usize::try_from(pagination.limit()).unwrap_or(0))
            .cloned()
            .collect();

        Ok(Page::new(data, pagination, total))
    }

    async fn archive_summary(&self) -> Result<ArchiveSummary, DomainError> {
        let table = self.table.lock();
        let mut summary = ArchiveSummary::default();
        let mut overtime_total: i64 = 0;

        for row in table.rows.iter().filter(|s| s.is_archived()) {
            summary.total += 1;
            match row.status {
                SessionStatus::Completed => summary.completed += 1,
                SessionStatus::Overtime => {
                    summary.overtime += 1;
                    overtime_total += i64::from(row.overtime_seconds);
                }
                SessionStatus::Active => {}
            }
        }

        if summary.overtime > 0 {
            summary.average_overtime_seconds = overtime_total as f64 / summary.overtime as f64;
        }
        Ok(summary)
    }
}

#[derive(Default)]
pub struct InMemorySettingsRepository {
    row: Mutex<Option<AppSetting>>,
}

impl InMemorySettingsRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stored(&self) -> Option<AppSetting> {
        self.row.lock().clone()
    }
}

#[async_trait]
impl SettingsRepository for InMemorySettingsRepository {
    async fn get_or_create(&self, defaults: &AppSetting) -> Result<AppSetting, DomainError> {
        let mut row = self.row.lock();
        Ok(row.get_or_insert_with(|| defaults.clone()).clone())
    }

    async fn update(
        &self,
        defaults: &AppSetting,
        update: &SettingsUpdate,
        now: DateTime<Utc>,
    ) -> Result<AppSetting, DomainError> {
        let mut row = self.row.lock();
        let settings = row.get_or_insert_with(|| defaults.clone());
        settings.apply(update, now);
        Ok(settings.clone())
    }
}
