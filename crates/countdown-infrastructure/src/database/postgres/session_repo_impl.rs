// ============================================================================
// Countdown Infrastructure - PostgreSQL Countdown Session Repository
// File: crates/countdown-infrastructure/src/database/postgres/session_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use countdown_core::domain::{CountdownSession, NewSession, SessionOutcome, SessionStatus};
use countdown_core::error::DomainError;
use countdown_core::repositories::{ArchiveSummary, OpenedSession, SessionRepository};
use countdown_shared::{Page, Pagination};

/// Advisory lock key serializing every session start.
const ACTIVE_SESSION_LOCK_KEY: i64 = 0x636f_756e_7464_6f77;

const SESSION_COLUMNS: &str = r#"
    id, participant_name, duration_minutes, status, overtime_seconds,
    started_at, ended_at, created_at, updated_at
"#;

pub struct PgSessionRepository {
    pool: PgPool,
}

impl PgSessionRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct CountdownSessionRow {
    pub id: i64,
    pub participant_name: String,
    pub duration_minutes: i32,
    pub status: String,
    pub overtime_seconds: i32,
    pub started_at: DateTime<Utc>,
    pub ended_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl TryFrom<CountdownSessionRow> for CountdownSession {
    type Error = DomainError;

    fn try_from(row: CountdownSessionRow) -> Result<Self, Self::Error> {
        let status = SessionStatus::from_str(&row.status).ok_or_else(|| {
            DomainError::DatabaseError(format!(
                "session {} has unknown status '{}'",
                row.id, row.status
            ))
        })?;

        Ok(CountdownSession {
            id: row.id,
            participant_name: row.participant_name,
            duration_minutes: row.duration_minutes,
            status,
            overtime_seconds: row.overtime_seconds,
            started_at: row.started_at,
            ended_at: row.ended_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

#[derive(Debug, FromRow)]
struct ArchiveSummaryRow {
    pub total: i64,
    pub completed: i64,
    pub overtime: i64,
    pub average_overtime_seconds: f64,
}

fn db_error(context: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e: sqlx::Error| {
        error!("Database error {}: {}", context, e);
        DomainError::DatabaseError(e.to_string())
    }
}

#[async_trait]
impl SessionRepository for PgSessionRepository {
    async fn find_by_id(&self, id: i64) -> Result<Option<CountdownSession>, DomainError> {
        let row: Option<CountdownSessionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM countdown_sessions WHERE id = $1",
            SESSION_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding session by id"))?;

        row.map(CountdownSession::try_from).transpose()
    }

    async fn find_active(&self) -> Result<Option<CountdownSession>, DomainError> {
        let row: Option<CountdownSessionRow> = sqlx::query_as(&format!(
            "SELECT {} FROM countdown_sessions WHERE status = 'active' ORDER BY started_at DESC LIMIT 1",
            SESSION_COLUMNS
        ))
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("finding active session"))?;

        row.map(CountdownSession::try_from).transpose()
    }

    async fn open_exclusive(
        &self,
        session: &NewSession,
        now: DateTime<Utc>,
    ) -> Result<OpenedSession, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(db_error("beginning start transaction"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(ACTIVE_SESSION_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(db_error("acquiring start lock"))?;

        let closed_session_ids: Vec<i64> = sqlx::query_scalar(
            r#"
            UPDATE countdown_sessions
            SET status = 'completed', ended_at = $1, updated_at = $1
            WHERE status = 'active'
            RETURNING id
            "#,
        )
        .bind(now)
        .fetch_all(&mut *tx)
        .await
        .map_err(db_error("closing active sessions"))?;

        let row: CountdownSessionRow = sqlx::query_as(&format!(
            r#"
            INSERT INTO countdown_sessions (
                participant_name, duration_minutes, status, overtime_seconds,
                started_at, ended_at, created_at, updated_at
            )
            VALUES ($1, $2, 'active', 0, $3, NULL, $3, $3)
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(&session.participant_name)
        .bind(session.duration_minutes)
        .bind(now)
        .fetch_one(&mut *tx)
        .await
        .map_err(db_error("inserting session"))?;

        tx.commit()
            .await
            .map_err(db_error("committing start transaction"))?;

        info!("Countdown session created: {}", row.id);
        Ok(OpenedSession {
            session: row.try_into()?,
            closed_session_ids,
        })
    }

    async fn close(
        &self,
        id: i64,
        outcome: SessionOutcome,
        now: DateTime<Utc>,
    ) -> Result<Option<CountdownSession>, DomainError> {
        let row: Option<CountdownSessionRow> = sqlx::query_as(&format!(
            r#"
            UPDATE countdown_sessions
            SET status = $2, overtime_seconds = $3, ended_at = $4, updated_at = $4
            WHERE id = $1
            RETURNING {}
            "#,
            SESSION_COLUMNS
        ))
        .bind(id)
        .bind(outcome.status.as_str())
        .bind(outcome.overtime_seconds)
        .bind(now)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("closing session"))?;

        row.map(CountdownSession::try_from).transpose()
    }

    async fn list_archive(&self, pagination: Pagination) -> Result<Page<CountdownSession>, DomainError> {
        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM countdown_sessions WHERE status IN ('completed', 'overtime')",
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("counting archive"))?;

        let rows: Vec<CountdownSessionRow> = sqlx::query_as(&format!(
            r#"
            SELECT {}
            FROM countdown_sessions
            WHERE status IN ('completed', 'overtime')
            ORDER BY created_at DESC, id DESC
            LIMIT $1 OFFSET $2
            "#,
            SESSION_COLUMNS
        ))
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("listing archive"))?;

        let sessions = rows
            .into_iter()
            .map(CountdownSession::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Page::new(sessions, pagination, u64::try_from(total).unwrap_or(0)))
    }

    async fn archive_summary(&self) -> Result<ArchiveSummary, DomainError> {
        let row: ArchiveSummaryRow = sqlx::query_as(
            r#"
            SELECT
                COUNT(*) AS total,
                COUNT(*) FILTER (WHERE status = 'completed') AS completed,
                COUNT(*) FILTER (WHERE status = 'overtime') AS overtime,
                COALESCE(AVG(overtime_seconds) FILTER (WHERE status = 'overtime'), 0)::FLOAT8
                    AS average_overtime_seconds
            FROM countdown_sessions
            WHERE status IN ('completed', 'overtime')
            "#,
        )
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("summarizing archive"))?;

        Ok(ArchiveSummary {
            total: u64::try_from(row.total).unwrap_or(0),
            completed: u64::try_from(row.completed).unwrap_or(0),
            overtime: u64::try_from(row.overtime).unwrap_or(0),
            average_overtime_seconds: row.average_overtime_seconds,
        })
    }
}
