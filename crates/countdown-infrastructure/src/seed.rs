//! Demo data for a fresh database.

use chrono::{Duration, Utc};
use fake::faker::{boolean::en::Boolean, name::en::Name};
use fake::Fake;
use sqlx::PgPool;
use tracing::info;

use countdown_core::domain::{AppSetting, SessionStatus};
use countdown_core::repositories::SettingsRepository;

use crate::database::PgSettingsRepository;

/// Randomized archive rows added on top of the named examples.
const FACTORY_SESSION_COUNT: usize = 15;

#[derive(Debug)]
struct SeedSession {
    participant_name: String,
    duration_minutes: i32,
    status: SessionStatus,
    overtime_seconds: i32,
    started_ago: Duration,
    ran_for: Duration,
}

fn named_sessions() -> [SeedSession; 3] {
    [
        SeedSession {
            participant_name: "Maria Santos".to_string(),
            duration_minutes: 5,
            status: SessionStatus::Completed,
            overtime_seconds: 0,
            started_ago: Duration::hours(2),
            ran_for: Duration::minutes(5),
        },
        SeedSession {
            participant_name: "John Doe".to_string(),
            duration_minutes: 10,
            status: SessionStatus::Overtime,
            overtime_seconds: 120,
            started_ago: Duration::hours(1),
            ran_for: Duration::minutes(12),
        },
        SeedSession {
            participant_name: "Sari Wulandari".to_string(),
            duration_minutes: 15,
            status: SessionStatus::Overtime,
            overtime_seconds: 300,
            started_ago: Duration::minutes(30),
            ran_for: Duration::minutes(20),
        },
    ]
}

/// Random archived sessions from the past week. Completed rows stop before
/// time runs out; overtime rows run past it by their overtime.
fn factory_sessions(count: usize) -> Vec<SeedSession> {
    (0..count)
        .map(|_| {
            let duration_minutes = (1..=60).fake::<i32>();
            let duration = Duration::minutes(i64::from(duration_minutes));
            let overtime = Boolean(50).fake::<bool>();

            let (status, overtime_seconds, ran_for) = if overtime {
                let seconds = (1..=300).fake::<i32>();
                (
                    SessionStatus::Overtime,
                    seconds,
                    duration + Duration::seconds(i64::from(seconds)),
                )
            } else {
                let seconds = (30..=duration.num_seconds()).fake::<i64>();
                (SessionStatus::Completed, 0, Duration::seconds(seconds))
            };

            SeedSession {
                participant_name: Name().fake(),
                duration_minutes,
                status,
                overtime_seconds,
                started_ago: Duration::seconds((3 * 3600..7 * 24 * 3600).fake::<i64>()),
                ran_for,
            }
        })
        .collect()
}

/// Ensures default settings exist and adds a few archived sessions.
/// Returns how many sessions were inserted.
pub async fn seed_demo_data(pool: &PgPool) -> anyhow::Result<usize> {
    let now = Utc::now();
    PgSettingsRepository::new(pool.clone())
        .get_or_create(&AppSetting::with_defaults(now))
        .await?;

    let mut sessions = factory_sessions(FACTORY_SESSION_COUNT);
    sessions.extend(named_sessions());
    for session in &sessions {
        let started_at = now - session.started_ago;
        let ended_at = started_at + session.ran_for;

        sqlx::query(
            r#"
            INSERT INTO countdown_sessions (
                participant_name, duration_minutes, status, overtime_seconds,
                started_at, ended_at, created_at, updated_at
            )
            VALUES ($1, $2, $3, $4, $5, $6, $5, $6)
            "#,
        )
        .bind(&session.participant_name)
        .bind(session.duration_minutes)
        .bind(session.status.as_str())
        .bind(session.overtime_seconds)
        .bind(started_at)
        .bind(ended_at)
        .execute(pool)
        .await?;
    }

    info!("Seeded {} archived countdown sessions", sessions.len());
    Ok(sessions.len())
}
