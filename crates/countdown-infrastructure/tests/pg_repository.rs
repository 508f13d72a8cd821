//! PostgreSQL repository tests.
//!
//! Run against a scratch database:
//! `DATABASE_URL=postgres://... cargo test -p countdown-infrastructure -- --ignored`

use std::sync::Arc;

use chrono::Utc;
use fake::{faker::name::en::Name, Fake};
use sqlx::postgres::PgPoolOptions;

use countdown_core::domain::{
    AppSetting, LogoChange, NewSession, SessionOutcome, SessionStatus, SettingsUpdate,
};
use countdown_core::repositories::{SessionRepository, SettingsRepository};
use countdown_infrastructure::{run_migrations, PgSessionRepository, PgSettingsRepository};
use countdown_shared::Pagination;

async fn fresh_pool() -> sqlx::PgPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set for database tests");
    let pool = PgPoolOptions::new()
        .max_connections(16)
        .connect(&url)
        .await
        .expect("connect");
    run_migrations(&pool).await.expect("migrate");
    sqlx::query("TRUNCATE countdown_sessions, app_settings RESTART IDENTITY")
        .execute(&pool)
        .await
        .expect("truncate");
    pool
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[ignore = "requires DATABASE_URL"]
async fn test_postgres_repositories() {
    let pool = fresh_pool().await;
    let sessions = Arc::new(PgSessionRepository::new(pool.clone()));
    let settings = PgSettingsRepository::new(pool.clone());

    // Lifecycle scenario
    let alice = sessions
        .open_exclusive(&NewSession::new("Alice", 5).unwrap(), Utc::now())
        .await
        .unwrap();
    assert!(alice.closed_session_ids.is_empty());

    let bob = sessions
        .open_exclusive(&NewSession::new("Bob", 10).unwrap(), Utc::now())
        .await
        .unwrap();
    assert_eq!(bob.closed_session_ids, vec![alice.session.id]);

    let closed_alice = sessions.find_by_id(alice.session.id).await.unwrap().unwrap();
    assert_eq!(closed_alice.status, SessionStatus::Completed);
    assert!(closed_alice.ended_at.is_some());

    let stopped = sessions
        .close(bob.session.id, SessionOutcome::overtime(42), Utc::now())
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stopped.overtime_seconds, 42);
    assert!(sessions.find_active().await.unwrap().is_none());
    assert!(sessions
        .close(i64::MAX, SessionOutcome::completed(), Utc::now())
        .await
        .unwrap()
        .is_none());

    let archive = sessions.list_archive(Pagination::new(None, None, 10)).await.unwrap();
    assert_eq!(archive.total, 2);
    assert_eq!(archive.data[0].id, bob.session.id);
    assert_eq!(archive.data[1].id, alice.session.id);

    let summary = sessions.archive_summary().await.unwrap();
    assert_eq!((summary.total, summary.completed, summary.overtime), (2, 1, 1));
    assert!((summary.average_overtime_seconds - 42.0).abs() < 1e-9);

    // Concurrent starts still leave exactly one active row
    let mut handles = Vec::new();
    for _ in 0..12 {
        let sessions = sessions.clone();
        handles.push(tokio::spawn(async move {
            let name: String = Name().fake();
            sessions
                .open_exclusive(&NewSession::new(&name, 3).unwrap(), Utc::now())
                .await
        }));
    }
    for handle in handles {
        handle.await.unwrap().unwrap();
    }
    let active: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM countdown_sessions WHERE status = 'active'")
            .fetch_one(&pool)
            .await
            .unwrap();
    assert_eq!(active, 1);

    // Settings singleton
    let first = settings.get_or_create(&AppSetting::with_defaults(Utc::now())).await.unwrap();
    let second = settings.get_or_create(&AppSetting::with_defaults(Utc::now())).await.unwrap();
    assert_eq!(first.id, second.id);
    assert_eq!(first.app_title, "PKKMB UNCP 2025");

    let update =
        SettingsUpdate::new("Custom Title", "Custom University", LogoChange::from_sent(Some("/logo.png")))
            .unwrap();
    let updated = settings
        .update(&AppSetting::with_defaults(Utc::now()), &update, Utc::now())
        .await
        .unwrap();
    assert_eq!(updated.app_title, "Custom Title");
    assert_eq!(updated.logo.as_deref(), Some("/logo.png"));

    // Leaving the logo out keeps it
    let keep = SettingsUpdate::new("Second Title", "Custom University", LogoChange::Keep).unwrap();
    let updated = settings
        .update(&AppSetting::with_defaults(Utc::now()), &keep, Utc::now())
        .await
        .unwrap();
    assert_eq!(updated.app_title, "Second Title");
    assert_eq!(updated.logo.as_deref(), Some("/logo.png"));

    let rows: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM app_settings")
        .fetch_one(&pool)
        .await
        .unwrap();
    assert_eq!(rows, 1);
}
