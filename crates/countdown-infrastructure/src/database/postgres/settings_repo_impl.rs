// ============================================================================
// Countdown Infrastructure - PostgreSQL App Settings Repository
// File: crates/countdown-infrastructure/src/database/postgres/settings_repo_impl.rs
// ============================================================================

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use tracing::{error, info};

use countdown_core::domain::{AppSetting, SettingsUpdate};
use countdown_core::error::DomainError;
use countdown_core::repositories::SettingsRepository;

pub struct PgSettingsRepository {
    pool: PgPool,
}

impl PgSettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn insert_defaults(&self, defaults: &AppSetting) -> Result<(), DomainError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO app_settings (id, logo, app_title, university_name, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            ON CONFLICT (id) DO NOTHING
            "#,
        )
        .bind(defaults.id)
        .bind(&defaults.logo)
        .bind(&defaults.app_title)
        .bind(&defaults.university_name)
        .bind(defaults.created_at)
        .bind(defaults.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error creating default settings: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        if inserted.rows_affected() > 0 {
            info!("Default app settings created");
        }
        Ok(())
    }
}

// Internal row type for SQLx mapping
#[derive(Debug, FromRow)]
struct AppSettingRow {
    pub id: i32,
    pub logo: Option<String>,
    pub app_title: String,
    pub university_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AppSettingRow> for AppSetting {
    fn from(row: AppSettingRow) -> Self {
        AppSetting {
            id: row.id,
            logo: row.logo,
            app_title: row.app_title,
            university_name: row.university_name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

#[async_trait]
impl SettingsRepository for PgSettingsRepository {
    async fn get_or_create(&self, defaults: &AppSetting) -> Result<AppSetting, DomainError> {
        self.insert_defaults(defaults).await?;

        let row: AppSettingRow = sqlx::query_as(
            r#"
            SELECT id, logo, app_title, university_name, created_at, updated_at
            FROM app_settings
            WHERE id = $1
            "#,
        )
        .bind(AppSetting::SINGLETON_ID)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error loading settings: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }

    async fn update(
        &self,
        defaults: &AppSetting,
        update: &SettingsUpdate,
        now: DateTime<Utc>,
    ) -> Result<AppSetting, DomainError> {
        self.insert_defaults(defaults).await?;

        let row: AppSettingRow = sqlx::query_as(
            r#"
            UPDATE app_settings
            SET
                app_title = $2,
                university_name = $3,
                logo = CASE WHEN $4 THEN $5 ELSE logo END,
                updated_at = $6
            WHERE id = $1
            RETURNING id, logo, app_title, university_name, created_at, updated_at
            "#,
        )
        .bind(AppSetting::SINGLETON_ID)
        .bind(&update.app_title)
        .bind(&update.university_name)
        .bind(update.logo.replaces())
        .bind(update.logo.value())
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(|e: sqlx::Error| {
            error!("Database error updating settings: {}", e);
            DomainError::DatabaseError(e.to_string())
        })?;

        Ok(row.into())
    }
}
