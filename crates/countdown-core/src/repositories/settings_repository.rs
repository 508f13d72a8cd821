//! App settings repository trait (port)

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::domain::{AppSetting, SettingsUpdate};
use crate::error::DomainError;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SettingsRepository: Send + Sync {
    /// Returns the singleton row, inserting `defaults` first if there is none.
    async fn get_or_create(&self, defaults: &AppSetting) -> Result<AppSetting, DomainError>;

    /// Overwrites the singleton row, creating it from `defaults` if missing.
    async fn update(
        &self,
        defaults: &AppSetting,
        update: &SettingsUpdate,
        now: DateTime<Utc>,
    ) -> Result<AppSetting, DomainError>;
}
