//! Branding settings accessor

use std::sync::Arc;

use chrono::Utc;
use tracing::{info, warn};

use crate::domain::{AppSetting, LogoChange, SettingsUpdate};
use crate::error::DomainError;
use crate::repositories::SettingsRepository;

pub struct SettingsService {
    settings_repo: Arc<dyn SettingsRepository>,
}

impl SettingsService {
    pub fn new(settings_repo: Arc<dyn SettingsRepository>) -> Self {
        Self { settings_repo }
    }

    /// Returns the settings row, creating it with the built-in defaults on first use.
    pub async fn get_or_create(&self) -> Result<AppSetting, DomainError> {
        self.settings_repo
            .get_or_create(&AppSetting::with_defaults(Utc::now()))
            .await
    }

    /// Replaces both names. The logo only changes when `logo` says so.
    pub async fn update(
        &self,
        app_title: &str,
        university_name: &str,
        logo: LogoChange,
    ) -> Result<AppSetting, DomainError> {
        let update = SettingsUpdate::new(app_title, university_name, logo).map_err(|e| {
            warn!("Settings update rejected: {}", e);
            e
        })?;

        let now = Utc::now();
        let settings = self
            .settings_repo
            .update(&AppSetting::with_defaults(now), &update, now)
            .await?;

        info!("App settings updated: {}", settings.app_title);
        Ok(settings)
    }
}
