//! Branding settings singleton

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use countdown_shared::constants::{
    DEFAULT_APP_TITLE, DEFAULT_UNIVERSITY_NAME, MAX_LOGO_LENGTH, MAX_SETTINGS_TEXT_LENGTH,
};

use crate::error::{DomainError, FieldErrors};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppSetting {
    pub id: i32,
    pub logo: Option<String>,
    pub app_title: String,
    pub university_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl AppSetting {
    /// The only row id the settings table accepts.
    pub const SINGLETON_ID: i32 = 1;

    pub fn with_defaults(now: DateTime<Utc>) -> Self {
        Self {
            id: Self::SINGLETON_ID,
            logo: None,
            app_title: DEFAULT_APP_TITLE.to_string(),
            university_name: DEFAULT_UNIVERSITY_NAME.to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, update: &SettingsUpdate, now: DateTime<Utc>) {
        self.app_title = update.app_title.clone();
        self.university_name = update.university_name.clone();
        match &update.logo {
            LogoChange::Keep => {}
            LogoChange::Clear => self.logo = None,
            LogoChange::Set(logo) => self.logo = Some(logo.clone()),
        }
        self.updated_at = now;
    }
}

/// What an update does to the stored logo.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LogoChange {
    /// Field left out of the request.
    #[default]
    Keep,
    Clear,
    Set(String),
}

impl LogoChange {
    /// A sent field: `null` or blank clears, anything else replaces.
    pub fn from_sent(logo: Option<&str>) -> Self {
        match logo.map(str::trim) {
            Some(logo) if !logo.is_empty() => LogoChange::Set(logo.to_string()),
            _ => LogoChange::Clear,
        }
    }

    pub fn replaces(&self) -> bool {
        !matches!(self, LogoChange::Keep)
    }

    /// The value written when the logo is replaced.
    pub fn value(&self) -> Option<&str> {
        match self {
            LogoChange::Set(logo) => Some(logo),
            LogoChange::Keep | LogoChange::Clear => None,
        }
    }
}

/// Validated replacement values for the settings row.
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct SettingsUpdate {
    #[validate(length(
        min = 1,
        max = MAX_SETTINGS_TEXT_LENGTH,
        message = "App title is required and may not exceed 255 characters"
    ))]
    pub app_title: String,

    #[validate(length(
        min = 1,
        max = MAX_SETTINGS_TEXT_LENGTH,
        message = "University name is required and may not exceed 255 characters"
    ))]
    pub university_name: String,

    pub logo: LogoChange,
}

impl SettingsUpdate {
    pub fn new(
        app_title: &str,
        university_name: &str,
        logo: LogoChange,
    ) -> Result<Self, DomainError> {
        let update = Self {
            app_title: app_title.trim().to_string(),
            university_name: university_name.trim().to_string(),
            logo,
        };

        let mut errors = FieldErrors::new();
        if let Err(e) = update.validate() {
            errors.merge(e.into());
        }
        let logo_length = update.logo.value().map_or(0, |logo| logo.chars().count());
        if logo_length as u64 > MAX_LOGO_LENGTH {
            errors.add("logo", "Logo path may not exceed 500 characters");
        }
        errors.into_result()?;

        Ok(update)
    }
}
