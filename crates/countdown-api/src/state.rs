use std::sync::Arc;

use countdown_core::services::{SessionService, SettingsService};
use countdown_shared::config::AppConfig;

#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionService>,
    pub settings: Arc<SettingsService>,
    pub config: AppConfig,
}
