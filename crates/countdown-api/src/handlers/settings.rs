//! Branding settings handlers

use axum::{extract::rejection::JsonRejection, extract::State, Json};
use serde::{Deserialize, Deserializer};

use countdown_core::{AppSetting, LogoChange};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct UpdateSettingsRequest {
    #[serde(default)]
    pub app_title: String,
    #[serde(default)]
    pub university_name: String,
    /// `None` when the field was left out, `Some(None)` for an explicit null.
    #[serde(default, deserialize_with = "sent")]
    pub logo: Option<Option<String>>,
}

fn sent<'de, D>(deserializer: D) -> Result<Option<Option<String>>, D::Error>
where
    D: Deserializer<'de>,
{
    Option::<String>::deserialize(deserializer).map(Some)
}

/// Settings handler - GET /app-settings
pub async fn show(State(state): State<AppState>) -> Result<Json<ApiResponse<AppSetting>>, ApiError> {
    let settings = state.settings.get_or_create().await?;
    Ok(Json(ApiResponse::success(settings)))
}

/// Update settings handler - PATCH /app-settings
pub async fn update(
    State(state): State<AppState>,
    payload: Result<Json<UpdateSettingsRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<AppSetting>>, ApiError> {
    let Json(payload) = payload?;

    let logo = match &payload.logo {
        None => LogoChange::Keep,
        Some(logo) => LogoChange::from_sent(logo.as_deref()),
    };

    let settings = state
        .settings
        .update(&payload.app_title, &payload.university_name, logo)
        .await?;

    Ok(Json(ApiResponse::success(settings)))
}
