// ============================================================================
// Countdown API - Countdown Handlers
// File: crates/countdown-api/src/handlers/countdown.rs
// ============================================================================
//! Countdown view, start, and stop handlers

use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection},
        Path, State,
    },
    http::StatusCode,
    Json,
};
use chrono::Utc;
use serde::{Deserialize, Serialize};

use countdown_core::timer::{TimerSnapshot, Urgency};
use countdown_core::{AppSetting, CloseSession, CountdownSession, IntegerInput};

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Start request payload
#[derive(Debug, Deserialize)]
pub struct StartSessionRequest {
    #[serde(default)]
    pub participant_name: String,
    /// Numeric strings are accepted; other types fail validation on this field.
    #[serde(default)]
    pub duration_minutes: IntegerInput,
}

/// Stop request payload
#[derive(Debug, Deserialize)]
pub struct StopSessionRequest {
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub overtime_seconds: IntegerInput,
}

/// Derived timer plus the values a display needs
#[derive(Debug, Serialize)]
pub struct TimerView {
    #[serde(flatten)]
    pub snapshot: TimerSnapshot,
    pub display: String,
    pub urgency: Urgency,
    pub progress_percent: f64,
}

impl From<TimerSnapshot> for TimerView {
    fn from(snapshot: TimerSnapshot) -> Self {
        Self {
            display: snapshot.display(),
            urgency: snapshot.urgency(),
            progress_percent: snapshot.progress_percent(),
            snapshot,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CountdownView {
    pub active_session: Option<CountdownSession>,
    pub settings: AppSetting,
    pub timer: Option<TimerView>,
}

#[derive(Debug, Serialize)]
pub struct StopSessionResponse {
    pub session: CountdownSession,
    pub active_session: Option<CountdownSession>,
}

/// Countdown view handler - GET /countdown
pub async fn show(State(state): State<AppState>) -> Result<Json<ApiResponse<CountdownView>>, ApiError> {
    let active_session = state.sessions.active_session().await?;
    let settings = state.settings.get_or_create().await?;
    let timer = active_session
        .as_ref()
        .map(|session| TimerView::from(session.timer_at(Utc::now())));

    Ok(Json(ApiResponse::success(CountdownView {
        active_session,
        settings,
        timer,
    })))
}

/// Start handler - POST /countdown
pub async fn start(
    State(state): State<AppState>,
    payload: Result<Json<StartSessionRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<ApiResponse<CountdownSession>>), ApiError> {
    let Json(payload) = payload?;

    let session = state
        .sessions
        .start_session(&payload.participant_name, payload.duration_minutes)
        .await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(session))))
}

/// Stop handler - PATCH /countdown/{id}
pub async fn stop(
    State(state): State<AppState>,
    session_id: Result<Path<i64>, PathRejection>,
    payload: Result<Json<StopSessionRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<StopSessionResponse>>, ApiError> {
    let Path(session_id) = session_id?;
    let Json(payload) = payload?;

    let request = CloseSession {
        status: payload.status,
        overtime_seconds: payload.overtime_seconds,
    };
    let session = state.sessions.stop_session(session_id, request).await?;

    Ok(Json(ApiResponse::success(StopSessionResponse {
        session,
        active_session: None,
    })))
}
