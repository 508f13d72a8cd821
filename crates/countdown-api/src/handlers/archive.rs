//! Archive listing handler

use axum::extract::{rejection::QueryRejection, Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use countdown_core::repositories::ArchiveSummary;
use countdown_core::{AppSetting, CountdownSession};
use countdown_shared::Page;

use crate::error::ApiError;
use crate::response::ApiResponse;
use crate::state::AppState;

/// Kept as text so `page=-1` or `page=abc` fall back instead of failing.
#[derive(Debug, Deserialize)]
pub struct ArchiveQuery {
    pub page: Option<String>,
    pub per_page: Option<String>,
}

fn number(raw: Option<&str>) -> Option<i64> {
    raw.and_then(|value| value.trim().parse().ok())
}

#[derive(Debug, Serialize)]
pub struct ArchiveView {
    pub sessions: Page<CountdownSession>,
    pub summary: ArchiveSummary,
    pub settings: AppSetting,
}

/// Archive handler - GET /archive?page=N
pub async fn index(
    State(state): State<AppState>,
    query: Result<Query<ArchiveQuery>, QueryRejection>,
) -> Result<Json<ApiResponse<ArchiveView>>, ApiError> {
    let Query(query) = query?;

    let sessions = state
        .sessions
        .list_archive(number(query.page.as_deref()), number(query.per_page.as_deref()))
        .await?;
    let summary = state.sessions.archive_summary().await?;
    let settings = state.settings.get_or_create().await?;

    Ok(Json(ApiResponse::success(ArchiveView { sessions, summary, settings })))
}
