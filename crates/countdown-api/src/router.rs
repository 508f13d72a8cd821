//! Route table and middleware stack

use std::time::Duration;

use axum::{
    http::{header, HeaderValue, Method},
    routing::{get, patch},
    Router,
};
use tower::ServiceBuilder;
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::{DefaultMakeSpan, TraceLayer},
};
use tracing::warn;

use crate::handlers::{archive, countdown, health, settings};
use crate::state::AppState;

pub fn build_router(state: AppState) -> Router {
    let cors = cors_layer(&state.config.app.cors_allowed_origins);
    let timeout = Duration::from_secs(state.config.app.request_timeout_seconds);

    Router::new()
        // Health check
        .route("/health-check", get(health::health_check))
        // Countdown routes
        .route("/countdown", get(countdown::show).post(countdown::start))
        .route("/countdown/{id}", patch(countdown::stop))
        // Archive routes
        .route("/archive", get(archive::index))
        // App settings routes
        .route("/app-settings", get(settings::show).patch(settings::update))
        // Add State
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::default().include_headers(true)),
                )
                .layer(PropagateRequestIdLayer::x_request_id())
                .layer(TimeoutLayer::new(timeout))
                .layer(cors),
        )
}

/// Any origin when the list is empty, otherwise only the listed ones.
fn cors_layer(allowed_origins: &[String]) -> CorsLayer {
    let base = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PATCH,
            Method::OPTIONS,
        ])
        .allow_headers([header::CONTENT_TYPE, header::ACCEPT]);

    if allowed_origins.is_empty() {
        return base.allow_origin(AllowOrigin::any());
    }

    let origins: Vec<HeaderValue> = allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("Ignoring invalid CORS origin {}: {}", origin, e);
                None
            }
        })
        .collect();

    base.allow_origin(AllowOrigin::list(origins))
}
