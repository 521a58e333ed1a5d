//! Prometheus exposition.

use crate::server::AppState;
use axum::{extract::State, http::header, response::IntoResponse};
use custom_orders_web::AppError;

/// `GET /metrics`
///
/// # Errors
///
/// 503 when no exporter is installed (tests, embedded use).
#[allow(clippy::unused_async)]
pub async fn render(State(state): State<AppState>) -> Result<impl IntoResponse, AppError> {
    let handle = state
        .metrics
        .as_ref()
        .ok_or_else(|| AppError::unavailable("Metrics exporter not installed"))?;

    Ok((
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        handle.render(),
    ))
}
