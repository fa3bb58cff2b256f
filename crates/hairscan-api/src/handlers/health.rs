use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use serde::Serialize;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub environment: String,
    pub inference_configured: bool,
    pub directory_configured: bool,
    /// Records not yet in a terminal status; `null` when the store is
    /// unreachable. Lets operators spot stuck ingestions.
    pub in_flight_uploads: Option<i64>,
}

/// Configuration and store readiness report.
#[utoipa::path(
    get,
    path = "/health",
    tag = "health",
    responses(
        (status = 200, description = "Service health", body = HealthResponse)
    )
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let in_flight_uploads = match state.uploads.count_in_flight().await {
        Ok(count) => Some(count),
        Err(e) => {
            tracing::warn!(error = %e, "Health check could not reach the store");
            None
        }
    };

    let status = if in_flight_uploads.is_some() {
        "ok"
    } else {
        "degraded"
    };

    Json(HealthResponse {
        status: status.to_string(),
        environment: state.config.environment.clone(),
        inference_configured: state.config.inference_endpoint.is_some(),
        directory_configured: state.directory.is_some(),
        in_flight_uploads,
    })
}
