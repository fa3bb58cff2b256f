use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use hairscan_core::AppError;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::sync::Arc;
use utoipa::ToSchema;

#[derive(Debug, Deserialize, ToSchema)]
pub struct StoreAnalysisRequest {
    pub subject_id: Option<String>,
    /// Free-form analysis fragments plus optional asset metadata
    /// (`filename`, `file_size`, `file_type`, `url`, model-run flags).
    #[schema(value_type = Option<Object>)]
    pub analysis_data: Option<JsonValue>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StoreAnalysisResponse {
    pub status: String,
    pub upload_id: String,
    pub timestamp: DateTime<Utc>,
}

/// Persist client-computed analysis results as a new upload record.
#[utoipa::path(
    post,
    path = "/api/v0/scans",
    tag = "scans",
    request_body = StoreAnalysisRequest,
    responses(
        (status = 200, description = "Analysis stored", body = StoreAnalysisResponse),
        (status = 400, description = "Missing fields or invalid JSON", body = ErrorResponse),
        (status = 500, description = "Persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(operation = "store_analysis")
)]
pub async fn store_analysis(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<StoreAnalysisRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    // Validation happens before any record is created: a rejected request
    // must leave no trace in the store.
    let subject_id = request
        .subject_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("subject_id is required".to_string()))?;

    let analysis_data = request
        .analysis_data
        .as_ref()
        .ok_or_else(|| AppError::InvalidInput("analysis_data is required".to_string()))?;

    let record = state
        .ingestion
        .store_precomputed(subject_id, analysis_data)
        .await?;

    Ok(Json(StoreAnalysisResponse {
        status: "success".to_string(),
        upload_id: record.upload_id,
        timestamp: record.updated_at,
    }))
}
