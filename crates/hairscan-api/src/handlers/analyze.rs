use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::services::ingestion::AnalyzeCommand;
use crate::state::AppState;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{DateTime, Utc};
use hairscan_core::models::DetectionParams;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::Arc;
use utoipa::ToSchema;

fn default_model_run() -> bool {
    true
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct AnalyzeScanRequest {
    pub subject_id: Option<String>,
    /// Inline image bytes, base64-encoded. Takes precedence over `fileName`.
    #[serde(rename = "imageBase64")]
    pub image_base64: Option<String>,
    /// Name of an object previously uploaded with an issued credential.
    #[serde(rename = "fileName")]
    pub file_name: Option<String>,
    #[serde(flatten)]
    pub params: DetectionParams,
    #[serde(default = "default_model_run")]
    pub density_model_run: bool,
    #[serde(default = "default_model_run")]
    pub thickness_model_run: bool,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct AnalyzeScanResponse {
    pub status: String,
    pub upload_id: String,
    pub total_predictions: usize,
    pub class_counts: BTreeMap<String, u64>,
    pub timestamp: DateTime<Utc>,
}

/// Run detection over a scan image and persist the outcome as a new upload
/// record. A failed inference leaves exactly one `error` record; retrying
/// means submitting a new analysis.
#[utoipa::path(
    post,
    path = "/api/v0/scans/analyze",
    tag = "scans",
    request_body = AnalyzeScanRequest,
    responses(
        (status = 200, description = "Analysis completed and stored", body = AnalyzeScanResponse),
        (status = 400, description = "Missing image or invalid input", body = ErrorResponse),
        (status = 404, description = "Named object not found", body = ErrorResponse),
        (status = 500, description = "Inference or persistence failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(operation = "analyze_scan")
)]
pub async fn analyze_scan(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<AnalyzeScanRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    let outcome = state
        .ingestion
        .analyze_image(AnalyzeCommand {
            subject_id: request.subject_id,
            image_base64: request.image_base64,
            file_name: request.file_name,
            params: request.params,
            density_model_run: request.density_model_run,
            thickness_model_run: request.thickness_model_run,
        })
        .await?;

    Ok(Json(AnalyzeScanResponse {
        status: "success".to_string(),
        upload_id: outcome.record.upload_id,
        total_predictions: outcome.total_predictions,
        class_counts: outcome.class_counts,
        timestamp: outcome.record.updated_at,
    }))
}
