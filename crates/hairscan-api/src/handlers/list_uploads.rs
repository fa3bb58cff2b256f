use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use hairscan_core::constants::{DEFAULT_LIST_LIMIT, MAX_LIST_LIMIT};
use hairscan_core::models::UploadRecord;
use hairscan_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ListUploadsQuery {
    pub subject_id: Option<String>,
    pub limit: Option<i64>,
    pub offset: Option<i64>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ListUploadsResponse {
    pub success: bool,
    pub subject_id: String,
    pub uploads: Vec<UploadRecord>,
    pub total_count: i64,
    pub limit: i64,
    pub offset: i64,
}

/// List a subject's upload records, most recent first. A subject with no
/// records gets an empty page, not an error.
#[utoipa::path(
    get,
    path = "/api/v0/scans",
    tag = "scans",
    params(ListUploadsQuery),
    responses(
        (status = 200, description = "Upload history page", body = ListUploadsResponse),
        (status = 400, description = "Missing subject_id", body = ErrorResponse),
        (status = 500, description = "Internal server error", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(operation = "list_uploads")
)]
pub async fn list_uploads(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ListUploadsQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let subject_id = query
        .subject_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("subject_id parameter is required".to_string()))?;

    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);
    let offset = query.offset.unwrap_or(0).max(0);

    let page = state
        .uploads
        .list_for_subject(subject_id, limit, offset)
        .await?;

    Ok(Json(ListUploadsResponse {
        success: true,
        subject_id: subject_id.to_string(),
        uploads: page.uploads,
        total_count: page.total_count,
        limit,
        offset,
    }))
}
