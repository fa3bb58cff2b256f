use crate::error::{ErrorResponse, HttpAppError, ValidatedJson};
use crate::state::AppState;
use crate::validation::validate_extension_content_type_match;
use axum::{extract::State, response::IntoResponse, Json};
use chrono::{Duration, Utc};
use hairscan_core::constants::UPLOAD_CREDENTIAL_TTL;
use hairscan_core::models::{UploadCredentialRequest, UploadCredentialResponse};
use hairscan_core::AppError;
use hairscan_storage::scan_object_key;
use std::sync::Arc;
use validator::Validate;

/// Issue a time-limited write credential (presigned PUT URL) for one scan
/// object. The client uploads directly to the object store; no image bytes
/// ever pass through this service.
#[utoipa::path(
    post,
    path = "/api/v0/uploads/credentials",
    tag = "uploads",
    request_body = UploadCredentialRequest,
    responses(
        (status = 200, description = "Upload credential issued", body = UploadCredentialResponse),
        (status = 400, description = "Invalid input", body = ErrorResponse),
        (status = 500, description = "Credential backend failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, request),
    fields(operation = "issue_upload_credential")
)]
pub async fn issue_upload_credential(
    State(state): State<Arc<AppState>>,
    ValidatedJson(request): ValidatedJson<UploadCredentialRequest>,
) -> Result<impl IntoResponse, HttpAppError> {
    request.validate()?;
    validate_extension_content_type_match(&request.file_name, &request.content_type)
        .map_err(AppError::InvalidInput)?;

    let storage_key = scan_object_key(&request.file_name)?;

    // Expiry is pinned before the signing call so the advertised instant is
    // exactly the credential lifetime from issuance.
    let expires_at = Utc::now() + Duration::seconds(UPLOAD_CREDENTIAL_TTL.as_secs() as i64);

    let url = state
        .storage
        .presigned_put_url(&storage_key, &request.content_type, UPLOAD_CREDENTIAL_TTL)
        .await?;

    tracing::info!(
        file_name = %request.file_name,
        content_type = %request.content_type,
        "Upload credential issued"
    );

    Ok(Json(UploadCredentialResponse {
        url,
        file_name: request.file_name,
        content_type: request.content_type,
        expires_at,
    }))
}
