use crate::error::{ErrorResponse, HttpAppError};
use crate::state::AppState;
use axum::{
    extract::{Query, State},
    response::IntoResponse,
    Json,
};
use hairscan_core::models::ContactProfile;
use hairscan_core::AppError;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Deserialize, IntoParams)]
pub struct ContactLookupQuery {
    pub subject_id: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactView {
    pub id: String,
    #[serde(rename = "firstName")]
    pub first_name: Option<String>,
    #[serde(rename = "lastName")]
    pub last_name: Option<String>,
    pub email: Option<String>,
    #[serde(rename = "fullName")]
    pub full_name: String,
}

impl From<ContactProfile> for ContactView {
    fn from(profile: ContactProfile) -> Self {
        let full_name = profile.full_name();
        ContactView {
            id: profile.id,
            first_name: profile.first_name,
            last_name: profile.last_name,
            email: profile.email,
            full_name,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ContactLookupResponse {
    pub success: bool,
    pub contact: ContactView,
}

/// Resolve a subject identifier to a display profile via the external
/// contact directory.
#[utoipa::path(
    get,
    path = "/api/v0/contacts",
    tag = "contacts",
    params(ContactLookupQuery),
    responses(
        (status = 200, description = "Contact found", body = ContactLookupResponse),
        (status = 400, description = "Missing subject_id", body = ErrorResponse),
        (status = 401, description = "Upstream auth failure", body = ErrorResponse),
        (status = 404, description = "Contact not found", body = ErrorResponse)
    )
)]
#[tracing::instrument(
    skip(state, query),
    fields(operation = "contact_lookup")
)]
pub async fn contact_lookup(
    State(state): State<Arc<AppState>>,
    Query(query): Query<ContactLookupQuery>,
) -> Result<impl IntoResponse, HttpAppError> {
    let subject_id = query
        .subject_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| AppError::InvalidInput("subject_id parameter is required".to_string()))?;

    let directory = state.directory.as_ref().ok_or_else(|| {
        AppError::Directory("subject directory is not configured".to_string())
    })?;

    let profile = directory
        .resolve(subject_id)
        .await?
        .ok_or_else(|| AppError::NotFound(format!("contact {} not found", subject_id)))?;

    Ok(Json(ContactLookupResponse {
        success: true,
        contact: profile.into(),
    }))
}
