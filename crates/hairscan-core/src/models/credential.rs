//! Upload credential request/response models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

/// Request for a time-limited write credential for one named object.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct UploadCredentialRequest {
    /// Target object name within the scan prefix
    #[serde(rename = "fileName")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "fileName must be between 1 and 255 characters"
    ))]
    pub file_name: String,
    /// Declared MIME type the credential authorizes
    #[serde(rename = "contentType")]
    #[validate(length(
        min = 1,
        max = 255,
        message = "contentType must be between 1 and 255 characters"
    ))]
    pub content_type: String,
}

/// Issued credential: a presigned PUT URL scoped to one object and content
/// type, expiring 15 minutes after issuance.
#[derive(Debug, Serialize, ToSchema)]
pub struct UploadCredentialResponse {
    pub url: String,
    #[serde(rename = "fileName")]
    pub file_name: String,
    #[serde(rename = "contentType")]
    pub content_type: String,
    pub expires_at: DateTime<Utc>,
}
