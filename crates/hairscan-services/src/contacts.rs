//! Subject directory: read-only contact lookup.

use anyhow::{Context, Result};
use async_trait::async_trait;
use hairscan_core::models::ContactProfile;
use hairscan_core::AppError;
use serde::Deserialize;
use std::time::Duration;

const DIRECTORY_TIMEOUT: Duration = Duration::from_secs(10);

/// Resolves an opaque subject identifier to a display profile.
///
/// This is a non-critical dependency: ingestion must never block on it.
/// Callers on the ingestion path use [`resolve_optional`], which degrades any
/// failure to `None` with a log line; only the dedicated lookup endpoint
/// surfaces directory errors to clients.
///
/// [`resolve_optional`]: SubjectDirectory::resolve_optional
#[async_trait]
pub trait SubjectDirectory: Send + Sync {
    /// `Ok(None)` means the directory answered and the subject is unknown.
    async fn resolve(&self, subject_id: &str) -> Result<Option<ContactProfile>, AppError>;

    /// Best-effort variant for the ingestion path.
    async fn resolve_optional(&self, subject_id: &str) -> Option<ContactProfile> {
        match self.resolve(subject_id).await {
            Ok(profile) => profile,
            Err(e) => {
                tracing::warn!(subject_id = %subject_id, error = %e, "Subject resolution failed; continuing without profile");
                None
            }
        }
    }
}

/// Wire shape of a directory contact.
#[derive(Debug, Deserialize)]
struct DirectoryContact {
    id: String,
    #[serde(rename = "firstName")]
    first_name: Option<String>,
    #[serde(rename = "lastName")]
    last_name: Option<String>,
    email: Option<String>,
}

impl From<DirectoryContact> for ContactProfile {
    fn from(contact: DirectoryContact) -> Self {
        ContactProfile {
            id: contact.id,
            first_name: contact.first_name,
            last_name: contact.last_name,
            email: contact.email,
        }
    }
}

/// HTTP client for the contact directory.
pub struct HttpSubjectDirectory {
    http_client: reqwest::Client,
    base_url: String,
    api_token: Option<String>,
}

impl HttpSubjectDirectory {
    pub fn new(base_url: String, api_token: Option<String>) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(DIRECTORY_TIMEOUT)
            .build()
            .context("Failed to create HTTP client for the subject directory")?;

        Ok(Self {
            http_client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_token,
        })
    }
}

#[async_trait]
impl SubjectDirectory for HttpSubjectDirectory {
    async fn resolve(&self, subject_id: &str) -> Result<Option<ContactProfile>, AppError> {
        let url = format!("{}/contacts/{}", self.base_url, subject_id);

        let mut request = self.http_client.get(&url);
        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Directory(format!("request failed: {}", e)))?;

        match response.status() {
            status if status.is_success() => {
                let contact: DirectoryContact = response
                    .json()
                    .await
                    .map_err(|e| AppError::Directory(format!("unparseable response: {}", e)))?;
                Ok(Some(contact.into()))
            }
            reqwest::StatusCode::NOT_FOUND => Ok(None),
            reqwest::StatusCode::UNAUTHORIZED | reqwest::StatusCode::FORBIDDEN => Err(
                AppError::Unauthorized("contact directory rejected the configured credentials".to_string()),
            ),
            status => {
                let body = response.text().await.unwrap_or_default();
                Err(AppError::Directory(format!(
                    "directory returned {}: {}",
                    status, body
                )))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn contact_wire_shape_maps_to_profile() {
        let raw = r#"{"id": "c-7", "firstName": "Grace", "lastName": "Hopper", "email": "grace@example.com"}"#;
        let contact: DirectoryContact = serde_json::from_str(raw).unwrap();
        let profile: ContactProfile = contact.into();
        assert_eq!(profile.full_name(), "Grace Hopper");
    }

    #[test]
    fn missing_name_fields_are_tolerated() {
        let raw = r#"{"id": "c-8"}"#;
        let contact: DirectoryContact = serde_json::from_str(raw).unwrap();
        let profile: ContactProfile = contact.into();
        assert_eq!(profile.full_name(), "c-8");
    }
}
