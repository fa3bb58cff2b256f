//! Subject profile resolved from the external contact directory.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Display profile for a subject. All naming fields are optional; the
/// directory is a best-effort collaborator and ingestion never depends on it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ContactProfile {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
}

impl ContactProfile {
    /// Concatenated display name; falls back to the email, then the id.
    pub fn full_name(&self) -> String {
        let name = [self.first_name.as_deref(), self.last_name.as_deref()]
            .iter()
            .flatten()
            .copied()
            .collect::<Vec<_>>()
            .join(" ");

        if !name.trim().is_empty() {
            name
        } else if let Some(email) = &self.email {
            email.clone()
        } else {
            self.id.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_name_joins_parts() {
        let profile = ContactProfile {
            id: "c-1".to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: Some("ada@example.com".to_string()),
        };
        assert_eq!(profile.full_name(), "Ada Lovelace");
    }

    #[test]
    fn full_name_falls_back_to_email_then_id() {
        let mut profile = ContactProfile {
            id: "c-2".to_string(),
            first_name: None,
            last_name: None,
            email: Some("someone@example.com".to_string()),
        };
        assert_eq!(profile.full_name(), "someone@example.com");

        profile.email = None;
        assert_eq!(profile.full_name(), "c-2");
    }
}
