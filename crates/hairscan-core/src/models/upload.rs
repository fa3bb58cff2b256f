//! Upload record: the persisted entity describing one ingestion attempt.

use std::fmt::{Display, Formatter, Result as FmtResult};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map as JsonMap, Value as JsonValue};
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of an upload record.
///
/// `pending → processing → {completed, error}`; `completed` and `error` are
/// terminal and no transition ever leaves them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::Type))]
#[cfg_attr(
    feature = "sqlx",
    sqlx(type_name = "processing_status", rename_all = "lowercase")
)]
#[serde(rename_all = "lowercase")]
pub enum ProcessingStatus {
    Pending,
    Processing,
    Completed,
    Error,
}

impl ProcessingStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProcessingStatus::Completed | ProcessingStatus::Error)
    }
}

impl Display for ProcessingStatus {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            ProcessingStatus::Pending => write!(f, "pending"),
            ProcessingStatus::Processing => write!(f, "processing"),
            ProcessingStatus::Completed => write!(f, "completed"),
            ProcessingStatus::Error => write!(f, "error"),
        }
    }
}

/// Persisted upload record (table `scan_uploads`).
///
/// `analysis_results` is kept as raw JSON here; [`AnalysisDocument`] is the
/// typed boundary shape used when the document is built.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[cfg_attr(feature = "sqlx", derive(sqlx::FromRow))]
pub struct UploadRecord {
    pub upload_id: String,
    pub subject_id: String,
    pub filename: String,
    pub file_size: i64,
    pub file_type: String,
    pub object_url: String,
    pub density_model_run: bool,
    pub thickness_model_run: bool,
    pub processing_status: ProcessingStatus,
    #[schema(value_type = Option<Object>)]
    pub analysis_results: Option<JsonValue>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied when creating a new upload record.
#[derive(Debug, Clone)]
pub struct NewUpload {
    pub subject_id: String,
    pub filename: String,
    pub file_size: i64,
    pub file_type: String,
    pub object_url: String,
    pub density_model_run: bool,
    pub thickness_model_run: bool,
}

impl NewUpload {
    /// A record with the source-asset defaults used when the client supplies
    /// only analysis fragments (camera-capture flow).
    pub fn for_subject(subject_id: impl Into<String>) -> Self {
        NewUpload {
            subject_id: subject_id.into(),
            filename: "camera-capture.jpg".to_string(),
            file_size: 0,
            file_type: "image/jpeg".to_string(),
            object_url: String::new(),
            density_model_run: true,
            thickness_model_run: true,
        }
    }
}

/// The analysis results document attached to a completed record.
///
/// Known fragments are optional; the document's shape varies with which
/// sub-models ran. Unknown fragment kinds land in `extra` and survive
/// round-trips, so the schema can evolve without migration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct AnalysisDocument {
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub density_results: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub thickness_results: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub combined_metrics: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub model_parameters: Option<JsonValue>,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub image_metadata: Option<JsonValue>,
    pub processing_timestamp: DateTime<Utc>,
    /// Back-reference to the owning record.
    pub upload_id: String,
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: JsonMap<String, JsonValue>,
}

impl AnalysisDocument {
    pub fn new(upload_id: impl Into<String>) -> Self {
        AnalysisDocument {
            density_results: None,
            thickness_results: None,
            combined_metrics: None,
            model_parameters: None,
            image_metadata: None,
            processing_timestamp: Utc::now(),
            upload_id: upload_id.into(),
            extra: JsonMap::new(),
        }
    }

    /// True when at least one result fragment is present.
    pub fn has_fragments(&self) -> bool {
        self.density_results.is_some()
            || self.thickness_results.is_some()
            || self.combined_metrics.is_some()
            || self.model_parameters.is_some()
            || self.image_metadata.is_some()
            || !self.extra.is_empty()
    }

    pub fn into_value(self) -> JsonValue {
        serde_json::to_value(self).expect("analysis document serializes to JSON")
    }
}

fn short_token() -> String {
    // 12 hex chars of a v4 UUID: 48 random bits.
    Uuid::new_v4().simple().to_string()[..12].to_string()
}

/// Allocate a new globally unique upload identifier.
///
/// The millisecond timestamp keeps identifiers roughly sortable; the random
/// suffix keeps near-simultaneous requests from colliding.
pub fn new_upload_id() -> String {
    format!("upload-{}-{}", Utc::now().timestamp_millis(), short_token())
}

/// Allocate a subject identifier for anonymous ingestion.
pub fn new_subject_id() -> String {
    format!("subject-{}-{}", Utc::now().timestamp_millis(), short_token())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::collections::HashSet;
    use std::thread;

    #[test]
    fn terminal_statuses() {
        assert!(!ProcessingStatus::Pending.is_terminal());
        assert!(!ProcessingStatus::Processing.is_terminal());
        assert!(ProcessingStatus::Completed.is_terminal());
        assert!(ProcessingStatus::Error.is_terminal());
    }

    #[test]
    fn status_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProcessingStatus::Completed).unwrap(),
            "\"completed\""
        );
        assert_eq!(ProcessingStatus::Error.to_string(), "error");
    }

    #[test]
    fn upload_ids_are_unique_under_concurrency() {
        let handles: Vec<_> = (0..8)
            .map(|_| thread::spawn(|| (0..500).map(|_| new_upload_id()).collect::<Vec<_>>()))
            .collect();

        let mut seen = HashSet::new();
        for handle in handles {
            for id in handle.join().unwrap() {
                assert!(id.starts_with("upload-"));
                assert!(seen.insert(id), "duplicate upload_id generated");
            }
        }
        assert_eq!(seen.len(), 4000);
    }

    #[test]
    fn document_round_trips_with_unknown_fragments() {
        let mut doc = AnalysisDocument::new("upload-1");
        doc.density_results = Some(json!({"count": 12}));
        doc.extra
            .insert("detection_results".to_string(), json!({"total": 3}));

        let value = serde_json::to_value(&doc).unwrap();
        assert_eq!(value["density_results"]["count"], 12);
        assert_eq!(value["detection_results"]["total"], 3);
        // Absent fragments are omitted entirely, not serialized as null.
        assert!(value.get("thickness_results").is_none());

        let back: AnalysisDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, doc);
    }

    #[test]
    fn empty_document_has_no_fragments() {
        let doc = AnalysisDocument::new("upload-1");
        assert!(!doc.has_fragments());
        assert_eq!(doc.upload_id, "upload-1");
    }
}
