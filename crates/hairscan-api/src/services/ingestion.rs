//! Ingestion coordinator
//!
//! Orchestrates the end-to-end flow: validate → create record → (inference)
//! → normalize → attach results, or mark the record as errored with the
//! triggering reason captured verbatim. This is the one place that decides
//! what counts as a completed ingestion: the inference output must have been
//! returned, normalized, and persisted. A failed ingestion is never retried
//! against the same record; a retry is a new ingestion with a new upload_id.

use std::collections::BTreeMap;
use std::sync::Arc;

use base64::Engine;
use hairscan_core::models::{
    new_subject_id, AnalysisDocument, DetectionParams, NewUpload, Prediction, UploadRecord,
};
use hairscan_core::AppError;
use hairscan_db::UploadRepository;
use hairscan_services::{InferenceGateway, SubjectDirectory};
use hairscan_storage::{scan_object_key, Storage};
use serde_json::{json, Value as JsonValue};

/// Metadata keys of the store-analysis payload that describe the source
/// asset rather than analysis output.
const ASSET_METADATA_KEYS: [&str; 6] = [
    "filename",
    "file_size",
    "file_type",
    "url",
    "density_model_run",
    "thickness_model_run",
];

/// Known result fragments lifted into typed document fields.
const KNOWN_FRAGMENTS: [&str; 5] = [
    "density_results",
    "thickness_results",
    "combined_metrics",
    "model_parameters",
    "image_metadata",
];

/// Server-side analysis request, already validated at the HTTP boundary.
#[derive(Debug)]
pub struct AnalyzeCommand {
    pub subject_id: Option<String>,
    /// Inline image bytes, base64-encoded.
    pub image_base64: Option<String>,
    /// Name of an object previously uploaded with an issued credential.
    pub file_name: Option<String>,
    pub params: DetectionParams,
    pub density_model_run: bool,
    pub thickness_model_run: bool,
}

/// Outcome of a server-side analysis ingestion.
#[derive(Debug)]
pub struct AnalyzeOutcome {
    pub record: UploadRecord,
    pub total_predictions: usize,
    pub class_counts: BTreeMap<String, u64>,
}

#[derive(Clone)]
pub struct IngestionService {
    uploads: UploadRepository,
    storage: Arc<dyn Storage>,
    inference: Arc<dyn InferenceGateway>,
    directory: Option<Arc<dyn SubjectDirectory>>,
}

impl IngestionService {
    pub fn new(
        uploads: UploadRepository,
        storage: Arc<dyn Storage>,
        inference: Arc<dyn InferenceGateway>,
        directory: Option<Arc<dyn SubjectDirectory>>,
    ) -> Self {
        Self {
            uploads,
            storage,
            inference,
            directory,
        }
    }

    /// Persist client-computed analysis fragments for a subject.
    ///
    /// The record is created in `processing` and completed in a second,
    /// guarded transition, so a failure between the two steps leaves a
    /// `processing` record that callers can observe and clean up by id.
    pub async fn store_precomputed(
        &self,
        subject_id: &str,
        analysis_data: &JsonValue,
    ) -> Result<UploadRecord, AppError> {
        let data = analysis_data.as_object().ok_or_else(|| {
            AppError::InvalidInput("analysis_data must be a JSON object".to_string())
        })?;

        self.log_subject_profile(subject_id).await;

        let mut new_upload = NewUpload::for_subject(subject_id);
        if let Some(filename) = data.get("filename").and_then(JsonValue::as_str) {
            new_upload.filename = filename.to_string();
        }
        if let Some(size) = data.get("file_size").and_then(JsonValue::as_i64) {
            new_upload.file_size = size;
        }
        if let Some(file_type) = data.get("file_type").and_then(JsonValue::as_str) {
            new_upload.file_type = file_type.to_string();
        }
        if let Some(url) = data.get("url").and_then(JsonValue::as_str) {
            new_upload.object_url = url.to_string();
        }
        if let Some(flag) = data.get("density_model_run").and_then(JsonValue::as_bool) {
            new_upload.density_model_run = flag;
        }
        if let Some(flag) = data.get("thickness_model_run").and_then(JsonValue::as_bool) {
            new_upload.thickness_model_run = flag;
        }

        let record = self.uploads.create(new_upload).await?;
        let document = document_from_fragments(&record.upload_id, data);

        match self.uploads.attach_results(&record.upload_id, document).await {
            Ok(completed) => Ok(completed),
            Err(e) => {
                self.demote_to_error(&record.upload_id, &e.to_string()).await;
                Err(e)
            }
        }
    }

    /// Run detection over a scan image and persist the normalized outcome.
    pub async fn analyze_image(&self, command: AnalyzeCommand) -> Result<AnalyzeOutcome, AppError> {
        let (image, filename, object_url) = self.resolve_image(&command).await?;

        let subject_id = command
            .subject_id
            .clone()
            .filter(|s| !s.trim().is_empty())
            .unwrap_or_else(new_subject_id);

        self.log_subject_profile(&subject_id).await;

        let new_upload = NewUpload {
            subject_id,
            filename,
            file_size: image.len() as i64,
            file_type: "image/jpeg".to_string(),
            object_url,
            density_model_run: command.density_model_run,
            thickness_model_run: command.thickness_model_run,
        };
        let record = self.uploads.create(new_upload).await?;

        let predictions = match self.inference.detect(&image, &command.params).await {
            Ok(predictions) => predictions,
            Err(e) => {
                self.demote_to_error(&record.upload_id, &e.to_string()).await;
                return Err(e);
            }
        };

        if predictions.is_empty() {
            let reason = "no predictions returned from model";
            self.demote_to_error(&record.upload_id, reason).await;
            return Err(AppError::BadRequest(reason.to_string()));
        }

        let class_counts = class_counts(&predictions);
        let total_predictions = predictions.len();
        let document = document_from_predictions(
            &record.upload_id,
            &predictions,
            &command.params,
            image.len(),
        );

        let record = match self.uploads.attach_results(&record.upload_id, document).await {
            Ok(completed) => completed,
            Err(e) => {
                self.demote_to_error(&record.upload_id, &e.to_string()).await;
                return Err(e);
            }
        };

        Ok(AnalyzeOutcome {
            record,
            total_predictions,
            class_counts,
        })
    }

    /// Resolve the image bytes for an analyze command: inline base64 takes
    /// precedence, otherwise the named object is fetched from the store.
    async fn resolve_image(
        &self,
        command: &AnalyzeCommand,
    ) -> Result<(Vec<u8>, String, String), AppError> {
        if let Some(encoded) = &command.image_base64 {
            let bytes = base64::engine::general_purpose::STANDARD
                .decode(encoded.as_bytes())
                .map_err(|e| AppError::InvalidInput(format!("imageBase64 is not valid base64: {}", e)))?;
            if bytes.is_empty() {
                return Err(AppError::InvalidInput("imageBase64 decoded to an empty image".to_string()));
            }
            return Ok((bytes, "camera-capture.jpg".to_string(), String::new()));
        }

        if let Some(file_name) = &command.file_name {
            let key = scan_object_key(file_name)?;
            if !self.storage.exists(&key).await? {
                return Err(AppError::NotFound(format!("object {} not found", key)));
            }
            let bytes = self.storage.download(&key).await?;
            let url = self.storage.public_url(&key);
            return Ok((bytes, file_name.clone(), url));
        }

        Err(AppError::InvalidInput(
            "either imageBase64 or fileName is required".to_string(),
        ))
    }

    /// Best-effort subject enrichment; never blocks or fails ingestion.
    async fn log_subject_profile(&self, subject_id: &str) {
        if let Some(directory) = &self.directory {
            if let Some(profile) = directory.resolve_optional(subject_id).await {
                tracing::debug!(
                    subject_id = %subject_id,
                    subject_name = %profile.full_name(),
                    "Resolved subject profile"
                );
            }
        }
    }

    /// Downgrade a record to `error` after a failed step. A failure here is
    /// logged but not propagated: the original error is the one the caller
    /// needs, and the record stays observable in its last known status.
    async fn demote_to_error(&self, upload_id: &str, reason: &str) {
        if let Err(e) = self.uploads.mark_error(upload_id, reason).await {
            tracing::error!(
                upload_id = %upload_id,
                error = %e,
                "Failed to mark upload as errored"
            );
        }
    }
}

/// Build the results document from client-computed fragments. Known fragment
/// kinds become typed fields; unknown keys survive in the extension map;
/// asset metadata keys are record columns, not analysis output.
fn document_from_fragments(
    upload_id: &str,
    data: &serde_json::Map<String, JsonValue>,
) -> AnalysisDocument {
    let mut document = AnalysisDocument::new(upload_id);

    document.density_results = data.get("density_results").cloned();
    document.thickness_results = data.get("thickness_results").cloned();
    document.combined_metrics = data.get("combined_metrics").cloned();
    document.model_parameters = data.get("model_parameters").cloned();
    document.image_metadata = data.get("image_metadata").cloned();

    for (key, value) in data {
        if KNOWN_FRAGMENTS.contains(&key.as_str()) || ASSET_METADATA_KEYS.contains(&key.as_str()) {
            continue;
        }
        document.extra.insert(key.clone(), value.clone());
    }

    document
}

/// Build the results document for a server-side detection run.
fn document_from_predictions(
    upload_id: &str,
    predictions: &[Prediction],
    params: &DetectionParams,
    image_size_bytes: usize,
) -> AnalysisDocument {
    let mut document = AnalysisDocument::new(upload_id);

    document.model_parameters = Some(json!({
        "confidence_threshold": params.confidence_threshold,
        "iou_threshold": params.iou_threshold,
        "max_predictions": params.max_predictions,
    }));
    document.image_metadata = Some(json!({
        "image_size_bytes": image_size_bytes,
    }));
    document.extra.insert(
        "detection_results".to_string(),
        json!({
            "predictions": predictions,
            "class_counts": class_counts(predictions),
            "total_predictions": predictions.len(),
        }),
    );

    document
}

/// Per-class detection counts, deterministically ordered.
fn class_counts(predictions: &[Prediction]) -> BTreeMap<String, u64> {
    let mut counts = BTreeMap::new();
    for prediction in predictions {
        *counts.entry(prediction.display_name.clone()).or_insert(0) += 1;
    }
    counts
}
