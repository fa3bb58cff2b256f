//! Inference gateway: remote object-detection over scan images.

use anyhow::{Context, Result};
use async_trait::async_trait;
use hairscan_core::models::{DetectionParams, Prediction};
use hairscan_core::AppError;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;

/// Black-box detection service. Implementations may time out or fail; the
/// coordinator treats any error as grounds for an `error` record and never
/// retries internally.
#[async_trait]
pub trait InferenceGateway: Send + Sync {
    async fn detect(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<Prediction>, AppError>;
}

/// Wire response: the first element of `predictions` carries the per-image
/// detection list.
#[derive(Debug, Deserialize)]
struct DetectResponse {
    #[serde(default)]
    predictions: Vec<Vec<Prediction>>,
}

/// HTTP client for a Vertex-style prediction endpoint.
pub struct VertexDetectionClient {
    http_client: reqwest::Client,
    endpoint: String,
    api_token: Option<String>,
}

impl VertexDetectionClient {
    pub fn new(endpoint: String, api_token: Option<String>, timeout: Duration) -> Result<Self> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .context("Failed to create HTTP client for the inference gateway")?;

        Ok(Self {
            http_client,
            endpoint,
            api_token,
        })
    }
}

#[async_trait]
impl InferenceGateway for VertexDetectionClient {
    async fn detect(
        &self,
        image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<Prediction>, AppError> {
        use base64::Engine;
        let image_base64 = base64::engine::general_purpose::STANDARD.encode(image);

        let request_body = json!({
            "instances": [{
                "image": {
                    "bytesBase64Encoded": image_base64
                }
            }],
            "parameters": {
                "confidenceThreshold": params.confidence_threshold,
                "iouThreshold": params.iou_threshold,
                "maxPredictions": params.max_predictions
            }
        });

        let mut request = self
            .http_client
            .post(&self.endpoint)
            .header("Content-Type", "application/json")
            .json(&request_body);

        if let Some(token) = &self.api_token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|e| AppError::Inference(format!("request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Inference(format!(
                "detection endpoint returned {}: {}",
                status, error_text
            )));
        }

        let detect_response: DetectResponse = response
            .json()
            .await
            .map_err(|e| AppError::Inference(format!("unparseable response: {}", e)))?;

        let predictions = detect_response
            .predictions
            .into_iter()
            .next()
            .unwrap_or_default();

        tracing::debug!(
            count = predictions.len(),
            confidence_threshold = params.confidence_threshold,
            "Detection call completed"
        );

        Ok(predictions)
    }
}

/// Canned-detection fallback used when no inference endpoint is configured,
/// so the rest of the pipeline stays exercisable in local development.
pub struct FallbackDetectionClient;

#[async_trait]
impl InferenceGateway for FallbackDetectionClient {
    async fn detect(
        &self,
        _image: &[u8],
        params: &DetectionParams,
    ) -> Result<Vec<Prediction>, AppError> {
        tracing::warn!("No inference endpoint configured; returning canned predictions");

        let canned = vec![
            Prediction {
                display_name: "follicular_unit".to_string(),
                confidence: 0.95,
                bbox: vec![0.1, 0.1, 0.3, 0.8],
            },
            Prediction {
                display_name: "follicular_unit".to_string(),
                confidence: 0.87,
                bbox: vec![0.4, 0.6, 0.9, 0.9],
            },
            Prediction {
                display_name: "thin_hair".to_string(),
                confidence: 0.78,
                bbox: vec![0.6, 0.2, 0.8, 0.5],
            },
        ];

        Ok(canned
            .into_iter()
            .filter(|p| p.confidence >= params.confidence_threshold)
            .take(params.max_predictions as usize)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn response_takes_first_prediction_batch() {
        let raw = r#"{
            "predictions": [[
                {"displayName": "follicular_unit", "confidence": 0.91, "bbox": [0.1, 0.2, 0.3, 0.4]},
                {"displayName": "thin_hair", "confidence": 0.65}
            ]]
        }"#;

        let parsed: DetectResponse = serde_json::from_str(raw).unwrap();
        let predictions = parsed.predictions.into_iter().next().unwrap();
        assert_eq!(predictions.len(), 2);
        assert_eq!(predictions[0].display_name, "follicular_unit");
        assert!(predictions[1].bbox.is_empty());
    }

    #[test]
    fn empty_response_yields_no_predictions() {
        let parsed: DetectResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.predictions.is_empty());
    }

    #[tokio::test]
    async fn fallback_client_honors_params() {
        let client = FallbackDetectionClient;
        let params = DetectionParams {
            confidence_threshold: 0.9,
            iou_threshold: 0.5,
            max_predictions: 100,
        };
        let predictions = client.detect(&[0u8; 4], &params).await.unwrap();
        assert_eq!(predictions.len(), 1);
        assert!(predictions[0].confidence >= 0.9);
    }
}
