//! Detection parameters and predictions exchanged with the inference gateway.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

fn default_confidence_threshold() -> f32 {
    0.5
}

fn default_iou_threshold() -> f32 {
    0.5
}

fn default_max_predictions() -> u32 {
    100
}

/// Tunable parameters forwarded to the detection model.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DetectionParams {
    #[serde(default = "default_confidence_threshold")]
    pub confidence_threshold: f32,
    #[serde(default = "default_iou_threshold")]
    pub iou_threshold: f32,
    #[serde(default = "default_max_predictions")]
    pub max_predictions: u32,
}

impl Default for DetectionParams {
    fn default() -> Self {
        DetectionParams {
            confidence_threshold: default_confidence_threshold(),
            iou_threshold: default_iou_threshold(),
            max_predictions: default_max_predictions(),
        }
    }
}

/// One detection returned by the inference gateway.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Prediction {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub confidence: f32,
    /// Normalized `[x1, y1, x2, y2]` box; empty when the model omits it.
    #[serde(default)]
    pub bbox: Vec<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn params_default_from_empty_json() {
        let params: DetectionParams = serde_json::from_str("{}").unwrap();
        assert_eq!(params.confidence_threshold, 0.5);
        assert_eq!(params.iou_threshold, 0.5);
        assert_eq!(params.max_predictions, 100);
    }

    #[test]
    fn prediction_parses_wire_shape() {
        let pred: Prediction = serde_json::from_str(
            r#"{"displayName": "follicle", "confidence": 0.93, "bbox": [0.1, 0.2, 0.3, 0.4]}"#,
        )
        .unwrap();
        assert_eq!(pred.display_name, "follicle");
        assert_eq!(pred.bbox.len(), 4);
    }
}
