//! Request/response payloads and the decision policy

use serde::{Deserialize, Serialize};

/// Predicted default probability below which an application is approved.
pub const APPROVE_BELOW: f64 = 0.03;

/// Probability below which an application goes to manual review;
/// everything at or above is rejected.
pub const REVIEW_BELOW: f64 = 0.08;

/// Scoring request: a raw feature mapping keyed by column name.
#[derive(Debug, Clone, Deserialize)]
pub struct ScoreRequest {
    pub features: serde_json::Map<String, serde_json::Value>,
}

/// Scoring response: probability of default plus the decision band.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScoreResponse {
    pub probability: f64,
    pub decision: String,
    pub reasons: Vec<String>,
}

/// Health-check payload.
#[derive(Debug, Clone, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub model_type: String,
    pub n_features: usize,
}

/// Map a probability to its decision band via the fixed thresholds.
pub fn decision_band(probability: f64) -> &'static str {
    if probability < APPROVE_BELOW {
        "approve"
    } else if probability < REVIEW_BELOW {
        "review"
    } else {
        "reject"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decision_bands() {
        assert_eq!(decision_band(0.0), "approve");
        assert_eq!(decision_band(0.029), "approve");
        assert_eq!(decision_band(0.03), "review");
        assert_eq!(decision_band(0.079), "review");
        assert_eq!(decision_band(0.08), "reject");
        assert_eq!(decision_band(1.0), "reject");
    }

    #[test]
    fn test_score_request_deserializes() {
        let json = r#"{"features": {"loan_amnt": 10000, "grade": "B"}}"#;
        let req: ScoreRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.features.len(), 2);
    }
}
