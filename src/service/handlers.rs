//! Request handlers for the scoring service

use std::sync::Arc;

use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;
use tracing::debug;

use crate::pipeline::encode::EncodeError;
use super::schemas::{decision_band, HealthResponse, ScoreRequest, ScoreResponse};
use super::AppState;

/// Per-request scoring failures. These map to 422 so a malformed
/// payload is distinguishable from a service fault.
#[derive(Debug, Error)]
pub enum ScoreError {
    #[error(transparent)]
    Encode(#[from] EncodeError),
}

impl IntoResponse for ScoreError {
    fn into_response(self) -> Response {
        let body = Json(serde_json::json!({ "error": self.to_string() }));
        (StatusCode::UNPROCESSABLE_ENTITY, body).into_response()
    }
}

/// GET /health: liveness plus a sketch of the loaded model.
pub async fn health_handler(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok",
        model_type: state.artifact.info.model_type.clone(),
        n_features: state.artifact.info.n_features,
    })
}

/// POST /score: encode the raw features and run the model.
pub async fn score_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<ScoreRequest>,
) -> Result<Json<ScoreResponse>, ScoreError> {
    let row = state.artifact.info.encoder.encode_row(&request.features)?;
    let probability = state.artifact.predict_proba(row);
    let decision = decision_band(probability);
    debug!(probability, decision, "Scored application");

    Ok(Json(ScoreResponse {
        probability,
        decision: decision.to_string(),
        reasons: vec!["baseline_policy".to_string()],
    }))
}
