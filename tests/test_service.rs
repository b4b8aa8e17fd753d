//! Scoring service tests, run against the router without a live socket

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use credo::pipeline::{train, TrainParams};
use credo::service::schemas::ScoreResponse;
use credo::service::{build_router, build_state, AppState};

#[path = "common/mod.rs"]
mod common;

use common::*;

fn test_router() -> Router {
    let df = create_processed_dataframe(120);
    let params = TrainParams {
        iterations: 20,
        max_depth: 3,
        ..TrainParams::default()
    };
    let artifact = train(&df, &params).unwrap().artifact;
    build_router(Arc::new(AppState { artifact }))
}

fn score_request(body: Value) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/score")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

async fn body_json(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health_reports_model_shape() {
    let app = test_router();

    let response = app
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["model_type"], "gbdt");
    assert!(body["n_features"].as_u64().unwrap() > 0);
}

#[tokio::test]
async fn test_score_returns_probability_and_decision() {
    let app = test_router();

    let response = app
        .oneshot(score_request(json!({
            "features": {
                "loan_amnt": 2000.0,
                "int_rate": 7.5,
                "grade": "A",
                "issue_month": "2016-01",
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    let score: ScoreResponse = serde_json::from_value(body).unwrap();

    assert!((0.0..=1.0).contains(&score.probability));
    assert!(["approve", "review", "reject"].contains(&score.decision.as_str()));
    assert_eq!(score.reasons, vec!["baseline_policy".to_string()]);
}

#[tokio::test]
async fn test_score_missing_field_is_unprocessable() {
    let app = test_router();

    let response = app
        .oneshot(score_request(json!({
            "features": {
                "loan_amnt": 2000.0,
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let body = body_json(response).await;
    assert!(body["error"].as_str().unwrap().contains("int_rate"));
}

#[tokio::test]
async fn test_score_wrong_type_is_unprocessable() {
    let app = test_router();

    let response = app
        .oneshot(score_request(json!({
            "features": {
                "loan_amnt": "lots",
                "int_rate": 7.5,
                "grade": "A",
                "issue_month": "2016-01",
            }
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_score_is_deterministic() {
    let app = test_router();

    let payload = json!({
        "features": {
            "loan_amnt": 15000.0,
            "int_rate": 14.0,
            "grade": "A",
            "issue_month": "2015-12",
        }
    });

    let first = app
        .clone()
        .oneshot(score_request(payload.clone()))
        .await
        .unwrap();
    let second = app.oneshot(score_request(payload)).await.unwrap();

    let p1 = body_json(first).await["probability"].as_f64().unwrap();
    let p2 = body_json(second).await["probability"].as_f64().unwrap();
    assert_eq!(p1, p2);
}

#[tokio::test]
async fn test_build_state_fails_without_artifact() {
    let temp_dir = tempfile::tempdir().unwrap();
    assert!(build_state(temp_dir.path()).is_err());
}
