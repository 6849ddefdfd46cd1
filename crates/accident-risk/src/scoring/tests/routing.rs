use super::common::*;
use axum::body::{Body, Bytes};
use axum::extract::State;
use axum::http::{header, Request, StatusCode};
use serde_json::{json, Value};
use tower::ServiceExt;

use crate::scoring::router::predict_handler;

fn post_json(uri: &str, body: impl Into<Body>) -> Request<Body> {
    Request::post(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.into())
        .expect("request builds")
}

#[tokio::test]
async fn predict_route_returns_prediction_and_echoed_input() {
    let router = router_with(FixedPredictor(1.0));

    let response = router
        .oneshot(post_json("/predict", urban_night_payload().to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    let prediction = &payload["prediction"];
    assert_eq!(prediction["risk_level"], json!("High Risk"));
    assert_eq!(prediction["raw_probability"], json!("100.00%"));
    assert_eq!(prediction["probability"], json!("79.75%"));
    assert_eq!(
        prediction["risk_factors"].as_array().map(Vec::len),
        Some(5)
    );
    assert_eq!(payload["input_data"], urban_night_payload());
}

#[tokio::test]
async fn api_prefixed_route_is_also_served() {
    let router = router_with(FixedPredictor(0.2));

    let response = router
        .oneshot(post_json("/api/predict", quiet_residential_payload().to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["prediction"]["risk_level"], json!("Not High Risk"));
    assert_eq!(payload["prediction"]["risk_factors"], json!([]));
}

#[tokio::test]
async fn missing_road_type_reports_field_details() {
    let router = router_with(FixedPredictor(0.5));
    let mut body = quiet_residential_payload();
    body.as_object_mut().expect("object").remove("road_type");

    let response = router
        .oneshot(post_json("/predict", body.to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let payload = read_json_body(response).await;
    assert_eq!(payload["error"], json!("Invalid input data"));
    assert_eq!(
        payload["details"],
        json!({
            "road_type": "Please select a valid road type (1: Residential, 2: Suburban, 3: Rural, 6: Urban)"
        })
    );
}

#[tokio::test]
async fn empty_and_malformed_bodies_count_as_missing_data() {
    for body in ["", "null", "{}", "[1, 2]", "{not json"] {
        let state = std::sync::Arc::new(crate::scoring::ScoringState::from(service_with(
            FixedPredictor(0.5),
        )));

        let response = predict_handler(State(state), Bytes::from(body)).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "body {body:?}");
        let payload = read_json_body(response).await;
        assert_eq!(payload, json!({ "error": "No data provided" }));
    }
}

#[tokio::test]
async fn unavailable_model_fails_every_request_uniformly() {
    let response = predict_handler(
        State(unavailable_state()),
        Bytes::from(urban_night_payload().to_string()),
    )
    .await;

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload = read_json_body(response).await;
    assert_eq!(
        payload,
        json!({ "error": "Model not loaded. Please try again later." })
    );
}

#[tokio::test]
async fn pipeline_failures_hide_internal_detail() {
    let router = router_with(BrokenPredictor);

    let response = router
        .oneshot(post_json("/predict", urban_night_payload().to_string()))
        .await
        .expect("route executes");

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let payload: Value = read_json_body(response).await;
    assert_eq!(payload, json!({ "error": "Failed to process prediction" }));
}
