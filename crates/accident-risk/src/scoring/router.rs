use std::sync::Arc;

use axum::{
    body::Bytes,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::error;

use super::domain::PredictionView;
use super::service::{request_object, AssessmentError, ScoringState};

pub const MODEL_UNAVAILABLE_MESSAGE: &str = "Model not loaded. Please try again later.";
pub const PREDICTION_FAILED_MESSAGE: &str = "Failed to process prediction";

/// Successful `/predict` payload.
#[derive(Debug, Serialize)]
pub struct PredictResponse {
    pub prediction: PredictionView,
    pub input_data: Value,
}

/// Router builder exposing the scoring endpoint.
pub fn risk_router(state: Arc<ScoringState>) -> Router {
    Router::new()
        .route("/predict", post(predict_handler))
        .route("/api/predict", post(predict_handler))
        .with_state(state)
}

pub(crate) async fn predict_handler(State(state): State<Arc<ScoringState>>, body: Bytes) -> Response {
    let Some(service) = state.service() else {
        let payload = json!({ "error": MODEL_UNAVAILABLE_MESSAGE });
        return (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response();
    };

    let outcome = request_object(&body).and_then(|raw| {
        service
            .assess_object(&raw)
            .map(|assessment| (assessment, Value::Object(raw)))
    });

    match outcome {
        Ok((assessment, input_data)) => {
            let payload = PredictResponse {
                prediction: assessment.prediction_view(),
                input_data,
            };
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(AssessmentError::NoData) => {
            let payload = json!({ "error": "No data provided" });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(AssessmentError::Invalid(details)) => {
            let payload = json!({
                "error": "Invalid input data",
                "details": details,
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
        }
        Err(other) => {
            error!(error = %other, "prediction pipeline failed");
            let payload = json!({ "error": PREDICTION_FAILED_MESSAGE });
            (StatusCode::INTERNAL_SERVER_ERROR, axum::Json(payload)).into_response()
        }
    }
}
