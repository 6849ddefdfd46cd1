use std::sync::Arc;

use axum::response::Response;
use serde_json::{json, Value};

use crate::scoring::domain::{
    JunctionDetail, RiskInput, RoadType, SpeedLimit, TimeOfDay, WeatherCondition,
};
use crate::scoring::features::{FeatureSchema, FeatureVector};
use crate::scoring::model::{PredictionError, Predictor};
use crate::scoring::{risk_router, RiskAssessmentService, ScoringConfig, ScoringState};

pub(super) const TRAINING_FEATURES: [&str; 28] = [
    "road_type_1",
    "road_type_2",
    "road_type_3",
    "road_type_6",
    "weather_conditions_1",
    "weather_conditions_2",
    "weather_conditions_3",
    "weather_conditions_4",
    "light_conditions_1",
    "light_conditions_4",
    "junction_detail_0",
    "junction_detail_1",
    "junction_detail_2",
    "junction_detail_3",
    "speed_limit",
    "number_of_vehicles",
    "number_of_casualties",
    "casualty_rate",
    "weather_risk",
    "surface_risk",
    "combined_risk",
    "is_night",
    "is_rush_hour",
    "is_weekend",
    "high_speed",
    "night_speed_risk",
    "weather_speed_risk",
    "urban_or_rural_area",
];

pub(super) fn training_schema() -> FeatureSchema {
    FeatureSchema::new(TRAINING_FEATURES.iter().map(|name| name.to_string()).collect())
        .expect("training schema is valid")
}

/// Returns the same probability for every vector.
pub(super) struct FixedPredictor(pub(super) f64);

impl Predictor for FixedPredictor {
    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
        Ok(self.0)
    }

    fn kind(&self) -> &'static str {
        "fixed"
    }
}

/// Always fails, standing in for a corrupted model.
pub(super) struct BrokenPredictor;

impl Predictor for BrokenPredictor {
    fn predict_probability(&self, _features: &FeatureVector) -> Result<f64, PredictionError> {
        Err(PredictionError::NonFinite)
    }

    fn kind(&self) -> &'static str {
        "broken"
    }
}

pub(super) fn service_with(predictor: impl Predictor + 'static) -> RiskAssessmentService {
    RiskAssessmentService::with_predictor(
        training_schema(),
        Arc::new(predictor),
        ScoringConfig::default(),
    )
}

pub(super) fn router_with(predictor: impl Predictor + 'static) -> axum::Router {
    risk_router(Arc::new(ScoringState::from(service_with(predictor))))
}

pub(super) fn unavailable_state() -> Arc<ScoringState> {
    Arc::new(ScoringState::Unavailable {
        reason: "model file not found at models/risk_model.json".to_string(),
    })
}

pub(super) fn urban_night_payload() -> Value {
    json!({
        "road_type": 6,
        "weather_conditions": "Rain",
        "speed_limit": 50,
        "time_of_day": "Night",
        "junction_detail": "Crossroads",
    })
}

pub(super) fn quiet_residential_payload() -> Value {
    json!({
        "road_type": 1,
        "weather_conditions": "Fine",
        "speed_limit": 20,
        "time_of_day": "Morning",
        "junction_detail": "Not at junction",
    })
}

pub(super) fn urban_night_input() -> RiskInput {
    RiskInput {
        road_type: RoadType::Urban,
        weather_conditions: WeatherCondition::Rain,
        speed_limit: SpeedLimit::new(50).expect("allowed"),
        time_of_day: TimeOfDay::Night,
        junction_detail: JunctionDetail::Crossroads,
    }
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = axum::body::to_bytes(response.into_body(), 16 * 1024)
        .await
        .expect("read body");
    serde_json::from_slice(&body).expect("json payload")
}
