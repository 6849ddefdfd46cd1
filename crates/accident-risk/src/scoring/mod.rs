//! Road accident risk scoring: validation, feature encoding, calibration,
//! classification and the explanations returned alongside each prediction.

pub mod batch;
pub mod calibration;
pub mod classification;
pub mod domain;
pub(crate) mod factors;
pub mod features;
pub mod model;
pub(crate) mod recommendations;
pub mod router;
pub mod service;
pub mod validation;

#[cfg(test)]
mod tests;

pub use batch::{assess_path, assess_reader, BatchError, BatchRow};
pub use calibration::{calibrate, Calibration};
pub use classification::{classify, ScoringConfig, DEFAULT_HIGH_RISK_THRESHOLD};
pub use domain::{
    format_percentage, JunctionDetail, PredictionView, RiskAssessment, RiskInput, RiskLevel,
    RoadType, SpeedLimit, TimeOfDay, WeatherCondition,
};
pub use factors::risk_factors;
pub use features::{encode, FeatureSchema, FeatureVector, SchemaError};
pub use model::{ModelArtifact, ModelError, PredictionError, Predictor};
pub use recommendations::{recommendations, FALLBACK_RECOMMENDATION};
pub use router::{risk_router, PredictResponse};
pub use service::{request_object, AssessmentError, RiskAssessmentService, ScoringState};
pub use validation::{validate, FieldErrors};
