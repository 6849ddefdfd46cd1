use std::path::Path;
use std::sync::Arc;

use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use super::calibration::calibrate;
use super::classification::{classify, ScoringConfig};
use super::domain::{RiskAssessment, RiskInput};
use super::factors::risk_factors;
use super::features::{encode, FeatureSchema};
use super::model::{ModelArtifact, PredictionError, Predictor};
use super::recommendations::recommendations;
use super::validation::{validate, FieldErrors};

/// Orchestrates validation, encoding, prediction, calibration and explanations.
pub struct RiskAssessmentService {
    schema: FeatureSchema,
    predictor: Arc<dyn Predictor>,
    config: ScoringConfig,
}

impl RiskAssessmentService {
    pub fn new(artifact: ModelArtifact, config: ScoringConfig) -> Self {
        let ModelArtifact { schema, predictor } = artifact;
        Self::with_predictor(schema, Arc::from(predictor), config)
    }

    pub fn with_predictor(
        schema: FeatureSchema,
        predictor: Arc<dyn Predictor>,
        config: ScoringConfig,
    ) -> Self {
        Self {
            schema,
            predictor,
            config,
        }
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    pub fn config(&self) -> &ScoringConfig {
        &self.config
    }

    /// Scores an already validated input.
    pub fn assess(&self, input: &RiskInput) -> Result<RiskAssessment, AssessmentError> {
        let features = encode(input, &self.schema);
        let raw_probability = self.predictor.predict_probability(&features)?;
        if !(0.0..=1.0).contains(&raw_probability) {
            return Err(AssessmentError::ProbabilityOutOfRange(raw_probability));
        }
        debug!(raw_probability, "raw prediction probability");

        let calibration = calibrate(raw_probability, input);
        debug!(
            adjusted = calibration.adjusted_probability,
            base_risk_score = calibration.base_risk_score,
            final_probability = calibration.final_probability,
            "calibrated prediction probability"
        );

        let risk_level = classify(calibration.final_probability, &self.config);
        let risk_factors = risk_factors(input);
        let recommendations = recommendations(input, risk_level, &risk_factors);

        Ok(RiskAssessment {
            risk_level,
            probability: calibration.final_probability,
            raw_probability,
            base_risk_score: calibration.base_risk_score,
            risk_factors,
            recommendations,
        })
    }

    /// Validates a raw request object, then scores it.
    pub fn assess_object(&self, raw: &Map<String, Value>) -> Result<RiskAssessment, AssessmentError> {
        let input = validate(raw)?;
        self.assess(&input)
    }
}

/// Extracts the request object from a body. Empty bodies, `null`, `{}`,
/// malformed JSON and non-object payloads all count as missing data.
pub fn request_object(body: &[u8]) -> Result<Map<String, Value>, AssessmentError> {
    match serde_json::from_slice::<Value>(body) {
        Ok(Value::Object(map)) if !map.is_empty() => Ok(map),
        _ => Err(AssessmentError::NoData),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum AssessmentError {
    #[error("No data provided")]
    NoData,
    #[error("Invalid input data: {0}")]
    Invalid(#[from] FieldErrors),
    #[error(transparent)]
    Prediction(#[from] PredictionError),
    #[error("model returned probability {0} outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

/// Outcome of loading the classifier at startup. Fixed for the process lifetime.
pub enum ScoringState {
    Ready(Arc<RiskAssessmentService>),
    Unavailable { reason: String },
}

impl ScoringState {
    pub fn load(path: impl AsRef<Path>, config: ScoringConfig) -> Self {
        let path = path.as_ref();
        match ModelArtifact::from_path(path) {
            Ok(artifact) => {
                info!(
                    path = %path.display(),
                    features = artifact.schema.len(),
                    kind = artifact.predictor.kind(),
                    "risk model loaded"
                );
                Self::Ready(Arc::new(RiskAssessmentService::new(artifact, config)))
            }
            Err(err) => {
                warn!(path = %path.display(), error = %err, "risk model unavailable; predictions disabled");
                Self::Unavailable {
                    reason: err.to_string(),
                }
            }
        }
    }

    pub fn service(&self) -> Option<&Arc<RiskAssessmentService>> {
        match self {
            Self::Ready(service) => Some(service),
            Self::Unavailable { .. } => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }
}

impl From<RiskAssessmentService> for ScoringState {
    fn from(service: RiskAssessmentService) -> Self {
        Self::Ready(Arc::new(service))
    }
}
