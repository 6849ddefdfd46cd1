use std::io::Write;
use std::path::PathBuf;

use accident_risk::scoring::{
    validate, ModelArtifact, RiskAssessmentService, RiskLevel, ScoringConfig, ScoringState,
};
use serde_json::json;

fn shipped_model_path() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("../../models/risk_model.json")
}

fn payload(value: serde_json::Value) -> serde_json::Map<String, serde_json::Value> {
    value.as_object().cloned().expect("payload is an object")
}

#[test]
fn shipped_artifact_loads_and_scores_locations() {
    let artifact = ModelArtifact::from_path(shipped_model_path()).expect("shipped model loads");
    assert_eq!(artifact.schema.len(), 27);
    assert_eq!(artifact.predictor.kind(), "logistic_regression");

    let service = RiskAssessmentService::new(artifact, ScoringConfig::default());
    let risky = validate(&payload(json!({
        "road_type": 6,
        "weather_conditions": "Rain",
        "speed_limit": 50,
        "time_of_day": "Night",
        "junction_detail": "Crossroads",
    })))
    .expect("valid input");
    let quiet = validate(&payload(json!({
        "road_type": 1,
        "weather_conditions": "Fine",
        "speed_limit": 20,
        "time_of_day": "Morning",
        "junction_detail": "Not at junction",
    })))
    .expect("valid input");

    let risky = service.assess(&risky).expect("risky location scores");
    let quiet = service.assess(&quiet).expect("quiet location scores");

    assert!(risky.raw_probability > quiet.raw_probability);
    assert!(risky.probability > quiet.probability);
    assert_eq!(risky.risk_factors.len(), 5);
    assert!(quiet.risk_factors.is_empty());
    assert_eq!(quiet.risk_level, RiskLevel::NotHighRisk);
}

#[test]
fn malformed_artifact_disables_scoring() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    write!(file, "{{\"feature_names\": [\"a\"], \"model\": {{\"kind\": \"svm\"}}}}")
        .expect("write artifact");

    let state = ScoringState::load(file.path(), ScoringConfig::default());

    assert!(!state.is_ready());
    match state {
        ScoringState::Unavailable { reason } => {
            assert!(reason.contains("invalid model file format"), "{reason}")
        }
        ScoringState::Ready(_) => panic!("malformed artifact should not load"),
    }
}

#[test]
fn missing_artifact_disables_scoring() {
    let dir = tempfile::tempdir().expect("temp dir");
    let state = ScoringState::load(dir.path().join("absent.json"), ScoringConfig::default());

    assert!(state.service().is_none());
}

#[test]
fn tree_ensemble_artifact_is_supported() {
    let mut file = tempfile::NamedTempFile::new().expect("temp file");
    let document = json!({
        "feature_names": ["speed_limit", "is_night", "weather_risk"],
        "model": {
            "kind": "gradient_boosted_trees",
            "base_margin": -0.5,
            "trees": [
                {"nodes": [
                    {"feature": 0, "threshold": 0.6, "left": 1, "right": 2},
                    {"leaf": -0.4},
                    {"leaf": 0.9}
                ]},
                {"nodes": [
                    {"feature": 1, "threshold": 0.5, "left": 1, "right": 2},
                    {"leaf": 0.0},
                    {"leaf": 0.6}
                ]}
            ]
        }
    });
    file.write_all(document.to_string().as_bytes())
        .expect("write artifact");

    let state = ScoringState::load(file.path(), ScoringConfig::default());
    let service = state.service().expect("ensemble loads");

    let input = validate(&payload(json!({
        "road_type": 3,
        "weather_conditions": "Fog",
        "speed_limit": 70,
        "time_of_day": "Evening",
        "junction_detail": "T Junction",
    })))
    .expect("valid input");
    let assessment = service.assess(&input).expect("scores");

    let expected_raw = 1.0 / (1.0 + (-(-0.5 + 0.9 + 0.6_f64)).exp());
    assert!((assessment.raw_probability - expected_raw).abs() < 1e-12);
}
