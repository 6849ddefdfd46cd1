use super::common::*;
use proptest::prelude::*;

use crate::scoring::calibration::{adjust_probability, base_risk_score};
use crate::scoring::classification::{classify, ScoringConfig};
use crate::scoring::domain::{
    JunctionDetail, RiskInput, RiskLevel, RoadType, SpeedLimit, TimeOfDay, WeatherCondition,
};
use crate::scoring::features::encode;

fn input_strategy() -> impl Strategy<Value = RiskInput> {
    (
        prop::sample::select(RoadType::ordered().to_vec()),
        prop::sample::select(WeatherCondition::ordered().to_vec()),
        prop::sample::select(SpeedLimit::ALLOWED.to_vec()),
        prop::sample::select(TimeOfDay::ordered().to_vec()),
        prop::sample::select(JunctionDetail::ordered().to_vec()),
    )
        .prop_map(|(road_type, weather_conditions, mph, time_of_day, junction_detail)| {
            RiskInput {
                road_type,
                weather_conditions,
                speed_limit: SpeedLimit::new(mph).expect("sampled from allowed values"),
                time_of_day,
                junction_detail,
            }
        })
}

fn group_total(vector: &crate::scoring::FeatureVector, prefix: &str) -> f64 {
    vector
        .iter()
        .filter(|(name, _)| name.starts_with(prefix))
        .map(|(_, value)| value)
        .sum()
}

proptest! {
    /// Property: each one-hot group has exactly one set indicator.
    #[test]
    fn one_hot_groups_have_single_indicator(input in input_strategy()) {
        let vector = encode(&input, &training_schema());

        for prefix in ["road_type_", "weather_conditions_", "light_conditions_", "junction_detail_"] {
            prop_assert_eq!(group_total(&vector, prefix), 1.0, "group {}", prefix);
        }

        let speed = vector.get("speed_limit").expect("speed column present");
        prop_assert!((20.0 / 70.0..=1.0).contains(&speed));
    }

    /// Property: calibration never leaves the unit interval.
    #[test]
    fn calibration_stays_in_unit_interval(raw in 0.0f64..=1.0) {
        let adjusted = adjust_probability(raw);
        prop_assert!((0.0..=1.0).contains(&adjusted), "raw {} -> {}", raw, adjusted);
    }

    /// Property: base score is a multiple of 0.1 between 0 and 0.5.
    #[test]
    fn base_score_is_a_tenth_multiple(input in input_strategy()) {
        let score = base_risk_score(&input);
        let tenths = (score * 10.0).round();
        prop_assert!((0.0..=5.0).contains(&tenths));
        prop_assert!((score - tenths / 10.0).abs() < 1e-9);
    }

    /// Property: identical inputs give identical, bounded, non-empty results.
    #[test]
    fn assessments_are_deterministic(input in input_strategy(), raw in 0.0f64..=1.0) {
        let service = service_with(FixedPredictor(raw));
        let first = service.assess(&input).expect("first run");
        let second = service.assess(&input).expect("second run");

        prop_assert!(first.probability >= 0.0 && first.probability <= 1.0);
        prop_assert!(!first.recommendations.is_empty());
        prop_assert_eq!(first, second);
    }
}

#[test]
fn classification_at_threshold_is_not_high_risk() {
    assert_eq!(
        classify(0.70, &ScoringConfig::default()),
        RiskLevel::NotHighRisk
    );
}
