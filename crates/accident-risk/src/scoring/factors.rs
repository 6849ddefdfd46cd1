use super::domain::RiskInput;

/// One contributing-factor rule: a predicate over the input and the message it yields.
pub(crate) struct FactorRule {
    pub(crate) applies: fn(&RiskInput) -> bool,
    pub(crate) describe: fn(&RiskInput) -> String,
}

/// Evaluated in order; every matching rule contributes.
pub(crate) const FACTOR_RULES: [FactorRule; 5] = [
    FactorRule {
        applies: |input| input.time_of_day.is_dark(),
        describe: |_| "Limited visibility during night/evening hours".to_string(),
    },
    FactorRule {
        applies: |input| input.weather_conditions.is_adverse(),
        describe: |input| format!("Adverse weather conditions ({})", input.weather_conditions),
    },
    FactorRule {
        applies: |input| input.speed_limit.is_high_speed(),
        describe: |_| "High speed zone".to_string(),
    },
    FactorRule {
        applies: |input| input.junction_detail.is_junction(),
        describe: |input| format!("Complex junction type ({})", input.junction_detail),
    },
    FactorRule {
        applies: |input| input.road_type.is_elevated(),
        describe: |input| input.road_type.description().to_string(),
    },
];

/// Human-readable conditions that raise risk at this location.
pub fn risk_factors(input: &RiskInput) -> Vec<String> {
    FACTOR_RULES
        .iter()
        .filter(|rule| (rule.applies)(input))
        .map(|rule| (rule.describe)(input))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scoring::domain::{
        JunctionDetail, RoadType, SpeedLimit, TimeOfDay, WeatherCondition,
    };

    fn input(
        road_type: RoadType,
        weather_conditions: WeatherCondition,
        mph: u8,
        time_of_day: TimeOfDay,
        junction_detail: JunctionDetail,
    ) -> RiskInput {
        RiskInput {
            road_type,
            weather_conditions,
            speed_limit: SpeedLimit::new(mph).expect("allowed"),
            time_of_day,
            junction_detail,
        }
    }

    #[test]
    fn every_rule_fires_in_order() {
        let factors = risk_factors(&input(
            RoadType::Urban,
            WeatherCondition::Rain,
            50,
            TimeOfDay::Night,
            JunctionDetail::Crossroads,
        ));

        assert_eq!(
            factors,
            vec![
                "Limited visibility during night/evening hours",
                "Adverse weather conditions (Rain)",
                "High speed zone",
                "Complex junction type (Crossroads)",
                "Urban area with high traffic",
            ]
        );
    }

    #[test]
    fn rural_roads_report_hazards() {
        let factors = risk_factors(&input(
            RoadType::Rural,
            WeatherCondition::Fine,
            40,
            TimeOfDay::Afternoon,
            JunctionDetail::TJunction,
        ));

        assert_eq!(
            factors,
            vec![
                "Complex junction type (T Junction)",
                "Rural road with potential hazards",
            ]
        );
    }

    #[test]
    fn residential_and_suburban_roads_never_contribute() {
        for road in [RoadType::Residential, RoadType::Suburban] {
            let factors = risk_factors(&input(
                road,
                WeatherCondition::Fine,
                30,
                TimeOfDay::Morning,
                JunctionDetail::NotAtJunction,
            ));
            assert!(factors.is_empty(), "{road:?} produced {factors:?}");
        }
    }
}
