use super::domain::{RiskInput, RiskLevel, RoadType};

pub const FALLBACK_RECOMMENDATION: &str = "No specific recommendations needed at this time";

/// Context a recommendation rule is evaluated against.
pub(crate) struct RecommendationContext<'a> {
    pub(crate) input: &'a RiskInput,
    pub(crate) risk_factors: &'a [String],
}

pub(crate) struct RecommendationRule {
    pub(crate) applies: fn(&RecommendationContext<'_>) -> bool,
    pub(crate) advice: fn(&RecommendationContext<'_>) -> String,
}

pub(crate) const HIGH_RISK_RULES: [RecommendationRule; 5] = [
    RecommendationRule {
        applies: |ctx| ctx.input.speed_limit.is_high_speed(),
        advice: |_| "Consider reducing speed limit in this area".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.junction_detail.is_junction(),
        advice: |_| "Install traffic monitoring cameras at the junction".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.time_of_day.is_dark(),
        advice: |_| "Improve street lighting conditions".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.weather_conditions.is_adverse(),
        advice: |ctx| {
            format!(
                "Install weather warning signs for {} conditions",
                ctx.input.weather_conditions
            )
        },
    },
    RecommendationRule {
        applies: |ctx| !ctx.risk_factors.is_empty(),
        advice: |_| "Increase police patrols in the area".to_string(),
    },
];

pub(crate) const STANDARD_RULES: [RecommendationRule; 6] = [
    RecommendationRule {
        applies: |ctx| ctx.input.junction_detail.is_junction(),
        advice: |_| "Consider additional signage at the junction".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.weather_conditions.is_adverse(),
        advice: |_| "Ensure regular road maintenance".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.time_of_day.is_dark(),
        advice: |_| "Consider enhanced road markings".to_string(),
    },
    RecommendationRule {
        applies: |_| true,
        advice: |ctx| {
            if ctx.risk_factors.is_empty() {
                "Continue regular maintenance and monitoring".to_string()
            } else {
                "Monitor conditions and maintain current safety measures".to_string()
            }
        },
    },
    RecommendationRule {
        applies: |ctx| ctx.input.road_type == RoadType::Residential,
        advice: |_| "Maintain residential area safety features".to_string(),
    },
    RecommendationRule {
        applies: |ctx| ctx.input.speed_limit.is_low_speed(),
        advice: |_| "Current speed restrictions are appropriate".to_string(),
    },
];

/// Ordered mitigation advice for the classified location. Never empty.
pub fn recommendations(
    input: &RiskInput,
    risk_level: RiskLevel,
    risk_factors: &[String],
) -> Vec<String> {
    let ctx = RecommendationContext {
        input,
        risk_factors,
    };
    let rules: &[RecommendationRule] = match risk_level {
        RiskLevel::HighRisk => &HIGH_RISK_RULES,
        RiskLevel::NotHighRisk => &STANDARD_RULES,
    };

    let advice: Vec<String> = rules
        .iter()
        .filter(|rule| (rule.applies)(&ctx))
        .map(|rule| (rule.advice)(&ctx))
        .collect();

    if advice.is_empty() {
        vec![FALLBACK_RECOMMENDATION.to_string()]
    } else {
        advice
    }
}
