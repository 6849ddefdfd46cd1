use super::domain::RiskInput;

const POSITIVE_CLASS_WEIGHT_CORRECTION: f64 = 0.5;
const LOW_BAND_CEILING: f64 = 0.2;
const HIGH_BAND_SPAN: f64 = 0.7;
const HIGH_BAND_EXPONENT: f64 = 5.0;
const LOW_BAND_EXPONENT: f64 = 0.33;
const CORRECTION_CUTOFF: f64 = 0.4;
const LOW_CORRECTION_RATE: f64 = 0.02;
const HIGH_CORRECTION_RATE: f64 = 0.05;

const BASE_RISK_INCREMENT: f64 = 0.1;
const MODEL_WEIGHT: f64 = 0.7;
const BASE_RISK_WEIGHT: f64 = 0.3;

/// Intermediate values of the calibration stage, kept for logging and audits.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Calibration {
    pub raw_probability: f64,
    pub adjusted_probability: f64,
    pub base_risk_score: f64,
    pub final_probability: f64,
}

/// Undoes the positive-class weighting used during training, then spreads the
/// result so only strong model signals land in the upper band.
pub fn adjust_probability(raw: f64) -> f64 {
    let weighted = raw * POSITIVE_CLASS_WEIGHT_CORRECTION;
    let adjusted = weighted / (weighted + (1.0 - raw));

    let mut remapped = if adjusted > 0.5 {
        let normalized = (adjusted - 0.5) * 2.0;
        let transformed = normalized.powf(HIGH_BAND_EXPONENT);
        LOW_BAND_CEILING + transformed * HIGH_BAND_SPAN
    } else {
        let normalized = adjusted * 2.0;
        LOW_BAND_CEILING * normalized.powf(LOW_BAND_EXPONENT)
    };

    let base_diff = (raw - 0.5).abs();
    if remapped < CORRECTION_CUTOFF {
        remapped += base_diff * LOW_CORRECTION_RATE;
    } else {
        remapped += base_diff * HIGH_CORRECTION_RATE;
    }

    remapped.clamp(0.0, 1.0)
}

/// Rule-derived score: 0.1 for each elevated condition, at most 0.5.
pub fn base_risk_score(input: &RiskInput) -> f64 {
    let triggers = [
        input.speed_limit.is_high_speed(),
        input.time_of_day.is_dark(),
        input.weather_conditions.is_adverse(),
        input.junction_detail.is_junction(),
        input.road_type.is_elevated(),
    ];

    triggers
        .into_iter()
        .filter(|fired| *fired)
        .fold(0.0, |score, _| score + BASE_RISK_INCREMENT)
}

pub fn blend(adjusted_probability: f64, base_risk_score: f64) -> f64 {
    adjusted_probability * MODEL_WEIGHT + base_risk_score * BASE_RISK_WEIGHT
}

pub fn calibrate(raw_probability: f64, input: &RiskInput) -> Calibration {
    let adjusted_probability = adjust_probability(raw_probability);
    let base_risk_score = base_risk_score(input);

    Calibration {
        raw_probability,
        adjusted_probability,
        base_risk_score,
        final_probability: blend(adjusted_probability, base_risk_score),
    }
}
