use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use super::domain::{
    JunctionDetail, RiskInput, RoadType, SpeedLimit, TimeOfDay, WeatherCondition,
};

/// Enumerated values a request field may take.
#[derive(Debug, Clone, Copy)]
pub enum FieldDomain {
    Codes(&'static [u8]),
    Labels(&'static [&'static str]),
}

impl FieldDomain {
    fn accepts(&self, value: &Value) -> bool {
        match (self, value) {
            (FieldDomain::Codes(codes), Value::Number(number)) => number
                .as_f64()
                .map(|n| codes.iter().any(|code| f64::from(*code) == n))
                .unwrap_or(false),
            (FieldDomain::Labels(labels), Value::String(text)) => labels.contains(&text.as_str()),
            _ => false,
        }
    }

    /// List literal naming the valid options, e.g. `[1, 2, 3, 6]` or `['Fine', 'Rain']`.
    pub fn options_literal(&self) -> String {
        let rendered: Vec<String> = match self {
            FieldDomain::Codes(codes) => codes.iter().map(u8::to_string).collect(),
            FieldDomain::Labels(labels) => labels.iter().map(|label| format!("'{label}'")).collect(),
        };
        format!("[{}]", rendered.join(", "))
    }
}

/// Declarative validation rule for one request field.
#[derive(Debug, Clone, Copy)]
pub struct FieldRule {
    pub name: &'static str,
    pub domain: FieldDomain,
    pub required: bool,
    pub missing_message: &'static str,
}

impl FieldRule {
    pub fn invalid_message(&self) -> String {
        format!(
            "Invalid value for {}. Options are: {}",
            self.name,
            self.domain.options_literal()
        )
    }
}

pub const ROAD_TYPE_CODES: [u8; 4] = [1, 2, 3, 6];
pub const WEATHER_LABELS: [&str; 4] = ["Fine", "Rain", "Snow", "Fog"];
pub const TIME_OF_DAY_LABELS: [&str; 4] = ["Morning", "Afternoon", "Evening", "Night"];
pub const JUNCTION_LABELS: [&str; 4] = ["T Junction", "Crossroads", "Roundabout", "Not at junction"];

pub const ROAD_TYPE_RULE: FieldRule = FieldRule {
    name: "road_type",
    domain: FieldDomain::Codes(&ROAD_TYPE_CODES),
    required: true,
    missing_message:
        "Please select a valid road type (1: Residential, 2: Suburban, 3: Rural, 6: Urban)",
};

pub const WEATHER_RULE: FieldRule = FieldRule {
    name: "weather_conditions",
    domain: FieldDomain::Labels(&WEATHER_LABELS),
    required: true,
    missing_message: "Please select valid weather conditions",
};

pub const SPEED_LIMIT_RULE: FieldRule = FieldRule {
    name: "speed_limit",
    domain: FieldDomain::Codes(&SpeedLimit::ALLOWED),
    required: true,
    missing_message: "Please select a valid speed limit",
};

pub const TIME_OF_DAY_RULE: FieldRule = FieldRule {
    name: "time_of_day",
    domain: FieldDomain::Labels(&TIME_OF_DAY_LABELS),
    required: true,
    missing_message: "Please select a valid time of day",
};

pub const JUNCTION_RULE: FieldRule = FieldRule {
    name: "junction_detail",
    domain: FieldDomain::Labels(&JUNCTION_LABELS),
    required: true,
    missing_message: "Please select a valid junction type",
};

/// Rules in the order fields are checked.
pub const FIELD_RULES: [FieldRule; 5] = [
    ROAD_TYPE_RULE,
    WEATHER_RULE,
    SPEED_LIMIT_RULE,
    TIME_OF_DAY_RULE,
    JUNCTION_RULE,
];

/// Per-field validation messages keyed by field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<&'static str, String>);

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn get(&self, field: &str) -> Option<&str> {
        self.0.get(field).map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.0.iter().map(|(field, message)| (*field, message.as_str()))
    }

    fn record(&mut self, field: &'static str, message: String) {
        self.0.insert(field, message);
    }
}

impl fmt::Display for FieldErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let joined: Vec<String> = self
            .iter()
            .map(|(field, message)| format!("{field}: {message}"))
            .collect();
        f.write_str(&joined.join("; "))
    }
}

impl std::error::Error for FieldErrors {}

fn check<'a>(
    raw: &'a Map<String, Value>,
    rule: &FieldRule,
    errors: &mut FieldErrors,
) -> Option<&'a Value> {
    match raw.get(rule.name) {
        None => {
            if rule.required {
                errors.record(rule.name, rule.missing_message.to_string());
            }
            None
        }
        Some(value) if rule.domain.accepts(value) => Some(value),
        Some(_) => {
            errors.record(rule.name, rule.invalid_message());
            None
        }
    }
}

fn as_code(value: &Value) -> Option<u8> {
    value.as_f64().map(|n| n as u8)
}

/// Checks every field of a raw request object, collecting all failures.
pub fn validate(raw: &Map<String, Value>) -> Result<RiskInput, FieldErrors> {
    let mut errors = FieldErrors::default();

    let road_type = check(raw, &ROAD_TYPE_RULE, &mut errors)
        .and_then(as_code)
        .and_then(RoadType::from_code);
    let weather_conditions = check(raw, &WEATHER_RULE, &mut errors)
        .and_then(Value::as_str)
        .and_then(WeatherCondition::from_label);
    let speed_limit = check(raw, &SPEED_LIMIT_RULE, &mut errors)
        .and_then(as_code)
        .and_then(SpeedLimit::new);
    let time_of_day = check(raw, &TIME_OF_DAY_RULE, &mut errors)
        .and_then(Value::as_str)
        .and_then(TimeOfDay::from_label);
    let junction_detail = check(raw, &JUNCTION_RULE, &mut errors)
        .and_then(Value::as_str)
        .and_then(JunctionDetail::from_label);

    match (
        road_type,
        weather_conditions,
        speed_limit,
        time_of_day,
        junction_detail,
    ) {
        (
            Some(road_type),
            Some(weather_conditions),
            Some(speed_limit),
            Some(time_of_day),
            Some(junction_detail),
        ) if errors.is_empty() => Ok(RiskInput {
            road_type,
            weather_conditions,
            speed_limit,
            time_of_day,
            junction_detail,
        }),
        _ => Err(errors),
    }
}
