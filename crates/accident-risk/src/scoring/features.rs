//! Encoding of validated conditions into the classifier's column layout.

use std::collections::HashMap;
use std::sync::Arc;

use super::domain::{JunctionDetail, RiskInput, SpeedLimit, TimeOfDay, WeatherCondition};

/// Ordered feature names the classifier was trained on. Column position carries meaning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureSchema {
    names: Arc<[String]>,
    positions: Arc<HashMap<String, usize>>,
}

impl FeatureSchema {
    /// Builds a schema, rejecting empty or duplicated feature names.
    pub fn new(names: Vec<String>) -> Result<Self, SchemaError> {
        if names.is_empty() {
            return Err(SchemaError::Empty);
        }

        let mut positions = HashMap::with_capacity(names.len());
        for (index, name) in names.iter().enumerate() {
            if name.trim().is_empty() {
                return Err(SchemaError::BlankName { index });
            }
            if positions.insert(name.clone(), index).is_some() {
                return Err(SchemaError::Duplicate { name: name.clone() });
            }
        }

        Ok(Self {
            names: names.into(),
            positions: Arc::new(positions),
        })
    }

    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn len(&self) -> usize {
        self.names.len()
    }

    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SchemaError {
    #[error("feature schema must list at least one feature")]
    Empty,
    #[error("feature name at position {index} is blank")]
    BlankName { index: usize },
    #[error("feature '{name}' appears more than once")]
    Duplicate { name: String },
}

/// Fully populated feature values laid out in schema order.
#[derive(Debug, Clone, PartialEq)]
pub struct FeatureVector {
    schema: FeatureSchema,
    values: Vec<f64>,
}

impl FeatureVector {
    pub fn zeroed(schema: &FeatureSchema) -> Self {
        Self {
            schema: schema.clone(),
            values: vec![0.0; schema.len()],
        }
    }

    /// Sets a named feature. Names outside the schema are dropped.
    pub fn set(&mut self, name: &str, value: f64) {
        if let Some(index) = self.schema.position(name) {
            self.values[index] = value;
        }
    }

    pub fn get(&self, name: &str) -> Option<f64> {
        self.schema.position(name).map(|index| self.values[index])
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn schema(&self) -> &FeatureSchema {
        &self.schema
    }

    /// `(name, value)` pairs in schema order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.schema
            .names()
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().copied())
    }
}

pub(crate) const fn weather_code(weather: WeatherCondition) -> u8 {
    match weather {
        WeatherCondition::Fine => 1,
        WeatherCondition::Rain => 2,
        WeatherCondition::Snow => 3,
        WeatherCondition::Fog => 4,
    }
}

/// Daylight (1) versus darkness with street lights lit (4).
pub(crate) const fn light_code(time: TimeOfDay) -> u8 {
    match time {
        TimeOfDay::Morning | TimeOfDay::Afternoon => 1,
        TimeOfDay::Evening | TimeOfDay::Night => 4,
    }
}

pub(crate) const fn junction_code(junction: JunctionDetail) -> u8 {
    match junction {
        JunctionDetail::NotAtJunction => 0,
        JunctionDetail::TJunction => 1,
        JunctionDetail::Crossroads => 2,
        JunctionDetail::Roundabout => 3,
    }
}

fn indicator(flag: bool) -> f64 {
    if flag {
        1.0
    } else {
        0.0
    }
}

/// Encodes a validated input against the loaded schema.
pub fn encode(input: &RiskInput, schema: &FeatureSchema) -> FeatureVector {
    let mut vector = FeatureVector::zeroed(schema);

    vector.set(&format!("road_type_{}", input.road_type.code()), 1.0);
    vector.set(
        &format!("weather_conditions_{}", weather_code(input.weather_conditions)),
        1.0,
    );
    vector.set(&format!("light_conditions_{}", light_code(input.time_of_day)), 1.0);
    vector.set(
        &format!("junction_detail_{}", junction_code(input.junction_detail)),
        1.0,
    );

    vector.set(
        "speed_limit",
        f64::from(input.speed_limit.mph()) / f64::from(SpeedLimit::MAX_MPH),
    );

    let weather_risk = indicator(input.weather_conditions.is_adverse());
    let surface_risk = indicator(input.weather_conditions.affects_surface());
    let is_night = indicator(input.time_of_day.is_dark());
    let high_speed = indicator(input.speed_limit.is_high_speed());

    vector.set("number_of_vehicles", 1.0);
    vector.set("number_of_casualties", 0.0);
    vector.set("casualty_rate", 0.0);
    vector.set("weather_risk", weather_risk);
    vector.set("surface_risk", surface_risk);
    vector.set("combined_risk", weather_risk + surface_risk);
    vector.set("is_night", is_night);
    vector.set("is_rush_hour", indicator(input.time_of_day.is_rush_hour()));
    vector.set("is_weekend", 0.0);
    vector.set("high_speed", high_speed);
    vector.set("night_speed_risk", is_night * high_speed);
    vector.set("weather_speed_risk", weather_risk * high_speed);

    vector
}
