use std::fmt;

use serde::Serialize;

/// Road classification codes as recorded in the accident dataset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoadType {
    Residential,
    Suburban,
    Rural,
    Urban,
}

impl RoadType {
    pub const fn ordered() -> [Self; 4] {
        [Self::Residential, Self::Suburban, Self::Rural, Self::Urban]
    }

    pub const fn code(self) -> u8 {
        match self {
            Self::Residential => 1,
            Self::Suburban => 2,
            Self::Rural => 3,
            Self::Urban => 6,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Self::ordered().into_iter().find(|road| road.code() == code)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Urban => "Urban area with high traffic",
            Self::Rural => "Rural road with potential hazards",
            Self::Suburban => "Suburban area with moderate traffic",
            Self::Residential => "Residential area with lower traffic",
        }
    }

    /// Urban and rural roads carry extra risk; the others only have a description.
    pub const fn is_elevated(self) -> bool {
        matches!(self, Self::Urban | Self::Rural)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherCondition {
    Fine,
    Rain,
    Snow,
    Fog,
}

impl WeatherCondition {
    pub const fn ordered() -> [Self; 4] {
        [Self::Fine, Self::Rain, Self::Snow, Self::Fog]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Fine => "Fine",
            Self::Rain => "Rain",
            Self::Snow => "Snow",
            Self::Fog => "Fog",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|weather| weather.label() == label)
    }

    pub const fn is_adverse(self) -> bool {
        !matches!(self, Self::Fine)
    }

    /// Wet or icy surfaces.
    pub const fn affects_surface(self) -> bool {
        matches!(self, Self::Rain | Self::Snow)
    }
}

impl fmt::Display for WeatherCondition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Posted limit in miles per hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpeedLimit(u8);

impl SpeedLimit {
    pub const ALLOWED: [u8; 6] = [20, 30, 40, 50, 60, 70];
    pub const MAX_MPH: u8 = 70;

    pub fn new(mph: u8) -> Option<Self> {
        Self::ALLOWED.contains(&mph).then_some(Self(mph))
    }

    pub const fn mph(self) -> u8 {
        self.0
    }

    pub const fn is_high_speed(self) -> bool {
        self.0 > 40
    }

    pub const fn is_low_speed(self) -> bool {
        self.0 <= 30
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const fn ordered() -> [Self; 4] {
        [Self::Morning, Self::Afternoon, Self::Evening, Self::Night]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Morning => "Morning",
            Self::Afternoon => "Afternoon",
            Self::Evening => "Evening",
            Self::Night => "Night",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|time| time.label() == label)
    }

    pub const fn is_dark(self) -> bool {
        matches!(self, Self::Evening | Self::Night)
    }

    pub const fn is_rush_hour(self) -> bool {
        matches!(self, Self::Morning | Self::Evening)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JunctionDetail {
    TJunction,
    Crossroads,
    Roundabout,
    NotAtJunction,
}

impl JunctionDetail {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::TJunction,
            Self::Crossroads,
            Self::Roundabout,
            Self::NotAtJunction,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::TJunction => "T Junction",
            Self::Crossroads => "Crossroads",
            Self::Roundabout => "Roundabout",
            Self::NotAtJunction => "Not at junction",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        Self::ordered().into_iter().find(|junction| junction.label() == label)
    }

    pub const fn is_junction(self) -> bool {
        !matches!(self, Self::NotAtJunction)
    }
}

impl fmt::Display for JunctionDetail {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Validated location conditions. Only the validator constructs these from raw payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct RiskInput {
    pub road_type: RoadType,
    pub weather_conditions: WeatherCondition,
    pub speed_limit: SpeedLimit,
    pub time_of_day: TimeOfDay,
    pub junction_detail: JunctionDetail,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum RiskLevel {
    #[serde(rename = "High Risk")]
    HighRisk,
    #[serde(rename = "Not High Risk")]
    NotHighRisk,
}

impl RiskLevel {
    pub const fn label(self) -> &'static str {
        match self {
            Self::HighRisk => "High Risk",
            Self::NotHighRisk => "Not High Risk",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Full scoring outcome for one location, before boundary formatting.
#[derive(Debug, Clone, PartialEq)]
pub struct RiskAssessment {
    pub risk_level: RiskLevel,
    pub probability: f64,
    pub raw_probability: f64,
    pub base_risk_score: f64,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

impl RiskAssessment {
    pub fn prediction_view(&self) -> PredictionView {
        PredictionView {
            risk_level: self.risk_level,
            probability: format_percentage(self.probability),
            raw_probability: format_percentage(self.raw_probability),
            risk_factors: self.risk_factors.clone(),
            recommendations: self.recommendations.clone(),
        }
    }
}

/// Wire representation of a prediction with percentages rendered as strings.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PredictionView {
    pub risk_level: RiskLevel,
    pub probability: String,
    pub raw_probability: String,
    pub risk_factors: Vec<String>,
    pub recommendations: Vec<String>,
}

/// Renders a probability as a percentage with two decimals, e.g. `0.4567` -> `45.67%`.
pub fn format_percentage(probability: f64) -> String {
    format!("{:.2}%", probability * 100.0)
}
