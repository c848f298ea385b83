use crate::error::LandslideError;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// The five scored weather parameters, in scoring order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Parameter {
    RainfallHourly,
    Cumulative3Day,
    Cumulative7Day,
    Humidity,
    WindSpeed,
}

impl Parameter {
    pub const ALL: [Parameter; 5] = [
        Parameter::RainfallHourly,
        Parameter::Cumulative3Day,
        Parameter::Cumulative7Day,
        Parameter::Humidity,
        Parameter::WindSpeed,
    ];

    pub fn key(self) -> &'static str {
        match self {
            Parameter::RainfallHourly => "rainfall_hourly",
            Parameter::Cumulative3Day => "cumulative_3day",
            Parameter::Cumulative7Day => "cumulative_7day",
            Parameter::Humidity => "humidity",
            Parameter::WindSpeed => "wind_speed",
        }
    }

    pub fn unit(self) -> &'static str {
        match self {
            Parameter::RainfallHourly => "mm/h",
            Parameter::Cumulative3Day | Parameter::Cumulative7Day => "mm",
            Parameter::Humidity => "%",
            Parameter::WindSpeed => "km/h",
        }
    }
}

impl fmt::Display for Parameter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for Parameter {
    type Err = LandslideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Parameter::ALL
            .into_iter()
            .find(|parameter| parameter.key() == s.trim())
            .ok_or_else(|| LandslideError::InputValidation {
                field: "parameter".to_string(),
                reason: format!("unknown parameter: {s}"),
            })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Safe,
    Watch,
    Danger,
}

impl RiskLevel {
    pub const ALL: [RiskLevel; 3] = [RiskLevel::Safe, RiskLevel::Watch, RiskLevel::Danger];

    pub fn as_str(self) -> &'static str {
        match self {
            RiskLevel::Safe => "SAFE",
            RiskLevel::Watch => "WATCH",
            RiskLevel::Danger => "DANGER",
        }
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RiskLevel {
    type Err = LandslideError;

    /// Accepts the English names and the Indonesian names used in the field
    /// (AMAN / WASPADA / BAHAYA).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SAFE" | "AMAN" => Ok(RiskLevel::Safe),
            "WATCH" | "WASPADA" => Ok(RiskLevel::Watch),
            "DANGER" | "BAHAYA" => Ok(RiskLevel::Danger),
            other => Err(LandslideError::InputValidation {
                field: "risk level".to_string(),
                reason: format!("unknown risk level: {other}"),
            }),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SeasonTier {
    High,
    Moderate,
    Low,
}

/// One normalized set of sensor inputs for a single assessment.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Readings {
    pub rainfall_hourly: f64,
    pub cumulative_3day: f64,
    pub cumulative_7day: f64,
    pub humidity: f64,
    pub wind_speed: f64,
}

impl Readings {
    pub fn value(&self, parameter: Parameter) -> f64 {
        match parameter {
            Parameter::RainfallHourly => self.rainfall_hourly,
            Parameter::Cumulative3Day => self.cumulative_3day,
            Parameter::Cumulative7Day => self.cumulative_7day,
            Parameter::Humidity => self.humidity,
            Parameter::WindSpeed => self.wind_speed,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParameterDetail {
    pub parameter: Parameter,
    pub value: f64,
    pub raw_score: f64,
    pub weight: f64,
    pub weighted_score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LevelDisplay {
    pub color: String,
    pub emoji: String,
    pub description: String,
}

/// Immutable snapshot produced by one engine assessment.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RiskResult {
    pub parameters: Vec<ParameterDetail>,
    pub total_score: f64,
    pub seasonal_multiplier: f64,
    pub adjusted_score: f64,
    pub risk_level: RiskLevel,
    pub display: LevelDisplay,
    pub timestamp: DateTime<Utc>,
}

impl RiskResult {
    pub fn detail(&self, parameter: Parameter) -> Option<&ParameterDetail> {
        self.parameters
            .iter()
            .find(|detail| detail.parameter == parameter)
    }
}
