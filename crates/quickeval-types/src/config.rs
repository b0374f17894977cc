//! Engine configuration

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Largest number of decimal places a result may be rounded to
pub const MAX_PRECISION: u32 = 28;

/// Decimal places used when none are configured
pub const DEFAULT_PRECISION: u32 = 10;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Precision {value} is out of range (0-{MAX_PRECISION})")]
    PrecisionOutOfRange { value: u32 },

    #[error("Unknown angle unit '{0}' (expected radians, degrees or gradians)")]
    UnknownAngleUnit(String),

    #[error("Invalid configuration: {0}")]
    Json(#[from] serde_json::Error),
}

/// Unit trigonometric functions read and return angles in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum AngleUnit {
    #[default]
    Radians,
    Degrees,
    Gradians,
}

impl AngleUnit {
    pub fn to_radians(self, angle: f64) -> f64 {
        match self {
            AngleUnit::Radians => angle,
            AngleUnit::Degrees => angle * std::f64::consts::PI / 180.0,
            AngleUnit::Gradians => angle * std::f64::consts::PI / 200.0,
        }
    }

    pub fn from_radians(self, radians: f64) -> f64 {
        match self {
            AngleUnit::Radians => radians,
            AngleUnit::Degrees => radians * 180.0 / std::f64::consts::PI,
            AngleUnit::Gradians => radians * 200.0 / std::f64::consts::PI,
        }
    }
}

impl fmt::Display for AngleUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AngleUnit::Radians => write!(f, "radians"),
            AngleUnit::Degrees => write!(f, "degrees"),
            AngleUnit::Gradians => write!(f, "gradians"),
        }
    }
}

impl FromStr for AngleUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rad" | "radian" | "radians" => Ok(AngleUnit::Radians),
            "deg" | "degree" | "degrees" => Ok(AngleUnit::Degrees),
            "grad" | "gradian" | "gradians" | "gon" => Ok(AngleUnit::Gradians),
            other => Err(ConfigError::UnknownAngleUnit(other.to_string())),
        }
    }
}

/// Immutable settings every evaluator is constructed with
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct EngineConfig {
    /// Decimal places for fixed-point output, `0..=28`
    pub precision: u32,
    pub angle_unit: AngleUnit,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            precision: DEFAULT_PRECISION,
            angle_unit: AngleUnit::Radians,
        }
    }
}

impl EngineConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_precision(mut self, precision: u32) -> Self {
        self.precision = precision;
        self
    }

    pub fn with_angle_unit(mut self, angle_unit: AngleUnit) -> Self {
        self.angle_unit = angle_unit;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.precision > MAX_PRECISION {
            return Err(ConfigError::PrecisionOutOfRange {
                value: self.precision,
            });
        }
        Ok(())
    }

    /// Parse and validate a JSON document such as
    /// `{"precision": 4, "angleUnit": "Degrees"}`. Missing fields take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: EngineConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.precision, 10);
        assert_eq!(config.angle_unit, AngleUnit::Radians);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_precision_bounds() {
        assert!(EngineConfig::new().with_precision(0).validate().is_ok());
        assert!(EngineConfig::new().with_precision(28).validate().is_ok());
        assert!(matches!(
            EngineConfig::new().with_precision(29).validate(),
            Err(ConfigError::PrecisionOutOfRange { value: 29 })
        ));
    }

    #[test]
    fn test_from_json() {
        let config = EngineConfig::from_json_str(r#"{"precision": 4, "angleUnit": "Degrees"}"#).unwrap();
        assert_eq!(config, EngineConfig::new().with_precision(4).with_angle_unit(AngleUnit::Degrees));

        let partial = EngineConfig::from_json_str(r#"{"precision": 2}"#).unwrap();
        assert_eq!(partial.angle_unit, AngleUnit::Radians);

        assert!(EngineConfig::from_json_str(r#"{"precision": 40}"#).is_err());
        assert!(EngineConfig::from_json_str("not json").is_err());
    }

    #[test]
    fn test_angle_unit_parse_and_convert() {
        assert_eq!("deg".parse::<AngleUnit>().unwrap(), AngleUnit::Degrees);
        assert_eq!("Gradians".parse::<AngleUnit>().unwrap(), AngleUnit::Gradians);
        assert!("turns".parse::<AngleUnit>().is_err());

        let radians = AngleUnit::Degrees.to_radians(180.0);
        assert!((radians - std::f64::consts::PI).abs() < 1e-12);
        assert!((AngleUnit::Gradians.from_radians(std::f64::consts::PI) - 200.0).abs() < 1e-9);
    }
}
