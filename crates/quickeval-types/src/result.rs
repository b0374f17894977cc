//! Evaluation output record

use serde::{Deserialize, Serialize};
use std::fmt;

/// Score attached to every successful result
pub const DEFAULT_SCORE: u32 = 100;

/// Domain tag carried by a [`CalculationResult`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CalculationType {
    Arithmetic,
    Algebraic,
    Trigonometric,
    Logarithmic,
    Statistical,
    UnitConversion,
    DateCalculation,
    LogicEvaluation,
    Health,
    Money,
    NaturalLanguage,
    AiAssisted,
    Error,
}

impl CalculationType {
    /// Every variant in declaration order
    pub const ALL: [CalculationType; 13] = [
        Self::Arithmetic,
        Self::Algebraic,
        Self::Trigonometric,
        Self::Logarithmic,
        Self::Statistical,
        Self::UnitConversion,
        Self::DateCalculation,
        Self::LogicEvaluation,
        Self::Health,
        Self::Money,
        Self::NaturalLanguage,
        Self::AiAssisted,
        Self::Error,
    ];

    pub const fn name(&self) -> &'static str {
        match self {
            Self::Arithmetic => "Arithmetic",
            Self::Algebraic => "Algebraic",
            Self::Trigonometric => "Trigonometric",
            Self::Logarithmic => "Logarithmic",
            Self::Statistical => "Statistical",
            Self::UnitConversion => "UnitConversion",
            Self::DateCalculation => "DateCalculation",
            Self::LogicEvaluation => "LogicEvaluation",
            Self::Health => "Health",
            Self::Money => "Money",
            Self::NaturalLanguage => "NaturalLanguage",
            Self::AiAssisted => "AiAssisted",
            Self::Error => "Error",
        }
    }

    /// Types answered by the numeric expression evaluator
    pub const fn is_math(&self) -> bool {
        matches!(
            self,
            Self::Arithmetic
                | Self::Algebraic
                | Self::Trigonometric
                | Self::Logarithmic
                | Self::Statistical
        )
    }
}

impl fmt::Display for CalculationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Output of any evaluator.
///
/// `is_error`, `score == 0` and `calculation_type == Error` always agree:
/// successful results are built with [`CalculationResult::success`] and
/// failures with [`CalculationResult::error`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CalculationResult {
    /// Echo of the input or a canonical expression
    pub title: String,
    /// Explanation line
    pub subtitle: String,
    /// Canonical formatted output
    pub result: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub raw_expression: Option<String>,
    #[serde(rename = "type")]
    pub calculation_type: CalculationType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub numeric_value: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    pub score: u32,
    pub is_error: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,
}

impl CalculationResult {
    /// Successful result of the given type, scored [`DEFAULT_SCORE`]
    pub fn success(
        title: impl Into<String>,
        result: impl Into<String>,
        calculation_type: CalculationType,
    ) -> Self {
        debug_assert!(calculation_type != CalculationType::Error);
        Self {
            title: title.into(),
            subtitle: String::new(),
            result: result.into(),
            raw_expression: None,
            calculation_type,
            numeric_value: None,
            unit: None,
            score: DEFAULT_SCORE,
            is_error: false,
            error_message: None,
        }
    }

    /// Error result echoing `input` with an actionable `message`
    pub fn error(input: impl Into<String>, message: impl Into<String>) -> Self {
        let message = message.into();
        Self {
            title: "Error".to_string(),
            subtitle: message.clone(),
            result: String::new(),
            raw_expression: Some(input.into()),
            calculation_type: CalculationType::Error,
            numeric_value: None,
            unit: None,
            score: 0,
            is_error: true,
            error_message: Some(message),
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    pub fn with_subtitle(mut self, subtitle: impl Into<String>) -> Self {
        self.subtitle = subtitle.into();
        self
    }

    pub fn with_raw_expression(mut self, raw: impl Into<String>) -> Self {
        self.raw_expression = Some(raw.into());
        self
    }

    pub fn with_numeric_value(mut self, value: f64) -> Self {
        self.numeric_value = Some(value);
        self
    }

    pub fn with_unit(mut self, unit: impl Into<String>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Error message for failed results, `None` otherwise
    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }
}

impl fmt::Display for CalculationResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_error {
            write!(f, "{}: {}", self.title, self.subtitle)
        } else {
            match &self.unit {
                Some(unit) => write!(f, "{} {}", self.result, unit),
                None => f.write_str(&self.result),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_success_defaults() {
        let result = CalculationResult::success("2+2", "4", CalculationType::Arithmetic)
            .with_subtitle("Result: 4")
            .with_numeric_value(4.0);

        assert!(!result.is_error);
        assert_eq!(result.score, DEFAULT_SCORE);
        assert_eq!(result.numeric_value, Some(4.0));
        assert_eq!(result.error_message(), None);
        assert_eq!(result.to_string(), "4");
    }

    #[test]
    fn test_error_invariants() {
        let result = CalculationResult::error("5 / 0", "Division by zero");

        assert!(result.is_error);
        assert_eq!(result.score, 0);
        assert_eq!(result.calculation_type, CalculationType::Error);
        assert_eq!(result.title, "Error");
        assert_eq!(result.subtitle, "Division by zero");
        assert_eq!(result.result, "");
        assert_eq!(result.raw_expression.as_deref(), Some("5 / 0"));
        assert_eq!(result.error_message(), Some("Division by zero"));
    }

    #[test]
    fn test_serializes_camel_case() {
        let result = CalculationResult::success("10 km to miles", "6.2137", CalculationType::UnitConversion)
            .with_unit("mi");
        let json = serde_json::to_value(&result).unwrap();

        assert_eq!(json["type"], "UnitConversion");
        assert_eq!(json["isError"], false);
        assert_eq!(json["unit"], "mi");
        assert!(json.get("numericValue").is_none());

        let back: CalculationResult = serde_json::from_value(json).unwrap();
        assert_eq!(back, result);
    }

    #[test]
    fn test_math_types() {
        assert!(CalculationType::Trigonometric.is_math());
        assert!(!CalculationType::UnitConversion.is_math());
        assert_eq!(CalculationType::ALL.len(), 13);
    }
}
