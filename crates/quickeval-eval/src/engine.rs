//! Evaluation engine
//!
//! Owns one evaluator per domain and maps a [`CalculationType`] onto the
//! evaluator that handles it.

use crate::context::Clock;
use crate::operators::{ArithmeticEvaluator, DateCalculator, LogicEvaluator, UnitConverter};
use quickeval_types::{CalculationResult, CalculationType, EngineConfig};
use std::sync::Arc;
use tracing::trace;

/// Dispatcher over the four domain evaluators
#[derive(Debug, Clone)]
pub struct EvaluationEngine {
    config: EngineConfig,
    arithmetic: ArithmeticEvaluator,
    logic: LogicEvaluator,
    units: UnitConverter,
    dates: DateCalculator,
}

impl Default for EvaluationEngine {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl EvaluationEngine {
    /// Create an engine whose date calculator reads the system clock
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            arithmetic: ArithmeticEvaluator::new(config),
            logic: LogicEvaluator::new(config),
            units: UnitConverter::new(config),
            dates: DateCalculator::new(config),
        }
    }

    /// Create an engine with a custom clock for date keywords
    pub fn with_clock(config: EngineConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            dates: DateCalculator::with_clock(config, clock),
            ..Self::new(config)
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn arithmetic(&self) -> &ArithmeticEvaluator {
        &self.arithmetic
    }

    pub fn logic(&self) -> &LogicEvaluator {
        &self.logic
    }

    pub fn units(&self) -> &UnitConverter {
        &self.units
    }

    pub fn dates(&self) -> &DateCalculator {
        &self.dates
    }

    /// Whether some evaluator handles `ty`
    pub fn supports(ty: CalculationType) -> bool {
        ty.is_math()
            || matches!(
                ty,
                CalculationType::UnitConversion
                    | CalculationType::DateCalculation
                    | CalculationType::LogicEvaluation
            )
    }

    /// Evaluate `input` as `ty`.
    ///
    /// Returns `None` for types no evaluator handles (health, money,
    /// natural language, AI, error). Evaluation failures come back as
    /// error results, never as `None`.
    pub fn evaluate_as(&self, ty: CalculationType, input: &str) -> Option<CalculationResult> {
        trace!(%ty, input, "dispatching");
        let result = match ty {
            CalculationType::UnitConversion => self.units.convert(input),
            CalculationType::DateCalculation => self.dates.calculate(input),
            CalculationType::LogicEvaluation => self.logic.evaluate(input),
            ty if ty.is_math() => self.arithmetic.evaluate(input),
            _ => return None,
        };
        Some(result)
    }
}
