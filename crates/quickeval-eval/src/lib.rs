//! Domain evaluators for quickeval
//!
//! This crate turns short text queries into [`CalculationResult`]s. Each
//! domain has its own micro-interpreter:
//!
//! - **Arithmetic**: `2 + 3 * 4`, `sqrt(16) + 2pi`, `pow(2, 10)`, `factorial(5)`
//! - **Logic**: boolean (`true and not false`), bitwise (`0xFF & 0x0F`, `1 << 4`)
//!   and two-operand comparison (`5 > 3`)
//! - **Units**: `10 km to miles`, `100 celsius to fahrenheit`, `5km miles`
//! - **Dates**: `today + 7 days`, `days between 2024-01-01 and 2024-01-31`, `age of 1990-05-20`
//!
//! # Example
//!
//! ```
//! use quickeval_eval::EvaluationEngine;
//! use quickeval_types::{CalculationType, EngineConfig};
//!
//! let engine = EvaluationEngine::new(EngineConfig::default().with_precision(4));
//! let result = engine.evaluate_as(CalculationType::UnitConversion, "10 km to miles").unwrap();
//! assert_eq!(result.result, "6.2137");
//! assert_eq!(result.unit.as_deref(), Some("mi"));
//! ```
//!
//! # Errors
//!
//! Evaluators never fail at their public boundary. Internally every step
//! returns [`EvalResult`]; the top-level `evaluate`/`convert`/`calculate`
//! calls turn an [`EvalError`] into an error result carrying the input text
//! and the error message.
//!
//! [`CalculationResult`]: quickeval_types::CalculationResult

pub mod context;
pub mod engine;
pub mod error;
pub mod operators;
pub mod registry;

pub use context::{Clock, FixedClock, SystemClock};
pub use engine::EvaluationEngine;
pub use error::{EvalError, EvalResult};
pub use operators::{
    ArithmeticEvaluator, ConversionInfo, ConversionRequest, DateCalculator, DateShape, DateUnit, Dimension,
    LogicEvaluator, LogicMode, UnitConverter,
};
pub use registry::{FunctionDefinition, FunctionRegistry};
