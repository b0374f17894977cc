//! Domain evaluators
//!
//! - `arithmetic`: shunting-yard numeric expressions with functions and constants
//! - `bitwise`, `comparison`, `logical`: the three logic sub-grammars
//! - `units`: dimension-table unit conversion
//! - `datetime`: calendar arithmetic over an injectable clock

pub mod arithmetic;
pub mod bitwise;
pub mod comparison;
pub mod datetime;
pub mod logical;
pub mod units;

pub use arithmetic::ArithmeticEvaluator;
pub use datetime::{DateCalculator, DateShape, DateUnit};
pub use logical::{LogicEvaluator, LogicMode};
pub use units::{ConversionInfo, ConversionRequest, Dimension, UnitConverter};
