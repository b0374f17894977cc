//! Evaluation errors

use quickeval_diagnostics::{
    Diagnostic, ErrorCategory, ErrorCode, QE0001, QE0002, QE0003, QE0004, QE0005, QE0006, QE0007,
    QE0008, QE0009, QE0100, QE0101, QE0200, QE0201, QE0202, QE0203, QE0204, QE0205, QE0206,
    QE0207, QE0300, QE0301, QE0302, QE0303,
};
use quickeval_types::CalculationResult;
use thiserror::Error;

/// Result type for evaluation operations
pub type EvalResult<T> = Result<T, EvalError>;

/// Errors raised while tokenizing or evaluating a query.
///
/// These never leave an evaluator's public entry point; they are turned into
/// error [`CalculationResult`]s there.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum EvalError {
    #[error("Expression cannot be empty")]
    EmptyExpression,

    #[error("Unknown token: {token}")]
    UnknownToken { token: String },

    #[error("Mismatched parentheses")]
    MismatchedParentheses,

    /// Operands left over or missing after evaluation
    #[error("Invalid expression")]
    InvalidExpression,

    #[error("Invalid number: {literal}")]
    InvalidNumber { literal: String },

    #[error("Invalid conversion format. Use: '10 km to miles'")]
    InvalidConversionFormat,

    #[error("Invalid date expression format")]
    InvalidDateExpression,

    #[error("Invalid comparison expression: expected '<number> <operator> <number>'")]
    InvalidComparison,

    #[error("Operator '{operator}' is not allowed here")]
    MisplacedOperator { operator: String },

    #[error("Insufficient operands for operator {operator}")]
    InsufficientOperands { operator: String },

    #[error("Insufficient arguments for function {function}")]
    InsufficientArguments { function: String },

    #[error("Division by zero")]
    DivisionByZero,

    #[error("Factorial is not defined for negative numbers")]
    NegativeFactorial,

    #[error("Factorial result too large")]
    FactorialOverflow,

    #[error("Arithmetic overflow in {operation}")]
    Overflow { operation: String },

    #[error("Cannot convert from '{from}' to '{to}'")]
    IncompatibleUnits { from: String, to: String },

    #[error("Cannot convert between special and regular units")]
    AffineMix,

    #[error("Cannot parse date: {text}")]
    UnparseableDate { text: String },

    #[error("Date out of range: {message}")]
    DateOutOfRange { message: String },

    #[error("Shift amount {amount} is out of range (0-63)")]
    ShiftOutOfRange { amount: i64 },

    #[error("Unknown operator: {operator}")]
    UnknownOperator { operator: String },

    #[error("Cannot convert from '{from}' to '{to}': unknown unit")]
    UnknownUnits { from: String, to: String },

    #[error("Unrecognized expression: {input}")]
    UnrecognizedExpression { input: String },

    #[error("Natural language processing requires AI integration")]
    NaturalLanguage,
}

impl EvalError {
    pub fn unknown_token(token: impl Into<String>) -> Self {
        Self::UnknownToken {
            token: token.into(),
        }
    }

    pub fn invalid_number(literal: impl Into<String>) -> Self {
        Self::InvalidNumber {
            literal: literal.into(),
        }
    }

    pub fn misplaced_operator(operator: impl Into<String>) -> Self {
        Self::MisplacedOperator {
            operator: operator.into(),
        }
    }

    pub fn insufficient_operands(operator: impl Into<String>) -> Self {
        Self::InsufficientOperands {
            operator: operator.into(),
        }
    }

    pub fn insufficient_arguments(function: impl Into<String>) -> Self {
        Self::InsufficientArguments {
            function: function.into(),
        }
    }

    pub fn overflow(operation: impl Into<String>) -> Self {
        Self::Overflow {
            operation: operation.into(),
        }
    }

    pub fn incompatible_units(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::IncompatibleUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn unknown_units(from: impl Into<String>, to: impl Into<String>) -> Self {
        Self::UnknownUnits {
            from: from.into(),
            to: to.into(),
        }
    }

    pub fn unparseable_date(text: impl Into<String>) -> Self {
        Self::UnparseableDate { text: text.into() }
    }

    pub fn date_out_of_range(message: impl Into<String>) -> Self {
        Self::DateOutOfRange {
            message: message.into(),
        }
    }

    pub fn unknown_operator(operator: impl Into<String>) -> Self {
        Self::UnknownOperator {
            operator: operator.into(),
        }
    }

    pub fn unrecognized(input: impl Into<String>) -> Self {
        Self::UnrecognizedExpression {
            input: input.into(),
        }
    }

    /// Stable diagnostic code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::EmptyExpression => QE0001,
            Self::UnknownToken { .. } => QE0002,
            Self::MismatchedParentheses => QE0003,
            Self::InvalidExpression => QE0004,
            Self::InvalidNumber { .. } => QE0005,
            Self::InvalidConversionFormat => QE0006,
            Self::InvalidDateExpression => QE0007,
            Self::InvalidComparison => QE0008,
            Self::MisplacedOperator { .. } => QE0009,
            Self::InsufficientOperands { .. } => QE0100,
            Self::InsufficientArguments { .. } => QE0101,
            Self::DivisionByZero => QE0200,
            Self::NegativeFactorial | Self::FactorialOverflow => QE0201,
            Self::Overflow { .. } => QE0202,
            Self::IncompatibleUnits { .. } => QE0203,
            Self::AffineMix => QE0204,
            Self::UnparseableDate { .. } => QE0205,
            Self::DateOutOfRange { .. } => QE0206,
            Self::ShiftOutOfRange { .. } => QE0207,
            Self::UnknownOperator { .. } => QE0300,
            Self::UnknownUnits { .. } => QE0301,
            Self::UnrecognizedExpression { .. } => QE0302,
            Self::NaturalLanguage => QE0303,
        }
    }

    pub fn category(&self) -> ErrorCategory {
        self.code().category().unwrap_or(ErrorCategory::System)
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        Diagnostic::error(self.code(), self.to_string())
    }

    /// Convert into the error result reported for `input`
    pub fn into_result(self, input: &str) -> CalculationResult {
        CalculationResult::error(input, self.to_string())
    }
}
