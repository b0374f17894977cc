//! Two-operand numeric comparisons

use crate::error::{EvalError, EvalResult};
use once_cell::sync::Lazy;
use regex::Regex;

static OPERATOR: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"==|!=|<>|<=|>=|<|>").expect("valid comparison operator pattern"));
static COMPARISON: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^([-+]?(?:\d+(?:\.\d*)?|\.\d+))\s*(==|!=|<>|<=|>=|<|>)\s*([-+]?(?:\d+(?:\.\d*)?|\.\d+))$",
    )
    .expect("valid comparison pattern")
});

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOperator {
    Equal,
    NotEqual,
    Less,
    LessOrEqual,
    Greater,
    GreaterOrEqual,
}

impl ComparisonOperator {
    pub fn parse(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Self::Equal),
            "!=" | "<>" => Some(Self::NotEqual),
            "<" => Some(Self::Less),
            "<=" => Some(Self::LessOrEqual),
            ">" => Some(Self::Greater),
            ">=" => Some(Self::GreaterOrEqual),
            _ => None,
        }
    }

    /// Compare with exact IEEE-754 semantics (no tolerance)
    #[allow(clippy::float_cmp)]
    pub fn apply(self, left: f64, right: f64) -> bool {
        match self {
            Self::Equal => left == right,
            Self::NotEqual => left != right,
            Self::Less => left < right,
            Self::LessOrEqual => left <= right,
            Self::Greater => left > right,
            Self::GreaterOrEqual => left >= right,
        }
    }
}

/// True when `expression` contains a comparison operator
pub fn is_comparison(expression: &str) -> bool {
    OPERATOR.is_match(expression)
}

/// Evaluate `<number> <operator> <number>`
pub fn evaluate(expression: &str) -> EvalResult<bool> {
    let caps = COMPARISON
        .captures(expression.trim())
        .ok_or(EvalError::InvalidComparison)?;

    let left = parse_operand(&caps[1])?;
    let right = parse_operand(&caps[3])?;
    let operator = ComparisonOperator::parse(&caps[2])
        .ok_or_else(|| EvalError::unknown_operator(&caps[2]))?;

    Ok(operator.apply(left, right))
}

fn parse_operand(text: &str) -> EvalResult<f64> {
    text.parse::<f64>().map_err(|_| EvalError::invalid_number(text))
}
