//! Logic evaluator: bitwise, comparison and boolean expressions
//!
//! The sub-grammar is picked by inspecting the text, in this order:
//! 1. bitwise, when `& | ^ ~ << >>` appear (`&&`/`||` excluded)
//! 2. comparison, when `== != <> <= >= < >` appear
//! 3. boolean otherwise
//!
//! Boolean word operators are rewritten to symbols before tokenizing:
//! `and` → `&&`, `or` → `||`, `not` → `!`, `xor` → `^`, `nand` → `!&`,
//! `nor` → `!|`, `xnor` → `!^`, and `true`/`false` become `1`/`0`.
//! Precedence: `!` = 3, `&&`/`nand` = 2, `^`/`xnor` = 1, `||`/`nor` = 0.

use crate::error::{EvalError, EvalResult};
use crate::operators::{bitwise, comparison};
use once_cell::sync::Lazy;
use quickeval_types::{CalculationResult, CalculationType, EngineConfig};
use regex::Regex;
use tracing::debug;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static WORD_OPERATORS: Lazy<Vec<(Regex, &'static str)>> = Lazy::new(|| {
    [
        ("xnor", "!^"),
        ("nand", "!&"),
        ("nor", "!|"),
        ("and", "&&"),
        ("or", "||"),
        ("xor", "^"),
        ("not", "!"),
        ("true", "1"),
        ("false", "0"),
    ]
    .into_iter()
    .map(|(word, symbol)| {
        let pattern = Regex::new(&format!(r"\b{word}\b")).expect("valid word operator pattern");
        (pattern, symbol)
    })
    .collect()
});
static BOOLEAN_TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"!&|!\||!\^|&&|\|\||[!^()]|\d+(?:\.\d+)?|[a-z_][a-z0-9_]*|\S")
        .expect("valid boolean token pattern")
});

/// Which sub-grammar a logic expression belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogicMode {
    Bitwise,
    Comparison,
    Boolean,
}

impl LogicMode {
    pub fn detect(normalized: &str) -> Self {
        if bitwise::is_bitwise(normalized) {
            LogicMode::Bitwise
        } else if comparison::is_comparison(normalized) {
            LogicMode::Comparison
        } else {
            LogicMode::Boolean
        }
    }
}

/// Evaluator for boolean, comparison and bitwise expressions
#[derive(Debug, Clone, Default)]
pub struct LogicEvaluator {
    config: EngineConfig,
}

impl LogicEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn evaluate(&self, expression: &str) -> CalculationResult {
        let input = expression.trim();
        match self.try_evaluate(input) {
            Ok(result) => result,
            Err(err) => {
                debug!(input, error = %err, "logic evaluation failed");
                err.into_result(input)
            }
        }
    }

    fn try_evaluate(&self, input: &str) -> EvalResult<CalculationResult> {
        if input.is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        let normalized = normalize(input);
        let mode = LogicMode::detect(&normalized);
        debug!(?mode, normalized = %normalized, "logic mode selected");

        let result = match mode {
            LogicMode::Bitwise => {
                let value = bitwise::evaluate(&normalized)?;
                success(input, value.to_string(), value as f64)
                    .with_subtitle(format!("Result: {value} (0x{value:X})"))
            }
            LogicMode::Comparison => boolean_result(input, comparison::evaluate(&normalized)?),
            LogicMode::Boolean => boolean_result(input, evaluate_boolean(&normalized)?),
        };
        Ok(result)
    }
}

fn success(input: &str, result: String, numeric: f64) -> CalculationResult {
    CalculationResult::success(input, result, CalculationType::LogicEvaluation)
        .with_raw_expression(input)
        .with_numeric_value(numeric)
}

fn boolean_result(input: &str, value: bool) -> CalculationResult {
    let text = if value { "True" } else { "False" };
    success(input, text.to_string(), if value { 1.0 } else { 0.0 })
        .with_subtitle(format!("Result: {text}"))
}

/// Lower-case, trim and collapse runs of whitespace
pub fn normalize(expression: &str) -> String {
    WHITESPACE
        .replace_all(expression.trim(), " ")
        .to_lowercase()
}

/// Rewrite word operators and literals into their symbolic forms
pub fn substitute_words(expression: &str) -> String {
    WORD_OPERATORS
        .iter()
        .fold(expression.to_string(), |text, (pattern, symbol)| {
            pattern.replace_all(&text, *symbol).into_owned()
        })
}

fn boolean_precedence(operator: &str) -> u8 {
    match operator {
        "!" => 3,
        "&&" | "!&" => 2,
        "^" | "!^" => 1,
        _ => 0,
    }
}

/// Evaluate a normalized boolean expression
pub fn evaluate_boolean(expression: &str) -> EvalResult<bool> {
    let text = substitute_words(expression);
    let mut values: Vec<bool> = Vec::new();
    let mut operators: Vec<&str> = Vec::new();
    let mut expect_operand = true;

    for m in BOOLEAN_TOKEN.find_iter(&text) {
        let token = m.as_str();
        match token {
            "1" => {
                values.push(true);
                expect_operand = false;
            }
            "0" => {
                values.push(false);
                expect_operand = false;
            }
            "(" => {
                operators.push("(");
                expect_operand = true;
            }
            ")" => {
                loop {
                    match operators.pop() {
                        None => return Err(EvalError::MismatchedParentheses),
                        Some("(") => break,
                        Some(op) => apply_boolean(op, &mut values)?,
                    }
                }
                expect_operand = false;
            }
            "!" if expect_operand => operators.push("!"),
            "!" => return Err(EvalError::misplaced_operator("!")),
            "&&" | "||" | "^" | "!&" | "!|" | "!^" => {
                let incoming = boolean_precedence(token);
                while let Some(&top) = operators.last() {
                    if top != "(" && boolean_precedence(top) >= incoming {
                        operators.pop();
                        apply_boolean(top, &mut values)?;
                    } else {
                        break;
                    }
                }
                operators.push(token);
                expect_operand = true;
            }
            other => return Err(EvalError::unknown_token(other)),
        }
    }

    while let Some(op) = operators.pop() {
        if op == "(" {
            return Err(EvalError::MismatchedParentheses);
        }
        apply_boolean(op, &mut values)?;
    }

    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::InvalidExpression),
    }
}

fn apply_boolean(operator: &str, values: &mut Vec<bool>) -> EvalResult<()> {
    if operator == "!" {
        let value = values.pop().ok_or_else(|| EvalError::insufficient_operands("!"))?;
        values.push(!value);
        return Ok(());
    }

    let (Some(b), Some(a)) = (values.pop(), values.pop()) else {
        return Err(EvalError::insufficient_operands(operator));
    };
    let result = match operator {
        "&&" => a && b,
        "||" => a || b,
        "^" => a ^ b,
        "!&" => !(a && b),
        "!|" => !(a || b),
        "!^" => !(a ^ b),
        other => return Err(EvalError::unknown_operator(other)),
    };
    values.push(result);
    Ok(())
}
