//! Arithmetic expression evaluator
//!
//! Pipeline: normalize the text, tokenize, convert to postfix with the
//! shunting-yard algorithm, then evaluate the postfix stream on a value stack.
//!
//! Precedence: `+ -` = 1, `* / %` = 2, `^` = 3. Every binary operator pops
//! operators of greater or equal precedence, so `^` is left-associative
//! (`2^3^2` = 64). A prefix `-` is a negation of precedence 2 that is pushed
//! without popping, which makes `-2^2` = -4 and `2^-1` = 0.5.

use crate::error::{EvalError, EvalResult};
use crate::registry::{CONSTANTS, FunctionRegistry};
use once_cell::sync::Lazy;
use quickeval_types::{CalculationResult, CalculationType, EngineConfig, Token, TokenKind, format_number};
use regex::Regex;
use smallvec::SmallVec;
use tracing::debug;

/// Operator token value used for prefix negation in postfix output
pub const NEGATE: &str = "neg";

static NUMBER_BEFORE_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b(\d+(?:\.\d+)?)([a-z(])").expect("valid implicit-product pattern"));
static CLOSE_BEFORE_OPERAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\)([\d.(a-z])").expect("valid implicit-product pattern"));
static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(\d+\.?\d*|\.\d+)|([+\-*/^%()])|(,)|([a-z][a-z0-9]*)|(\S)").expect("valid token pattern")
});
static CONSTANT_PATTERNS: Lazy<Vec<(Regex, String)>> = Lazy::new(|| {
    CONSTANTS
        .iter()
        .map(|(name, value)| {
            let pattern = Regex::new(&format!(r"\b{name}\b")).expect("valid constant pattern");
            (pattern, value.to_string())
        })
        .collect()
});

/// Binding strength of an arithmetic operator token
pub fn precedence(operator: &str) -> u8 {
    match operator {
        "+" | "-" => 1,
        "*" | "/" | "%" | NEGATE => 2,
        "^" => 3,
        _ => 0,
    }
}

/// Numeric expression evaluator with functions and named constants
#[derive(Debug, Clone)]
pub struct ArithmeticEvaluator {
    config: EngineConfig,
    functions: FunctionRegistry,
}

impl Default for ArithmeticEvaluator {
    fn default() -> Self {
        Self::new(EngineConfig::default())
    }
}

impl ArithmeticEvaluator {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            functions: FunctionRegistry::with_standard_functions(config.angle_unit),
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn functions(&self) -> &FunctionRegistry {
        &self.functions
    }

    /// Evaluate `expression`, reporting failures as an error result
    pub fn evaluate(&self, expression: &str) -> CalculationResult {
        let input = expression.trim();
        match self.compute(input) {
            Ok(value) => {
                let formatted = format_number(value, self.config.precision);
                CalculationResult::success(input, formatted.clone(), CalculationType::Arithmetic)
                    .with_subtitle(format!("Result: {formatted}"))
                    .with_raw_expression(input)
                    .with_numeric_value(value)
            }
            Err(err) => {
                debug!(input, error = %err, "arithmetic evaluation failed");
                err.into_result(input)
            }
        }
    }

    /// Evaluate `expression` to a raw number
    pub fn compute(&self, expression: &str) -> EvalResult<f64> {
        if expression.trim().is_empty() {
            return Err(EvalError::EmptyExpression);
        }
        let normalized = normalize(expression);
        let tokens = self.tokenize(&normalized)?;
        let postfix = to_postfix(&tokens)?;
        self.evaluate_postfix(&postfix)
    }

    /// Split a normalized expression into tokens.
    ///
    /// Identifiers must name a registered function; anything else is an
    /// unknown token.
    pub fn tokenize(&self, normalized: &str) -> EvalResult<Vec<Token>> {
        let mut tokens = Vec::new();

        for caps in TOKEN.captures_iter(normalized) {
            let Some(whole) = caps.get(0) else { continue };
            let position = whole.start();
            let text = whole.as_str();

            let kind = if caps.get(1).is_some() {
                TokenKind::Number
            } else if caps.get(2).is_some() {
                if text == "(" || text == ")" {
                    TokenKind::Parenthesis
                } else {
                    TokenKind::Operator
                }
            } else if caps.get(3).is_some() {
                TokenKind::Comma
            } else if caps.get(4).is_some() && self.functions.contains(text) {
                TokenKind::Function
            } else {
                return Err(EvalError::unknown_token(text));
            };

            tokens.push(Token::new(kind, text, position));
        }

        Ok(tokens)
    }

    /// Evaluate a postfix token stream
    pub fn evaluate_postfix(&self, postfix: &[Token]) -> EvalResult<f64> {
        let mut stack: Vec<f64> = Vec::with_capacity(postfix.len());

        for token in postfix {
            match token.kind {
                TokenKind::Number => {
                    let value = token
                        .value
                        .parse::<f64>()
                        .map_err(|_| EvalError::invalid_number(&token.value))?;
                    stack.push(value);
                }
                TokenKind::Operator if token.value == NEGATE => {
                    let value = stack.pop().ok_or_else(|| EvalError::insufficient_operands("-"))?;
                    stack.push(-value);
                }
                TokenKind::Operator => {
                    let (Some(b), Some(a)) = (stack.pop(), stack.pop()) else {
                        return Err(EvalError::insufficient_operands(&token.value));
                    };
                    stack.push(apply_binary(&token.value, a, b)?);
                }
                TokenKind::Function => {
                    let function = self
                        .functions
                        .get(&token.value)
                        .ok_or_else(|| EvalError::unknown_token(&token.value))?;
                    if stack.len() < function.arity {
                        return Err(EvalError::insufficient_arguments(&function.name));
                    }
                    let args: SmallVec<[f64; 2]> = stack.drain(stack.len() - function.arity..).collect();
                    stack.push(function.call(&args)?);
                }
                _ => return Err(EvalError::unknown_token(&token.value)),
            }
        }

        match stack.as_slice() {
            [value] => Ok(*value),
            _ => Err(EvalError::InvalidExpression),
        }
    }
}

/// Lower-case, strip whitespace, make implicit products explicit and
/// substitute named constants.
///
/// `2pi` becomes `2*3.141592653589793`, `(1)(2)` becomes `(1)*(2)` and
/// `log2(8)` is left alone because the digit belongs to the name. Digits
/// separated only by whitespace join up, so `2 3` is `23`.
pub fn normalize(expression: &str) -> String {
    let compact: String = expression
        .to_lowercase()
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();

    let mut text = NUMBER_BEFORE_NAME.replace_all(&compact, "${1}*${2}").into_owned();
    for (pattern, value) in CONSTANT_PATTERNS.iter() {
        text = pattern.replace_all(&text, value.as_str()).into_owned();
    }
    // constants may now sit directly before "("
    text = NUMBER_BEFORE_NAME.replace_all(&text, "${1}*${2}").into_owned();
    CLOSE_BEFORE_OPERAND.replace_all(&text, ")*${1}").into_owned()
}

/// Shunting-yard conversion to postfix order
pub fn to_postfix(tokens: &[Token]) -> EvalResult<Vec<Token>> {
    let mut output: Vec<Token> = Vec::with_capacity(tokens.len());
    let mut operators: Vec<Token> = Vec::new();
    let mut expect_operand = true;

    for token in tokens {
        match token.kind {
            TokenKind::Number => {
                output.push(token.clone());
                expect_operand = false;
            }
            TokenKind::Function => {
                operators.push(token.clone());
                expect_operand = true;
            }
            TokenKind::Operator if expect_operand && (token.value == "-" || token.value == "+") => {
                if token.value == "-" {
                    operators.push(Token::new(TokenKind::Operator, NEGATE, token.position));
                }
            }
            TokenKind::Operator => {
                let incoming = precedence(&token.value);
                while let Some(top) = operators.last() {
                    if top.kind == TokenKind::Operator && precedence(&top.value) >= incoming {
                        output.extend(operators.pop());
                    } else {
                        break;
                    }
                }
                operators.push(token.clone());
                expect_operand = true;
            }
            TokenKind::Comma => {
                flush_to_open_paren(&mut operators, &mut output)?;
                let in_call = operators.len() >= 2
                    && operators[operators.len() - 2].kind == TokenKind::Function;
                if !in_call {
                    return Err(EvalError::InvalidExpression);
                }
                expect_operand = true;
            }
            TokenKind::Parenthesis if token.value == "(" => {
                operators.push(token.clone());
                expect_operand = true;
            }
            TokenKind::Parenthesis => {
                flush_to_open_paren(&mut operators, &mut output)?;
                operators.pop();
                if operators.last().is_some_and(|top| top.kind == TokenKind::Function) {
                    output.extend(operators.pop());
                }
                expect_operand = false;
            }
            _ => return Err(EvalError::unknown_token(&token.value)),
        }
    }

    while let Some(top) = operators.pop() {
        if top.kind == TokenKind::Parenthesis {
            return Err(EvalError::MismatchedParentheses);
        }
        output.push(top);
    }

    Ok(output)
}

/// Move operators to `output` until an open parenthesis is on top of the stack
fn flush_to_open_paren(operators: &mut Vec<Token>, output: &mut Vec<Token>) -> EvalResult<()> {
    loop {
        match operators.last() {
            None => return Err(EvalError::MismatchedParentheses),
            Some(top) if top.is_open_paren() => return Ok(()),
            Some(_) => output.extend(operators.pop()),
        }
    }
}

fn apply_binary(operator: &str, a: f64, b: f64) -> EvalResult<f64> {
    let value = match operator {
        "+" => a + b,
        "-" => a - b,
        "*" => a * b,
        "/" | "%" if b == 0.0 => return Err(EvalError::DivisionByZero),
        "/" => a / b,
        "%" => a % b,
        "^" => a.powf(b),
        other => return Err(EvalError::unknown_operator(other)),
    };
    check_finite(operator, value, &[a, b])
}

/// Finite operands must not produce an infinite result
pub(crate) fn check_finite(operation: &str, value: f64, operands: &[f64]) -> EvalResult<f64> {
    if value.is_infinite() && operands.iter().all(|x| x.is_finite()) {
        return Err(EvalError::overflow(operation));
    }
    Ok(value)
}
