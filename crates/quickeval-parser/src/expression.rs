//! Single-pass expression parsing
//!
//! `normalize → detect → tokenize → validate → dispatch`. Detection uses
//! text heuristics, checked in order: date, unit conversion, logic,
//! arithmetic. Anything left over is natural language.

use crate::lexer::tokenize;
use crate::validate::validate;
use once_cell::sync::Lazy;
use quickeval_diagnostics::{Diagnostic, QE0001, QE0004, Span};
use quickeval_eval::{ConversionRequest, EvalError, EvaluationEngine};
use quickeval_types::{CalculationResult, CalculationType, EngineConfig, Token};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::debug;

static WHITESPACE: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));
static UNIT_EXPLICIT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^-?\d*\.?\d+\s*[a-z°²/][a-z°²/ ]*?\s+(?:to|in)\s+[a-z°²/][a-z°²/ ]*$")
        .expect("valid unit pattern")
});
static UNIT_COMPACT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^-?\d*\.?\d+\s*[a-z°²/]+\s+[a-z°²/]+$").expect("valid unit pattern"));
static DATE_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"\b(?:today|yesterday|tomorrow|now|ago|between|next|last|age of|what day is|which day is)\b|\d{4}[-/]\d{1,2}[-/]\d{1,2}",
    )
    .expect("valid date hint pattern")
});
static LOGIC_HINT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"\b(?:and|or|not|xor|nand|nor|xnor|true|false)\b|&&|\|\||<<|>>|[&|~!<>=]")
        .expect("valid logic hint pattern")
});
static BASE_LITERAL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\b0(?:x[0-9a-f]+|b[01]+|o[0-7]+)\b").expect("valid literal pattern"));
static ARITHMETIC_OPERAND: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\d|\b(?:pi|e|tau|phi)\b").expect("valid operand pattern"));
static ARITHMETIC_OPERATOR: Lazy<Regex> = Lazy::new(|| Regex::new(r"[+\-*/^%]").expect("valid operator pattern"));
static PURE_NUMERIC: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[\d.\s()+\-*/^%]*\d[\d.\s()+\-*/^%]*$").expect("valid numeric pattern"));
static WORD: Lazy<Regex> = Lazy::new(|| Regex::new(r"[a-z][a-z0-9]*").expect("valid word pattern"));

/// Domain an expression was detected as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExpressionKind {
    Unknown,
    Arithmetic,
    Logic,
    UnitConversion,
    DateCalculation,
    NaturalLanguage,
}

impl ExpressionKind {
    /// Result type produced when this kind is evaluated
    pub fn calculation_type(self) -> Option<CalculationType> {
        match self {
            Self::Arithmetic => Some(CalculationType::Arithmetic),
            Self::Logic => Some(CalculationType::LogicEvaluation),
            Self::UnitConversion => Some(CalculationType::UnitConversion),
            Self::DateCalculation => Some(CalculationType::DateCalculation),
            Self::NaturalLanguage => Some(CalculationType::NaturalLanguage),
            Self::Unknown => None,
        }
    }
}

impl fmt::Display for ExpressionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Unknown => "unknown",
            Self::Arithmetic => "arithmetic",
            Self::Logic => "logic",
            Self::UnitConversion => "unit conversion",
            Self::DateCalculation => "date calculation",
            Self::NaturalLanguage => "natural language",
        };
        f.write_str(name)
    }
}

/// Outcome of [`ExpressionParser::parse`]
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedExpression {
    pub original_input: String,
    pub normalized_input: String,
    pub kind: ExpressionKind,
    pub tokens: Vec<Token>,
    pub is_valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<Diagnostic>,
}

impl ParsedExpression {
    pub fn error_message(&self) -> Option<&str> {
        self.error.as_ref().map(|d| d.message.as_str())
    }
}

/// Lower-case, trim and collapse runs of whitespace
pub fn normalize(input: &str) -> String {
    WHITESPACE.replace_all(input.trim(), " ").to_lowercase()
}

/// Parse-then-evaluate front end over an [`EvaluationEngine`]
#[derive(Debug, Clone, Default)]
pub struct ExpressionParser {
    engine: EvaluationEngine,
}

impl ExpressionParser {
    pub fn new(config: EngineConfig) -> Self {
        Self::with_engine(EvaluationEngine::new(config))
    }

    pub fn with_engine(engine: EvaluationEngine) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EvaluationEngine {
        &self.engine
    }

    /// Detect the domain of a normalized expression
    pub fn detect(&self, normalized: &str) -> ExpressionKind {
        if DATE_HINT.is_match(normalized) {
            ExpressionKind::DateCalculation
        } else if self.is_unit_conversion(normalized) {
            ExpressionKind::UnitConversion
        } else if LOGIC_HINT.is_match(normalized)
            || (normalized.contains('^') && BASE_LITERAL.is_match(normalized))
        {
            ExpressionKind::Logic
        } else if self.is_arithmetic(normalized) {
            ExpressionKind::Arithmetic
        } else {
            ExpressionKind::NaturalLanguage
        }
    }

    /// The `to`/`in` form is always a conversion; the compact form only when
    /// both words are known units, so `1 or true` stays logic.
    fn is_unit_conversion(&self, normalized: &str) -> bool {
        if UNIT_EXPLICIT.is_match(normalized) {
            return true;
        }
        if !UNIT_COMPACT.is_match(normalized) {
            return false;
        }
        let units = self.engine.units();
        ConversionRequest::parse(normalized)
            .is_ok_and(|request| units.lookup(&request.from).is_some() && units.lookup(&request.to).is_some())
    }

    fn is_arithmetic(&self, normalized: &str) -> bool {
        let functions = self.engine.arithmetic().functions();
        let calls_function = WORD
            .find_iter(normalized)
            .any(|word| functions.contains(word.as_str()));
        calls_function
            || PURE_NUMERIC.is_match(normalized)
            || (ARITHMETIC_OPERAND.is_match(normalized) && ARITHMETIC_OPERATOR.is_match(normalized))
    }

    /// Normalize, detect, tokenize and validate `input`
    pub fn parse(&self, input: &str) -> ParsedExpression {
        if input.trim().is_empty() {
            return ParsedExpression {
                original_input: input.to_string(),
                normalized_input: String::new(),
                kind: ExpressionKind::Unknown,
                tokens: Vec::new(),
                is_valid: false,
                error: Some(Diagnostic::error(QE0001, "Input cannot be empty")),
            };
        }

        let normalized = normalize(input);
        let kind = self.detect(&normalized);
        let tokens = tokenize(&normalized, kind, self.engine.arithmetic().functions());
        let error = validate(&tokens, kind).err().map(|index| {
            let span = tokens
                .get(index)
                .map_or_else(|| Span::point(normalized.len()), Token::span);
            Diagnostic::error(QE0004, "Invalid expression syntax").with_span(span)
        });
        debug!(%kind, tokens = tokens.len(), valid = error.is_none(), "parsed expression");

        ParsedExpression {
            original_input: input.to_string(),
            normalized_input: normalized,
            kind,
            tokens,
            is_valid: error.is_none(),
            error,
        }
    }

    /// Parse `input` and, when valid, evaluate it with the detected domain's evaluator
    pub fn evaluate_expression(&self, input: &str) -> CalculationResult {
        let parsed = self.parse(input);
        let input = input.trim();
        if let Some(message) = parsed.error_message() {
            return CalculationResult::error(input, message);
        }

        let Some(ty) = parsed.kind.calculation_type() else {
            return EvalError::unrecognized(input).into_result(input);
        };
        self.engine
            .evaluate_as(ty, input)
            .unwrap_or_else(|| EvalError::NaturalLanguage.into_result(input))
    }
}
