//! Tests for the expression parser meta-layer
//!
//! Covers:
//! - Domain detection
//! - Tokenization per domain
//! - Validation failures and their spans
//! - Dispatch to the domain evaluators

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quickeval_diagnostics::{QE0001, QE0004, Span};
use quickeval_eval::{EvaluationEngine, FixedClock};
use quickeval_parser::{ExpressionKind, ExpressionParser};
use quickeval_types::{CalculationType, EngineConfig, TokenKind};
use rstest::rstest;
use std::sync::Arc;

fn parser() -> ExpressionParser {
    let now = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    let config = EngineConfig::default().with_precision(4);
    ExpressionParser::with_engine(EvaluationEngine::with_clock(config, Arc::new(FixedClock::new(now))))
}

// ============================================================================
// Detection
// ============================================================================

#[rstest]
#[case("2 + 3 * 4", ExpressionKind::Arithmetic)]
#[case("sqrt(16) + 2pi", ExpressionKind::Arithmetic)]
#[case("pow(2, 10)", ExpressionKind::Arithmetic)]
#[case("5km miles", ExpressionKind::UnitConversion)]
#[case("100 Celsius to Fahrenheit", ExpressionKind::UnitConversion)]
#[case("5 > 3", ExpressionKind::Logic)]
#[case("0xFF & 0x0F", ExpressionKind::Logic)]
#[case("1 << 4", ExpressionKind::Logic)]
#[case("3 days ago", ExpressionKind::DateCalculation)]
#[case("what day is 2024-01-01", ExpressionKind::DateCalculation)]
#[case("what is the meaning of life", ExpressionKind::NaturalLanguage)]
fn test_parse_detects_kind(#[case] input: &str, #[case] expected: ExpressionKind) {
    assert_eq!(parser().parse(input).kind, expected);
}

#[test]
fn test_parse_keeps_original_and_normalized_input() {
    let parsed = parser().parse("  10  KM to   Miles ");
    assert_eq!(parsed.original_input, "  10  KM to   Miles ");
    assert_eq!(parsed.normalized_input, "10 km to miles");
}

// ============================================================================
// Tokens
// ============================================================================

#[test]
fn test_arithmetic_tokens() {
    let parsed = parser().parse("2 + 3 * 4");
    assert!(parsed.is_valid);
    let kinds: Vec<TokenKind> = parsed.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Number,
            TokenKind::Operator,
            TokenKind::Number,
        ]
    );
}

#[test]
fn test_unit_tokens() {
    let parsed = parser().parse("10 km to miles");
    let kinds: Vec<TokenKind> = parsed.tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![TokenKind::Number, TokenKind::Unit, TokenKind::Keyword, TokenKind::Unit]
    );
}

#[test]
fn test_function_tokens() {
    let parsed = parser().parse("sqrt(16)");
    assert_eq!(parsed.tokens[0].kind, TokenKind::Function);
    assert_eq!(parsed.tokens[1].kind, TokenKind::Parenthesis);
    assert!(parsed.is_valid);
}

// ============================================================================
// Validation
// ============================================================================

#[test]
fn test_empty_input() {
    let parsed = parser().parse("   ");
    assert_eq!(parsed.kind, ExpressionKind::Unknown);
    assert!(!parsed.is_valid);
    assert!(parsed.tokens.is_empty());
    assert_eq!(parsed.error.as_ref().map(|d| d.code), Some(QE0001));
    assert_eq!(parsed.error_message(), Some("Input cannot be empty"));
}

#[test]
fn test_invalid_operator_sequence_points_at_token() {
    let parsed = parser().parse("2 + * 3");
    assert_eq!(parsed.kind, ExpressionKind::Arithmetic);
    assert!(!parsed.is_valid);
    let error = parsed.error.unwrap();
    assert_eq!(error.code, QE0004);
    assert_eq!(error.span, Some(Span::new(4, 5)));
}

#[test]
fn test_dangling_operator_points_at_end() {
    let parsed = parser().parse("2 +");
    assert_eq!(parsed.error.and_then(|d| d.span), Some(Span::point(3)));
}

#[rstest]
#[case("(1 + 2")]
#[case("1 + 2)")]
#[case("sqrt 4")]
#[case("5 > > 3")]
#[case("true false")]
#[case("between")]
#[case("today +")]
fn test_invalid_syntax(#[case] input: &str) {
    let parsed = parser().parse(input);
    assert!(!parsed.is_valid, "{input} should not validate");
}

#[test]
fn test_natural_language_is_valid_but_unevaluated() {
    let parsed = parser().parse("what is the meaning of life");
    assert!(parsed.is_valid);
    assert!(parsed.error.is_none());
}

#[test]
fn test_parsed_expression_serializes() {
    let parsed = parser().parse("5 > 3");
    let json = serde_json::to_value(&parsed).unwrap();
    assert_eq!(json["kind"], "logic");
    assert_eq!(json["isValid"], true);
    assert!(json.get("error").is_none());
}

// ============================================================================
// Evaluation
// ============================================================================

#[rstest]
#[case("2 + 3 * 4", "14.0000", CalculationType::Arithmetic)]
#[case("10 km to miles", "6.2137", CalculationType::UnitConversion)]
#[case("5 > 3", "True", CalculationType::LogicEvaluation)]
#[case("3 days ago", "2024-01-12 00:00:00", CalculationType::DateCalculation)]
#[case("tomorrow", "2024-01-16 00:00:00", CalculationType::DateCalculation)]
#[case("2024/01/15", "2024-01-15 00:00:00", CalculationType::DateCalculation)]
fn test_evaluate_dispatches(#[case] input: &str, #[case] expected: &str, #[case] ty: CalculationType) {
    let result = parser().evaluate_expression(input);
    assert!(!result.is_error, "{input}: {:?}", result.error_message());
    assert_eq!(result.result, expected);
    assert_eq!(result.calculation_type, ty);
}

#[test]
fn test_evaluate_invalid_syntax() {
    let result = parser().evaluate_expression("2 + * 3");
    assert!(result.is_error);
    assert_eq!(result.error_message(), Some("Invalid expression syntax"));
    assert_eq!(result.raw_expression.as_deref(), Some("2 + * 3"));
}

#[test]
fn test_evaluate_natural_language() {
    let result = parser().evaluate_expression("what is the meaning of life");
    assert!(result.is_error);
    assert_eq!(
        result.error_message(),
        Some("Natural language processing requires AI integration")
    );
}

#[test]
fn test_evaluate_empty() {
    let result = parser().evaluate_expression("");
    assert!(result.is_error);
    assert_eq!(result.error_message(), Some("Input cannot be empty"));
}
