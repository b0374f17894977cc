//! Date calculator tests against a pinned clock
//!
//! The clock is fixed at Monday 2024-01-15 10:30:00.

use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use quickeval_eval::{DateCalculator, FixedClock};
use quickeval_types::{CalculationResult, CalculationType, EngineConfig};
use rstest::rstest;
use std::sync::Arc;

fn calculator() -> DateCalculator {
    let now = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();
    DateCalculator::with_clock(EngineConfig::default(), Arc::new(FixedClock::new(now)))
}

fn calculate(expression: &str) -> CalculationResult {
    let result = calculator().calculate(expression);
    assert_eq!(result.calculation_type, CalculationType::DateCalculation, "{:?}", result.error_message);
    result
}

// ============================================================================
// Differences
// ============================================================================

#[rstest]
#[case("days between 2024-01-01 and 2024-01-31", "30")]
#[case("days between 2024-01-31 and 2024-01-01", "30")]
#[case("business days between 2024-01-01 and 2024-01-07", "5")]
#[case("workdays between 2024-01-01 and 2024-01-31", "23")]
#[case("weeks between 2024-01-01 and 2024-01-29", "4")]
#[case("months between 2024-01-15 and 2024-06-01", "5")]
#[case("years between 1990-05-20 and 2024-01-01", "34")]
#[case("hours between 2024-01-01 and 2024-01-02", "24")]
#[case("days between yesterday and tomorrow", "2")]
fn test_difference(#[case] expression: &str, #[case] expected: &str) {
    assert_eq!(calculate(expression).result, expected);
}

#[test]
fn test_difference_subtitle_singularizes() {
    let result = calculate("days between 2024-01-01 and 2024-01-02");
    assert_eq!(result.subtitle, "1 day between 2024-01-01 and 2024-01-02");
    assert_eq!(result.numeric_value, Some(1.0));

    let result = calculate("days between 2024-01-01 and 2024-01-31");
    assert_eq!(result.subtitle, "30 days between 2024-01-01 and 2024-01-31");
}

// ============================================================================
// Arithmetic and relative dates
// ============================================================================

#[rstest]
#[case("2024-01-01 + 5 days", "2024-01-06 00:00:00", "2024-01-01 + 5 days = 2024-01-06")]
#[case("2024-03-10 - 2 weeks", "2024-02-25 00:00:00", "2024-03-10 - 2 weeks = 2024-02-25")]
#[case("2024-01-31 + 1 month", "2024-02-29 00:00:00", "2024-01-31 + 1 month = 2024-02-29")]
#[case("today + 7 days", "2024-01-22 00:00:00", "today + 7 days = 2024-01-22")]
#[case("now + 3 hours", "2024-01-15 13:30:00", "now + 3 hours = 2024-01-15")]
fn test_arithmetic(#[case] expression: &str, #[case] result: &str, #[case] subtitle: &str) {
    let calculated = calculate(expression);
    assert_eq!(calculated.result, result);
    assert_eq!(calculated.subtitle, subtitle);
}

#[rstest]
#[case("next monday", "2024-01-22 00:00:00")]
#[case("next wednesday", "2024-01-17 00:00:00")]
#[case("last friday", "2024-01-12 00:00:00")]
#[case("last monday", "2024-01-08 00:00:00")]
#[case("3 days ago", "2024-01-12 00:00:00")]
#[case("2 weeks from now", "2024-01-29 00:00:00")]
#[case("2 hours from now", "2024-01-15 12:30:00")]
#[case("1 year ago", "2023-01-15 00:00:00")]
fn test_relative(#[case] expression: &str, #[case] expected: &str) {
    assert_eq!(calculate(expression).result, expected);
}

// ============================================================================
// Age, weekday, bare dates
// ============================================================================

#[test]
fn test_age() {
    let result = calculate("age of 1990-06-15");
    assert_eq!(result.result, "33 years");
    assert_eq!(result.subtitle, "Age: 33 years");
    assert_eq!(result.numeric_value, Some(33.0));

    assert_eq!(calculate("age of 1990-01-15").result, "34 years");
}

#[test]
fn test_weekday() {
    let result = calculate("what day is 2024-07-04");
    assert_eq!(result.result, "Thursday");
    assert_eq!(result.subtitle, "2024-07-04 is a Thursday");
    assert_eq!(calculate("which day is today").result, "Monday");
}

#[rstest]
#[case("2024-07-04", "2024-07-04 00:00:00")]
#[case("July 4, 2024", "2024-07-04 00:00:00")]
#[case("2024-07-04 08:15:00", "2024-07-04 08:15:00")]
#[case("tomorrow", "2024-01-16 00:00:00")]
#[case("now", "2024-01-15 10:30:00")]
fn test_bare_date(#[case] expression: &str, #[case] expected: &str) {
    let result = calculate(expression);
    assert_eq!(result.result, expected);
    assert_eq!(result.subtitle, format!("Date: {expected}"));
}

#[test]
fn test_numeric_value_is_unix_timestamp() {
    assert_eq!(calculate("1970-01-02").numeric_value, Some(86_400.0));
}

// ============================================================================
// Errors
// ============================================================================

#[rstest]
#[case("days between someday and 2024-01-01", "Cannot parse date: someday")]
#[case("someday + 3 days", "Cannot parse date: someday")]
#[case("what day is the first", "Cannot parse date: the first")]
#[case("gibberish", "Invalid date expression format")]
#[case("   ", "Expression cannot be empty")]
fn test_errors(#[case] expression: &str, #[case] message: &str) {
    let result = calculator().calculate(expression);
    assert!(result.is_error);
    assert_eq!(result.error_message.as_deref(), Some(message));
}

#[test]
fn test_future_birth_date_is_rejected() {
    let result = calculator().calculate("age of 2030-01-01");
    assert!(result.is_error);
    assert!(result.error_message.unwrap_or_default().contains("in the future"));
}
