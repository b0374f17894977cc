//! Tests for query classification and module priority

use pretty_assertions::assert_eq;
use quickeval::{CalculationType, QueryClassifier};
use rstest::rstest;

// ============================================================================
// classify
// ============================================================================

#[rstest]
#[case("2 + 2", CalculationType::Arithmetic, 100)]
#[case("what is 20% of 50", CalculationType::Arithmetic, 95)]
#[case("10 km to miles", CalculationType::UnitConversion, 95)]
#[case("100 Celsius to Fahrenheit", CalculationType::UnitConversion, 95)]
#[case("convert 5 kg", CalculationType::UnitConversion, 90)]
#[case("days between 2024-01-01 and 2024-01-31", CalculationType::DateCalculation, 95)]
#[case("tomorrow", CalculationType::DateCalculation, 80)]
#[case("2024/01/15", CalculationType::DateCalculation, 95)]
#[case("sin(30)", CalculationType::Trigonometric, 95)]
#[case("log(100)", CalculationType::Logarithmic, 95)]
#[case("mean(1, 2, 3)", CalculationType::Statistical, 95)]
#[case("sqrt(16)", CalculationType::Algebraic, 95)]
#[case("true and false", CalculationType::LogicEvaluation, 95)]
#[case("5 > 3", CalculationType::LogicEvaluation, 90)]
#[case("12 & 10", CalculationType::LogicEvaluation, 85)]
#[case("bmi 70 1.8", CalculationType::Health, 95)]
#[case("tip 15% on 80", CalculationType::Money, 95)]
#[case("ai what is rust", CalculationType::AiAssisted, 100)]
fn test_classify(#[case] query: &str, #[case] kind: CalculationType, #[case] confidence: u8) {
    let classification = QueryClassifier::new().classify(query);
    assert_eq!((classification.kind, classification.confidence), (kind, confidence));
}

#[rstest]
#[case("")]
#[case("   ")]
#[case("hello world")]
fn test_unclassifiable(#[case] query: &str) {
    let classification = QueryClassifier::new().classify(query);
    assert_eq!(classification.kind, CalculationType::Error);
    assert_eq!(classification.confidence, 0);
}

#[rstest]
#[case("42")]
#[case("(1.5)")]
#[case("2 ** 3")]
fn test_arithmetic_fallback(#[case] query: &str) {
    let classification = QueryClassifier::new().classify(query);
    assert_eq!(classification.kind, CalculationType::Arithmetic);
    assert_eq!(classification.confidence, 50);
}

#[test]
fn test_classify_is_case_insensitive() {
    let classifier = QueryClassifier::new();
    assert_eq!(classifier.classify("10 KM TO MILES"), classifier.classify("10 km to miles"));
}

// ============================================================================
// module_priority
// ============================================================================

#[test]
fn test_priority_leads_with_classified_type() {
    let priority = QueryClassifier::new().module_priority("10 km to miles");
    assert_eq!(
        priority,
        vec![
            CalculationType::UnitConversion,
            CalculationType::Arithmetic,
            CalculationType::DateCalculation,
            CalculationType::LogicEvaluation,
        ]
    );
}

#[test]
fn test_priority_adds_keyword_domains_before_default_tail() {
    let priority = QueryClassifier::new().module_priority("sin(30)");
    assert_eq!(
        priority,
        vec![
            CalculationType::Trigonometric,
            CalculationType::Arithmetic,
            CalculationType::UnitConversion,
            CalculationType::DateCalculation,
            CalculationType::LogicEvaluation,
        ]
    );

    let priority = QueryClassifier::new().module_priority("true and false");
    assert_eq!(priority[0], CalculationType::LogicEvaluation);
}

#[test]
fn test_priority_for_unclassified_query_is_default_order() {
    let priority = QueryClassifier::new().module_priority("hello world");
    assert_eq!(
        priority,
        vec![
            CalculationType::Arithmetic,
            CalculationType::UnitConversion,
            CalculationType::DateCalculation,
            CalculationType::LogicEvaluation,
        ]
    );
}

#[rstest]
#[case("")]
#[case("bmi 70 1.8")]
#[case("ai tell me a joke")]
#[case("0xFF | 0x01")]
fn test_priority_always_has_core_domains(#[case] query: &str) {
    let priority = QueryClassifier::new().module_priority(query);
    for kind in quickeval::classifier::DEFAULT_ORDER {
        assert!(priority.contains(&kind), "{query}: missing {kind}");
    }
    let mut deduped = priority.clone();
    deduped.dedup();
    assert_eq!(deduped.len(), priority.len());
}

// ============================================================================
// is_likely_type
// ============================================================================

#[test]
fn test_is_likely_type() {
    let classifier = QueryClassifier::new();
    assert!(classifier.is_likely_type("10 km to miles", CalculationType::UnitConversion));
    assert!(!classifier.is_likely_type("10 km to miles", CalculationType::Arithmetic));
    // fallback confidence is below the threshold
    assert!(!classifier.is_likely_type("42", CalculationType::Arithmetic));
}
