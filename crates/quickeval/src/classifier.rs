//! Pattern-weighted query classification
//!
//! Every category owns a list of regex patterns with a confidence score.
//! A query scores the highest confidence among the patterns it matches in
//! each category, and the best-scoring category wins. Ties go to the
//! category declared first.

use indexmap::IndexMap;
use once_cell::sync::Lazy;
use quickeval_types::CalculationType;
use regex::{Regex, RegexBuilder};
use serde::Serialize;
use tracing::trace;

/// Confidence at which the classified type leads the module priority list
pub const PRIORITY_THRESHOLD: u8 = 50;

/// Confidence required by [`QueryClassifier::is_likely_type`]
pub const LIKELY_THRESHOLD: u8 = 70;

/// Confidence reported when only the digits-and-operators fallback matches
pub const FALLBACK_CONFIDENCE: u8 = 50;

/// Domains every priority list ends with, in this order
pub const DEFAULT_ORDER: [CalculationType; 4] = [
    CalculationType::Arithmetic,
    CalculationType::UnitConversion,
    CalculationType::DateCalculation,
    CalculationType::LogicEvaluation,
];

const PATTERN_TABLE: &[(CalculationType, &[(&str, u8)])] = &[
    (
        CalculationType::UnitConversion,
        &[
            (r"\d+\.?\d*\s*(km|kilometers?|kilometres?)\s+to\s+", 95),
            (r"\d+\.?\d*\s*(kg|kilograms?)\s+to\s+", 95),
            (r"\d+\.?\d*\s*(lb|lbs|pounds?)\s+to\s+", 95),
            (r"\d+\.?\d*\s*(celsius|fahrenheit|kelvin|[cf])\s+to\s+", 95),
            (r"\d+\.?\d*\s*(miles?|meters?|metres?|feet|ft|inches?|in)\s+to\s+", 95),
            (r"\d+\.?\d*\s*(gallons?|liters?|litres?|ml|cups?)\s+to\s+", 95),
            (r"\d+\.?\d*\s*(gb|mb|kb|tb|bytes?)\s+to\s+", 95),
            (r"^convert\s+\d+", 90),
            (r"^how\s+many\s+\w+\s+in\s+\d+", 85),
            (r"\d+\s*(km|kg|lb|miles|meters|pounds|celsius|fahrenheit)", 70),
        ],
    ),
    (
        CalculationType::DateCalculation,
        &[
            (r"\d{4}-\d{2}-\d{2}", 95),
            (r"^\d{4}/\d{1,2}/\d{1,2}", 95),
            (r"(today|now|tomorrow|yesterday)\s*[+\-]\s*\d+\s*(days?|weeks?|months?|years?)", 95),
            (r"\d+\s*(days?|weeks?|months?|years?)\s+(from|after|before)", 90),
            (r"(days?|weeks?|months?|years?)\s+between", 95),
            (r"(days?|weeks?|months?|years?)\s+(from|until|to)", 85),
            (r"\b(today|tomorrow|yesterday|now)\b", 80),
            (r"(next|last)\s+(week|month|year)", 85),
        ],
    ),
    (
        CalculationType::Arithmetic,
        &[
            (r"^\d+\s*[+\-*/]\s*\d+$", 100),
            (r"^\d+\.?\d*\s*[+\-*/^]\s*\d+\.?\d*$", 100),
            (r"\d+%\s+of\s+\d+", 95),
            (r"what\s+is\s+\d+%", 90),
            (r"\d+\s*[+\-*/]\s*\d+\s*[+\-*/]\s*\d+", 95),
        ],
    ),
    (
        CalculationType::Trigonometric,
        &[
            (r"\b(sin|cos|tan|asin|acos|atan)\s*\(", 95),
            (r"\b(sinh|cosh|tanh)\s*\(", 95),
        ],
    ),
    (
        CalculationType::Logarithmic,
        &[(r"\b(log|ln|log10|log2)\s*\(", 95), (r"\b(exp|pow|power)\s*\(", 90)],
    ),
    (
        CalculationType::Statistical,
        &[
            (r"\b(mean|median|mode|average|avg)\s*[(\[]", 95),
            (r"\b(stddev|variance|stdev|std)\s*[(\[]", 95),
            (r"\b(sum|min|max|count)\s*[(\[]", 90),
        ],
    ),
    (
        CalculationType::Algebraic,
        &[
            (r"\b(sqrt|cbrt|root)\s*\(", 95),
            (r"\b(abs|absolute)\s*\(", 90),
            (r"\b(floor|ceil|ceiling|round)\s*\(", 90),
            (r"\b(factorial|fact)\s*\(", 90),
        ],
    ),
    (
        CalculationType::LogicEvaluation,
        &[
            (r"\b(true|false)\b.*\b(and|or|not|xor)\b", 95),
            (r"\b(and|or|not|xor)\b.*\b(true|false)\b", 95),
            (r"\d+\s*(<|>|<=|>=|==|!=)\s*\d+", 90),
            (r"\b(greater|less|equal)\s+(than|to)\b", 85),
            (r"\d+\s*(&|\||\^|<<|>>)\s*\d+", 85),
        ],
    ),
    (
        CalculationType::Health,
        &[
            (r"\bbmi\b", 95),
            (r"\bbody\s+mass\s+index\b", 95),
            (r"\b(height|weight)\b.*\b(height|weight)\b", 70),
        ],
    ),
    (
        CalculationType::Money,
        &[
            (r"\btip\s+\d+%", 95),
            (r"\b(discount|tax|interest)\s+\d+", 85),
            (r"\$\d+", 70),
            (r"\b(price|cost|total)\b", 60),
        ],
    ),
    (
        CalculationType::AiAssisted,
        &[(r"^ai\s+", 100), (r"^ask\s+", 100), (r"^(explain|what|why|how)\s+", 70)],
    ),
];

static FALLBACK: Lazy<Regex> = Lazy::new(|| Regex::new(r"[\d+\-*/^().]+").expect("valid fallback pattern"));

/// Keyword triggers that pull a domain forward in the priority list
static SECONDARY: Lazy<[(CalculationType, Regex); 4]> = Lazy::new(|| {
    [
        (CalculationType::Arithmetic, Regex::new(r"\d").expect("valid trigger pattern")),
        (
            CalculationType::UnitConversion,
            Regex::new(r"(km|kg|lb|celsius|fahrenheit|miles|meters|pounds|to|in)").expect("valid trigger pattern"),
        ),
        (
            CalculationType::DateCalculation,
            Regex::new(r"(\d{4}-\d{2}-\d{2}|today|tomorrow|yesterday|days?|weeks?|months?|years?)")
                .expect("valid trigger pattern"),
        ),
        (
            CalculationType::LogicEvaluation,
            Regex::new(r"\b(and|or|not|xor|true|false)\b").expect("valid trigger pattern"),
        ),
    ]
});

/// A regex and the confidence a match contributes to its category
#[derive(Debug, Clone)]
pub struct QueryPattern {
    pub pattern: Regex,
    pub confidence: u8,
}

/// Best category for a query
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Classification {
    pub kind: CalculationType,
    /// `0..=100`
    pub confidence: u8,
}

impl Classification {
    pub const NONE: Self = Self {
        kind: CalculationType::Error,
        confidence: 0,
    };
}

#[derive(Debug, Clone)]
pub struct QueryClassifier {
    patterns: IndexMap<CalculationType, Vec<QueryPattern>>,
}

impl Default for QueryClassifier {
    fn default() -> Self {
        Self::new()
    }
}

impl QueryClassifier {
    pub fn new() -> Self {
        let patterns = PATTERN_TABLE
            .iter()
            .map(|(kind, entries)| {
                let compiled = entries
                    .iter()
                    .filter_map(|(source, confidence)| {
                        RegexBuilder::new(source)
                            .case_insensitive(true)
                            .build()
                            .ok()
                            .map(|pattern| QueryPattern {
                                pattern,
                                confidence: *confidence,
                            })
                    })
                    .collect();
                (*kind, compiled)
            })
            .collect();
        Self { patterns }
    }

    pub fn patterns(&self) -> &IndexMap<CalculationType, Vec<QueryPattern>> {
        &self.patterns
    }

    /// Per-category maximum confidence over every matching pattern, in
    /// declaration order
    pub fn scores(&self, query: &str) -> IndexMap<CalculationType, u8> {
        let normalized = query.trim().to_lowercase();
        let mut scores = IndexMap::new();
        for (kind, patterns) in &self.patterns {
            let best = patterns
                .iter()
                .filter(|p| p.pattern.is_match(&normalized))
                .map(|p| p.confidence)
                .max();
            if let Some(best) = best {
                scores.insert(*kind, best);
            }
        }
        scores
    }

    pub fn classify(&self, query: &str) -> Classification {
        if query.trim().is_empty() {
            return Classification::NONE;
        }

        let scores = self.scores(query);
        trace!(?scores, "classifier scores");

        // first maximum wins, keeping ties in declaration order
        let best = scores.iter().fold(None::<(CalculationType, u8)>, |best, (kind, score)| match best {
            Some((_, top)) if top >= *score => best,
            _ => Some((*kind, *score)),
        });
        if let Some((kind, confidence)) = best {
            return Classification { kind, confidence };
        }

        if FALLBACK.is_match(&query.trim().to_lowercase()) {
            Classification {
                kind: CalculationType::Arithmetic,
                confidence: FALLBACK_CONFIDENCE,
            }
        } else {
            Classification::NONE
        }
    }

    /// Domains to try, best guess first. Always contains the four
    /// [`DEFAULT_ORDER`] domains.
    pub fn module_priority(&self, query: &str) -> Vec<CalculationType> {
        let classification = self.classify(query);
        let normalized = query.trim().to_lowercase();
        let mut priority = Vec::with_capacity(DEFAULT_ORDER.len() + 1);

        if classification.confidence >= PRIORITY_THRESHOLD {
            priority.push(classification.kind);
        }
        for (kind, trigger) in SECONDARY.iter() {
            if trigger.is_match(&normalized) && !priority.contains(kind) {
                priority.push(*kind);
            }
        }
        for kind in DEFAULT_ORDER {
            if !priority.contains(&kind) {
                priority.push(kind);
            }
        }
        priority
    }

    pub fn is_likely_type(&self, query: &str, kind: CalculationType) -> bool {
        let classification = self.classify(query);
        classification.kind == kind && classification.confidence >= LIKELY_THRESHOLD
    }
}
