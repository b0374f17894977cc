//! Query orchestration
//!
//! `raw text → classifier priority list → first evaluator that succeeds →
//! cache`. Queries whose answer depends on the clock, and AI-prefixed
//! queries, skip the cache in both directions.

use crate::cache::{CacheStats, ResultCache};
use crate::classifier::{Classification, QueryClassifier};
use crate::config::QueryEngineConfig;
use crate::error::Result;
use once_cell::sync::Lazy;
use quickeval_eval::{Clock, EvalError, EvaluationEngine, SystemClock};
use quickeval_parser::{ExpressionParser, ParsedExpression};
use quickeval_types::{CalculationResult, CalculationType, EngineConfig};
use regex::Regex;
use std::sync::Arc;
use tracing::{debug, instrument};

static DYNAMIC: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(?:ai|ask)\s|\b(?:today|now|tomorrow|yesterday|ago|next|last|age of)\b")
        .expect("valid dynamic query pattern")
});

/// Whether the answer to `query` can change between calls
pub fn is_dynamic_query(query: &str) -> bool {
    DYNAMIC.is_match(&query.trim().to_lowercase())
}

/// Classifier, evaluators and result cache behind one `query` call
#[derive(Debug)]
pub struct QueryEngine {
    config: QueryEngineConfig,
    clock: Arc<dyn Clock>,
    classifier: QueryClassifier,
    parser: ExpressionParser,
    cache: ResultCache,
}

impl QueryEngine {
    pub fn new(config: QueryEngineConfig) -> Result<Self> {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// Build an engine whose date keywords read `clock`
    pub fn with_clock(config: QueryEngineConfig, clock: Arc<dyn Clock>) -> Result<Self> {
        config.validate()?;
        let evaluators = EvaluationEngine::with_clock(config.engine, Arc::clone(&clock));
        Ok(Self {
            config,
            classifier: QueryClassifier::new(),
            parser: ExpressionParser::with_engine(evaluators),
            cache: ResultCache::new(config.cache_capacity)?,
            clock,
        })
    }

    pub fn config(&self) -> &QueryEngineConfig {
        &self.config
    }

    pub fn classifier(&self) -> &QueryClassifier {
        &self.classifier
    }

    pub fn evaluators(&self) -> &EvaluationEngine {
        self.parser.engine()
    }

    pub fn parser(&self) -> &ExpressionParser {
        &self.parser
    }

    pub fn cache(&self) -> &ResultCache {
        &self.cache
    }

    /// Swap evaluator settings. Cached results were formatted with the old
    /// settings, so the cache is cleared.
    pub fn reconfigure(&mut self, engine: EngineConfig) -> Result<()> {
        engine.validate()?;
        self.config.engine = engine;
        self.parser = ExpressionParser::with_engine(EvaluationEngine::with_clock(engine, Arc::clone(&self.clock)));
        self.cache.clear();
        Ok(())
    }

    pub fn classify(&self, query: &str) -> Classification {
        self.classifier.classify(query)
    }

    pub fn parse(&self, query: &str) -> ParsedExpression {
        self.parser.parse(query)
    }

    /// Single-pass route through the expression parser, uncached
    pub fn evaluate_expression(&self, query: &str) -> CalculationResult {
        self.parser.evaluate_expression(query)
    }

    /// Answer `query`. Empty input yields no results; otherwise the list
    /// holds exactly one result, which may be an error.
    #[instrument(level = "debug", skip(self))]
    pub fn query(&self, query: &str) -> Vec<CalculationResult> {
        let input = query.trim();
        if input.is_empty() {
            return Vec::new();
        }

        let dynamic = is_dynamic_query(input);
        if !dynamic {
            if let Some(cached) = self.cache.try_get(input) {
                debug!("served from cache");
                return cached;
            }
        }

        let result = self.evaluate(input);
        let results = vec![result];
        if !dynamic && !results[0].is_error {
            self.cache.set(input, &results);
        }
        results
    }

    /// Try each domain in priority order. The first success wins; if every
    /// domain fails, the first domain's error is returned.
    pub fn evaluate(&self, query: &str) -> CalculationResult {
        let input = query.trim();
        let priority = self.classifier.module_priority(input);
        debug!(?priority, "module priority");

        let mut first_error = None;
        for kind in priority {
            let Some(result) = self.evaluators().evaluate_as(kind, input) else {
                continue;
            };
            if !result.is_error {
                debug!(%kind, "evaluated");
                return result;
            }
            debug!(%kind, error = result.error_message().unwrap_or_default(), "domain failed");
            first_error.get_or_insert(result);
        }

        first_error.unwrap_or_else(|| EvalError::unrecognized(input).into_result(input))
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// Domains `query` would be tried against, in order
    pub fn module_priority(&self, query: &str) -> Vec<CalculationType> {
        self.classifier.module_priority(query)
    }
}
