//! One-shot commands

use super::output::{self, OutputFormat};
use crate::engine::QueryEngine;
use anyhow::Result;
use serde_json::json;

/// Evaluate each query and render the results
pub fn eval(engine: &QueryEngine, queries: &[String], format: OutputFormat) -> Result<String> {
    let answered: Vec<(String, _)> = queries
        .iter()
        .filter_map(|query| {
            let result = engine.query(query).into_iter().next()?;
            Some((query.clone(), result))
        })
        .collect();

    match format {
        OutputFormat::Json => {
            let results: Vec<_> = answered.iter().map(|(_, result)| result).collect();
            output::to_json(&results)
        }
        OutputFormat::Table => Ok(output::results_table(&answered)),
        OutputFormat::Pretty => Ok(answered
            .iter()
            .map(|(query, result)| format!("{query}\n{}", output::format_result(result)))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Show how the expression parser sees `query`
pub fn parse(engine: &QueryEngine, query: &str, format: OutputFormat) -> Result<String> {
    let parsed = engine.parse(query);
    match format {
        OutputFormat::Json => output::to_json(&parsed),
        OutputFormat::Pretty | OutputFormat::Table => Ok(output::format_parsed(&parsed)),
    }
}

/// Show the classifier's verdict and module priority for `query`
pub fn classify(engine: &QueryEngine, query: &str, format: OutputFormat) -> Result<String> {
    let classification = engine.classify(query);
    let priority = engine.module_priority(query);
    match format {
        OutputFormat::Json => output::to_json(&json!({
            "type": classification.kind,
            "confidence": classification.confidence,
            "priority": priority,
        })),
        OutputFormat::Pretty | OutputFormat::Table => Ok(output::format_classification(classification, &priority)),
    }
}
