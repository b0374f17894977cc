//! Output formatting utilities

use crate::classifier::Classification;
use anyhow::{Context, Result};
use clap::ValueEnum;
use colored::Colorize;
use quickeval_parser::ParsedExpression;
use quickeval_types::{CalculationResult, CalculationType};
use serde::Serialize;
use std::io::IsTerminal;
use tabled::settings::Style;
use tabled::{Table, Tabled};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Pretty,
    Json,
    Table,
}

/// Set up color output based on user preference
pub fn setup_colors(mode: &str) {
    match mode.to_lowercase().as_str() {
        "always" => colored::control::set_override(true),
        "never" => colored::control::set_override(false),
        _ => colored::control::set_override(std::io::stdout().is_terminal()),
    }
}

/// Format an error for display
pub fn format_error(error: &anyhow::Error) -> String {
    format!("{} {error:#}", "Error:".red().bold())
}

/// Format a success message for display
pub fn format_success(message: &str) -> String {
    format!("{} {message}", "Success:".green().bold())
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    serde_json::to_string_pretty(value).context("Failed to serialize JSON")
}

/// One line per result: `query = value unit`, errors in red
pub fn format_result(result: &CalculationResult) -> String {
    if result.is_error {
        let message = result.error_message().unwrap_or("Unable to process query");
        return format!("{} {}", "✗".red().bold(), message.red());
    }
    let value = match &result.unit {
        Some(unit) => format!("{} {unit}", result.result),
        None => result.result.clone(),
    };
    let mut line = format!("{} {}", "=".dimmed(), value.green().bold());
    if !result.subtitle.is_empty() {
        line.push_str(&format!("  {}", result.subtitle.dimmed()));
    }
    line
}

#[derive(Tabled)]
struct ResultRow {
    #[tabled(rename = "Query")]
    query: String,
    #[tabled(rename = "Type")]
    kind: String,
    #[tabled(rename = "Result")]
    result: String,
    #[tabled(rename = "Details")]
    details: String,
}

pub fn results_table(rows: &[(String, CalculationResult)]) -> String {
    let rows = rows.iter().map(|(query, result)| ResultRow {
        query: query.clone(),
        kind: result.calculation_type.to_string(),
        result: match (&result.unit, result.is_error) {
            (_, true) => String::new(),
            (Some(unit), false) => format!("{} {unit}", result.result),
            (None, false) => result.result.clone(),
        },
        details: result.subtitle.clone(),
    });
    Table::new(rows).with(Style::modern()).to_string()
}

pub fn format_parsed(parsed: &ParsedExpression) -> String {
    let mut lines = vec![
        format!("{} {}", "Input:".bold(), parsed.normalized_input),
        format!("{} {}", "Kind:".bold(), parsed.kind.to_string().cyan()),
        format!(
            "{} {}",
            "Valid:".bold(),
            if parsed.is_valid {
                "yes".green()
            } else {
                "no".red()
            }
        ),
    ];
    for token in &parsed.tokens {
        lines.push(format!("  {:>3}  {:<12} {}", token.position, format!("{:?}", token.kind), token.value));
    }
    if let Some(error) = &parsed.error {
        lines.push(error.render(&parsed.normalized_input));
    }
    lines.join("\n")
}

pub fn format_classification(classification: Classification, priority: &[CalculationType]) -> String {
    let order = priority
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(" → ");
    format!(
        "{} {} ({}%)\n{} {order}",
        "Type:".bold(),
        classification.kind.to_string().cyan(),
        classification.confidence,
        "Priority:".bold(),
    )
}
