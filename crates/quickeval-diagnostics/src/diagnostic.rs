//! Diagnostic messages

use crate::{ErrorCategory, ErrorCode, Span};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Severity {
    /// Evaluation cannot proceed
    Error,
    /// Potential issue, evaluation continues
    Warning,
    /// Suggestion for a better query
    Hint,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Hint => write!(f, "hint"),
        }
    }
}

/// A diagnostic message with optional location and help
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub code: ErrorCode,
    /// Human-readable message
    pub message: String,
    /// Location in the query text
    pub span: Option<Span>,
    /// Additional context or help
    pub help: Option<String>,
}

impl Diagnostic {
    /// Create a new error diagnostic.
    ///
    /// The help text registered for `code` is attached automatically and can
    /// be replaced with [`Diagnostic::with_help`].
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            span: None,
            help: code.help().map(str::to_string),
        }
    }

    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            ..Self::error(code, message)
        }
    }

    pub fn with_span(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.help = Some(help.into());
        self
    }

    pub fn category(&self) -> Option<ErrorCategory> {
        self.code.category()
    }

    /// Title used when presenting this diagnostic as a result row
    pub fn title(&self) -> String {
        match self.category() {
            Some(category) => format!("Error: {}", category.title()),
            None => "Error".to_string(),
        }
    }

    /// Multi-line rendering with a caret pointing into `source`
    pub fn render(&self, source: &str) -> String {
        let mut out = format!("{}[{}]: {}", self.severity, self.code, self.message);
        if let Some(span) = self.span {
            out.push_str(&format!("\n  | {source}\n  | {}", span.underline(source)));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  = help: {help}"));
        }
        out
    }

    /// Same as [`Diagnostic::render`] with terminal colors
    #[cfg(feature = "colored")]
    pub fn render_colored(&self, source: &str) -> String {
        use colored::Colorize;

        let header = match self.severity {
            Severity::Error => format!("{}[{}]", self.severity, self.code).red().bold(),
            Severity::Warning => format!("{}[{}]", self.severity, self.code).yellow().bold(),
            Severity::Hint => format!("{}[{}]", self.severity, self.code).cyan().bold(),
        };
        let mut out = format!("{header}: {}", self.message.bold());
        if let Some(span) = self.span {
            out.push_str(&format!(
                "\n  {} {source}\n  {} {}",
                "|".blue(),
                "|".blue(),
                span.underline(source).red()
            ));
        }
        if let Some(help) = &self.help {
            out.push_str(&format!("\n  {} {help}", "= help:".cyan()));
        }
        out
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} - {}", self.severity, self.code, self.message)?;
        if let Some(span) = &self.span {
            write!(f, " at {}", span)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{QE0004, QE0200};

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(QE0004, "Invalid expression syntax").with_span(Span::new(4, 5));

        assert!(diag.to_string().contains("QE0004"));
        assert!(diag.to_string().contains("4..5"));
    }

    #[test]
    fn test_default_help_comes_from_code() {
        let diag = Diagnostic::error(QE0200, "Division by zero");
        assert_eq!(diag.help.as_deref(), Some("Check your expression for '/0' or '%0'"));
        assert_eq!(diag.title(), "Error: Invalid Value");
    }

    #[test]
    fn test_render_with_caret() {
        let diag = Diagnostic::error(QE0004, "Invalid expression syntax")
            .with_span(Span::new(4, 5))
            .with_help("remove the extra operator");
        let rendered = diag.render("2 + * 3");

        assert_eq!(
            rendered,
            "error[QE0004]: Invalid expression syntax\n  | 2 + * 3\n  |     ^\n  = help: remove the extra operator"
        );
    }
}
