//! Error codes following a structured numbering system
//!
//! Error code ranges:
//! - QE0001-QE0099: Syntax errors (tokens, parentheses, malformed shapes)
//! - QE0100-QE0199: Arity errors (operands, function arguments)
//! - QE0200-QE0299: Domain errors (division by zero, ranges, units, dates)
//! - QE0300-QE0399: Unsupported input (unknown operators, units, shapes)
//! - QE0400-QE0499: Configuration and system errors

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::LazyLock;

/// Error code identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ErrorCode(u16);

impl ErrorCode {
    /// Create a new error code
    pub const fn new(code: u16) -> Self {
        Self(code)
    }

    /// Get the numeric code
    pub const fn code(&self) -> u16 {
        self.0
    }

    /// Get error information for this code
    pub fn info(&self) -> &'static ErrorInfo {
        ERROR_INFO.get(&self.0).unwrap_or(&UNKNOWN_ERROR)
    }

    /// Help text registered for this code, if any
    pub fn help(&self) -> Option<&'static str> {
        self.info().help
    }

    /// Category derived from the numeric range
    pub const fn category(&self) -> Option<ErrorCategory> {
        match self.0 {
            1..=99 => Some(ErrorCategory::Syntax),
            100..=199 => Some(ErrorCategory::Arity),
            200..=299 => Some(ErrorCategory::Domain),
            300..=399 => Some(ErrorCategory::Unsupported),
            400..=499 => Some(ErrorCategory::System),
            _ => None,
        }
    }

    pub const fn is_syntax_error(&self) -> bool {
        self.0 >= 1 && self.0 < 100
    }

    pub const fn is_arity_error(&self) -> bool {
        self.0 >= 100 && self.0 < 200
    }

    pub const fn is_domain_error(&self) -> bool {
        self.0 >= 200 && self.0 < 300
    }

    pub const fn is_unsupported(&self) -> bool {
        self.0 >= 300 && self.0 < 400
    }

    pub const fn is_system_error(&self) -> bool {
        self.0 >= 400 && self.0 < 500
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "QE{:04}", self.0)
    }
}

/// Broad error family, used for titles and filtering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    Syntax,
    Arity,
    Domain,
    Unsupported,
    System,
}

impl ErrorCategory {
    /// Short human title, e.g. for an error result header
    pub const fn title(&self) -> &'static str {
        match self {
            ErrorCategory::Syntax => "Invalid Syntax",
            ErrorCategory::Arity => "Missing Operands",
            ErrorCategory::Domain => "Invalid Value",
            ErrorCategory::Unsupported => "Not Supported",
            ErrorCategory::System => "System Error",
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorCategory::Syntax => write!(f, "syntax"),
            ErrorCategory::Arity => write!(f, "arity"),
            ErrorCategory::Domain => write!(f, "domain"),
            ErrorCategory::Unsupported => write!(f, "unsupported"),
            ErrorCategory::System => write!(f, "system"),
        }
    }
}

/// Information about an error code
#[derive(Debug, Clone)]
pub struct ErrorInfo {
    /// Short description of the error
    pub description: &'static str,
    /// Actionable hint shown to the user
    pub help: Option<&'static str>,
}

impl ErrorInfo {
    const fn new(description: &'static str) -> Self {
        Self {
            description,
            help: None,
        }
    }

    const fn with_help(mut self, help: &'static str) -> Self {
        self.help = Some(help);
        self
    }
}

static UNKNOWN_ERROR: ErrorInfo = ErrorInfo::new("Unknown error");

static ERROR_INFO: LazyLock<HashMap<u16, ErrorInfo>> = LazyLock::new(|| {
    let mut map = HashMap::new();

    // Syntax errors (0001-0099)
    map.insert(1, ErrorInfo::new("Empty expression")
        .with_help("Try: '2+2', '100 km to miles', or 'today + 7 days'"));
    map.insert(2, ErrorInfo::new("Unknown token")
        .with_help("Check for misspelled function names or unsupported characters"));
    map.insert(3, ErrorInfo::new("Mismatched parentheses")
        .with_help("Every '(' needs a matching ')'"));
    map.insert(4, ErrorInfo::new("Invalid expression")
        .with_help("Try: '2+2', '100 km to miles', or 'sin(pi/4)'"));
    map.insert(5, ErrorInfo::new("Invalid number literal")
        .with_help("Integer literals may use 0b, 0o or 0x prefixes"));
    map.insert(6, ErrorInfo::new("Invalid conversion format")
        .with_help("Example: '100 km to miles' or '70 kg to pounds'"));
    map.insert(7, ErrorInfo::new("Invalid date expression")
        .with_help("Use format YYYY-MM-DD, e.g. '2025-01-15' or 'today + 7 days'"));
    map.insert(8, ErrorInfo::new("Invalid comparison")
        .with_help("Compare exactly two numbers, e.g. '5 > 3'"));
    map.insert(9, ErrorInfo::new("Misplaced operator")
        .with_help("Unary '~' is only allowed at the start of a bitwise expression"));

    // Arity errors (0100-0199)
    map.insert(100, ErrorInfo::new("Insufficient operands")
        .with_help("Each binary operator needs a value on both sides"));
    map.insert(101, ErrorInfo::new("Insufficient function arguments")
        .with_help("Examples: 'sqrt(25)', 'log(100)', 'pow(2, 10)'"));

    // Domain errors (0200-0299)
    map.insert(200, ErrorInfo::new("Division by zero")
        .with_help("Check your expression for '/0' or '%0'"));
    map.insert(201, ErrorInfo::new("Factorial out of range")
        .with_help("Factorial accepts whole numbers from 0 to 170"));
    map.insert(202, ErrorInfo::new("Numeric overflow")
        .with_help("Result too large to calculate, try smaller numbers"));
    map.insert(203, ErrorInfo::new("Incompatible units")
        .with_help("Both units must measure the same quantity, e.g. length to length"));
    map.insert(204, ErrorInfo::new("Affine unit mix")
        .with_help("Temperatures convert only to other temperatures"));
    map.insert(205, ErrorInfo::new("Unparseable date")
        .with_help("Use format YYYY-MM-DD, e.g. '2025-01-15' or 'today + 7 days'"));
    map.insert(206, ErrorInfo::new("Date out of range"));
    map.insert(207, ErrorInfo::new("Shift amount out of range")
        .with_help("Shift amounts must be between 0 and 63"));

    // Unsupported (0300-0399)
    map.insert(300, ErrorInfo::new("Unknown operator"));
    map.insert(301, ErrorInfo::new("Unknown unit")
        .with_help("Supported: length, weight, temperature, volume, area, time, speed, data"));
    map.insert(302, ErrorInfo::new("Unrecognized expression")
        .with_help("Try: '2+2', '100 km to miles', or 'days between 2024-01-01 and 2024-01-31'"));
    map.insert(303, ErrorInfo::new("Natural language query")
        .with_help("Free-form questions need an AI provider, which this engine does not include"));

    // Configuration and system errors (0400-0499)
    map.insert(400, ErrorInfo::new("Invalid configuration"));
    map.insert(401, ErrorInfo::new("I/O error"));
    map.insert(402, ErrorInfo::new("Invalid cache capacity")
        .with_help("Cache capacity must be greater than zero"));

    map
});

// Syntax
pub const QE0001: ErrorCode = ErrorCode::new(1);
pub const QE0002: ErrorCode = ErrorCode::new(2);
pub const QE0003: ErrorCode = ErrorCode::new(3);
pub const QE0004: ErrorCode = ErrorCode::new(4);
pub const QE0005: ErrorCode = ErrorCode::new(5);
pub const QE0006: ErrorCode = ErrorCode::new(6);
pub const QE0007: ErrorCode = ErrorCode::new(7);
pub const QE0008: ErrorCode = ErrorCode::new(8);
pub const QE0009: ErrorCode = ErrorCode::new(9);

// Arity
pub const QE0100: ErrorCode = ErrorCode::new(100);
pub const QE0101: ErrorCode = ErrorCode::new(101);

// Domain
pub const QE0200: ErrorCode = ErrorCode::new(200);
pub const QE0201: ErrorCode = ErrorCode::new(201);
pub const QE0202: ErrorCode = ErrorCode::new(202);
pub const QE0203: ErrorCode = ErrorCode::new(203);
pub const QE0204: ErrorCode = ErrorCode::new(204);
pub const QE0205: ErrorCode = ErrorCode::new(205);
pub const QE0206: ErrorCode = ErrorCode::new(206);
pub const QE0207: ErrorCode = ErrorCode::new(207);

// Unsupported
pub const QE0300: ErrorCode = ErrorCode::new(300);
pub const QE0301: ErrorCode = ErrorCode::new(301);
pub const QE0302: ErrorCode = ErrorCode::new(302);
pub const QE0303: ErrorCode = ErrorCode::new(303);

// Configuration / system
pub const QE0400: ErrorCode = ErrorCode::new(400);
pub const QE0401: ErrorCode = ErrorCode::new(401);
pub const QE0402: ErrorCode = ErrorCode::new(402);
