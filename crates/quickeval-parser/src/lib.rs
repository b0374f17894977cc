//! quickeval expression parser
//!
//! A meta-layer above the domain evaluators. [`ExpressionParser::parse`]
//! normalizes a query, detects its domain, tokenizes it with winnow and
//! validates the token sequence; [`ExpressionParser::evaluate_expression`]
//! then hands valid input to the matching evaluator.
//!
//! ```
//! use quickeval_parser::{ExpressionKind, ExpressionParser};
//!
//! let parser = ExpressionParser::default();
//! let parsed = parser.parse("2 + 3 * 4");
//! assert_eq!(parsed.kind, ExpressionKind::Arithmetic);
//! assert_eq!(parsed.tokens.len(), 5);
//! assert!(parsed.is_valid);
//! ```

mod expression;
pub mod lexer;
pub mod validate;

pub use expression::{ExpressionKind, ExpressionParser, ParsedExpression, normalize};
pub use lexer::tokenize;
pub use validate::Validation;
