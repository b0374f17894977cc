//! Lexical tokens shared by the evaluators and the expression parser

use quickeval_diagnostics::Span;
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TokenKind {
    Number,
    Operator,
    Function,
    Variable,
    Unit,
    Parenthesis,
    Comma,
    Keyword,
    Unknown,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TokenKind::Number => "number",
            TokenKind::Operator => "operator",
            TokenKind::Function => "function",
            TokenKind::Variable => "variable",
            TokenKind::Unit => "unit",
            TokenKind::Parenthesis => "parenthesis",
            TokenKind::Comma => "comma",
            TokenKind::Keyword => "keyword",
            TokenKind::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// A token with its byte position in the text it was read from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Token {
    pub kind: TokenKind,
    pub value: String,
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, value: impl Into<String>, position: usize) -> Self {
        Self {
            kind,
            value: value.into(),
            position,
        }
    }

    pub fn span(&self) -> Span {
        Span::new(self.position, self.position + self.value.len())
    }

    pub fn is(&self, kind: TokenKind, value: &str) -> bool {
        self.kind == kind && self.value == value
    }

    pub fn is_open_paren(&self) -> bool {
        self.is(TokenKind::Parenthesis, "(")
    }

    pub fn is_close_paren(&self) -> bool {
        self.is(TokenKind::Parenthesis, ")")
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}({})@{}", self.kind, self.value, self.position)
    }
}
