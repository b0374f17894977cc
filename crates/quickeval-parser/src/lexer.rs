//! Token combinators
//!
//! The lexer reads raw lexemes with winnow and then assigns a [`TokenKind`]
//! according to the domain the expression was detected as. The same word
//! is a `Function` in arithmetic (`sqrt`), an `Operator` in logic (`and`)
//! and a `Unit` in a conversion (`km`).

use crate::expression::ExpressionKind;
use quickeval_eval::FunctionRegistry;
use quickeval_eval::registry::CONSTANTS;
use quickeval_types::{Token, TokenKind};
use winnow::ascii::{digit1, hex_digit1, multispace0};
use winnow::combinator::{alt, opt};
use winnow::prelude::*;
use winnow::token::{any, one_of, take_while};

/// Parser result type
pub type PResult<T> = ModalResult<T>;

/// Lexeme shape before domain classification
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Lexeme {
    Number,
    Word,
    Symbol,
    Open,
    Close,
    Comma,
    Other,
}

/// Skip whitespace
pub fn ws<'i>(input: &mut &'i str) -> PResult<&'i str> {
    multispace0.parse_next(input)
}

/// Decimal or base-prefixed integer literal
pub fn number<'i>(input: &mut &'i str) -> PResult<&'i str> {
    alt((
        ("0x", hex_digit1).take(),
        ("0b", take_while(1.., ['0', '1'])).take(),
        ("0o", take_while(1.., '0'..='7')).take(),
        (digit1, opt((".", digit1))).take(),
        (".", digit1).take(),
    ))
    .parse_next(input)
}

/// Multi-character operators first so `<<` never lexes as two `<`
pub fn symbol<'i>(input: &mut &'i str) -> PResult<&'i str> {
    alt((
        "<<",
        ">>",
        "==",
        "!=",
        "<>",
        "<=",
        ">=",
        "&&",
        "||",
        one_of(['+', '-', '*', '/', '^', '%', '<', '>', '&', '|', '!', '~', '=']).take(),
    ))
    .parse_next(input)
}

/// An identifier; `°` and `²` are word characters so `°c` and `m²` stay whole
fn word<'i>(input: &mut &'i str, allow_slash: bool) -> PResult<&'i str> {
    (
        one_of(|c: char| c.is_alphabetic() || c == '°'),
        take_while(0.., move |c: char| {
            c.is_alphanumeric() || matches!(c, '_' | '°' | '²') || (allow_slash && c == '/')
        }),
    )
        .take()
        .parse_next(input)
}

/// Read one lexeme. Never fails on non-empty input: unrecognized characters
/// come back as [`Lexeme::Other`].
pub fn lexeme<'i>(input: &mut &'i str, allow_slash: bool) -> PResult<(Lexeme, &'i str)> {
    alt((
        number.map(|text| (Lexeme::Number, text)),
        (|input: &mut &'i str| word(input, allow_slash)).map(|text| (Lexeme::Word, text)),
        symbol.map(|text| (Lexeme::Symbol, text)),
        "(".map(|text| (Lexeme::Open, text)),
        ")".map(|text| (Lexeme::Close, text)),
        ",".map(|text| (Lexeme::Comma, text)),
        any.take().map(|text| (Lexeme::Other, text)),
    ))
    .parse_next(input)
}

/// Tokenize a normalized expression for the given domain
pub fn tokenize(normalized: &str, kind: ExpressionKind, functions: &FunctionRegistry) -> Vec<Token> {
    let mut rest = normalized;
    let mut tokens = Vec::new();
    let allow_slash = kind == ExpressionKind::UnitConversion;

    loop {
        ws(&mut rest).ok();
        if rest.is_empty() {
            break;
        }
        let position = normalized.len() - rest.len();
        let Ok((shape, text)) = lexeme(&mut rest, allow_slash) else {
            break;
        };
        tokens.push(Token::new(classify(shape, text, kind, functions), text, position));
    }

    tokens
}

fn classify(lexeme: Lexeme, text: &str, kind: ExpressionKind, functions: &FunctionRegistry) -> TokenKind {
    match lexeme {
        Lexeme::Number => TokenKind::Number,
        Lexeme::Symbol => TokenKind::Operator,
        Lexeme::Open | Lexeme::Close => TokenKind::Parenthesis,
        Lexeme::Comma => TokenKind::Comma,
        Lexeme::Other => TokenKind::Unknown,
        Lexeme::Word => classify_word(text, kind, functions),
    }
}

fn classify_word(text: &str, kind: ExpressionKind, functions: &FunctionRegistry) -> TokenKind {
    match kind {
        ExpressionKind::Arithmetic if functions.contains(text) => TokenKind::Function,
        ExpressionKind::Arithmetic if CONSTANTS.iter().any(|(name, _)| *name == text) => TokenKind::Variable,
        ExpressionKind::Arithmetic => TokenKind::Unknown,
        ExpressionKind::Logic => match text {
            "and" | "or" | "not" | "xor" | "nand" | "nor" | "xnor" => TokenKind::Operator,
            "true" | "false" => TokenKind::Keyword,
            _ => TokenKind::Unknown,
        },
        ExpressionKind::UnitConversion => match text {
            "to" | "in" => TokenKind::Keyword,
            _ => TokenKind::Unit,
        },
        ExpressionKind::DateCalculation => TokenKind::Keyword,
        ExpressionKind::NaturalLanguage | ExpressionKind::Unknown => TokenKind::Variable,
    }
}
