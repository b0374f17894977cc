//! Token-sequence validation per domain
//!
//! Validators return the first offending token index on failure, or the
//! token count when the sequence ends early (a dangling operator, an
//! unclosed parenthesis).

use crate::expression::ExpressionKind;
use quickeval_eval::operators::datetime::DATE_KEYWORDS;
use quickeval_types::{Token, TokenKind};

/// Outcome of validating a token sequence
pub type Validation = Result<(), usize>;

pub fn validate(tokens: &[Token], kind: ExpressionKind) -> Validation {
    if tokens.is_empty() {
        return Err(0);
    }
    match kind {
        ExpressionKind::Arithmetic => validate_arithmetic(tokens),
        ExpressionKind::Logic => validate_logic(tokens),
        ExpressionKind::UnitConversion => validate_unit_conversion(tokens),
        ExpressionKind::DateCalculation => validate_date(tokens),
        ExpressionKind::NaturalLanguage => Ok(()),
        ExpressionKind::Unknown => Err(0),
    }
}

/// Operand/operator alternation with balanced parentheses.
///
/// Accepted on top of the strict alternation: unary `+`/`-`, implicit
/// products (`2pi`, `2(3)`, `(1)(2)`, `(2)3`), and `,` between the
/// arguments of a call. A function name must be followed by `(`.
pub fn validate_arithmetic(tokens: &[Token]) -> Validation {
    let mut depth = 0usize;
    let mut expect_operand = true;
    let mut previous: Option<&Token> = None;

    for (index, token) in tokens.iter().enumerate() {
        if previous.is_some_and(|p| p.kind == TokenKind::Function) && !token.is_open_paren() {
            return Err(index);
        }
        let implicit_product = previous.is_some_and(|p| {
            p.is_close_paren()
                || (p.kind == TokenKind::Number
                    && matches!(token.kind, TokenKind::Variable | TokenKind::Function | TokenKind::Parenthesis))
        });

        match token.kind {
            TokenKind::Number | TokenKind::Variable | TokenKind::Function => {
                if !expect_operand && !implicit_product {
                    return Err(index);
                }
                expect_operand = token.kind == TokenKind::Function;
            }
            TokenKind::Operator => {
                let unary = token.value == "-" || token.value == "+";
                let binary = matches!(token.value.as_str(), "+" | "-" | "*" | "/" | "%" | "^");
                if expect_operand && !unary {
                    return Err(index);
                } else if !expect_operand && !binary {
                    return Err(index);
                }
                expect_operand = true;
            }
            TokenKind::Parenthesis if token.is_open_paren() => {
                if !expect_operand && !implicit_product {
                    return Err(index);
                }
                depth += 1;
                expect_operand = true;
            }
            TokenKind::Parenthesis => {
                if expect_operand || depth == 0 {
                    return Err(index);
                }
                depth -= 1;
            }
            TokenKind::Comma => {
                if expect_operand || depth == 0 {
                    return Err(index);
                }
                expect_operand = true;
            }
            _ => return Err(index),
        }
        previous = Some(token);
    }

    if depth == 0 && !expect_operand {
        Ok(())
    } else {
        Err(tokens.len())
    }
}

/// `[-]<number> <unit...> (to|in) <unit...>` or `[-]<number> <unit> <unit>`
pub fn validate_unit_conversion(tokens: &[Token]) -> Validation {
    let mut rest = tokens;
    let mut offset = 0;
    if rest.first().is_some_and(|t| t.is(TokenKind::Operator, "-")) {
        rest = &rest[1..];
        offset = 1;
    }
    if !rest.first().is_some_and(|t| t.kind == TokenKind::Number) {
        return Err(offset);
    }
    let units = &rest[1..];
    if let Some(bad) = units
        .iter()
        .position(|t| !matches!(t.kind, TokenKind::Unit | TokenKind::Keyword))
    {
        return Err(offset + 1 + bad);
    }

    // `in` is both a separator and the inch unit, so the separator is the
    // first keyword after at least one unit word
    let separator = units
        .iter()
        .enumerate()
        .skip(1)
        .find(|(_, t)| t.kind == TokenKind::Keyword)
        .map(|(index, _)| index);

    match separator {
        Some(index) if index + 1 < units.len() => Ok(()),
        Some(_) => Err(tokens.len()),
        None if units.len() == 2 => Ok(()),
        None => Err(offset + 1 + units.len().min(2)),
    }
}

/// Two or more tokens not ending in an operator, or a lone date keyword.
///
/// Shape matching happens in the date calculator.
pub fn validate_date(tokens: &[Token]) -> Validation {
    match tokens {
        [only] if DATE_KEYWORDS.contains(&only.value.as_str()) => Ok(()),
        [] | [_] => Err(tokens.len()),
        [.., last] if last.kind == TokenKind::Operator => Err(tokens.len()),
        _ => Ok(()),
    }
}

/// Operand/operator alternation where `!`, `not` and `~` are prefix operators
pub fn validate_logic(tokens: &[Token]) -> Validation {
    let mut depth = 0usize;
    let mut expect_operand = true;

    for (index, token) in tokens.iter().enumerate() {
        match token.kind {
            TokenKind::Number | TokenKind::Keyword => {
                if !expect_operand {
                    return Err(index);
                }
                expect_operand = false;
            }
            TokenKind::Operator if matches!(token.value.as_str(), "!" | "not" | "~") => {
                if !expect_operand {
                    return Err(index);
                }
            }
            TokenKind::Operator => {
                if expect_operand {
                    return Err(index);
                }
                expect_operand = true;
            }
            TokenKind::Parenthesis if token.is_open_paren() => {
                if !expect_operand {
                    return Err(index);
                }
                depth += 1;
            }
            TokenKind::Parenthesis => {
                if expect_operand || depth == 0 {
                    return Err(index);
                }
                depth -= 1;
            }
            _ => return Err(index),
        }
    }

    if depth == 0 && !expect_operand {
        Ok(())
    } else {
        Err(tokens.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn token(kind: TokenKind, value: &str) -> Token {
        Token::new(kind, value, 0)
    }

    fn num(value: &str) -> Token {
        token(TokenKind::Number, value)
    }

    fn op(value: &str) -> Token {
        token(TokenKind::Operator, value)
    }

    fn paren(value: &str) -> Token {
        token(TokenKind::Parenthesis, value)
    }

    #[test]
    fn test_arithmetic_alternation() {
        assert_eq!(validate_arithmetic(&[num("2"), op("+"), num("3")]), Ok(()));
        assert_eq!(validate_arithmetic(&[num("2"), op("+"), op("*"), num("3")]), Err(2));
        assert_eq!(validate_arithmetic(&[num("2"), op("+")]), Err(2));
        assert_eq!(validate_arithmetic(&[num("2"), num("3")]), Err(1));
    }

    #[test]
    fn test_arithmetic_parentheses() {
        assert_eq!(validate_arithmetic(&[paren("("), num("1"), paren(")")]), Ok(()));
        assert_eq!(validate_arithmetic(&[paren("("), num("1")]), Err(2));
        assert_eq!(validate_arithmetic(&[num("1"), paren(")")]), Err(1));
        assert_eq!(validate_arithmetic(&[paren("("), paren(")")]), Err(1));
    }

    #[test]
    fn test_arithmetic_calls_and_implicit_products() {
        let sqrt = token(TokenKind::Function, "sqrt");
        let pi = token(TokenKind::Variable, "pi");
        let comma = token(TokenKind::Comma, ",");
        let pow = token(TokenKind::Function, "pow");

        assert_eq!(validate_arithmetic(&[sqrt.clone(), paren("("), num("4"), paren(")")]), Ok(()));
        assert_eq!(validate_arithmetic(&[sqrt, num("4")]), Err(1));
        assert_eq!(validate_arithmetic(&[num("2"), pi]), Ok(()));
        assert_eq!(
            validate_arithmetic(&[pow, paren("("), num("2"), comma.clone(), num("3"), paren(")")]),
            Ok(())
        );
        assert_eq!(validate_arithmetic(&[num("1"), comma, num("2")]), Err(1));
        assert_eq!(validate_arithmetic(&[op("-"), num("5")]), Ok(()));
    }

    #[rstest]
    #[case(&["10", "km", "to", "miles"], true)]
    #[case(&["5", "km", "miles"], true)]
    #[case(&["2", "square", "meters", "to", "square", "feet"], true)]
    #[case(&["5", "km"], false)]
    #[case(&["5", "km", "to"], false)]
    #[case(&["5", "km", "m", "cm"], false)]
    #[case(&["km", "to", "miles"], false)]
    #[case(&["10", "in", "to", "cm"], true)]
    #[case(&["10", "km", "to", "in"], true)]
    fn test_unit_conversion(#[case] words: &[&str], #[case] valid: bool) {
        let tokens: Vec<Token> = words
            .iter()
            .map(|w| {
                let kind = match *w {
                    "to" | "in" => TokenKind::Keyword,
                    w if w.chars().all(|c| c.is_ascii_digit()) => TokenKind::Number,
                    _ => TokenKind::Unit,
                };
                token(kind, w)
            })
            .collect();
        assert_eq!(validate_unit_conversion(&tokens).is_ok(), valid);
    }

    #[rstest]
    #[case(&["today"], true)]
    #[case(&["tomorrow"], true)]
    #[case(&["between"], false)]
    #[case(&["monday"], false)]
    #[case(&["today", "+", "7", "days"], true)]
    #[case(&["today", "+"], false)]
    #[case(&["3", "days", "ago"], true)]
    fn test_date(#[case] words: &[&str], #[case] valid: bool) {
        let tokens: Vec<Token> = words
            .iter()
            .map(|w| {
                let kind = match *w {
                    "+" | "-" => TokenKind::Operator,
                    w if w.chars().all(|c| c.is_ascii_digit()) => TokenKind::Number,
                    _ => TokenKind::Keyword,
                };
                token(kind, w)
            })
            .collect();
        assert_eq!(validate_date(&tokens).is_ok(), valid);
    }

    #[test]
    fn test_logic_prefix_operators() {
        let t = token(TokenKind::Keyword, "true");
        let f = token(TokenKind::Keyword, "false");
        assert_eq!(validate_logic(&[op("not"), t.clone(), op("and"), f.clone()]), Ok(()));
        assert_eq!(validate_logic(&[op("~"), num("5")]), Ok(()));
        assert_eq!(validate_logic(&[t.clone(), op("!")]), Err(1));
        assert_eq!(validate_logic(&[t, f]), Err(1));
        assert_eq!(validate_logic(&[num("5"), op(">")]), Err(2));
    }
}
