//! Bitwise integer expressions
//!
//! Operands are 64-bit signed integers written in decimal or with a `0b`,
//! `0o` or `0x` prefix. Precedence, loosest first: `|`, `^`, `&`, shifts.
//! Unary `~` is only accepted as the first token and complements the operand
//! that follows it (a literal or a parenthesized group).

use crate::error::{EvalError, EvalResult};
use once_cell::sync::Lazy;
use quickeval_types::{Token, TokenKind};
use regex::Regex;

static TOKEN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"0b[01]+|0o[0-7]+|0x[0-9a-f]+|\d+|<<|>>|[&|^~()]|[a-z_][a-z0-9_]*|\S")
        .expect("valid bitwise token pattern")
});

/// Binding strength of a bitwise operator
pub fn precedence(operator: &str) -> u8 {
    match operator {
        "~" => 4,
        "<<" | ">>" => 3,
        "&" => 2,
        "^" => 1,
        _ => 0,
    }
}

/// True when `expression` uses a bitwise operator.
///
/// `&&` and `||` are boolean operators and do not count.
pub fn is_bitwise(expression: &str) -> bool {
    expression.contains("<<")
        || expression.contains(">>")
        || expression.contains('~')
        || expression.contains('^')
        || has_single(expression, b'&')
        || has_single(expression, b'|')
}

fn has_single(text: &str, needle: u8) -> bool {
    let bytes = text.as_bytes();
    bytes.iter().enumerate().any(|(i, &b)| {
        b == needle
            && (i == 0 || bytes[i - 1] != needle)
            && bytes.get(i + 1) != Some(&needle)
    })
}

pub fn tokenize(expression: &str) -> EvalResult<Vec<Token>> {
    TOKEN
        .find_iter(expression)
        .map(|m| {
            let text = m.as_str();
            let first = text.as_bytes()[0];
            let kind = if first.is_ascii_digit() {
                TokenKind::Number
            } else if text == "(" || text == ")" {
                TokenKind::Parenthesis
            } else if matches!(text, "&" | "|" | "^" | "~" | "<<" | ">>") {
                TokenKind::Operator
            } else {
                return Err(EvalError::unknown_token(text));
            };
            Ok(Token::new(kind, text, m.start()))
        })
        .collect()
}

/// Parse a decimal or base-prefixed integer literal
pub fn parse_integer(literal: &str) -> EvalResult<i64> {
    let (digits, radix) = if let Some(rest) = literal.strip_prefix("0b") {
        (rest, 2)
    } else if let Some(rest) = literal.strip_prefix("0o") {
        (rest, 8)
    } else if let Some(rest) = literal.strip_prefix("0x") {
        (rest, 16)
    } else {
        (literal, 10)
    };
    i64::from_str_radix(digits, radix).map_err(|_| EvalError::invalid_number(literal))
}

/// Evaluate a lower-cased bitwise expression
pub fn evaluate(expression: &str) -> EvalResult<i64> {
    let tokens = tokenize(expression)?;
    let mut values: Vec<i64> = Vec::new();
    let mut operators: Vec<&str> = Vec::new();
    // operator-stack depth of the "(" whose group must be complemented
    let mut complement_group: Option<usize> = None;

    let mut rest = tokens.as_slice();
    if let Some((first, tail)) = rest.split_first() {
        if first.value == "~" {
            match tail.split_first() {
                Some((operand, after)) if operand.kind == TokenKind::Number => {
                    values.push(!parse_integer(&operand.value)?);
                    rest = after;
                }
                Some((operand, _)) if operand.is_open_paren() => {
                    complement_group = Some(0);
                    rest = tail;
                }
                _ => return Err(EvalError::insufficient_operands("~")),
            }
        }
    }

    for token in rest {
        match token.kind {
            TokenKind::Number => values.push(parse_integer(&token.value)?),
            TokenKind::Parenthesis if token.value == "(" => operators.push("("),
            TokenKind::Parenthesis => {
                loop {
                    match operators.pop() {
                        None => return Err(EvalError::MismatchedParentheses),
                        Some("(") => break,
                        Some(op) => apply(op, &mut values)?,
                    }
                }
                if complement_group == Some(operators.len()) {
                    let top = values.last_mut().ok_or_else(|| EvalError::insufficient_operands("~"))?;
                    *top = !*top;
                    complement_group = None;
                }
            }
            TokenKind::Operator if token.value == "~" => {
                return Err(EvalError::misplaced_operator("~"));
            }
            TokenKind::Operator => {
                let incoming = precedence(&token.value);
                while let Some(&top) = operators.last() {
                    if top != "(" && precedence(top) >= incoming {
                        operators.pop();
                        apply(top, &mut values)?;
                    } else {
                        break;
                    }
                }
                operators.push(token.value.as_str());
            }
            _ => return Err(EvalError::unknown_token(&token.value)),
        }
    }

    while let Some(op) = operators.pop() {
        if op == "(" {
            return Err(EvalError::MismatchedParentheses);
        }
        apply(op, &mut values)?;
    }

    match values.as_slice() {
        [value] => Ok(*value),
        _ => Err(EvalError::InvalidExpression),
    }
}

fn apply(operator: &str, values: &mut Vec<i64>) -> EvalResult<()> {
    let (Some(b), Some(a)) = (values.pop(), values.pop()) else {
        return Err(EvalError::insufficient_operands(operator));
    };
    let result = match operator {
        "&" => a & b,
        "|" => a | b,
        "^" => a ^ b,
        "<<" | ">>" => {
            let shift = u32::try_from(b)
                .ok()
                .filter(|s| *s < 64)
                .ok_or(EvalError::ShiftOutOfRange { amount: b })?;
            if operator == "<<" { a << shift } else { a >> shift }
        }
        other => return Err(EvalError::unknown_operator(other)),
    };
    values.push(result);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("0b1010 & 0b1100", 8)]
    #[case("0b1010 | 0b0100", 14)]
    #[case("5 ^ 3", 6)]
    #[case("5 << 3", 40)]
    #[case("40 >> 1", 20)]
    #[case("0xff & 0x0f", 15)]
    #[case("0o17 | 0", 15)]
    #[case("1 | 2 & 3", 3)]
    #[case("(1 | 2) & 2", 2)]
    #[case("~0b1010", -11)]
    #[case("~0 & 0xf", 15)]
    #[case("~(1 | 2)", -4)]
    fn test_evaluate(#[case] expression: &str, #[case] expected: i64) {
        assert_eq!(evaluate(expression), Ok(expected));
    }

    #[test]
    fn test_detection() {
        assert!(is_bitwise("1 & 2"));
        assert!(is_bitwise("~5"));
        assert!(is_bitwise("1 << 2"));
        assert!(!is_bitwise("true && false"));
        assert!(!is_bitwise("1 || 0"));
        assert!(!is_bitwise("5 > 3"));
    }

    #[test]
    fn test_errors() {
        assert_eq!(evaluate("(1 & 2"), Err(EvalError::MismatchedParentheses));
        assert_eq!(evaluate("1 & 2)"), Err(EvalError::MismatchedParentheses));
        assert_eq!(evaluate("1 &"), Err(EvalError::insufficient_operands("&")));
        assert_eq!(evaluate("1 & ~2"), Err(EvalError::misplaced_operator("~")));
        assert_eq!(evaluate("1 << 64"), Err(EvalError::ShiftOutOfRange { amount: 64 }));
        assert_eq!(evaluate("0b102 & 1"), Err(EvalError::InvalidExpression));
        assert_eq!(evaluate("x & 1"), Err(EvalError::unknown_token("x")));
        assert_eq!(evaluate("~"), Err(EvalError::insufficient_operands("~")));
    }
}
