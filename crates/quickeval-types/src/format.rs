//! Number formatting shared by every numeric evaluator

use crate::MAX_PRECISION;
use rust_decimal::prelude::FromPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};

const SCIENTIFIC_LOW: f64 = 1e-4;
const SCIENTIFIC_HIGH: f64 = 1e10;

/// Render a value for display.
///
/// `NaN` and infinities print as words. Non-zero magnitudes below `1e-4` or
/// above `1e10` use scientific notation with at most four fraction digits
/// (`1.2346E+10`). Everything else is rounded half away from zero to
/// `precision` decimals and printed with exactly that many.
pub fn format_number(value: f64, precision: u32) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return "Infinity".to_string();
    }

    let magnitude = value.abs();
    if magnitude > 0.0 && !(SCIENTIFIC_LOW..=SCIENTIFIC_HIGH).contains(&magnitude) {
        return format_scientific(value);
    }

    let precision = precision.min(MAX_PRECISION);
    let places = precision as usize;
    match Decimal::from_f64(value) {
        Some(decimal) => {
            let mut rounded =
                decimal.round_dp_with_strategy(precision, RoundingStrategy::MidpointAwayFromZero);
            if rounded.is_zero() {
                rounded = Decimal::ZERO;
            }
            // Decimal's own `{:.N}` writes into a fixed buffer, so pad here
            pad_fraction(rounded.to_string(), places)
        }
        None if value == 0.0 => pad_fraction("0".to_string(), places),
        None => format!("{value:.places$}"),
    }
}

/// Right-pad the fractional part of `text` with zeros to `places` digits
fn pad_fraction(mut text: String, places: usize) -> String {
    let written = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
    if places == 0 || written >= places {
        return text;
    }
    if written == 0 {
        text.push('.');
    }
    text.extend(std::iter::repeat_n('0', places - written));
    text
}

/// Scientific notation with up to four fraction digits and no trailing zeros
pub fn format_scientific(value: f64) -> String {
    let raw = format!("{value:.4e}");
    let Some((mantissa, exponent)) = raw.split_once('e') else {
        return raw;
    };
    let mantissa = if mantissa.contains('.') {
        mantissa.trim_end_matches('0').trim_end_matches('.')
    } else {
        mantissa
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let sign = if exponent < 0 { '-' } else { '+' };
    format!("{mantissa}E{sign}{}", exponent.abs())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case(14.0, 10, "14.0000000000")]
    #[case(5.0, 10, "5.0000000000")]
    #[case(212.0, 4, "212.0000")]
    #[case(6.213711922373339, 4, "6.2137")]
    #[case(6.213711922373339, 10, "6.2137119224")]
    #[case(std::f64::consts::PI, 10, "3.1415926536")]
    #[case(0.0, 4, "0.0000")]
    #[case(2.5, 0, "3")]
    #[case(-2.5, 0, "-3")]
    #[case(0.125, 2, "0.13")]
    #[case(1e10, 2, "10000000000.00")]
    fn test_fixed(#[case] value: f64, #[case] precision: u32, #[case] expected: &str) {
        assert_eq!(format_number(value, precision), expected);
    }

    #[rstest]
    #[case(12345678901.0, "1.2346E+10")]
    #[case(0.00001234, "1.234E-5")]
    #[case(0.00005, "5E-5")]
    #[case(-2e11, "-2E+11")]
    fn test_scientific(#[case] value: f64, #[case] expected: &str) {
        assert_eq!(format_number(value, 10), expected);
    }

    #[rstest]
    #[case(7.0, 0, "7", "")]
    #[case(7.0, 15, "7", "")]
    #[case(7.0, 28, "7", "")]
    #[case(12.25, 28, "12", "25")]
    #[case(99999.0, 28, "99999", "")]
    #[case(123456.0, 28, "123456", "")]
    #[case(1234.5, 0, "1235", "")]
    #[case(1234.5, 15, "1234", "5")]
    #[case(1234.5, 28, "1234", "5")]
    #[case(-1234.5, 28, "-1234", "5")]
    #[case(9999999999.5, 15, "9999999999", "5")]
    #[case(9999999999.5, 22, "9999999999", "5")]
    #[case(9999999999.5, 28, "9999999999", "5")]
    fn test_wide_precision(
        #[case] value: f64,
        #[case] precision: u32,
        #[case] integer: &str,
        #[case] fraction: &str,
    ) {
        let places = precision as usize;
        let expected = if places == 0 {
            integer.to_string()
        } else {
            format!("{integer}.{fraction:0<places$}")
        };
        assert_eq!(format_number(value, precision), expected);
    }

    #[rstest]
    #[case(-0.0, 4, "0.0000")]
    #[case(-0.00012, 2, "0.00")]
    #[case(-0.4, 0, "0")]
    fn test_negative_zero_has_no_sign(#[case] value: f64, #[case] precision: u32, #[case] expected: &str) {
        assert_eq!(format_number(value, precision), expected);
    }

    proptest::proptest! {
        #[test]
        fn test_any_precision_formats(value in -1e10f64..1e10, precision in 0u32..=MAX_PRECISION) {
            let text = format_number(value, precision);
            if !text.contains('E') {
                let places = text.split_once('.').map_or(0, |(_, fraction)| fraction.len());
                proptest::prop_assert_eq!(places, precision as usize);
            }
        }
    }

    #[test]
    fn test_special_values() {
        assert_eq!(format_number(f64::NAN, 4), "NaN");
        assert_eq!(format_number(f64::INFINITY, 4), "Infinity");
        assert_eq!(format_number(f64::NEG_INFINITY, 4), "Infinity");
    }
}
