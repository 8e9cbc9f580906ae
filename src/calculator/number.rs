//! Operand parsing and result formatting
//!
//! Operands are kept as text. Parsing takes the longest numeric prefix and
//! yields NaN when there is none; formatting produces the shortest form that
//! round-trips, with `Infinity`/`NaN` spelled out and exponent notation only
//! for very large or very small magnitudes.

use super::state::Operator;

const EXPONENT_UPPER: f64 = 1e21;
const EXPONENT_LOWER: f64 = 1e-6;

/// Apply `operator` to two operand strings and render the result.
///
/// Never fails: unparseable operands become NaN and division by zero
/// follows IEEE semantics.
pub fn evaluate(previous: &str, operator: Operator, current: &str) -> String {
    format_number(operator.apply(operand_value(previous), operand_value(current)))
}

/// Numeric value of an operand; an empty operand counts as zero.
pub fn operand_value(operand: &str) -> f64 {
    if operand.is_empty() {
        0.0
    } else {
        parse_float(operand)
    }
}

/// Parse the longest leading float literal, ignoring leading whitespace.
pub fn parse_float(text: &str) -> f64 {
    let bytes = text.trim_start().as_bytes();
    let mut pos = 0;

    let sign = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            "-"
        }
        Some(b'+') => {
            pos += 1;
            ""
        }
        _ => "",
    };

    if bytes[pos..].starts_with(b"Infinity") {
        return if sign == "-" {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }

    let int_digits = leading_digits(&bytes[pos..]);
    pos += int_digits.len();

    let mut frac_digits: &[u8] = &[];
    if bytes.get(pos) == Some(&b'.') {
        frac_digits = leading_digits(&bytes[pos + 1..]);
        pos += 1 + frac_digits.len();
    }

    if int_digits.is_empty() && frac_digits.is_empty() {
        return f64::NAN;
    }

    let mut literal = String::from(sign);
    if int_digits.is_empty() {
        literal.push('0');
    } else {
        literal.push_str(&String::from_utf8_lossy(int_digits));
    }
    if !frac_digits.is_empty() {
        literal.push('.');
        literal.push_str(&String::from_utf8_lossy(frac_digits));
    }

    if matches!(bytes.get(pos), Some(b'e' | b'E')) {
        let mut exp_pos = pos + 1;
        let exp_sign = match bytes.get(exp_pos) {
            Some(b'-') => {
                exp_pos += 1;
                "-"
            }
            Some(b'+') => {
                exp_pos += 1;
                ""
            }
            _ => "",
        };
        let exp_digits = leading_digits(&bytes[exp_pos..]);
        if !exp_digits.is_empty() {
            literal.push('e');
            literal.push_str(exp_sign);
            literal.push_str(&String::from_utf8_lossy(exp_digits));
        }
    }

    literal.parse().unwrap_or(f64::NAN)
}

fn leading_digits(bytes: &[u8]) -> &[u8] {
    let len = bytes.iter().take_while(|b| b.is_ascii_digit()).count();
    &bytes[..len]
}

/// Render a result the way it is shown and logged in history.
pub fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    }
    if value.is_infinite() {
        return if value > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }
    if value == 0.0 {
        // Covers negative zero as well.
        return "0".to_string();
    }

    let magnitude = value.abs();
    if (EXPONENT_LOWER..EXPONENT_UPPER).contains(&magnitude) {
        return value.to_string();
    }

    let formatted = format!("{value:e}");
    match formatted.split_once('e') {
        Some((mantissa, exponent)) if !exponent.starts_with('-') => {
            format!("{mantissa}e+{exponent}")
        }
        _ => formatted,
    }
}
