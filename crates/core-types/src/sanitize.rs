//! Lexical cleanup of loosely formatted numeric text.
//!
//! Handles thousands separators (`3'000'000.00`, `1,234`), currency symbols and
//! percent signs. No rounding or unit conversion happens here.

use serde_json::Value;

/// Cleans `input` and parses its leading numeric token.
///
/// Returns `None` (not-a-number) when nothing numeric remains.
pub fn sanitize(input: &str) -> Option<f64> {
    let cleaned: String = input
        .chars()
        .filter(|c| c.is_ascii_digit() || matches!(c, '+' | '-' | '.'))
        .collect();

    if cleaned.is_empty() || cleaned == "-" || cleaned == "+" {
        return None;
    }

    leading_number(&cleaned)
}

/// Sanitizes an untyped value: numbers pass through, strings are cleaned,
/// everything else is not-a-number.
pub fn sanitize_value(input: &Value) -> Option<f64> {
    match input {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => sanitize(s),
        _ => None,
    }
}

/// Parses the longest `[+-]?digits[.digits]` prefix, requiring at least one digit.
fn leading_number(s: &str) -> Option<f64> {
    let bytes = s.as_bytes();
    let mut end = 0;

    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    let mut digits = end - int_start;

    if end < bytes.len() && bytes[end] == b'.' {
        let frac_start = end + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        digits += frac_end - frac_start;
        end = frac_end;
    }

    if digits == 0 {
        return None;
    }

    s[..end].parse::<f64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn strips_grouping_marks_and_symbols() {
        assert_eq!(sanitize("3'000'000.00"), Some(3_000_000.0));
        assert_eq!(sanitize("1,234.5"), Some(1234.5));
        assert_eq!(sanitize("$ 42"), Some(42.0));
        assert_eq!(sanitize("0.16%"), Some(0.16));
    }

    #[test]
    fn negative_zero_percent_is_zero() {
        assert_eq!(sanitize("-0.00%"), Some(0.0));
    }

    #[test]
    fn empty_and_bare_signs_are_not_numbers() {
        assert_eq!(sanitize(""), None);
        assert_eq!(sanitize("+"), None);
        assert_eq!(sanitize("-"), None);
        assert_eq!(sanitize("n/a"), None);
        assert_eq!(sanitize("."), None);
    }

    #[test]
    fn parses_only_the_leading_token() {
        assert_eq!(sanitize("1.2.3"), Some(1.2));
        assert_eq!(sanitize("1-2"), Some(1.0));
        assert_eq!(sanitize("-.5"), Some(-0.5));
        assert_eq!(sanitize("--1"), None);
    }

    #[test]
    fn untyped_values() {
        assert_eq!(sanitize_value(&json!(null)), None);
        assert_eq!(sanitize_value(&json!(0.25)), Some(0.25));
        assert_eq!(sanitize_value(&json!("12%")), Some(12.0));
        assert_eq!(sanitize_value(&json!(true)), None);
        assert_eq!(sanitize_value(&json!([1])), None);
    }
}
