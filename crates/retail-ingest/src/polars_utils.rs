//! Polars AnyValue utility functions.
//!
//! String and numeric views of cell values, shared by the transform and
//! output stages.

use polars::prelude::AnyValue;

/// Converts a Polars AnyValue to a String representation.
/// Returns empty string for Null, properly formats numeric types.
pub fn any_to_string(value: AnyValue<'_>) -> String {
    match value {
        AnyValue::Null => String::new(),
        AnyValue::Int8(v) => v.to_string(),
        AnyValue::Int16(v) => v.to_string(),
        AnyValue::Int32(v) => v.to_string(),
        AnyValue::Int64(v) => v.to_string(),
        AnyValue::UInt8(v) => v.to_string(),
        AnyValue::UInt16(v) => v.to_string(),
        AnyValue::UInt32(v) => v.to_string(),
        AnyValue::UInt64(v) => v.to_string(),
        AnyValue::Float32(v) => format_numeric(f64::from(v)),
        AnyValue::Float64(v) => format_numeric(v),
        AnyValue::String(s) => s.to_string(),
        AnyValue::StringOwned(s) => s.to_string(),
        AnyValue::Boolean(b) => b.to_string(),
        other => other.to_string(),
    }
}

/// Formats a floating-point number as a string without trailing zeros.
pub fn format_numeric(v: f64) -> String {
    let s = format!("{v}");
    if s.contains('.') {
        s.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        s
    }
}

/// Converts an AnyValue to f64, returning None for non-numeric or null values.
pub fn any_to_f64(value: AnyValue<'_>) -> Option<f64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(f64::from(v)),
        AnyValue::Int16(v) => Some(f64::from(v)),
        AnyValue::Int32(v) => Some(f64::from(v)),
        AnyValue::Int64(v) => Some(v as f64),
        AnyValue::UInt8(v) => Some(f64::from(v)),
        AnyValue::UInt16(v) => Some(f64::from(v)),
        AnyValue::UInt32(v) => Some(f64::from(v)),
        AnyValue::UInt64(v) => Some(v as f64),
        AnyValue::Float32(v) => Some(f64::from(v)),
        AnyValue::Float64(v) => Some(v),
        AnyValue::Boolean(b) => Some(if b { 1.0 } else { 0.0 }),
        AnyValue::String(s) => parse_f64(s),
        AnyValue::StringOwned(s) => parse_f64(&s),
        _ => None,
    }
}

/// Converts an AnyValue to i64, returning None unless the value is integral.
pub fn any_to_i64(value: AnyValue<'_>) -> Option<i64> {
    match value {
        AnyValue::Null => None,
        AnyValue::Int8(v) => Some(i64::from(v)),
        AnyValue::Int16(v) => Some(i64::from(v)),
        AnyValue::Int32(v) => Some(i64::from(v)),
        AnyValue::Int64(v) => Some(v),
        AnyValue::UInt8(v) => Some(i64::from(v)),
        AnyValue::UInt16(v) => Some(i64::from(v)),
        AnyValue::UInt32(v) => Some(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).ok(),
        AnyValue::Boolean(b) => Some(i64::from(b)),
        AnyValue::String(s) => parse_i64(s),
        AnyValue::StringOwned(s) => parse_i64(&s),
        _ => None,
    }
}

/// Parses a string as f64, returning None for invalid, empty, or non-finite strings.
pub fn parse_f64(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Parses a string as i64, returning None for invalid or empty strings.
pub fn parse_i64(value: &str) -> Option<i64> {
    if value.trim().is_empty() {
        return None;
    }
    value.trim().parse::<i64>().ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn formats_floats_without_trailing_zeros() {
        assert_eq!(format_numeric(10.0), "10");
        assert_eq!(format_numeric(10.5), "10.5");
        assert_eq!(format_numeric(19.98), "19.98");
    }

    #[test]
    fn integer_and_float_keys_render_alike() {
        assert_eq!(any_to_string(AnyValue::Int64(7)), "7");
        assert_eq!(any_to_string(AnyValue::Float64(7.0)), "7");
        assert_eq!(any_to_string(AnyValue::String("7")), "7");
    }

    #[test]
    fn parses_numbers() {
        assert_eq!(parse_f64(" 9.99 "), Some(9.99));
        assert_eq!(parse_f64("n/a"), None);
        assert_eq!(parse_f64("NaN"), None);
        assert_eq!(parse_i64("42"), Some(42));
        assert_eq!(parse_i64("4.2"), None);
        assert_eq!(any_to_i64(AnyValue::Float64(4.0)), None);
    }
}
