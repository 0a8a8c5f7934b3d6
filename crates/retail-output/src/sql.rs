//! Mapping from Polars dtypes and cells to SQLite.

use polars::prelude::{AnyValue, DataType, TimeUnit};
use rusqlite::types::Value;

use retail_ingest::any_to_string;
use retail_transform::datetime::{format_timestamp, from_epoch};

const MILLIS_PER_DAY: i64 = 86_400_000;

/// Quote an identifier for use in SQL text.
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Declared SQLite column type for a Polars dtype.
pub fn sql_type(dtype: &DataType) -> &'static str {
    match dtype {
        DataType::Int8
        | DataType::Int16
        | DataType::Int32
        | DataType::Int64
        | DataType::UInt8
        | DataType::UInt16
        | DataType::UInt32
        | DataType::UInt64
        | DataType::Boolean => "INTEGER",
        DataType::Float32 | DataType::Float64 => "REAL",
        DataType::Datetime(_, _) | DataType::Date => "TIMESTAMP",
        _ => "TEXT",
    }
}

fn timestamp(value: i64, unit: TimeUnit) -> Value {
    from_epoch(value, unit).map_or(Value::Null, |dt| Value::Text(format_timestamp(dt)))
}

/// SQLite value for one cell. Date-times are stored as
/// `YYYY-MM-DD HH:MM:SS` text.
pub fn sql_value(value: AnyValue<'_>) -> Value {
    match value {
        AnyValue::Null => Value::Null,
        AnyValue::Boolean(b) => Value::Integer(i64::from(b)),
        AnyValue::Int8(v) => Value::Integer(i64::from(v)),
        AnyValue::Int16(v) => Value::Integer(i64::from(v)),
        AnyValue::Int32(v) => Value::Integer(i64::from(v)),
        AnyValue::Int64(v) => Value::Integer(v),
        AnyValue::UInt8(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt16(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt32(v) => Value::Integer(i64::from(v)),
        AnyValue::UInt64(v) => i64::try_from(v).map_or(Value::Real(v as f64), Value::Integer),
        AnyValue::Float32(v) => Value::Real(f64::from(v)),
        AnyValue::Float64(v) => Value::Real(v),
        AnyValue::Datetime(v, unit, _) => timestamp(v, unit),
        AnyValue::DatetimeOwned(v, unit, _) => timestamp(v, unit),
        AnyValue::Date(days) => timestamp(i64::from(days) * MILLIS_PER_DAY, TimeUnit::Milliseconds),
        AnyValue::String(s) => Value::Text(s.to_string()),
        AnyValue::StringOwned(s) => Value::Text(s.to_string()),
        other => Value::Text(any_to_string(other)),
    }
}
