//! Numeric and date-time coercion.
//!
//! Coercion never fails the run: a cell that does not parse becomes null.
//! Columns named in a plan but missing from the table are skipped.

use polars::prelude::{AnyValue, Column, DataFrame, DataType, NamedFrom, Series, TimeUnit};
use tracing::debug;

use retail_ingest::{any_to_f64, any_to_i64, any_to_string};

use crate::datetime::{parse_datetime, to_epoch_millis};
use crate::error::Result;
use crate::keys::has_column;

/// Date-time dtype produced by [`coerce_dates`].
pub fn datetime_dtype() -> DataType {
    DataType::Datetime(TimeUnit::Milliseconds, None)
}

/// Convert the named columns to numbers.
///
/// A column becomes `Int64` when every value that parses is integral and
/// `Float64` otherwise.
pub fn coerce_numeric(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in columns.iter().copied() {
        if !has_column(df, name) {
            continue;
        }
        let series = numeric_series(df.column(name)?, df.height());
        out.with_column(series)?;
    }
    Ok(out)
}

fn numeric_series(column: &Column, height: usize) -> Series {
    let mut floats: Vec<Option<f64>> = Vec::with_capacity(height);
    let mut ints: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut all_integral = true;
    let mut degraded = 0usize;
    for idx in 0..height {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            floats.push(None);
            ints.push(None);
            continue;
        }
        let float = any_to_f64(value.clone());
        if float.is_none() {
            degraded += 1;
        }
        let int = float.and_then(|_| any_to_i64(value));
        if float.is_some() && int.is_none() {
            all_integral = false;
        }
        floats.push(float);
        ints.push(int);
    }
    if degraded > 0 {
        debug!(
            column = %column.name(),
            degraded,
            "unparsable numeric values set to null"
        );
    }
    if all_integral {
        Series::new(column.name().clone(), ints)
    } else {
        Series::new(column.name().clone(), floats)
    }
}

/// Convert the named columns to millisecond date-times.
///
/// Columns that already hold date-times are left as they are; plain dates
/// are widened to midnight.
pub fn coerce_dates(df: &DataFrame, columns: &[&str]) -> Result<DataFrame> {
    let mut out = df.clone();
    for name in columns.iter().copied() {
        if !has_column(df, name) {
            continue;
        }
        let column = df.column(name)?;
        match column.dtype() {
            DataType::Datetime(_, _) => continue,
            DataType::Date => {
                out.with_column(column.cast(&datetime_dtype())?)?;
            }
            _ => {
                let series = datetime_series(column, df.height())?;
                out.with_column(series)?;
            }
        }
    }
    Ok(out)
}

fn datetime_series(column: &Column, height: usize) -> Result<Series> {
    let mut millis: Vec<Option<i64>> = Vec::with_capacity(height);
    let mut degraded = 0usize;
    for idx in 0..height {
        let value = column.get(idx).unwrap_or(AnyValue::Null);
        if matches!(value, AnyValue::Null) {
            millis.push(None);
            continue;
        }
        let parsed = parse_datetime(&any_to_string(value)).map(to_epoch_millis);
        if parsed.is_none() {
            degraded += 1;
        }
        millis.push(parsed);
    }
    if degraded > 0 {
        debug!(
            column = %column.name(),
            degraded,
            "unparsable date values set to null"
        );
    }
    let series = Series::new(column.name().clone(), millis).cast(&datetime_dtype())?;
    Ok(series)
}
