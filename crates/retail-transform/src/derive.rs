//! Derived columns: line totals and calendar parts of a date column.

use chrono::Datelike;
use polars::prelude::{AnyValue, DataFrame, DataType, NamedFrom, Series};

use retail_ingest::any_to_f64;

use crate::datetime::from_epoch;
use crate::error::Result;
use crate::keys::has_column;

pub const LINE_TOTAL: &str = "line_total";
pub const QUANTITY: &str = "quantity";
pub const UNIT_PRICE: &str = "unit_price";

/// Add `line_total = quantity * unit_price` when the table lacks one.
///
/// A row gets a total only when both factors are numeric; otherwise its
/// total is null. Tables that already carry `line_total`, or lack either
/// factor, come back unchanged.
pub fn derive_line_total(df: &DataFrame) -> Result<DataFrame> {
    if has_column(df, LINE_TOTAL) || !has_column(df, QUANTITY) || !has_column(df, UNIT_PRICE) {
        return Ok(df.clone());
    }
    let quantity = df.column(QUANTITY)?;
    let unit_price = df.column(UNIT_PRICE)?;
    let totals: Vec<Option<f64>> = (0..df.height())
        .map(|idx| {
            let q = any_to_f64(quantity.get(idx).unwrap_or(AnyValue::Null))?;
            let p = any_to_f64(unit_price.get(idx).unwrap_or(AnyValue::Null))?;
            Some(q * p)
        })
        .collect();
    let mut out = df.clone();
    out.with_column(Series::new(LINE_TOTAL.into(), totals))?;
    Ok(out)
}

/// Add Int32 `<prefix>_year`, `<prefix>_month` and `<prefix>_day` columns
/// taken from a date-time column.
///
/// Nothing is added unless `column` exists and holds date-times.
pub fn add_date_parts(df: &DataFrame, column: &str, prefix: &str) -> Result<DataFrame> {
    if !has_column(df, column) {
        return Ok(df.clone());
    }
    let source = df.column(column)?;
    let DataType::Datetime(unit, _) = source.dtype() else {
        return Ok(df.clone());
    };
    let unit = *unit;
    let physical = source.cast(&DataType::Int64)?;
    let mut years: Vec<Option<i32>> = Vec::with_capacity(df.height());
    let mut months: Vec<Option<i32>> = Vec::with_capacity(df.height());
    let mut days: Vec<Option<i32>> = Vec::with_capacity(df.height());
    for value in physical.i64()? {
        let dt = value.and_then(|v| from_epoch(v, unit));
        years.push(dt.map(|dt| dt.year()));
        months.push(dt.map(|dt| dt.month() as i32));
        days.push(dt.map(|dt| dt.day() as i32));
    }

    let mut out = df.clone();
    out.with_column(Series::new(format!("{prefix}_year").into(), years))?;
    out.with_column(Series::new(format!("{prefix}_month").into(), months))?;
    out.with_column(Series::new(format!("{prefix}_day").into(), days))?;
    Ok(out)
}
