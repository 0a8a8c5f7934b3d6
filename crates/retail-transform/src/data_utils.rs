//! Cell access helpers shared by dedupe and the joins.

use polars::prelude::{AnyValue, Column, DataFrame};
use retail_ingest::any_to_string;

use crate::error::Result;

/// Comparable rendering of one cell. Null is distinct from every string,
/// including the empty one. Negative zero renders as zero.
pub fn cell_key(column: &Column, idx: usize) -> Option<String> {
    match column.get(idx).unwrap_or(AnyValue::Null) {
        AnyValue::Null => None,
        AnyValue::Float64(v) if v == 0.0 => Some(any_to_string(AnyValue::Float64(0.0))),
        AnyValue::Float32(v) if v == 0.0 => Some(any_to_string(AnyValue::Float32(0.0))),
        value => Some(any_to_string(value)),
    }
}

/// Comparable renderings of every cell in a column.
pub fn column_keys(df: &DataFrame, name: &str) -> Result<Vec<Option<String>>> {
    let column = df.column(name)?;
    Ok((0..df.height()).map(|idx| cell_key(column, idx)).collect())
}

/// Comparable renderings of each row across several columns.
pub fn row_keys(df: &DataFrame, names: &[&str]) -> Result<Vec<Vec<Option<String>>>> {
    let columns = names
        .iter()
        .map(|name| df.column(name))
        .collect::<std::result::Result<Vec<_>, _>>()?;
    Ok((0..df.height())
        .map(|idx| columns.iter().map(|column| cell_key(column, idx)).collect())
        .collect())
}

/// Column names as owned strings, in frame order.
pub fn column_names(df: &DataFrame) -> Vec<String> {
    df.get_column_names()
        .into_iter()
        .map(|name| name.to_string())
        .collect()
}
