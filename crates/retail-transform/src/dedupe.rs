//! First-seen-wins deduplication on a key or on whole rows.

use std::collections::HashSet;

use polars::prelude::{BooleanChunked, DataFrame, NewChunkedArray};
use tracing::{debug, info};

use retail_model::EntityKey;

use crate::data_utils::{column_names, row_keys};
use crate::error::Result;
use crate::keys::has_column;

/// Keep the first row for each distinct key value, preserving order.
///
/// Without a key, or when a key column is missing from the table, rows are
/// compared on every column. Null key cells compare equal to each other.
pub fn dedupe(df: &DataFrame, key: Option<&EntityKey>) -> Result<DataFrame> {
    if df.height() == 0 {
        return Ok(df.clone());
    }
    let key_columns: Vec<String> = match key {
        Some(key) if key.columns().iter().all(|name| has_column(df, name)) => {
            key.columns().iter().map(|name| (*name).to_string()).collect()
        }
        Some(key) => {
            info!(%key, "key column missing, deduplicating on whole rows");
            column_names(df)
        }
        None => column_names(df),
    };
    let names: Vec<&str> = key_columns.iter().map(String::as_str).collect();
    let rows = row_keys(df, &names)?;

    let mut seen = HashSet::with_capacity(rows.len());
    let keep: Vec<bool> = rows.into_iter().map(|row| seen.insert(row)).collect();
    let dropped = keep.iter().filter(|kept| !**kept).count();
    if dropped == 0 {
        return Ok(df.clone());
    }
    debug!(dropped, columns = names.len(), "duplicate rows removed");
    let mask = BooleanChunked::from_slice("keep".into(), &keep);
    Ok(df.filter(&mask)?)
}
