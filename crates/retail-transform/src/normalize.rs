//! Column name canonicalization and text trimming.

use std::collections::HashSet;

use polars::prelude::{DataFrame, DataType, NamedFrom, Series};

use crate::data_utils::column_names;
use crate::error::Result;

/// Canonical form of a raw column header.
///
/// Trims whitespace and lower-cases, then turns every run of non-word
/// characters into a single underscore and strips leading and trailing
/// underscores. Lower-casing comes first because it can produce combining
/// marks. A header with no word characters becomes the empty string.
///
/// ```
/// use retail_transform::normalize_column_name;
///
/// assert_eq!(normalize_column_name(" Order ID "), "order_id");
/// assert_eq!(normalize_column_name("Unit-Price ($)"), "unit_price");
/// assert_eq!(normalize_column_name("__sub__category__"), "sub_category");
/// assert_eq!(normalize_column_name("%%%"), "");
/// ```
pub fn normalize_column_name(raw: &str) -> String {
    let lowered = raw.trim().to_lowercase();
    let mut collapsed = String::with_capacity(lowered.len());
    for ch in lowered.chars() {
        let ch = if is_word_char(ch) { ch } else { '_' };
        if ch == '_' && collapsed.ends_with('_') {
            continue;
        }
        collapsed.push(ch);
    }
    collapsed.trim_matches('_').to_string()
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// Make normalized names unique, keeping the first occurrence unchanged.
///
/// Later duplicates get `_2`, `_3`, ... appended; a duplicate empty name
/// becomes `column_<position>`.
fn unique_names(names: Vec<String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::with_capacity(names.len());
    let mut out = Vec::with_capacity(names.len());
    for (idx, name) in names.into_iter().enumerate() {
        let base = if seen.contains(&name) && name.is_empty() {
            format!("column_{}", idx + 1)
        } else {
            name
        };
        let mut candidate = base.clone();
        let mut suffix = 2usize;
        while seen.contains(&candidate) {
            candidate = format!("{base}_{suffix}");
            suffix += 1;
        }
        seen.insert(candidate.clone());
        out.push(candidate);
    }
    out
}

/// Rename every column to its canonical, unique form.
pub fn normalize_columns(df: &DataFrame) -> Result<DataFrame> {
    let names = unique_names(
        column_names(df)
            .iter()
            .map(|name| normalize_column_name(name))
            .collect(),
    );
    let mut out = df.clone();
    out.set_column_names(names)?;
    Ok(out)
}

/// Trim leading and trailing whitespace from every text cell.
///
/// Non-text columns are returned untouched.
pub fn trim_strings(df: &DataFrame) -> Result<DataFrame> {
    let mut out = df.clone();
    for column in df.get_columns() {
        if column.dtype() != &DataType::String {
            continue;
        }
        let values: Vec<Option<String>> = column
            .str()?
            .into_iter()
            .map(|value| value.map(|s| s.trim().to_string()))
            .collect();
        out.with_column(Series::new(column.name().clone(), values))?;
    }
    Ok(out)
}

/// Canonical column names plus trimmed text.
pub fn normalize(df: &DataFrame) -> Result<DataFrame> {
    trim_strings(&normalize_columns(df)?)
}
