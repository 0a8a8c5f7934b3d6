//! Retail extract ingestion.
//!
//! Reads the four configured CSV extracts into Polars DataFrames. Every
//! source path is checked before any file is parsed, so a missing extract
//! aborts the run before any work is done.

pub mod csv;
mod error;
pub mod extract;
pub mod polars_utils;

pub use csv::read_csv_table;
pub use error::{IngestError, Result};
pub use extract::{RawTables, check_sources, extract};
pub use polars_utils::{any_to_f64, any_to_i64, any_to_string, format_numeric, parse_f64, parse_i64};
