//! CSV reading utilities.

mod reader;

pub use reader::{ensure_source_exists, read_csv_table};
