//! Retail ETL output.
//!
//! Cleaned entity tables and the fact table are written to one SQLite
//! database through the [`TableWriter`] seam, then indexed.

mod error;
pub mod index;
pub mod load;
pub mod sql;
pub mod writer;

pub use error::{OutputError, Result};
pub use index::{IndexSpec, index_plan};
pub use load::load;
pub use writer::{SqliteWriter, TableWriter};
