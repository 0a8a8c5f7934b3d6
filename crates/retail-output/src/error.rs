//! Error types for the load stage.

use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum OutputError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// The store exists and the run was told not to touch it.
    #[error("database already exists: {}", path.display())]
    DatabaseExists { path: PathBuf },

    #[error("failed to prepare {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for OutputError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, OutputError>;
