//! Error types for extract ingestion.

use std::path::PathBuf;

use retail_model::Entity;
use thiserror::Error;

/// Errors that can occur while reading extracts.
#[derive(Debug, Error)]
pub enum IngestError {
    /// A configured extract does not exist. Fatal for the run.
    #[error("missing source for {entity}: {path}")]
    MissingSource { entity: Entity, path: PathBuf },

    /// CSV file not found.
    #[error("CSV file not found: {path}")]
    FileNotFound { path: PathBuf },

    /// Failed to read file metadata or contents.
    #[error("failed to read file {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to parse CSV with Polars.
    #[error("failed to parse CSV {path}: {message}")]
    CsvParse { path: PathBuf, message: String },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for IngestError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

/// Result type for ingestion operations.
pub type Result<T> = std::result::Result<T, IngestError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = IngestError::MissingSource {
            entity: Entity::OrderItems,
            path: PathBuf::from("/data/order_items.csv"),
        };
        assert_eq!(
            err.to_string(),
            "missing source for order_items: /data/order_items.csv"
        );
    }

    #[test]
    fn test_error_from_polars() {
        let polars_err = polars::prelude::PolarsError::ColumnNotFound("test".into());
        let ingest_err: IngestError = polars_err.into();
        assert!(matches!(ingest_err, IngestError::DataFrame { .. }));
    }
}
