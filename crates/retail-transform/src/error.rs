//! Error type for the transform stage.
//!
//! Schema gaps and unparsable cells are not errors here; they degrade the
//! output instead. Only DataFrame failures surface.

use retail_model::Entity;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TransformError {
    /// An entity was not present in the extracted tables.
    #[error("no extracted table for {entity}")]
    MissingTable { entity: Entity },

    /// Failed DataFrame operation.
    #[error("DataFrame operation failed: {message}")]
    DataFrame { message: String },
}

impl From<polars::prelude::PolarsError> for TransformError {
    fn from(err: polars::prelude::PolarsError) -> Self {
        Self::DataFrame {
            message: err.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, TransformError>;
