//! CSV file reading into Polars.

use std::path::Path;

use polars::prelude::{CsvReadOptions, DataFrame, SerReader};

use crate::error::{IngestError, Result};

/// Check that a source path exists without opening it.
pub fn ensure_source_exists(path: &Path) -> Result<()> {
    match std::fs::metadata(path) {
        Ok(_) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        }),
        Err(e) => Err(IngestError::FileRead {
            path: path.to_path_buf(),
            source: e,
        }),
    }
}

/// Reads a CSV file into a Polars DataFrame.
///
/// The first row holds the column names, which are kept exactly as written;
/// normalization happens in the transform stage. Column types are inferred
/// from the whole file so a late malformed value degrades the column to text
/// instead of failing the read.
pub fn read_csv_table(path: &Path) -> Result<DataFrame> {
    ensure_source_exists(path)?;

    let df = CsvReadOptions::default()
        .with_has_header(true)
        .with_infer_schema_length(None)
        .try_into_reader_with_file_path(Some(path.to_path_buf()))
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?
        .finish()
        .map_err(|e| IngestError::CsvParse {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    tracing::debug!(
        path = %path.display(),
        rows = df.height(),
        columns = df.width(),
        "read csv"
    );
    Ok(df)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn create_temp_csv(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        write!(file, "{}", content).unwrap();
        file
    }

    #[test]
    fn test_read_csv_table_keeps_raw_headers() {
        let file = create_temp_csv("Order ID,Unit Price\n1,9.99\n2,5\n");
        let df = read_csv_table(file.path()).unwrap();

        let names: Vec<String> = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        assert_eq!(names, vec!["Order ID", "Unit Price"]);
        assert_eq!(df.height(), 2);
    }

    #[test]
    fn test_read_csv_table_keeps_whitespace_in_cells() {
        let file = create_temp_csv("id,name\n1, Al \n");
        let df = read_csv_table(file.path()).unwrap();

        let names = df.column("name").unwrap().str().unwrap();
        assert_eq!(names.get(0), Some(" Al "));
    }

    #[test]
    fn test_missing_file() {
        let result = read_csv_table(Path::new("/no/such/extract.csv"));
        assert!(matches!(result, Err(IngestError::FileNotFound { .. })));
    }
}
