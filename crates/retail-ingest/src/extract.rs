//! Extract stage: check every source, then read every source.

use std::collections::BTreeMap;
use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use retail_model::{Entity, SourcePaths};

use crate::csv::{ensure_source_exists, read_csv_table};
use crate::error::{IngestError, Result};

/// Raw extracts keyed by entity, exactly as read.
pub type RawTables = BTreeMap<Entity, DataFrame>;

/// Verify that every configured extract exists.
///
/// Reports the first missing entity in extract order.
pub fn check_sources(sources: &SourcePaths) -> Result<()> {
    for (entity, path) in sources.iter() {
        match ensure_source_exists(path) {
            Ok(()) => {}
            Err(IngestError::FileNotFound { path }) => {
                return Err(IngestError::MissingSource { entity, path });
            }
            Err(other) => return Err(other),
        }
    }
    Ok(())
}

/// Read all four extracts.
///
/// Nothing is parsed until every source has been found on disk.
pub fn extract(sources: &SourcePaths) -> Result<RawTables> {
    check_sources(sources)?;
    let mut tables = RawTables::new();
    for (entity, path) in sources.iter() {
        let span = info_span!("extract_entity", entity = %entity, path = %path.display());
        let _guard = span.enter();
        let start = Instant::now();
        let df = read_csv_table(path)?;
        info!(
            rows = df.height(),
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "extracted"
        );
        tables.insert(entity, df);
    }
    Ok(tables)
}
