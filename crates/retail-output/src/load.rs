//! Load stage: write every produced table, then index it.

use std::path::Path;
use std::time::Instant;

use tracing::{debug, info, info_span};

use retail_model::{RunSummary, TableSummary};
use retail_transform::{TransformOutput, has_column};

use crate::error::Result;
use crate::index::index_plan;
use crate::writer::TableWriter;

/// Persist the cleaned entities and the fact table, in summary order.
///
/// Indexes whose column is absent from the table are skipped.
pub fn load<W: TableWriter>(
    writer: &mut W,
    output: &TransformOutput,
    database: &Path,
) -> Result<RunSummary> {
    let mut tables = Vec::new();
    for (name, df) in output.tables() {
        let span = info_span!("load_table", table = name);
        let _guard = span.enter();
        let start = Instant::now();
        let rows = writer.write_table(name, df)?;
        for spec in index_plan(name) {
            if has_column(df, spec.column) {
                writer.create_index(name, spec.name, &[spec.column])?;
            } else {
                debug!(index = spec.name, column = spec.column, "column absent, index skipped");
            }
        }
        info!(
            rows,
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "loaded"
        );
        tables.push(TableSummary {
            name: name.to_string(),
            rows,
            columns: df.width(),
        });
    }
    Ok(RunSummary {
        database: database.to_path_buf(),
        tables,
    })
}
