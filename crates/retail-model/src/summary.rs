use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Shape of one persisted table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSummary {
    pub name: String,
    pub rows: usize,
    pub columns: usize,
}

/// Everything the operator sees once a run completes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunSummary {
    pub database: PathBuf,
    pub tables: Vec<TableSummary>,
}

impl RunSummary {
    pub fn total_rows(&self) -> usize {
        self.tables.iter().map(|table| table.rows).sum()
    }

    pub fn table(&self, name: &str) -> Option<&TableSummary> {
        self.tables.iter().find(|table| table.name == name)
    }
}
