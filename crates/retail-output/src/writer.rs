//! Table writer seam and its SQLite implementation.

use std::fs;
use std::path::Path;

use polars::prelude::{AnyValue, DataFrame};
use rusqlite::types::Value;
use rusqlite::{Connection, params_from_iter};
use tracing::{debug, info, warn};

use retail_model::IfExists;

use crate::error::{OutputError, Result};
use crate::sql::{quote_ident, sql_type, sql_value};

/// Persists tables and builds indexes on them.
pub trait TableWriter {
    /// Replace any table called `name` with the contents of `df`.
    /// Returns the number of rows written.
    fn write_table(&mut self, name: &str, df: &DataFrame) -> Result<usize>;

    /// Replace any index called `index` with one on `columns` of `table`.
    fn create_index(&mut self, table: &str, index: &str, columns: &[&str]) -> Result<()>;
}

/// Writes tables into a single SQLite database.
pub struct SqliteWriter {
    conn: Connection,
}

impl SqliteWriter {
    /// Open the store at `path`, applying the existing-file policy first.
    pub fn open(path: &Path, if_exists: IfExists) -> Result<Self> {
        prepare_target(path, if_exists)?;
        let conn = Connection::open(path)?;
        Ok(Self { conn })
    }

    pub fn open_in_memory() -> Result<Self> {
        Ok(Self {
            conn: Connection::open_in_memory()?,
        })
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

fn prepare_target(path: &Path, if_exists: IfExists) -> Result<()> {
    let io_err = |source| OutputError::Io {
        path: path.to_path_buf(),
        source,
    };
    if path.exists() {
        match if_exists {
            IfExists::Fail => {
                return Err(OutputError::DatabaseExists {
                    path: path.to_path_buf(),
                });
            }
            IfExists::Replace => {
                info!(path = %path.display(), "replacing existing database");
                fs::remove_file(path).map_err(io_err)?;
            }
        }
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    Ok(())
}

impl TableWriter for SqliteWriter {
    fn write_table(&mut self, name: &str, df: &DataFrame) -> Result<usize> {
        if df.width() == 0 {
            warn!(table = name, "table has no columns, not written");
            return Ok(0);
        }
        let table = quote_ident(name);
        let columns = df.get_columns();
        let definitions: Vec<String> = columns
            .iter()
            .map(|column| format!("{} {}", quote_ident(column.name()), sql_type(column.dtype())))
            .collect();
        let names: Vec<String> = columns.iter().map(|column| quote_ident(column.name())).collect();
        let placeholders: Vec<String> = (1..=columns.len()).map(|idx| format!("?{idx}")).collect();

        let tx = self.conn.transaction()?;
        tx.execute_batch(&format!(
            "DROP TABLE IF EXISTS {table};\nCREATE TABLE {table} ({});",
            definitions.join(", ")
        ))?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO {table} ({}) VALUES ({})",
                names.join(", "),
                placeholders.join(", ")
            ))?;
            for idx in 0..df.height() {
                let row: Vec<Value> = columns
                    .iter()
                    .map(|column| sql_value(column.get(idx).unwrap_or(AnyValue::Null)))
                    .collect();
                stmt.execute(params_from_iter(row.iter()))?;
            }
        }
        tx.commit()?;
        debug!(table = name, rows = df.height(), "table written");
        Ok(df.height())
    }

    fn create_index(&mut self, table: &str, index: &str, columns: &[&str]) -> Result<()> {
        let index_name = quote_ident(index);
        let column_list: Vec<String> = columns.iter().map(|name| quote_ident(name)).collect();
        self.conn.execute_batch(&format!(
            "DROP INDEX IF EXISTS {index_name};\nCREATE INDEX {index_name} ON {} ({});",
            quote_ident(table),
            column_list.join(", ")
        ))?;
        debug!(table, index, "index created");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use polars::prelude::{NamedFrom, Series};

    fn orders() -> DataFrame {
        DataFrame::new(vec![
            Series::new("order_id".into(), [Some(1i64), Some(2), None]).into(),
            Series::new("total_amount".into(), [Some(9.5f64), None, Some(1.0)]).into(),
            Series::new("status".into(), ["new", "shipped", "lost"]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn writes_and_replaces_tables() {
        let mut writer = SqliteWriter::open_in_memory().unwrap();
        assert_eq!(writer.write_table("orders", &orders()).unwrap(), 3);
        assert_eq!(writer.write_table("orders", &orders().slice(0, 1)).unwrap(), 1);
        let count: i64 = writer
            .connection()
            .query_row("SELECT COUNT(*) FROM orders", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn declares_column_types() {
        let mut writer = SqliteWriter::open_in_memory().unwrap();
        writer.write_table("orders", &orders()).unwrap();
        let mut stmt = writer
            .connection()
            .prepare("SELECT name, type FROM pragma_table_info('orders') ORDER BY cid")
            .unwrap();
        let columns: Vec<(String, String)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?)))
            .unwrap()
            .collect::<std::result::Result<_, _>>()
            .unwrap();
        assert_eq!(
            columns,
            vec![
                ("order_id".to_string(), "INTEGER".to_string()),
                ("total_amount".to_string(), "REAL".to_string()),
                ("status".to_string(), "TEXT".to_string()),
            ]
        );
    }

    #[test]
    fn nulls_survive() {
        let mut writer = SqliteWriter::open_in_memory().unwrap();
        writer.write_table("orders", &orders()).unwrap();
        let nulls: i64 = writer
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM orders WHERE order_id IS NULL",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(nulls, 1);
    }

    #[test]
    fn index_can_be_rebuilt() {
        let mut writer = SqliteWriter::open_in_memory().unwrap();
        writer.write_table("orders", &orders()).unwrap();
        writer.create_index("orders", "idx_orders_order_id", &["order_id"]).unwrap();
        writer.create_index("orders", "idx_orders_order_id", &["order_id"]).unwrap();
        let count: i64 = writer
            .connection()
            .query_row(
                "SELECT COUNT(*) FROM sqlite_master WHERE type = 'index' AND name = 'idx_orders_order_id'",
                [],
                |row| row.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
