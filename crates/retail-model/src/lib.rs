pub mod config;
pub mod entity;
pub mod error;
pub mod key;
pub mod summary;

pub use config::{EtlConfig, IfExists, SourcePaths, load_config};
pub use entity::{CoercionPlan, Entity, FACT_TABLE};
pub use error::{ConfigError, Result};
pub use key::EntityKey;
pub use summary::{RunSummary, TableSummary};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entity_table_names_are_distinct() {
        let mut names: Vec<&str> = Entity::ALL.iter().map(|e| e.table_name()).collect();
        names.push(FACT_TABLE);
        let count = names.len();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), count);
    }

    #[test]
    fn summary_serializes() {
        let summary = RunSummary {
            database: "retail.db".into(),
            tables: vec![TableSummary {
                name: "orders".to_string(),
                rows: 3,
                columns: 5,
            }],
        };
        let json = serde_json::to_string(&summary).expect("serialize summary");
        let round: RunSummary = serde_json::from_str(&json).expect("deserialize summary");
        assert_eq!(round.tables[0].name, "orders");
        assert_eq!(round.total_rows(), 3);
    }
}
