//! Entity frame: a cleaned table tagged with the entity it belongs to.

use polars::prelude::DataFrame;

use retail_model::{Entity, EntityKey};

/// A cleaned entity table plus the key it was deduplicated on.
#[derive(Debug, Clone)]
pub struct EntityFrame {
    pub entity: Entity,
    pub data: DataFrame,
    /// `None` when no key was found and whole-row deduplication was used.
    pub key: Option<EntityKey>,
}

impl EntityFrame {
    pub fn new(entity: Entity, data: DataFrame) -> Self {
        Self {
            entity,
            data,
            key: None,
        }
    }

    pub fn with_key(mut self, key: Option<EntityKey>) -> Self {
        self.key = key;
        self
    }

    /// Store table name.
    pub fn table_name(&self) -> &'static str {
        self.entity.table_name()
    }

    pub fn record_count(&self) -> usize {
        self.data.height()
    }
}
