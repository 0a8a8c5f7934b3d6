//! Heuristic key discovery.
//!
//! Keys are picked from fixed, priority-ordered candidate lists: the first
//! candidate present in the table wins.

use polars::prelude::DataFrame;

use retail_model::entity::{MIN_COMPOSITE_KEY_COLUMNS, ORDER_ITEM_COMPOSITE_CANDIDATES};
use retail_model::{Entity, EntityKey};

pub fn has_column(df: &DataFrame, name: &str) -> bool {
    df.get_column_index(name).is_some()
}

/// First candidate column present in `df`.
pub fn discover_key(df: &DataFrame, candidates: &[&str]) -> Option<String> {
    candidates
        .iter()
        .find(|name| has_column(df, name))
        .map(|name| (*name).to_string())
}

/// Deduplication key for an entity.
///
/// Order items without a surrogate key fall back to a composite of
/// `order_id`, `product_id` and `line_number`, but only when at least two of
/// them exist; a one-column composite counts as no key.
pub fn discover_entity_key(entity: Entity, df: &DataFrame) -> Option<EntityKey> {
    if let Some(column) = discover_key(df, entity.key_candidates()) {
        return Some(EntityKey::Single(column));
    }
    if entity != Entity::OrderItems {
        return None;
    }
    let present: Vec<String> = ORDER_ITEM_COMPOSITE_CANDIDATES
        .iter()
        .filter(|name| has_column(df, name))
        .map(|name| (*name).to_string())
        .collect();
    if present.len() >= MIN_COMPOSITE_KEY_COLUMNS {
        Some(EntityKey::Composite(present))
    } else {
        None
    }
}
