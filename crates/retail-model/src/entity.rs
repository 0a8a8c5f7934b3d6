//! The four retail entities and their fixed per-entity configuration.
//!
//! Key candidates and coercion plans are static tables: they are looked up,
//! never mutated, and live for the whole program.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name of the derived analytical table.
pub const FACT_TABLE: &str = "fact_order_items";

/// Columns that may form a composite order-item key, in priority order.
pub const ORDER_ITEM_COMPOSITE_CANDIDATES: &[&str] = &["order_id", "product_id", "line_number"];

/// Minimum number of composite candidates that must be present before a
/// composite order-item key is used.
pub const MIN_COMPOSITE_KEY_COLUMNS: usize = 2;

/// One of the input extracts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Entity {
    Customers,
    Products,
    Orders,
    OrderItems,
}

/// Columns converted to numeric and date-time semantics for one entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CoercionPlan {
    pub numeric: &'static [&'static str],
    pub dates: &'static [&'static str],
}

impl Entity {
    /// Every entity in extract and summary order.
    pub const ALL: [Entity; 4] = [
        Entity::Customers,
        Entity::Products,
        Entity::Orders,
        Entity::OrderItems,
    ];

    /// Table name used in the store and in logs.
    pub fn table_name(self) -> &'static str {
        match self {
            Entity::Customers => "customers",
            Entity::Products => "products",
            Entity::Orders => "orders",
            Entity::OrderItems => "order_items",
        }
    }

    /// Default extract file name inside a data directory.
    pub fn file_name(self) -> &'static str {
        match self {
            Entity::Customers => "customers.csv",
            Entity::Products => "products.csv",
            Entity::Orders => "orders.csv",
            Entity::OrderItems => "order_items.csv",
        }
    }

    /// Single-column key candidates, highest priority first.
    pub fn key_candidates(self) -> &'static [&'static str] {
        match self {
            Entity::Customers => &["customer_id", "id"],
            Entity::Products => &["product_id", "id"],
            Entity::Orders => &["order_id", "id"],
            Entity::OrderItems => &["order_item_id", "id"],
        }
    }

    /// Column other entities use to reference this one.
    ///
    /// Order items are never referenced, so they have none.
    pub fn reference_column(self) -> Option<&'static str> {
        match self {
            Entity::Customers => Some("customer_id"),
            Entity::Products => Some("product_id"),
            Entity::Orders => Some("order_id"),
            Entity::OrderItems => None,
        }
    }

    pub fn coercion_plan(self) -> CoercionPlan {
        match self {
            Entity::Customers => CoercionPlan {
                numeric: &[],
                dates: &["created_at", "updated_at", "signup_date"],
            },
            Entity::Products => CoercionPlan {
                numeric: &["price", "cost", "msrp"],
                dates: &["created_at", "updated_at", "release_date"],
            },
            Entity::Orders => CoercionPlan {
                numeric: &[
                    "total_amount",
                    "subtotal",
                    "tax",
                    "shipping_cost",
                    "discount",
                ],
                dates: &[
                    "order_date",
                    "ship_date",
                    "delivery_date",
                    "created_at",
                    "updated_at",
                ],
            },
            Entity::OrderItems => CoercionPlan {
                numeric: &["quantity", "unit_price", "line_total", "discount"],
                dates: &["created_at", "updated_at"],
            },
        }
    }
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.table_name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn customers_have_no_numeric_candidates() {
        assert!(Entity::Customers.coercion_plan().numeric.is_empty());
    }

    #[test]
    fn key_candidates_fall_back_to_id() {
        for entity in Entity::ALL {
            assert_eq!(entity.key_candidates().last(), Some(&"id"));
        }
    }
}
