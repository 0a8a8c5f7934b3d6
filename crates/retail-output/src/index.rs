//! Secondary indexes built after the tables are written.

use retail_model::FACT_TABLE;

/// One single-column index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndexSpec {
    pub name: &'static str,
    pub column: &'static str,
}

const fn spec(name: &'static str, column: &'static str) -> IndexSpec {
    IndexSpec { name, column }
}

const ORDERS: &[IndexSpec] = &[
    spec("idx_orders_order_id", "order_id"),
    spec("idx_orders_customer_id", "customer_id"),
    spec("idx_orders_order_date", "order_date"),
];

const ORDER_ITEMS: &[IndexSpec] = &[
    spec("idx_order_items_order_id", "order_id"),
    spec("idx_order_items_product_id", "product_id"),
];

const FACT: &[IndexSpec] = &[
    spec("idx_fact_order_id", "order_id"),
    spec("idx_fact_customer_id", "customer_id"),
    spec("idx_fact_product_id", "product_id"),
    spec("idx_fact_year", "order_year"),
    spec("idx_fact_month", "order_month"),
];

/// Indexes wanted on a table. Tables not listed get none.
pub fn index_plan(table: &str) -> &'static [IndexSpec] {
    match table {
        "orders" => ORDERS,
        "order_items" => ORDER_ITEMS,
        FACT_TABLE => FACT,
        _ => &[],
    }
}
