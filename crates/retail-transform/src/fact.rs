//! Denormalized order-item fact table.
//!
//! Order items are left-joined to their order, the order's customer, and
//! the item's product. Joins match on the textual rendering of the key
//! cells, so an integer key joins a text key with the same digits. Null
//! keys never match.

use std::collections::{HashMap, HashSet};

use polars::prelude::{Column, DataFrame, IdxCa, IdxSize, NewChunkedArray, Series};
use tracing::{debug, info};

use retail_model::Entity;

use crate::data_utils::{column_keys, column_names};
use crate::derive::{add_date_parts, derive_line_total};
use crate::error::Result;
use crate::keys::{discover_key, has_column};

/// Columns kept in the fact table when present, in output order.
const RETAINED_COLUMNS: &[&str] = &[
    "order_id",
    "customer_id",
    "product_id",
    "order_item_id",
    "order_date",
    "quantity",
    "unit_price",
    "line_total",
    "total_amount",
    "status",
    "state",
    "city",
    "category",
    "sub_category",
    "brand",
    "name",
];

const ORDER_DATE: &str = "order_date";

/// The four cleaned entity tables the fact table is built from.
#[derive(Debug, Clone, Copy)]
pub struct FactInputs<'a> {
    pub customers: &'a DataFrame,
    pub products: &'a DataFrame,
    pub orders: &'a DataFrame,
    pub order_items: &'a DataFrame,
}

/// A reference column on the fact side paired with a dimension's key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinKey {
    pub left: String,
    pub right: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JoinPlan {
    pub order: JoinKey,
    pub customer: JoinKey,
    pub product: JoinKey,
}

fn join_key(left: &DataFrame, left_name: &str, dimension: Entity, right: &DataFrame) -> Option<JoinKey> {
    let reference = dimension.reference_column()?;
    if !has_column(left, reference) {
        info!(
            table = left_name,
            column = reference,
            "reference column missing, fact table skipped"
        );
        return None;
    }
    let Some(key) = discover_key(right, dimension.key_candidates()) else {
        info!(table = %dimension, "no key found, fact table skipped");
        return None;
    };
    Some(JoinKey {
        left: reference.to_string(),
        right: key,
    })
}

/// Discover all three join keys, or `None` if any side of any join is missing.
pub fn plan_joins(inputs: &FactInputs<'_>) -> Option<JoinPlan> {
    let items = Entity::OrderItems.table_name();
    let orders = Entity::Orders.table_name();
    Some(JoinPlan {
        order: join_key(inputs.order_items, items, Entity::Orders, inputs.orders)?,
        customer: join_key(inputs.orders, orders, Entity::Customers, inputs.customers)?,
        product: join_key(inputs.order_items, items, Entity::Products, inputs.products)?,
    })
}

/// Left join `right` onto `left`.
///
/// Every left row is kept, repeated once per matching right row. The right
/// key column is dropped; other right columns whose names are already taken
/// get `suffix` appended.
pub fn left_join(left: &DataFrame, right: &DataFrame, key: &JoinKey, suffix: &str) -> Result<DataFrame> {
    let mut index: HashMap<String, Vec<IdxSize>> = HashMap::new();
    for (row, value) in column_keys(right, &key.right)?.into_iter().enumerate() {
        if let Some(value) = value {
            index.entry(value).or_default().push(row as IdxSize);
        }
    }

    let mut left_rows: Vec<IdxSize> = Vec::with_capacity(left.height());
    let mut right_rows: Vec<Option<IdxSize>> = Vec::with_capacity(left.height());
    for (row, value) in column_keys(left, &key.left)?.into_iter().enumerate() {
        match value.as_ref().and_then(|value| index.get(value)) {
            Some(matches) => {
                for matched in matches {
                    left_rows.push(row as IdxSize);
                    right_rows.push(Some(*matched));
                }
            }
            None => {
                left_rows.push(row as IdxSize);
                right_rows.push(None);
            }
        }
    }
    debug!(
        left = left.height(),
        right = right.height(),
        matched = right_rows.iter().filter(|row| row.is_some()).count(),
        "left join"
    );

    let left_taken = left.take(&IdxCa::from_vec("left".into(), left_rows))?;
    let dimension = right.drop(&key.right)?;
    let mut right_taken = if dimension.height() == 0 {
        let columns: Vec<Column> = dimension
            .get_columns()
            .iter()
            .map(|column| {
                Series::full_null(column.name().clone(), left_taken.height(), column.dtype()).into()
            })
            .collect();
        DataFrame::new(columns)?
    } else {
        dimension.take(&IdxCa::from_iter_options("right".into(), right_rows.into_iter()))?
    };

    let mut taken: HashSet<String> = column_names(&left_taken).into_iter().collect();
    let mut renamed = Vec::with_capacity(right_taken.width());
    for name in column_names(&right_taken) {
        let mut candidate = name.clone();
        if taken.contains(&candidate) {
            candidate = format!("{name}{suffix}");
            let mut n = 2usize;
            while taken.contains(&candidate) {
                candidate = format!("{name}{suffix}_{n}");
                n += 1;
            }
        }
        taken.insert(candidate.clone());
        renamed.push(candidate);
    }
    right_taken.set_column_names(renamed)?;

    Ok(left_taken.hstack(right_taken.get_columns())?)
}

fn prune(df: &DataFrame) -> Result<DataFrame> {
    let keep: Vec<&str> = RETAINED_COLUMNS
        .iter()
        .copied()
        .filter(|name| has_column(df, name))
        .collect();
    Ok(df.select(keep)?)
}

/// Build the fact table, or `None` when the join keys cannot be discovered.
pub fn build_fact_table(inputs: &FactInputs<'_>) -> Result<Option<DataFrame>> {
    let Some(plan) = plan_joins(inputs) else {
        return Ok(None);
    };
    debug!(?plan, "fact joins planned");

    let fact = left_join(inputs.order_items, inputs.orders, &plan.order, "_order")?;
    let fact = left_join(&fact, inputs.customers, &plan.customer, "_customer")?;
    let fact = left_join(&fact, inputs.products, &plan.product, "_product")?;
    let fact = prune(&fact)?;
    let fact = derive_line_total(&fact)?;
    let fact = add_date_parts(&fact, ORDER_DATE, "order")?;
    Ok(Some(fact))
}
