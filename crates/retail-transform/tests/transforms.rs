use std::collections::HashSet;

use polars::prelude::{DataFrame, NamedFrom, Series};
use proptest::prelude::*;

use retail_ingest::RawTables;
use retail_model::{Entity, EntityKey, FACT_TABLE};
use retail_transform::{
    clean_entity, dedupe, derive_line_total, normalize_column_name, normalize_columns, transform,
};

fn frame(columns: Vec<Series>) -> DataFrame {
    DataFrame::new(columns.into_iter().map(Into::into).collect()).unwrap()
}

fn scenario_tables() -> RawTables {
    let mut raw = RawTables::new();
    raw.insert(
        Entity::Customers,
        frame(vec![
            Series::new("id".into(), [1i64]),
            Series::new("name".into(), [" Al "]),
        ]),
    );
    raw.insert(
        Entity::Products,
        frame(vec![
            Series::new("product_id".into(), [10i64]),
            Series::new("price".into(), ["9.99"]),
        ]),
    );
    raw.insert(
        Entity::Orders,
        frame(vec![
            Series::new("order_id".into(), [100i64]),
            Series::new("customer_id".into(), [1i64]),
            Series::new("order_date".into(), ["2024-01-05"]),
        ]),
    );
    raw.insert(
        Entity::OrderItems,
        frame(vec![
            Series::new("order_id".into(), [100i64]),
            Series::new("product_id".into(), [10i64]),
            Series::new("quantity".into(), ["2"]),
            Series::new("unit_price".into(), ["9.99"]),
        ]),
    );
    raw
}

#[test]
fn single_order_scenario() {
    let output = transform(&scenario_tables()).unwrap();
    let customers = output.get(Entity::Customers).unwrap();
    assert_eq!(customers.key, Some(EntityKey::single("id")));

    let fact = output.fact.as_ref().expect("fact table");
    assert_eq!(fact.height(), 1);
    let line_total = fact.column("line_total").unwrap().f64().unwrap().get(0);
    assert!((line_total.unwrap() - 19.98).abs() < 1e-9);
    assert_eq!(fact.column("order_year").unwrap().i32().unwrap().get(0), Some(2024));
    assert_eq!(fact.column("order_month").unwrap().i32().unwrap().get(0), Some(1));
    assert_eq!(fact.column("order_day").unwrap().i32().unwrap().get(0), Some(5));
    assert_eq!(fact.column("name").unwrap().str().unwrap().get(0), Some("Al"));
    assert!(fact.column("price").is_err());

    let names: Vec<&str> = output.tables().into_iter().map(|(name, _)| name).collect();
    assert_eq!(
        names,
        vec!["customers", "products", "orders", "order_items", FACT_TABLE]
    );
}

#[test]
fn order_items_gain_line_total() {
    let output = transform(&scenario_tables()).unwrap();
    let items = output.get(Entity::OrderItems).unwrap();
    let total = items.data.column("line_total").unwrap().f64().unwrap().get(0);
    assert_eq!(total, Some(2.0 * 9.99));
}

#[test]
fn no_product_key_means_no_fact() {
    let mut raw = scenario_tables();
    raw.insert(
        Entity::OrderItems,
        frame(vec![
            Series::new("order_id".into(), [100i64]),
            Series::new("sku".into(), ["A-1"]),
            Series::new("quantity".into(), ["2"]),
        ]),
    );
    let output = transform(&raw).unwrap();
    assert!(output.fact.is_none());
    assert_eq!(output.tables().len(), 4);
}

#[test]
fn duplicate_order_ids_keep_first() {
    let raw = frame(vec![
        Series::new("Order ID".into(), [1i64, 1, 2]),
        Series::new("Status".into(), ["first", "second", "other"]),
    ]);
    let orders = clean_entity(Entity::Orders, &raw).unwrap();
    assert_eq!(orders.record_count(), 2);
    let status = orders.data.column("status").unwrap().str().unwrap();
    assert_eq!(status.get(0), Some("first"));
    assert_eq!(status.get(1), Some("other"));
}

#[test]
fn order_items_with_only_order_id_dedupe_whole_rows() {
    let raw = frame(vec![
        Series::new("order_id".into(), [1i64, 1, 1]),
        Series::new("quantity".into(), ["1", "1", "2"]),
    ]);
    let items = clean_entity(Entity::OrderItems, &raw).unwrap();
    assert_eq!(items.key, None);
    assert_eq!(items.record_count(), 2);
}

#[test]
fn fact_rows_never_exceed_items() {
    let mut raw = scenario_tables();
    raw.insert(
        Entity::OrderItems,
        frame(vec![
            Series::new("order_id".into(), [100i64, 100, 999]),
            Series::new("product_id".into(), [10i64, 10, 10]),
            Series::new("line_number".into(), [1i64, 2, 1]),
            Series::new("quantity".into(), ["1", "3", "1"]),
            Series::new("unit_price".into(), ["9.99", "9.99", "9.99"]),
        ]),
    );
    let output = transform(&raw).unwrap();
    let items = output.get(Entity::OrderItems).unwrap();
    let fact = output.fact.as_ref().unwrap();
    assert_eq!(items.record_count(), 3);
    assert!(fact.height() <= items.record_count());
    assert_eq!(fact.column("customer_id").unwrap().null_count(), 1);
}

#[test]
fn normalized_headers_are_unique() {
    let raw = frame(vec![
        Series::new("Order ID".into(), [1i64]),
        Series::new("order-id".into(), [2i64]),
        Series::new("ORDER_ID".into(), [3i64]),
    ]);
    let out = normalize_columns(&raw).unwrap();
    let names: Vec<String> = out
        .get_column_names()
        .into_iter()
        .map(ToString::to_string)
        .collect();
    assert_eq!(names, vec!["order_id", "order_id_2", "order_id_3"]);
}

proptest! {
    #[test]
    fn column_names_are_idempotent(raw in "\\PC{0,32}") {
        let once = normalize_column_name(&raw);
        prop_assert_eq!(normalize_column_name(&once), once.clone());
    }

    #[test]
    fn dedupe_is_idempotent(rows in prop::collection::vec((prop::option::of(0i64..5), 0u8..3), 0..40)) {
        let ids: Vec<Option<i64>> = rows.iter().map(|(id, _)| *id).collect();
        let tags: Vec<String> = rows.iter().map(|(_, tag)| format!("t{tag}")).collect();
        let df = frame(vec![
            Series::new("order_id".into(), ids),
            Series::new("tag".into(), tags),
        ]);
        let key = EntityKey::single("order_id");
        let once = dedupe(&df, Some(&key)).unwrap();
        let twice = dedupe(&once, Some(&key)).unwrap();
        prop_assert!(once.equals_missing(&twice));

        let keys: Vec<Option<i64>> = once.column("order_id").unwrap().i64().unwrap().into_iter().collect();
        let distinct: HashSet<Option<i64>> = keys.iter().copied().collect();
        prop_assert_eq!(distinct.len(), keys.len());

        let whole_once = dedupe(&df, None).unwrap();
        let whole_twice = dedupe(&whole_once, None).unwrap();
        prop_assert_eq!(whole_once.height(), whole_twice.height());
    }

    #[test]
    fn line_total_is_quantity_times_price(
        rows in prop::collection::vec((prop::option::of(0i64..50), prop::option::of(0u32..100_000)), 0..30)
    ) {
        let quantity: Vec<Option<i64>> = rows.iter().map(|(q, _)| *q).collect();
        let unit_price: Vec<Option<f64>> = rows
            .iter()
            .map(|(_, cents)| cents.map(|c| f64::from(c) / 100.0))
            .collect();
        let df = frame(vec![
            Series::new("quantity".into(), quantity.clone()),
            Series::new("unit_price".into(), unit_price.clone()),
        ]);
        let out = derive_line_total(&df).unwrap();
        let totals: Vec<Option<f64>> = out.column("line_total").unwrap().f64().unwrap().into_iter().collect();
        for ((q, p), total) in quantity.iter().zip(&unit_price).zip(&totals) {
            match (q, p) {
                (Some(q), Some(p)) => {
                    let expected = *q as f64 * p;
                    prop_assert!((total.unwrap() - expected).abs() < 1e-9);
                }
                _ => prop_assert_eq!(*total, None),
            }
        }
    }

    #[test]
    fn fact_rows_bounded_by_items(
        rows in prop::collection::vec((90i64..110, 8i64..13, 1i64..4, 1i64..5), 1..30)
    ) {
        let mut raw = scenario_tables();
        raw.insert(
            Entity::OrderItems,
            frame(vec![
                Series::new("order_id".into(), rows.iter().map(|r| r.0).collect::<Vec<_>>()),
                Series::new("product_id".into(), rows.iter().map(|r| r.1).collect::<Vec<_>>()),
                Series::new("line_number".into(), rows.iter().map(|r| r.2).collect::<Vec<_>>()),
                Series::new("quantity".into(), rows.iter().map(|r| r.3).collect::<Vec<_>>()),
            ]),
        );
        let output = transform(&raw).unwrap();
        let items = output.get(Entity::OrderItems).unwrap();
        if let Some(fact) = output.fact.as_ref() {
            prop_assert!(fact.height() <= items.record_count());
        }
    }
}
