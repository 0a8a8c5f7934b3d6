//! Tests for the extract stage.

use std::fs;
use std::path::Path;

use retail_ingest::{IngestError, check_sources, extract};
use retail_model::{Entity, EtlConfig};

fn write_sources(dir: &Path) {
    fs::write(dir.join("customers.csv"), "Customer ID,Name\n1,Al\n").unwrap();
    fs::write(dir.join("products.csv"), "product_id,price\n10,9.99\n").unwrap();
    fs::write(dir.join("orders.csv"), "order_id,customer_id\n100,1\n101,1\n").unwrap();
    fs::write(
        dir.join("order_items.csv"),
        "order_id,product_id,quantity\n100,10,2\n",
    )
    .unwrap();
}

#[test]
fn extracts_all_four_entities() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_sources(dir.path());
    let config = EtlConfig::from_data_dir(dir.path());

    let tables = extract(&config.sources).expect("extract");

    assert_eq!(tables.len(), 4);
    assert_eq!(tables[&Entity::Orders].height(), 2);
    assert_eq!(tables[&Entity::Customers].width(), 2);
}

#[test]
fn missing_source_names_the_entity() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_sources(dir.path());
    fs::remove_file(dir.path().join("order_items.csv")).unwrap();
    let config = EtlConfig::from_data_dir(dir.path());

    let err = extract(&config.sources).expect_err("missing order items");

    match err {
        IngestError::MissingSource { entity, path } => {
            assert_eq!(entity, Entity::OrderItems);
            assert_eq!(path, dir.path().join("order_items.csv"));
        }
        other => panic!("unexpected error: {other}"),
    }
}

#[test]
fn missing_source_is_detected_before_parsing() {
    let dir = tempfile::tempdir().expect("create temp dir");
    write_sources(dir.path());
    // A malformed early file must not mask a missing later one.
    fs::write(dir.path().join("customers.csv"), "").unwrap();
    fs::remove_file(dir.path().join("orders.csv")).unwrap();
    let config = EtlConfig::from_data_dir(dir.path());

    let err = check_sources(&config.sources).expect_err("missing orders");

    assert!(matches!(
        err,
        IngestError::MissingSource {
            entity: Entity::Orders,
            ..
        }
    ));
    assert!(matches!(
        extract(&config.sources),
        Err(IngestError::MissingSource { .. })
    ));
}
