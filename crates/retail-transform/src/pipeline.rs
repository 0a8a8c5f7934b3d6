//! Per-run transform over all four entities.
//!
//! 1. **Clean**: normalize, coerce, and deduplicate each entity
//! 2. **Derive**: add `line_total` to order items when missing
//! 3. **Fact**: join the cleaned entities into the fact table

use std::time::Instant;

use polars::prelude::DataFrame;
use tracing::{info, info_span};

use retail_ingest::RawTables;
use retail_model::{Entity, FACT_TABLE};

use crate::coerce::{coerce_dates, coerce_numeric};
use crate::dedupe::dedupe;
use crate::derive::derive_line_total;
use crate::error::{Result, TransformError};
use crate::fact::{FactInputs, build_fact_table};
use crate::frame::EntityFrame;
use crate::keys::discover_entity_key;
use crate::normalize::normalize;

/// Cleaned entities plus the fact table, if one could be built.
#[derive(Debug, Clone)]
pub struct TransformOutput {
    /// One frame per entity, in [`Entity::ALL`] order.
    pub entities: Vec<EntityFrame>,
    pub fact: Option<DataFrame>,
}

impl TransformOutput {
    pub fn get(&self, entity: Entity) -> Option<&EntityFrame> {
        self.entities.iter().find(|frame| frame.entity == entity)
    }

    /// Every produced table with its store name, in write order.
    pub fn tables(&self) -> Vec<(&str, &DataFrame)> {
        let mut tables: Vec<(&str, &DataFrame)> = self
            .entities
            .iter()
            .map(|frame| (frame.table_name(), &frame.data))
            .collect();
        if let Some(fact) = &self.fact {
            tables.push((FACT_TABLE, fact));
        }
        tables
    }
}

/// Clean one raw extract.
pub fn clean_entity(entity: Entity, raw: &DataFrame) -> Result<EntityFrame> {
    let plan = entity.coercion_plan();
    let df = normalize(raw)?;
    let df = coerce_numeric(&df, plan.numeric)?;
    let df = coerce_dates(&df, plan.dates)?;
    let key = discover_entity_key(entity, &df);
    if key.is_none() {
        info!(entity = %entity, "no key found, deduplicating on whole rows");
    }
    let mut df = dedupe(&df, key.as_ref())?;
    if entity == Entity::OrderItems {
        df = derive_line_total(&df)?;
    }
    Ok(EntityFrame::new(entity, df).with_key(key))
}

/// Transform every extract and build the fact table.
pub fn transform(raw: &RawTables) -> Result<TransformOutput> {
    let mut entities = Vec::with_capacity(Entity::ALL.len());
    for entity in Entity::ALL {
        let table = raw
            .get(&entity)
            .ok_or(TransformError::MissingTable { entity })?;
        let span = info_span!("transform_entity", entity = %entity);
        let _guard = span.enter();
        let start = Instant::now();
        let frame = clean_entity(entity, table)?;
        info!(
            rows_in = table.height(),
            rows = frame.record_count(),
            columns = frame.data.width(),
            key = ?frame.key,
            duration_ms = start.elapsed().as_millis(),
            "cleaned"
        );
        entities.push(frame);
    }

    let fact = build_fact(&entities)?;
    Ok(TransformOutput { entities, fact })
}

fn entity_data(entities: &[EntityFrame], entity: Entity) -> Result<&DataFrame> {
    entities
        .iter()
        .find(|frame| frame.entity == entity)
        .map(|frame| &frame.data)
        .ok_or(TransformError::MissingTable { entity })
}

fn build_fact(entities: &[EntityFrame]) -> Result<Option<DataFrame>> {
    let inputs = FactInputs {
        customers: entity_data(entities, Entity::Customers)?,
        products: entity_data(entities, Entity::Products)?,
        orders: entity_data(entities, Entity::Orders)?,
        order_items: entity_data(entities, Entity::OrderItems)?,
    };
    let span = info_span!("build_fact", table = FACT_TABLE);
    let _guard = span.enter();
    let start = Instant::now();
    let fact = build_fact_table(&inputs)?;
    match &fact {
        Some(df) => info!(
            rows = df.height(),
            columns = df.width(),
            duration_ms = start.elapsed().as_millis(),
            "fact table built"
        ),
        None => info!("fact table skipped"),
    }
    Ok(fact)
}
