//! Batch pipeline with explicit stages.
//!
//! 1. **Extract**: check every source exists, then read all four CSVs
//! 2. **Transform**: clean each entity and build the fact table
//! 3. **Load**: write every table to SQLite and index it
//!
//! Each stage runs inside its own span and logs its duration.

use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::{info, info_span};

use retail_ingest::{RawTables, extract};
use retail_model::{Entity, EtlConfig, IfExists, RunSummary, SourcePaths, load_config};
use retail_output::{SqliteWriter, load};
use retail_transform::{TransformOutput, transform};

/// Command-line settings layered over the config file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub data_dir: Option<PathBuf>,
    pub customers: Option<PathBuf>,
    pub products: Option<PathBuf>,
    pub orders: Option<PathBuf>,
    pub order_items: Option<PathBuf>,
    pub database: Option<PathBuf>,
    pub if_exists: Option<IfExists>,
}

impl ConfigOverrides {
    fn source(&self, entity: Entity) -> Option<&PathBuf> {
        match entity {
            Entity::Customers => self.customers.as_ref(),
            Entity::Products => self.products.as_ref(),
            Entity::Orders => self.orders.as_ref(),
            Entity::OrderItems => self.order_items.as_ref(),
        }
    }
}

/// Resolve the run configuration.
///
/// Precedence, lowest first: the current directory layout, the config
/// file, `--data-dir`, then the per-file and database flags.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<EtlConfig> {
    let mut config = match &overrides.config {
        Some(path) => {
            load_config(path).with_context(|| format!("load config {}", path.display()))?
        }
        None => EtlConfig::from_data_dir("."),
    };
    if let Some(dir) = &overrides.data_dir {
        let layout = EtlConfig::from_data_dir(dir);
        config.sources = layout.sources;
        config.database = layout.database;
    }
    for entity in Entity::ALL {
        if let Some(path) = overrides.source(entity) {
            config.sources.set(entity, path.clone());
        }
    }
    if let Some(database) = &overrides.database {
        config.database = database.clone();
    }
    if let Some(policy) = overrides.if_exists {
        config.if_exists = policy;
    }
    Ok(config)
}

pub fn extract_stage(sources: &SourcePaths) -> Result<RawTables> {
    let span = info_span!("extract");
    let _guard = span.enter();
    let start = Instant::now();
    let raw = extract(sources).context("extract sources")?;
    info!(
        tables = raw.len(),
        duration_ms = start.elapsed().as_millis(),
        "extract complete"
    );
    Ok(raw)
}

pub fn transform_stage(raw: &RawTables) -> Result<TransformOutput> {
    let span = info_span!("transform");
    let _guard = span.enter();
    let start = Instant::now();
    let output = transform(raw).context("transform tables")?;
    info!(
        tables = output.tables().len(),
        fact = output.fact.is_some(),
        duration_ms = start.elapsed().as_millis(),
        "transform complete"
    );
    Ok(output)
}

pub fn load_stage(output: &TransformOutput, config: &EtlConfig) -> Result<RunSummary> {
    let span = info_span!("load", database = %config.database.display());
    let _guard = span.enter();
    let start = Instant::now();
    let mut writer = SqliteWriter::open(&config.database, config.if_exists)
        .with_context(|| format!("open database {}", config.database.display()))?;
    let summary = load(&mut writer, output, &config.database).context("load tables")?;
    info!(
        rows = summary.total_rows(),
        duration_ms = start.elapsed().as_millis(),
        "load complete"
    );
    Ok(summary)
}

/// Run extract, transform and load against one configuration.
pub fn run_pipeline(config: &EtlConfig) -> Result<RunSummary> {
    let raw = extract_stage(&config.sources)?;
    let output = transform_stage(&raw)?;
    load_stage(&output, config)
}
