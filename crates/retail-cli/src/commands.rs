use anyhow::Result;
use comfy_table::Table;
use tracing::info_span;

use retail_cli::pipeline::{resolve_config, run_pipeline};
use retail_model::entity::{MIN_COMPOSITE_KEY_COLUMNS, ORDER_ITEM_COMPOSITE_CANDIDATES};
use retail_model::{Entity, EtlConfig, RunSummary};

use crate::cli::SourceArgs;
use crate::summary::apply_table_style;

pub fn run_etl(args: &SourceArgs) -> Result<RunSummary> {
    let config = resolve_config(&args.overrides())?;
    let span = info_span!("run", database = %config.database.display());
    let _guard = span.enter();
    run_pipeline(&config)
}

pub fn run_plan(args: &SourceArgs) -> Result<()> {
    let config = resolve_config(&args.overrides())?;
    println!("{}", plan_table(&config));
    println!("Database: {}", config.database.display());
    println!("If exists: {:?}", config.if_exists);
    Ok(())
}

fn plan_table(config: &EtlConfig) -> Table {
    let mut table = Table::new();
    table.set_header(vec!["Entity", "Source", "Key candidates", "Numeric", "Dates"]);
    apply_table_style(&mut table);
    for entity in Entity::ALL {
        let plan = entity.coercion_plan();
        let mut keys = entity.key_candidates().join(", ");
        if entity == Entity::OrderItems {
            keys.push_str(&format!(
                ", else {MIN_COMPOSITE_KEY_COLUMNS}+ of ({})",
                ORDER_ITEM_COMPOSITE_CANDIDATES.join(", ")
            ));
        }
        table.add_row(vec![
            entity.table_name().to_string(),
            config.sources.get(entity).display().to_string(),
            keys,
            list_or_dash(plan.numeric),
            list_or_dash(plan.dates),
        ]);
    }
    table
}

fn list_or_dash(columns: &[&str]) -> String {
    if columns.is_empty() {
        "-".to_string()
    } else {
        columns.join(", ")
    }
}
