//! Retail extract transformation.
//!
//! Every stage takes a `&DataFrame` and returns a new `DataFrame`; nothing
//! mutates a table another stage can still see.
//!
//! - **normalize**: canonical column names and trimmed text cells
//! - **coerce**: numeric and date-time conversion with null on failure
//! - **keys**: priority-ordered key discovery per entity
//! - **dedupe**: first-seen-wins deduplication on a key or on whole rows
//! - **derive**: line totals and order date parts
//! - **fact**: the denormalized order-item fact table
//! - **pipeline**: the per-run transform over all four entities

mod error;

pub mod coerce;
pub mod data_utils;
pub mod datetime;
pub mod dedupe;
pub mod derive;
pub mod fact;
pub mod frame;
pub mod keys;
pub mod normalize;
pub mod pipeline;

pub use coerce::{coerce_dates, coerce_numeric};
pub use dedupe::dedupe;
pub use derive::{add_date_parts, derive_line_total};
pub use error::{Result, TransformError};
pub use fact::{FactInputs, JoinKey, JoinPlan, build_fact_table, left_join, plan_joins};
pub use frame::EntityFrame;
pub use keys::{discover_entity_key, discover_key, has_column};
pub use normalize::{normalize, normalize_column_name, normalize_columns, trim_strings};
pub use pipeline::{TransformOutput, clean_entity, transform};
