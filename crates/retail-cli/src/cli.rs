//! CLI argument definitions for the retail ETL.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;

use retail_cli::pipeline::ConfigOverrides;
use retail_model::IfExists;

#[derive(Parser)]
#[command(
    name = "retail-etl",
    version,
    about = "Retail ETL - Load retail CSV extracts into an analysis-ready SQLite store",
    long_about = "Load customers, products, orders and order items from CSV extracts.\n\n\
                  Column names are normalized, values coerced and deduplicated, and a\n\
                  denormalized fact_order_items table is built when the join keys exist."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Extract, transform and load all four extracts.
    Run(SourceArgs),

    /// Show resolved paths, key candidates and coercion plans without running.
    Plan(SourceArgs),
}

#[derive(Args, Clone, Default)]
pub struct SourceArgs {
    /// TOML config file; relative paths inside it resolve against its directory.
    #[arg(long = "config", value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Directory holding customers.csv, products.csv, orders.csv and order_items.csv.
    #[arg(long = "data-dir", value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    #[arg(long = "customers", value_name = "CSV")]
    pub customers: Option<PathBuf>,

    #[arg(long = "products", value_name = "CSV")]
    pub products: Option<PathBuf>,

    #[arg(long = "orders", value_name = "CSV")]
    pub orders: Option<PathBuf>,

    #[arg(long = "order-items", value_name = "CSV")]
    pub order_items: Option<PathBuf>,

    /// SQLite database to write (default: <DATA_DIR>/retail.db).
    #[arg(long = "database", value_name = "PATH")]
    pub database: Option<PathBuf>,

    /// What to do when the database already exists.
    #[arg(long = "if-exists", value_enum)]
    pub if_exists: Option<IfExistsArg>,
}

impl SourceArgs {
    pub fn overrides(&self) -> ConfigOverrides {
        ConfigOverrides {
            config: self.config.clone(),
            data_dir: self.data_dir.clone(),
            customers: self.customers.clone(),
            products: self.products.clone(),
            orders: self.orders.clone(),
            order_items: self.order_items.clone(),
            database: self.database.clone(),
            if_exists: self.if_exists.map(IfExists::from),
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
pub enum IfExistsArg {
    /// Delete the existing database and rebuild it.
    Replace,
    /// Abort the run.
    Fail,
}

impl From<IfExistsArg> for IfExists {
    fn from(arg: IfExistsArg) -> Self {
        match arg {
            IfExistsArg::Replace => IfExists::Replace,
            IfExistsArg::Fail => IfExists::Fail,
        }
    }
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}
