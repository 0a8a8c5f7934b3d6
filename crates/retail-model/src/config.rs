//! Run configuration: where the four extracts live and where the store goes.
//!
//! A config is built from a data directory with conventional file names,
//! optionally read from a TOML file, and finally patched by CLI flags.
//!
//! ```toml
//! data_dir = "data"
//! database = "out/retail.db"
//! if_exists = "replace"
//!
//! [sources]
//! orders = "exports/orders_2024.csv"
//! ```
//!
//! Relative paths in the file resolve against the file's own directory.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::entity::Entity;
use crate::error::{ConfigError, Result};

/// Default store file name inside the data directory.
pub const DEFAULT_DATABASE: &str = "retail.db";

/// What to do when the store already exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IfExists {
    /// Delete the existing store and rebuild every table.
    #[default]
    Replace,
    /// Abort the run.
    Fail,
}

/// Extract path per entity. Each entity has its own file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourcePaths {
    pub customers: PathBuf,
    pub products: PathBuf,
    pub orders: PathBuf,
    pub order_items: PathBuf,
}

impl SourcePaths {
    pub fn in_dir(dir: &Path) -> Self {
        Self {
            customers: dir.join(Entity::Customers.file_name()),
            products: dir.join(Entity::Products.file_name()),
            orders: dir.join(Entity::Orders.file_name()),
            order_items: dir.join(Entity::OrderItems.file_name()),
        }
    }

    pub fn get(&self, entity: Entity) -> &Path {
        match entity {
            Entity::Customers => &self.customers,
            Entity::Products => &self.products,
            Entity::Orders => &self.orders,
            Entity::OrderItems => &self.order_items,
        }
    }

    pub fn set(&mut self, entity: Entity, path: PathBuf) {
        match entity {
            Entity::Customers => self.customers = path,
            Entity::Products => self.products = path,
            Entity::Orders => self.orders = path,
            Entity::OrderItems => self.order_items = path,
        }
    }

    /// Entity/path pairs in extract order.
    pub fn iter(&self) -> impl Iterator<Item = (Entity, &Path)> {
        Entity::ALL.into_iter().map(|entity| (entity, self.get(entity)))
    }
}

/// Fully resolved configuration for one run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EtlConfig {
    pub sources: SourcePaths,
    pub database: PathBuf,
    pub if_exists: IfExists,
}

impl EtlConfig {
    /// Conventional layout: `customers.csv`, `products.csv`, `orders.csv`,
    /// `order_items.csv` and `retail.db`, all inside `dir`.
    pub fn from_data_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            sources: SourcePaths::in_dir(dir),
            database: dir.join(DEFAULT_DATABASE),
            if_exists: IfExists::default(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    data_dir: Option<PathBuf>,
    database: Option<PathBuf>,
    if_exists: Option<IfExists>,
    #[serde(default)]
    sources: SourceOverrides,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct SourceOverrides {
    customers: Option<PathBuf>,
    products: Option<PathBuf>,
    orders: Option<PathBuf>,
    order_items: Option<PathBuf>,
}

impl SourceOverrides {
    fn get(&self, entity: Entity) -> Option<&PathBuf> {
        match entity {
            Entity::Customers => self.customers.as_ref(),
            Entity::Products => self.products.as_ref(),
            Entity::Orders => self.orders.as_ref(),
            Entity::OrderItems => self.order_items.as_ref(),
        }
    }
}

/// Load a TOML config file.
pub fn load_config(path: &Path) -> Result<EtlConfig> {
    let contents = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let file: ConfigFile = toml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    let base = path.parent().unwrap_or_else(|| Path::new("."));
    Ok(resolve(file, base))
}

fn resolve(file: ConfigFile, base: &Path) -> EtlConfig {
    let data_dir = file
        .data_dir
        .as_deref()
        .map_or_else(|| base.to_path_buf(), |dir| base.join(dir));
    let mut config = EtlConfig::from_data_dir(&data_dir);
    for entity in Entity::ALL {
        if let Some(path) = file.sources.get(entity) {
            config.sources.set(entity, base.join(path));
        }
    }
    if let Some(database) = file.database {
        config.database = base.join(database);
    }
    if let Some(policy) = file.if_exists {
        config.if_exists = policy;
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_dir_layout() {
        let config = EtlConfig::from_data_dir("/data");
        assert_eq!(config.sources.orders, PathBuf::from("/data/orders.csv"));
        assert_eq!(
            config.sources.order_items,
            PathBuf::from("/data/order_items.csv")
        );
        assert_eq!(config.database, PathBuf::from("/data/retail.db"));
        assert_eq!(config.if_exists, IfExists::Replace);
    }

    #[test]
    fn every_entity_gets_its_own_extract() {
        let config = EtlConfig::from_data_dir("/data");
        let mut paths: Vec<&Path> = config.sources.iter().map(|(_, path)| path).collect();
        paths.sort();
        paths.dedup();
        assert_eq!(paths.len(), Entity::ALL.len());
    }

    #[test]
    fn resolves_relative_to_base() {
        let file: ConfigFile = toml::from_str(
            r#"
            data_dir = "raw"
            database = "out/shop.db"
            if_exists = "fail"

            [sources]
            orders = "exports/orders.csv"
            "#,
        )
        .unwrap();
        let config = resolve(file, Path::new("/etl"));
        assert_eq!(config.sources.customers, PathBuf::from("/etl/raw/customers.csv"));
        assert_eq!(config.sources.orders, PathBuf::from("/etl/exports/orders.csv"));
        assert_eq!(config.database, PathBuf::from("/etl/out/shop.db"));
        assert_eq!(config.if_exists, IfExists::Fail);
    }

    #[test]
    fn rejects_unknown_keys() {
        let parsed: std::result::Result<ConfigFile, _> = toml::from_str("datadir = \"x\"");
        assert!(parsed.is_err());
    }
}
