//! Catalog command implementation

use crate::catalog::{load_catalog, ApiCatalog, CatalogItem, CatalogProvider, SeedFileCatalog};
use crate::config::{CatalogSource, Config};
use clap::Args;
use std::time::Duration;

#[derive(Args, Debug)]
pub struct CatalogArgs {
    /// Catalog provider to read from
    #[arg(long, value_enum)]
    pub source: Option<CatalogSource>,
}

impl CatalogArgs {
    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        if let Some(source) = self.source {
            config.catalog.source = source;
        }

        let items = load_configured_catalog(&config).await?;
        println!("{} items:", items.len());
        for item in &items {
            match item.buff_goods_id {
                Some(goods_id) => println!("  {}  {}  (buff {})", item.id, item.market_hash_name, goods_id),
                None => println!("  {}  {}", item.id, item.market_hash_name),
            }
        }
        Ok(())
    }
}

/// Load the catalog from the configured provider, with optional fallback
pub async fn load_configured_catalog(config: &Config) -> anyhow::Result<Vec<CatalogItem>> {
    let seed_catalog = SeedFileCatalog::new(&config.catalog.seed_path);
    let api_catalog = ApiCatalog::new(
        &config.catalog.api_base,
        Duration::from_secs(config.sources.timeout_secs),
    )?;
    let seed: &dyn CatalogProvider = &seed_catalog;
    let api: &dyn CatalogProvider = &api_catalog;

    let (primary, other) = match config.catalog.source {
        CatalogSource::Seed => (seed, api),
        CatalogSource::Api => (api, seed),
    };
    let fallback = config.catalog.fallback.then_some(other);

    Ok(load_catalog(primary, fallback).await?)
}
