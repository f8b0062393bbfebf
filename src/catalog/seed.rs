//! Seed file catalog provider

use super::{retain_identified, CatalogItem, CatalogProvider};
use anyhow::Context;
use async_trait::async_trait;
use std::path::PathBuf;

/// Reads the catalog from a JSON array on disk
pub struct SeedFileCatalog {
    path: PathBuf,
}

impl SeedFileCatalog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl CatalogProvider for SeedFileCatalog {
    fn name(&self) -> &'static str {
        "seed"
    }

    async fn load(&self) -> anyhow::Result<Vec<CatalogItem>> {
        let raw = tokio::fs::read_to_string(&self.path)
            .await
            .with_context(|| format!("read seed file {}", self.path.display()))?;
        let items: Vec<CatalogItem> = serde_json::from_str(&raw)
            .with_context(|| format!("parse seed file {}", self.path.display()))?;
        Ok(retain_identified(items))
    }
}
