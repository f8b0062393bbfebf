//! Catalog module
//!
//! The list of skins the monitor samples. Items come from a static seed
//! file or from a running backend's listing endpoint; both providers
//! yield the same shape and are interchangeable.

mod api;
mod seed;

pub use api::ApiCatalog;
pub use seed::SeedFileCatalog;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// A tradable item to monitor
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogItem {
    /// Short stable identifier
    #[serde(default)]
    pub id: String,
    /// Canonical name used to query Steam
    #[serde(default)]
    pub market_hash_name: String,
    /// Buff163 goods id, if the item is listed there
    #[serde(default)]
    pub buff_goods_id: Option<u64>,
}

impl CatalogItem {
    pub fn new(
        id: impl Into<String>,
        market_hash_name: impl Into<String>,
        buff_goods_id: Option<u64>,
    ) -> Self {
        Self {
            id: id.into(),
            market_hash_name: market_hash_name.into(),
            buff_goods_id,
        }
    }
}

/// Trait for catalog providers
#[async_trait]
pub trait CatalogProvider: Send + Sync {
    /// Provider name for logging
    fn name(&self) -> &'static str;

    /// Load all catalog items
    async fn load(&self) -> anyhow::Result<Vec<CatalogItem>>;
}

/// Drop entries without an identifier
pub(crate) fn retain_identified(items: Vec<CatalogItem>) -> Vec<CatalogItem> {
    let total = items.len();
    let kept: Vec<CatalogItem> = items.into_iter().filter(|i| !i.id.is_empty()).collect();
    if kept.len() < total {
        tracing::warn!(skipped = total - kept.len(), "Skipping catalog entries without id");
    }
    kept
}

/// Load the catalog from `primary`, falling back to `fallback`
///
/// A provider that fails or yields nothing counts as empty. Returns
/// `ConfigError::EmptyCatalog` when neither provider has items.
pub async fn load_catalog<'a>(
    primary: &'a dyn CatalogProvider,
    fallback: Option<&'a dyn CatalogProvider>,
) -> Result<Vec<CatalogItem>, crate::config::ConfigError> {
    for provider in std::iter::once(primary).chain(fallback) {
        match provider.load().await {
            Ok(items) if !items.is_empty() => {
                tracing::info!(provider = provider.name(), count = items.len(), "Catalog loaded");
                return Ok(items);
            }
            Ok(_) => {
                tracing::warn!(provider = provider.name(), "Catalog provider returned no items");
            }
            Err(e) => {
                tracing::warn!(provider = provider.name(), error = %e, "Catalog provider failed");
            }
        }
    }

    Err(crate::config::ConfigError::EmptyCatalog)
}
