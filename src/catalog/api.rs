//! Live API catalog provider

use super::{retain_identified, CatalogItem, CatalogProvider};
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;

/// Reads the catalog from a running backend's `/api/skins` endpoint
pub struct ApiCatalog {
    base_url: String,
    client: Client,
}

impl ApiCatalog {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> anyhow::Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .context("build catalog HTTP client")?;

        Ok(Self {
            base_url: base_url.into(),
            client,
        })
    }

    fn listing_url(&self) -> String {
        format!("{}/api/skins", self.base_url.trim_end_matches('/'))
    }
}

#[async_trait]
impl CatalogProvider for ApiCatalog {
    fn name(&self) -> &'static str {
        "api"
    }

    async fn load(&self) -> anyhow::Result<Vec<CatalogItem>> {
        let url = self.listing_url();
        tracing::debug!(url = %url, "Fetching catalog");

        let response = self.client.get(&url).send().await?;
        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Catalog API error: {} - {}", status, body);
        }

        let items: Vec<CatalogItem> = response.json().await?;
        Ok(retain_identified(items))
    }
}
