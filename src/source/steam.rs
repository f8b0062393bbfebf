//! Steam community market price overview adapter

use super::http::HttpFetcher;
use super::sanitize::{sanitize_price, sanitize_volume, value_text};
use super::{PriceSource, RawQuote, Source, SourceError};
use crate::catalog::CatalogItem;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Steam community base URL
pub const STEAM_API_URL: &str = "https://steamcommunity.com";

/// Fields are loosely typed so one odd value only drops that field
#[derive(Debug, Default, Deserialize)]
struct PriceOverview {
    /// Lowest listing, a currency string like "$1,234.56"
    #[serde(default)]
    lowest_price: Option<Value>,
    #[serde(default)]
    median_price: Option<Value>,
    /// Units sold in the last day, usually "1,234"
    #[serde(default)]
    volume: Option<Value>,
}

/// Configuration for the Steam adapter
#[derive(Debug, Clone)]
pub struct SteamConfig {
    pub base_url: String,
    /// Steam application id (730 = CS2)
    pub app_id: u32,
    /// Steam currency code (1 = USD)
    pub currency: u32,
}

impl Default for SteamConfig {
    fn default() -> Self {
        Self {
            base_url: STEAM_API_URL.to_string(),
            app_id: 730,
            currency: 1,
        }
    }
}

/// Quotes items by their market hash name
pub struct SteamSource {
    config: SteamConfig,
    fetcher: HttpFetcher,
}

impl SteamSource {
    pub fn new(config: SteamConfig, fetcher: HttpFetcher) -> Self {
        Self { config, fetcher }
    }

    fn overview_url(&self) -> String {
        format!(
            "{}/market/priceoverview/",
            self.config.base_url.trim_end_matches('/')
        )
    }

    /// Lowest listing price, falling back to the median sale price
    fn parse_overview(overview: PriceOverview) -> RawQuote {
        let price_of = |value: Option<&Value>| {
            value
                .and_then(value_text)
                .and_then(|t| sanitize_price(&t))
        };
        let price = price_of(overview.lowest_price.as_ref())
            .or_else(|| price_of(overview.median_price.as_ref()));
        let volume = overview
            .volume
            .as_ref()
            .and_then(value_text)
            .and_then(|t| sanitize_volume(&t));

        RawQuote::new(price, volume)
    }
}

#[async_trait]
impl PriceSource for SteamSource {
    fn source(&self) -> Source {
        Source::Steam
    }

    async fn fetch_quote(&self, item: &CatalogItem) -> Result<Option<RawQuote>, SourceError> {
        if item.market_hash_name.is_empty() {
            return Ok(None);
        }

        let app_id = self.config.app_id.to_string();
        let currency = self.config.currency.to_string();
        let overview: PriceOverview = self
            .fetcher
            .get_json(
                &self.overview_url(),
                &[
                    ("appid", app_id.as_str()),
                    ("currency", currency.as_str()),
                    ("market_hash_name", item.market_hash_name.as_str()),
                ],
                &[("referer", "https://steamcommunity.com/market/")],
            )
            .await?;

        Ok(Some(Self::parse_overview(overview)))
    }
}
