//! Buff163 goods API adapter

use super::http::HttpFetcher;
use super::sanitize::{sanitize_price, sanitize_volume, value_text};
use super::{PriceSource, RawQuote, Source, SourceError};
use crate::catalog::CatalogItem;
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;

/// Buff163 base URL
pub const BUFF_API_URL: &str = "https://buff.163.com";

#[derive(Debug, Default, Deserialize)]
struct GoodsResponse {
    #[serde(default)]
    data: Option<GoodsData>,
}

#[derive(Debug, Default, Deserialize)]
struct GoodsData {
    #[serde(default)]
    goods_info: Option<GoodsInfo>,
}

#[derive(Debug, Default, Deserialize)]
struct GoodsInfo {
    /// Minimum sell price, usually a string like "123.5"
    #[serde(default)]
    sell_min_price: Option<Value>,
    /// Number of listings on sale
    #[serde(default)]
    sell_num: Option<Value>,
}

/// Configuration for the Buff163 adapter
#[derive(Debug, Clone)]
pub struct BuffConfig {
    pub base_url: String,
}

impl Default for BuffConfig {
    fn default() -> Self {
        Self {
            base_url: BUFF_API_URL.to_string(),
        }
    }
}

/// Quotes items by their Buff163 goods id
pub struct BuffSource {
    config: BuffConfig,
    fetcher: HttpFetcher,
}

impl BuffSource {
    pub fn new(config: BuffConfig, fetcher: HttpFetcher) -> Self {
        Self { config, fetcher }
    }

    fn goods_url(&self) -> String {
        format!("{}/api/market/goods", self.config.base_url.trim_end_matches('/'))
    }

    /// Extract the quote from a goods response
    fn parse_goods(response: GoodsResponse) -> RawQuote {
        let info = response
            .data
            .and_then(|d| d.goods_info)
            .unwrap_or_default();

        let price = info
            .sell_min_price
            .as_ref()
            .and_then(value_text)
            .and_then(|t| sanitize_price(&t));
        let volume = info
            .sell_num
            .as_ref()
            .and_then(value_text)
            .and_then(|t| sanitize_volume(&t));

        RawQuote::new(price, volume)
    }
}

#[async_trait]
impl PriceSource for BuffSource {
    fn source(&self) -> Source {
        Source::Buff163
    }

    async fn fetch_quote(&self, item: &CatalogItem) -> Result<Option<RawQuote>, SourceError> {
        let Some(goods_id) = item.buff_goods_id.filter(|id| *id != 0) else {
            return Ok(None);
        };
        let goods_id = goods_id.to_string();

        let response: GoodsResponse = self
            .fetcher
            .get_json(
                &self.goods_url(),
                &[("goods_id", goods_id.as_str())],
                &[
                    ("accept-language", "en-US,en;q=0.9"),
                    ("referer", "https://buff.163.com/market/csgo"),
                ],
            )
            .await?;

        Ok(Some(Self::parse_goods(response)))
    }
}
