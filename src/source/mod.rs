//! Price source module
//!
//! Adapters that fetch a raw quote for one catalog item from an upstream
//! market. Pacing between calls is the scheduler's job, not the adapter's.

mod buff;
mod http;
mod sanitize;
mod steam;
mod types;

pub use buff::{BuffConfig, BuffSource, BUFF_API_URL};
pub use http::{FetchConfig, HttpFetcher, DEFAULT_USER_AGENT};
pub use sanitize::{sanitize_price, sanitize_volume, value_text};
pub use steam::{SteamConfig, SteamSource, STEAM_API_URL};
pub use types::{RawQuote, Source, SourceError};

use crate::catalog::CatalogItem;
use async_trait::async_trait;

/// Trait for upstream market adapters
#[async_trait]
pub trait PriceSource: Send + Sync {
    /// Market this adapter reads from
    fn source(&self) -> Source;

    /// Fetch a quote for `item`
    ///
    /// `Ok(None)` means the item cannot be quoted by this source (missing
    /// key) and no request was made.
    async fn fetch_quote(&self, item: &CatalogItem) -> Result<Option<RawQuote>, SourceError>;
}
