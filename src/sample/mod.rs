//! Sample module
//!
//! Canonical price samples, timestamp bucketing and the normalizer that
//! turns raw adapter quotes into samples.

mod bucket;
mod normalizer;

pub use bucket::bucket_timestamp;
pub use normalizer::normalize;

use crate::source::Source;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Canonical unit of record
///
/// Only the normalizer builds these, so `price` is always positive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PriceSample {
    pub item_id: String,
    pub source: Source,
    pub price: Decimal,
    pub volume: Option<u64>,
    pub timestamp: DateTime<Utc>,
}

impl PriceSample {
    /// Natural key downstream consumers can de-duplicate on
    pub fn dedup_key(&self) -> String {
        format!(
            "{}:{}:{}",
            self.item_id,
            self.source,
            self.timestamp.timestamp_millis()
        )
    }

    /// Key of the (item, source) pair this sample belongs to
    pub fn pair_key(&self) -> String {
        format!("{}:{}", self.item_id, self.source)
    }
}
