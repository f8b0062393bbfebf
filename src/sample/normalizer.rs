//! Raw quote normalization

use super::PriceSample;
use crate::source::{RawQuote, Source};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// Build a sample from a raw quote
///
/// Returns `None` unless the quote carries a positive price. Volume is
/// carried through unchanged.
pub fn normalize(
    item_id: &str,
    source: Source,
    quote: &RawQuote,
    timestamp: DateTime<Utc>,
) -> Option<PriceSample> {
    let price = quote.price.filter(|p| *p > Decimal::ZERO)?;

    Some(PriceSample {
        item_id: item_id.to_string(),
        source,
        price,
        volume: quote.volume,
        timestamp,
    })
}
