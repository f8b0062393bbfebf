//! Price source types

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Upstream market a quote was taken from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    /// Buff163 goods API, keyed by goods id
    Buff163,
    /// Steam community market price overview, keyed by market hash name
    Steam,
}

impl Source {
    /// Identifier written to both sinks
    pub fn as_str(&self) -> &'static str {
        match self {
            Source::Buff163 => "buff163",
            Source::Steam => "steam",
        }
    }
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Source-specific quote before normalization
///
/// Both fields are `None` when the source had no usable value.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawQuote {
    pub price: Option<Decimal>,
    pub volume: Option<u64>,
}

impl RawQuote {
    pub fn new(price: Option<Decimal>, volume: Option<u64>) -> Self {
        Self { price, volume }
    }
}

/// Failure of a single adapter call
#[derive(Debug, Error)]
pub enum SourceError {
    /// Connection, timeout or body read failure
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// Non-success HTTP status
    #[error("unexpected status {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },
    /// Body was not the expected JSON shape
    #[error("malformed response: {0}")]
    Decode(#[from] serde_json::Error),
}
