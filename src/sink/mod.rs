//! Persistence sink module
//!
//! Every normalized sample is appended to each enabled sink. Sinks fail
//! independently; a failure in one never stops delivery to another.

mod csv;
mod postgres;

pub use self::csv::{CsvSink, CSV_HEADER};
pub use self::postgres::{strip_schema_param, PostgresSink, PRICE_HISTORY_TABLE};

use crate::sample::PriceSample;
use async_trait::async_trait;
use thiserror::Error;

/// Sink write errors
#[derive(Debug, Error)]
pub enum SinkError {
    /// File open or write failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    /// Row could not be serialized to CSV
    #[error("CSV error: {0}")]
    Csv(#[from] csv_async::Error),
    /// Relational insert failed
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
}

/// Trait for append-only sample sinks
#[async_trait]
pub trait SampleSink: Send {
    /// Sink name for logging
    fn name(&self) -> &'static str;

    /// Append one sample
    async fn append(&mut self, sample: &PriceSample) -> Result<(), SinkError>;
}
