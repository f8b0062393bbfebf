//! Flat-file sink
//!
//! Appends one CSV row per sample. The header is written only when the
//! call creates the file; existing rows are never touched.

use super::{SampleSink, SinkError};
use crate::sample::PriceSample;
use crate::source::Source;
use async_trait::async_trait;
use csv_async::AsyncWriterBuilder;
use rust_decimal::Decimal;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs::{self, OpenOptions};

/// Column order of the sample file
pub const CSV_HEADER: &str = "timestamp,itemId,source,price,volume";

/// One row of the sample file; field order is column order
#[derive(Debug, Serialize)]
struct CsvRow<'a> {
    timestamp: String,
    #[serde(rename = "itemId")]
    item_id: &'a str,
    source: Source,
    price: Decimal,
    volume: Option<u64>,
}

impl<'a> From<&'a PriceSample> for CsvRow<'a> {
    fn from(sample: &'a PriceSample) -> Self {
        Self {
            timestamp: sample.timestamp.to_rfc3339(),
            item_id: &sample.item_id,
            source: sample.source,
            price: sample.price,
            volume: sample.volume,
        }
    }
}

/// Appends samples to a CSV file
pub struct CsvSink {
    path: PathBuf,
}

impl CsvSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn append_row(&self, sample: &PriceSample) -> Result<(), SinkError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).await?;
            }
        }

        let is_new = !fs::try_exists(&self.path).await?;
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .await?;

        // Header comes from the row's field names, only for a fresh file
        let mut writer = AsyncWriterBuilder::new()
            .has_headers(is_new)
            .create_serializer(file);
        writer.serialize(CsvRow::from(sample)).await?;
        writer.flush().await?;
        Ok(())
    }
}

#[async_trait]
impl SampleSink for CsvSink {
    fn name(&self) -> &'static str {
        "csv"
    }

    async fn append(&mut self, sample: &PriceSample) -> Result<(), SinkError> {
        self.append_row(sample).await
    }
}
