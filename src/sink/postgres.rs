//! Relational sink
//!
//! Appends one row per sample to the price history table over a single
//! connection opened at startup.

use super::{SampleSink, SinkError};
use crate::sample::PriceSample;
use anyhow::Context;
use async_trait::async_trait;
use reqwest::Url;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::str::FromStr;
use std::time::Duration;

/// Table receiving samples
pub const PRICE_HISTORY_TABLE: &str = "PriceHistory";

const INSERT_SAMPLE: &str = r#"INSERT INTO "PriceHistory" ("skinId", "price", "volume", "source", "timestamp") VALUES ($1, $2, $3, $4, $5)"#;

/// Remove the Prisma-only `schema` query parameter from a connection URL
pub fn strip_schema_param(database_url: &str) -> anyhow::Result<String> {
    if !database_url.contains("schema=") {
        return Ok(database_url.to_string());
    }

    let mut url = Url::parse(database_url).context("Failed to parse database URL")?;
    let kept: Vec<(String, String)> = url
        .query_pairs()
        .filter(|(k, _)| k != "schema")
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();

    if kept.is_empty() {
        url.set_query(None);
    } else {
        url.query_pairs_mut().clear().extend_pairs(kept);
    }
    Ok(url.to_string())
}

/// Appends samples to PostgreSQL
pub struct PostgresSink {
    pool: PgPool,
}

impl PostgresSink {
    /// Open the shared connection
    pub async fn connect(database_url: &str, acquire_timeout: Duration) -> anyhow::Result<Self> {
        let url = strip_schema_param(database_url)?;
        let connect_opts =
            PgConnectOptions::from_str(&url).context("Failed to parse database URL")?;

        let pool = PgPoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .acquire_timeout(acquire_timeout)
            .connect_with(connect_opts)
            .await
            .context("Failed to connect to database")?;

        tracing::info!(table = PRICE_HISTORY_TABLE, "Relational sink connected");
        Ok(Self { pool })
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SampleSink for PostgresSink {
    fn name(&self) -> &'static str {
        "postgres"
    }

    async fn append(&mut self, sample: &PriceSample) -> Result<(), SinkError> {
        let volume = sample.volume.and_then(|v| i64::try_from(v).ok());

        sqlx::query(INSERT_SAMPLE)
            .bind(sample.item_id.as_str())
            .bind(sample.price)
            .bind(volume)
            .bind(sample.source.as_str())
            .bind(sample.timestamp)
            .execute(&self.pool)
            .await?;
        Ok(())
    }
}
