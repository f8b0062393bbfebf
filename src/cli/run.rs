//! Run command implementation

use super::load_configured_catalog;
use crate::config::{self, CatalogSource, Config};
use crate::detector::ChangeDetector;
use crate::monitor::{Monitor, MonitorSettings, SystemClock};
use crate::sink::{CsvSink, PostgresSink, SampleSink};
use crate::source::{
    BuffConfig, BuffSource, FetchConfig, HttpFetcher, PriceSource, SteamConfig, SteamSource,
};
use clap::Args;
use rust_decimal::Decimal;
use std::path::PathBuf;
use std::time::Duration;

#[derive(Args, Debug, Default)]
pub struct RunArgs {
    /// Catalog provider
    #[arg(long, value_enum)]
    pub source: Option<CatalogSource>,

    /// Backend base URL for the API catalog
    #[arg(long)]
    pub api_base: Option<String>,

    /// Seconds between sweeps (0 disables timestamp bucketing)
    #[arg(long)]
    pub interval: Option<u64>,

    /// Percentage move reported as notable
    #[arg(long)]
    pub threshold: Option<Decimal>,

    /// CSV output path
    #[arg(long)]
    pub out_csv: Option<PathBuf>,

    /// Seconds to pause after each source request
    #[arg(long)]
    pub request_gap: Option<f64>,

    /// Also append samples to PostgreSQL (requires DATABASE_URL)
    #[arg(long)]
    pub write_db: bool,

    /// Stop after this many sweeps
    #[arg(long)]
    pub sweeps: Option<u64>,
}

impl RunArgs {
    /// Apply command-line overrides on top of the file configuration
    pub fn apply_overrides(&self, config: &mut Config) {
        if let Some(source) = self.source {
            config.catalog.source = source;
        }
        if let Some(ref api_base) = self.api_base {
            config.catalog.api_base = api_base.clone();
        }
        if let Some(interval) = self.interval {
            config.monitor.interval_secs = interval;
        }
        if let Some(threshold) = self.threshold {
            config.monitor.threshold_pct = threshold;
        }
        if let Some(ref out_csv) = self.out_csv {
            config.sink.out_csv = out_csv.clone();
        }
        if let Some(gap) = self.request_gap {
            config.monitor.request_gap_secs = gap;
        }
        if self.write_db {
            config.sink.write_db = true;
        }
    }

    pub async fn execute(&self, mut config: Config) -> anyhow::Result<()> {
        self.apply_overrides(&mut config);
        config.validate()?;

        if config::load_env_file(&config.sink.env_file)? {
            tracing::debug!(path = %config.sink.env_file.display(), "Loaded env file");
        }
        let database_url = if config.sink.write_db {
            Some(config::database_url()?)
        } else {
            None
        };

        let catalog = load_configured_catalog(&config).await?;

        let fetcher = HttpFetcher::new(FetchConfig {
            timeout: Duration::from_secs(config.sources.timeout_secs),
            attempts: config.sources.retry_attempts,
            base_delay: Duration::from_millis(config.sources.retry_base_delay_ms),
            user_agent: config.sources.user_agent.clone(),
        })?;
        let sources: Vec<Box<dyn PriceSource>> = vec![
            Box::new(BuffSource::new(
                BuffConfig {
                    base_url: config.sources.buff_base_url.clone(),
                },
                fetcher.clone(),
            )),
            Box::new(SteamSource::new(
                SteamConfig {
                    base_url: config.sources.steam_base_url.clone(),
                    app_id: config.sources.steam_app_id,
                    currency: config.sources.steam_currency,
                },
                fetcher,
            )),
        ];

        let mut sinks: Vec<Box<dyn SampleSink>> = Vec::new();
        if let Some(url) = database_url {
            let timeout = Duration::from_secs(config.sink.db_connect_timeout_secs);
            sinks.push(Box::new(PostgresSink::connect(&url, timeout).await?));
        }
        sinks.push(Box::new(CsvSink::new(config.sink.out_csv.clone())));

        let settings = MonitorSettings {
            interval_secs: config.monitor.interval_secs,
            request_gap: config.monitor.request_gap(),
            max_sweeps: self.sweeps,
        };
        let detector = ChangeDetector::new(config.monitor.threshold_pct);
        let mut monitor = Monitor::new(settings, catalog, sources, sinks, detector, SystemClock)?;

        let sweeps = monitor.run().await;
        tracing::info!(sweeps, "Monitor stopped");
        Ok(())
    }
}
