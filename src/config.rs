//! Configuration types for skin-price-monitor

use crate::telemetry::LogFormat;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Environment variable holding the relational sink connection string
pub const DATABASE_URL_VAR: &str = "DATABASE_URL";

/// Startup configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A required environment variable is unset or empty
    #[error("Missing required env var: {0}")]
    MissingEnv(&'static str),
    /// Neither catalog provider produced items
    #[error("no items to monitor")]
    EmptyCatalog,
    /// A setting is out of range
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub monitor: MonitorConfig,
    #[serde(default)]
    pub sources: SourcesConfig,
    #[serde(default)]
    pub sink: SinkConfig,
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

/// Where the catalog comes from
#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum CatalogSource {
    /// Static JSON seed file
    #[default]
    Seed,
    /// Running backend's listing endpoint
    Api,
}

/// Catalog configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CatalogConfig {
    #[serde(default)]
    pub source: CatalogSource,
    #[serde(default = "default_seed_path")]
    pub seed_path: PathBuf,
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Try the other provider when the selected one is empty or fails
    #[serde(default = "default_true")]
    pub fallback: bool,
}

fn default_seed_path() -> PathBuf {
    PathBuf::from("prisma/seed/skins.json")
}
fn default_api_base() -> String {
    "http://127.0.0.1:3001".to_string()
}
fn default_true() -> bool {
    true
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            source: CatalogSource::Seed,
            seed_path: default_seed_path(),
            api_base: default_api_base(),
            fallback: true,
        }
    }
}

/// Monitoring loop configuration
#[derive(Debug, Clone, Deserialize)]
pub struct MonitorConfig {
    /// Seconds between sweeps; also the bucketing interval (0 disables bucketing)
    #[serde(default = "default_interval_secs")]
    pub interval_secs: u64,

    /// Minimum absolute percentage move reported as notable
    #[serde(default = "default_threshold_pct")]
    pub threshold_pct: Decimal,

    /// Seconds to pause after each adapter call
    #[serde(default = "default_request_gap_secs")]
    pub request_gap_secs: f64,
}

fn default_interval_secs() -> u64 {
    1800
}
fn default_threshold_pct() -> Decimal {
    Decimal::new(5, 1) // 0.5%
}
fn default_request_gap_secs() -> f64 {
    0.4
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            interval_secs: 1800,
            threshold_pct: Decimal::new(5, 1),
            request_gap_secs: 0.4,
        }
    }
}

impl MonitorConfig {
    /// Pause after each adapter call; zero if the value is out of range
    pub fn request_gap(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_gap_secs).unwrap_or_default()
    }
}

/// Upstream market configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SourcesConfig {
    #[serde(default = "default_buff_base_url")]
    pub buff_base_url: String,
    #[serde(default = "default_steam_base_url")]
    pub steam_base_url: String,
    #[serde(default = "default_steam_app_id")]
    pub steam_app_id: u32,
    #[serde(default = "default_steam_currency")]
    pub steam_currency: u32,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    #[serde(default = "default_retry_attempts")]
    pub retry_attempts: u32,
    #[serde(default = "default_retry_base_delay_ms")]
    pub retry_base_delay_ms: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

fn default_buff_base_url() -> String {
    crate::source::BUFF_API_URL.to_string()
}
fn default_steam_base_url() -> String {
    crate::source::STEAM_API_URL.to_string()
}
fn default_steam_app_id() -> u32 {
    730
}
fn default_steam_currency() -> u32 {
    1
}
fn default_timeout_secs() -> u64 {
    15
}
fn default_retry_attempts() -> u32 {
    3
}
fn default_retry_base_delay_ms() -> u64 {
    500
}
fn default_user_agent() -> String {
    crate::source::DEFAULT_USER_AGENT.to_string()
}

impl Default for SourcesConfig {
    fn default() -> Self {
        Self {
            buff_base_url: default_buff_base_url(),
            steam_base_url: default_steam_base_url(),
            steam_app_id: 730,
            steam_currency: 1,
            timeout_secs: 15,
            retry_attempts: 3,
            retry_base_delay_ms: 500,
            user_agent: default_user_agent(),
        }
    }
}

/// Persistence configuration
#[derive(Debug, Clone, Deserialize)]
pub struct SinkConfig {
    /// Flat-file sink path; always active
    #[serde(default = "default_out_csv")]
    pub out_csv: PathBuf,
    /// Enable the relational sink (requires DATABASE_URL)
    #[serde(default)]
    pub write_db: bool,
    /// KEY=VALUE file used to fill unset environment variables
    #[serde(default = "default_env_file")]
    pub env_file: PathBuf,
    #[serde(default = "default_db_connect_timeout_secs")]
    pub db_connect_timeout_secs: u64,
}

fn default_out_csv() -> PathBuf {
    PathBuf::from("price_samples.csv")
}
fn default_env_file() -> PathBuf {
    PathBuf::from(".env")
}
fn default_db_connect_timeout_secs() -> u64 {
    10
}

impl Default for SinkConfig {
    fn default() -> Self {
        Self {
            out_csv: default_out_csv(),
            write_db: false,
            env_file: default_env_file(),
            db_connect_timeout_secs: 10,
        }
    }
}

/// Telemetry configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelemetryConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub log_format: LogFormat,
    /// Prometheus exporter port; disabled when unset
    #[serde(default)]
    pub metrics_port: Option<u16>,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_format: LogFormat::Pretty,
            metrics_port: None,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file
    pub fn load(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Config = toml::from_str(&content)?;
        Ok(config)
    }

    /// Reject settings the monitor cannot run with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.monitor.threshold_pct < Decimal::ZERO {
            return Err(ConfigError::Invalid(format!(
                "threshold_pct must be non-negative, got {}",
                self.monitor.threshold_pct
            )));
        }
        let gap = self.monitor.request_gap_secs;
        if Duration::try_from_secs_f64(gap).is_err() {
            return Err(ConfigError::Invalid(format!(
                "request_gap_secs must be a non-negative number of seconds, got {gap}"
            )));
        }
        if self.sources.retry_attempts == 0 {
            return Err(ConfigError::Invalid(
                "retry_attempts must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}

/// Fill unset environment variables from a `KEY=VALUE` file
///
/// Variables already present in the environment are never overwritten.
/// A missing file is not an error.
pub fn load_env_file(path: &Path) -> anyhow::Result<bool> {
    if !path.exists() {
        return Ok(false);
    }
    dotenvy::from_path(path)
        .map_err(|e| anyhow::anyhow!("Failed to load {}: {}", path.display(), e))?;
    Ok(true)
}

/// Read the relational sink connection string
pub fn database_url() -> Result<String, ConfigError> {
    std::env::var(DATABASE_URL_VAR)
        .ok()
        .filter(|v| !v.trim().is_empty())
        .ok_or(ConfigError::MissingEnv(DATABASE_URL_VAR))
}
