//! CLI interface for skin-price-monitor
//!
//! Provides subcommands for:
//! - `run`: Start the monitoring loop
//! - `catalog`: Show the items that would be monitored
//! - `config`: Show the effective configuration

mod catalog;
mod run;

pub use catalog::{load_configured_catalog, CatalogArgs};
pub use run::RunArgs;

use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "skin-price-monitor")]
#[command(about = "Samples Buff163 and Steam prices for a skin catalog")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: String,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the monitoring loop
    Run(RunArgs),
    /// Show the items that would be monitored
    Catalog(CatalogArgs),
    /// Show configuration
    Config,
}
