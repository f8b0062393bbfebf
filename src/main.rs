use clap::Parser;
use skin_price_monitor::cli::{Cli, Commands};
use skin_price_monitor::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    skin_price_monitor::telemetry::init_telemetry(&config.telemetry)?;

    match cli.command {
        Commands::Run(args) => {
            tracing::info!("Starting price monitor");
            args.execute(config).await?;
        }
        Commands::Catalog(args) => {
            args.execute(config).await?;
        }
        Commands::Config => {
            println!("Current configuration:");
            println!(
                "  Catalog: {:?} (seed={}, api={})",
                config.catalog.source,
                config.catalog.seed_path.display(),
                config.catalog.api_base
            );
            println!(
                "  Monitor: interval={}s, threshold={}%, gap={}s",
                config.monitor.interval_secs,
                config.monitor.threshold_pct,
                config.monitor.request_gap_secs
            );
            println!(
                "  Sources: buff={}, steam={}, timeout={}s, attempts={}",
                config.sources.buff_base_url,
                config.sources.steam_base_url,
                config.sources.timeout_secs,
                config.sources.retry_attempts
            );
            println!(
                "  Sinks: csv={}, db={}",
                config.sink.out_csv.display(),
                config.sink.write_db
            );
        }
    }

    Ok(())
}
