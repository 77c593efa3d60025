use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use farewatch_core::FlightStore;
use farewatch_fares::{DeeplinkFareLookup, HtmlPriceExtractor, SnapshotArchive};
use farewatch_monitor::{MonitorSettings, PriceMonitor, RunSummary};
use farewatch_store::{Config, RedisFlightStore};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Re-check the current fare of every tracked flight and record price drops.
#[derive(Debug, Parser)]
#[command(version)]
struct Args {
    /// Directory holding default/{RUN_MODE}/local config files
    #[arg(long, default_value = "config")]
    config_dir: PathBuf,

    /// Override the application namespace flights are stored under
    #[arg(long)]
    app_id: Option<String>,

    /// Override the per-flight fare lookup timeout
    #[arg(long)]
    lookup_timeout_secs: Option<u64>,
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "farewatch_monitor=info,farewatch_fares=info,farewatch_store=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    match run(args).await {
        Ok(summary) => {
            info!("Checked {} flight(s), updated {}", summary.flights_examined, summary.updated);
            ExitCode::SUCCESS
        }
        Err(e) => {
            error!("FATAL: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(args: Args) -> anyhow::Result<RunSummary> {
    let mut config = Config::load_from(&args.config_dir)
        .with_context(|| format!("Failed to load config from {}", args.config_dir.display()))?;
    if let Some(app_id) = args.app_id {
        config.store.app_id = app_id;
    }
    if let Some(secs) = args.lookup_timeout_secs {
        config.lookup.timeout_seconds = secs;
    }

    // Nothing is processed unless the store answers first
    let store = RedisFlightStore::new(&config.store.redis_url, &config.store.app_id)
        .context("Could not initialize the flight store client")?;
    store.ping().await.context("Could not connect to the flight store")?;

    let lookup = DeeplinkFareLookup::new(&config.lookup)
        .context("Could not build the fare lookup client")?
        .with_archive(SnapshotArchive::from_config(&config.snapshots), config.snapshots.archive);
    let extractor = HtmlPriceExtractor::new(&config.extractor).context("Invalid extractor configuration")?;

    let monitor = PriceMonitor::new(
        Arc::new(store),
        Arc::new(lookup),
        Arc::new(extractor),
        MonitorSettings::for_lookup_timeout(config.lookup.timeout_seconds),
    );

    Ok(monitor.run().await?)
}
