use std::error::Error;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use tsunami_evac::adapters::inbound::{serve, AppState};
use tsunami_evac::adapters::outbound::{init_combined_logger, map_source_for};
use tsunami_evac::{Config, EvacuationService};

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let config_path = Config::resolve_path();
    let (config, found) = Config::load_or_default(&config_path).await?;

    // Initialize tracing; RUST_LOG wins over the configured level
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(config.logging.level.as_directive()));
    let subscriber = tracing_subscriber::fmt().with_env_filter(filter).finish();
    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting tsunami evacuation simulation");
    if found {
        info!("Configuration loaded from {}", config_path.display());
    } else {
        warn!("{} not found, using default configuration", config_path.display());
    }

    let logger = init_combined_logger(config.logging.file.as_deref(), config.logging.level);
    let mut service = EvacuationService::from_config(&config, logger)?;

    // Footprints must be loaded before any request is served
    let source = map_source_for(&config.map.path);
    match service.load_map(source.as_ref()) {
        Ok(stats) => info!(
            "Loaded {} buildings ({} malformed ways skipped) in {:.3}s",
            stats.buildings, stats.malformed_buildings, stats.elapsed_secs
        ),
        Err(e) => {
            error!("Failed to load map {}: {}", config.map.path.display(), e);
            return Err(e.into());
        }
    }

    let addr = config.server_addr();
    tokio::select! {
        result = serve(&addr, AppState::new(service)) => result?,
        _ = tokio::signal::ctrl_c() => info!("Shutting down"),
    }

    Ok(())
}
