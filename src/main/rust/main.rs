use std::sync::Arc;

use anyhow::Result;
use clap::Parser;
use tokio::sync::{mpsc, oneshot};
use tracing::{error, info};

use bridge_obs_to_mqtt::{
    serve_metrics, BridgeService, BridgeSettings, Config, ObsGateway, PrometheusReporter,
    RumqttPublisher,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Parse configuration
    let config = Config::parse();
    config.validate()?;

    // Initialize logging
    let filter = if config.verbose { "debug" } else { "info" };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .init();

    // Initialize metrics
    PrometheusReporter::init_metrics()?;

    info!("Starting OBS to MQTT bridge v{}", env!("CARGO_PKG_VERSION"));
    info!("  MQTT broker: {}:{}", config.mqtt_host, config.mqtt_port);
    info!("  Status topic: {}", config.mqtt_topic);
    info!("  Update interval: {}s", config.interval);
    info!("  OBS websocket: {}:{}", config.obs_host, config.obs_port);
    info!("  Metrics port: {}", config.metrics_port);

    // Start metrics server
    let metrics_port = config.metrics_port;
    tokio::spawn(async move {
        serve_metrics(metrics_port).await;
    });

    // Convert CLI config to domain settings
    let settings = config
        .to_bridge_settings()
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    // Create infrastructure implementations (dependency injection)
    let (gateway, cue_rx) = ObsGateway::new(config.to_obs_endpoint());
    let gateway = Arc::new(gateway);
    let publisher = Box::new(RumqttPublisher::new());
    let metrics_reporter = Arc::new(PrometheusReporter::new());

    // Create application service
    let mut bridge_service =
        BridgeService::new(gateway.clone(), gateway, publisher, metrics_reporter);

    bridge_service
        .apply_settings(settings)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;
    info!("MQTT bridge loaded");

    // Settings stay fixed for the process lifetime; the sender is held open
    // so the run loop keeps its settings arm alive.
    let (_settings_tx, settings_rx) = mpsc::channel::<BridgeSettings>(1);

    // Handle Ctrl+C
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Shutdown signal received (Ctrl+C)");
                let _ = shutdown_tx.send(());
            }
            Err(err) => {
                error!("Failed to listen for shutdown signal: {}", err);
            }
        }
    });

    bridge_service
        .run(cue_rx, settings_rx, shutdown_rx)
        .await
        .map_err(|e| anyhow::anyhow!("{}", e))?;

    info!("Bridge shutdown complete");
    Ok(())
}
