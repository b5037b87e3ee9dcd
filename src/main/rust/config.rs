use std::time::Duration;

use clap::Parser;

use crate::domain::value_objects::{BridgeSettings, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
use crate::infrastructure::obs::ObsEndpoint;

#[derive(Parser, Debug, Clone)]
#[command(
    name = "bridge-obs-to-mqtt",
    version = "0.1.0",
    author = "OBS Status Bridge",
    about = "Publishes real-time OBS status info to the given MQTT server/port/topic at the configured interval"
)]
pub struct Config {
    /// MQTT broker hostname or address
    #[arg(long, env = "MQTT_HOST", default_value = "localhost")]
    pub mqtt_host: String,

    /// MQTT broker port
    #[arg(long, env = "MQTT_PORT", default_value = "1883")]
    pub mqtt_port: u16,

    /// Topic the status JSON is published to
    #[arg(long, env = "MQTT_TOPIC", default_value = "obs/status")]
    pub mqtt_topic: String,

    /// Seconds between status publishes
    #[arg(long, env = "UPDATE_INTERVAL", default_value = "5")]
    pub interval: u64,

    /// Comma-separated source names that receive tally colors
    #[arg(long, env = "TALLY_SOURCES", value_delimiter = ',')]
    pub tally_sources: Vec<String>,

    /// OBS websocket hostname
    #[arg(long, env = "OBS_HOST", default_value = "localhost")]
    pub obs_host: String,

    /// OBS websocket port
    #[arg(long, env = "OBS_PORT", default_value = "4455")]
    pub obs_port: u16,

    /// OBS websocket password
    #[arg(long, env = "OBS_PASSWORD")]
    pub obs_password: Option<String>,

    /// Metrics server port
    #[arg(long, env = "METRICS_PORT", default_value = "9003")]
    pub metrics_port: u16,

    /// Enable verbose logging
    #[arg(short, long)]
    pub verbose: bool,
}

/// Minimum allowed port (ports below 1024 are privileged)
const MIN_USER_PORT: u16 = 1024;

impl Config {
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.mqtt_host.trim().is_empty() {
            anyhow::bail!("MQTT host cannot be empty");
        }

        if self.mqtt_port == 0 {
            anyhow::bail!("Invalid MQTT port: port cannot be 0");
        }

        if self.mqtt_topic.trim().is_empty() {
            anyhow::bail!("MQTT topic cannot be empty");
        }

        if self.interval < MIN_INTERVAL_SECS || self.interval > MAX_INTERVAL_SECS {
            anyhow::bail!(
                "Update interval must be between {} and {} seconds",
                MIN_INTERVAL_SECS,
                MAX_INTERVAL_SECS
            );
        }

        if self.obs_port == 0 {
            anyhow::bail!("Invalid OBS port: port cannot be 0");
        }

        Self::validate_port(self.metrics_port, "metrics")?;

        Ok(())
    }

    fn validate_port(port: u16, name: &str) -> anyhow::Result<()> {
        if port == 0 {
            anyhow::bail!("Invalid {} port: port cannot be 0", name);
        }
        if port < MIN_USER_PORT {
            anyhow::bail!(
                "Invalid {} port: {} is a privileged port (< {}). Use a port >= {}",
                name,
                port,
                MIN_USER_PORT,
                MIN_USER_PORT
            );
        }
        Ok(())
    }

    pub fn to_bridge_settings(&self) -> crate::domain::errors::Result<BridgeSettings> {
        let tally_sources = self
            .tally_sources
            .iter()
            .map(|source| source.trim().to_string())
            .filter(|source| !source.is_empty())
            .collect();

        BridgeSettings::new(
            self.mqtt_host.trim().to_string(),
            self.mqtt_port,
            self.mqtt_topic.trim().to_string(),
            Duration::from_secs(self.interval),
            tally_sources,
        )
    }

    pub fn to_obs_endpoint(&self) -> ObsEndpoint {
        ObsEndpoint {
            host: self.obs_host.clone(),
            port: self.obs_port,
            password: self.obs_password.clone(),
        }
    }
}
