use std::time::Duration;

use crate::domain::errors::{DomainError, Result};

/// Shortest accepted publish interval
pub const MIN_INTERVAL_SECS: u64 = 1;
/// Longest accepted publish interval
pub const MAX_INTERVAL_SECS: u64 = 3600;

const DEFAULT_BROKER_HOST: &str = "localhost";
const DEFAULT_BROKER_PORT: u16 = 1883;
const DEFAULT_TOPIC: &str = "obs/status";
const DEFAULT_INTERVAL_SECS: u64 = 5;

/// Validated broker and publishing settings for the bridge
#[derive(Debug, Clone, PartialEq)]
pub struct BridgeSettings {
    broker_host: String,
    broker_port: u16,
    topic: String,
    interval: Duration,
    tally_sources: Vec<String>,
}

impl BridgeSettings {
    pub fn new(
        broker_host: String,
        broker_port: u16,
        topic: String,
        interval: Duration,
        tally_sources: Vec<String>,
    ) -> Result<Self> {
        if broker_host.is_empty() {
            return Err(DomainError::InvalidBrokerHost);
        }
        if broker_port == 0 {
            return Err(DomainError::InvalidPort);
        }
        if topic.is_empty() {
            return Err(DomainError::InvalidTopic);
        }
        let secs = interval.as_secs();
        if !(MIN_INTERVAL_SECS..=MAX_INTERVAL_SECS).contains(&secs) {
            return Err(DomainError::InvalidInterval(secs));
        }
        if tally_sources.iter().any(|source| source.is_empty()) {
            return Err(DomainError::InvalidTallySource);
        }

        Ok(Self {
            broker_host,
            broker_port,
            topic,
            interval,
            tally_sources,
        })
    }

    pub fn broker_host(&self) -> &str {
        &self.broker_host
    }

    pub fn broker_port(&self) -> u16 {
        self.broker_port
    }

    pub fn topic(&self) -> &str {
        &self.topic
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub fn tally_sources(&self) -> &[String] {
        &self.tally_sources
    }
}

impl Default for BridgeSettings {
    fn default() -> Self {
        Self {
            broker_host: DEFAULT_BROKER_HOST.to_string(),
            broker_port: DEFAULT_BROKER_PORT,
            topic: DEFAULT_TOPIC.to_string(),
            interval: Duration::from_secs(DEFAULT_INTERVAL_SECS),
            tally_sources: Vec::new(),
        }
    }
}
