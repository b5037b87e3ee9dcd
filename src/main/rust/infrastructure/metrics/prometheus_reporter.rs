use lazy_static::lazy_static;
use prometheus::{Encoder, Gauge, IntCounter, Registry, TextEncoder};

use crate::domain::ports::MetricsReporter;
use crate::domain::value_objects::ConnectionState;

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Broker connection state (0=Disconnected, 1=Connecting, 2=Connected)
    pub static ref CONNECTION_STATE: Gauge = Gauge::new(
        "mqtt_connection_state",
        "Current MQTT broker connection state"
    ).expect("metric can be created");

    // Total status messages handed to the broker
    pub static ref STATUS_PUBLISHES: IntCounter = IntCounter::new(
        "status_publishes_total",
        "Total number of status messages published"
    ).expect("metric can be created");

    // Total tally color messages handed to the broker
    pub static ref TALLY_PUBLISHES: IntCounter = IntCounter::new(
        "tally_publishes_total",
        "Total number of tally color messages published"
    ).expect("metric can be created");

    // Publishes the broker session rejected
    pub static ref PUBLISH_FAILURES: IntCounter = IntCounter::new(
        "publish_failures_total",
        "Total number of failed publish attempts"
    ).expect("metric can be created");

    // Scene change notifications received from OBS
    pub static ref SCENE_EVENTS: IntCounter = IntCounter::new(
        "scene_events_total",
        "Total number of OBS scene change events handled"
    ).expect("metric can be created");

    // Time connected to the broker
    pub static ref CONNECTED_UPTIME: Gauge = Gauge::new(
        "mqtt_connected_uptime_seconds",
        "Time since the broker connection was established"
    ).expect("metric can be created");
}

pub struct PrometheusReporter;

impl PrometheusReporter {
    pub fn new() -> Self {
        Self
    }

    pub fn init_metrics() -> Result<(), prometheus::Error> {
        REGISTRY.register(Box::new(CONNECTION_STATE.clone()))?;
        REGISTRY.register(Box::new(STATUS_PUBLISHES.clone()))?;
        REGISTRY.register(Box::new(TALLY_PUBLISHES.clone()))?;
        REGISTRY.register(Box::new(PUBLISH_FAILURES.clone()))?;
        REGISTRY.register(Box::new(SCENE_EVENTS.clone()))?;
        REGISTRY.register(Box::new(CONNECTED_UPTIME.clone()))?;
        Ok(())
    }

    pub fn gather_metrics() -> Vec<u8> {
        let encoder = TextEncoder::new();
        let metric_families = REGISTRY.gather();
        let mut buffer = vec![];
        if let Err(e) = encoder.encode(&metric_families, &mut buffer) {
            tracing::error!("Failed to encode metrics: {}", e);
            return b"# Error encoding metrics\n".to_vec();
        }
        buffer
    }
}

impl Default for PrometheusReporter {
    fn default() -> Self {
        Self::new()
    }
}

impl MetricsReporter for PrometheusReporter {
    fn report_state_change(&self, state: &ConnectionState) {
        CONNECTION_STATE.set(state.as_metric());
    }

    fn report_status_publish(&self) {
        STATUS_PUBLISHES.inc();
    }

    fn report_tally_publish(&self) {
        TALLY_PUBLISHES.inc();
    }

    fn report_publish_failure(&self) {
        PUBLISH_FAILURES.inc();
    }

    fn report_scene_event(&self) {
        SCENE_EVENTS.inc();
    }

    fn report_uptime(&self, uptime_secs: f64) {
        CONNECTED_UPTIME.set(uptime_secs);
    }
}
