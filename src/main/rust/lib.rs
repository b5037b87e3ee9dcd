pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;

// Re-exports for convenience
pub use application::services::BridgeService;
pub use config::Config;
pub use domain::entities::{ConnectionLifecycle, StateTransition, StatusTracker, TallyBoard};
pub use domain::errors::{DomainError, Result};
pub use domain::ports::{MetricsReporter, SceneCue, SceneMonitor, StatusPublisher, StatusSource};
pub use domain::value_objects::{
    BridgeSettings, ConnectionState, SceneView, StatusSnapshot, TallyColor,
};
pub use infrastructure::metrics::{serve_metrics, PrometheusReporter};
pub use infrastructure::mqtt::RumqttPublisher;
pub use infrastructure::obs::{ObsEndpoint, ObsGateway};
