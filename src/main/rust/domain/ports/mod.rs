mod metrics_reporter;
mod scene_monitor;
mod status_publisher;
mod status_source;

pub use metrics_reporter::MetricsReporter;
pub use scene_monitor::{SceneCue, SceneMonitor};
pub use status_publisher::StatusPublisher;
pub use status_source::StatusSource;
