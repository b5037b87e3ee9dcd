use crate::domain::value_objects::ConnectionState;

/// Port for metrics reporting
pub trait MetricsReporter: Send + Sync {
    fn report_state_change(&self, state: &ConnectionState);
    fn report_status_publish(&self);
    fn report_tally_publish(&self);
    fn report_publish_failure(&self);
    fn report_scene_event(&self);
    fn report_uptime(&self, uptime_secs: f64);
}
