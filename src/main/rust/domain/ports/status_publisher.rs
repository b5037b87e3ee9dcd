use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::{BridgeSettings, ConnectionState};

/// Port for the outbound publishing side of the bridge
#[async_trait]
pub trait StatusPublisher: Send + Sync {
    /// Tear down any current broker session and open a new one against the
    /// given settings. Resolution failures and refused connections are
    /// logged and swallowed; the publisher stays disconnected until the
    /// next reconnect check.
    async fn apply(&mut self, settings: &BridgeSettings) -> Result<()>;

    /// Publish one payload to one topic
    async fn publish(&self, topic: &str, payload: String) -> Result<()>;

    /// Close the broker session
    async fn disconnect(&mut self) -> Result<()>;

    /// Current broker session state
    fn connection_state(&self) -> ConnectionState;

    /// Nudge a disconnected session into another connection attempt; called
    /// once per status tick
    fn reconnect_check(&self);
}
