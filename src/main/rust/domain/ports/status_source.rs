use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::StatusSnapshot;

/// Port for the host application's status query interface
#[async_trait]
pub trait StatusSource: Send + Sync {
    /// Fetch the host's current recording/streaming status and performance
    /// counters as one snapshot
    async fn poll_status(&self) -> Result<StatusSnapshot>;
}
