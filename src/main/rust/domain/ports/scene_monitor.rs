use async_trait::async_trait;

use crate::domain::errors::Result;
use crate::domain::value_objects::SceneView;

/// Scene change notification delivered by the host application
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneCue {
    /// The program (live) scene switched
    ProgramChanged(String),
    /// The preview (studio mode) scene switched
    PreviewChanged(String),
}

/// Port for the host application's scene interface
#[async_trait]
pub trait SceneMonitor: Send + Sync {
    /// Current program/preview scenes and the sources visible in each
    async fn scene_view(&self) -> Result<SceneView>;
}
