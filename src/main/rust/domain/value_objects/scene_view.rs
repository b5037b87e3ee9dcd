use std::collections::HashSet;

use super::TallyColor;

/// Snapshot of the host's program/preview scenes and the sources visible in
/// each, taken when a scene change fires
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneView {
    program_scene: Option<String>,
    preview_scene: Option<String>,
    program_sources: HashSet<String>,
    preview_sources: HashSet<String>,
}

impl SceneView {
    pub fn new(
        program_scene: Option<String>,
        preview_scene: Option<String>,
        program_sources: HashSet<String>,
        preview_sources: HashSet<String>,
    ) -> Self {
        Self {
            program_scene,
            preview_scene,
            program_sources,
            preview_sources,
        }
    }

    /// View with no scenes; every source resolves to idle
    pub fn empty() -> Self {
        Self {
            program_scene: None,
            preview_scene: None,
            program_sources: HashSet::new(),
            preview_sources: HashSet::new(),
        }
    }

    pub fn program_scene(&self) -> Option<&str> {
        self.program_scene.as_deref()
    }

    pub fn preview_scene(&self) -> Option<&str> {
        self.preview_scene.as_deref()
    }

    /// Tally color for one source under this view
    pub fn color_for(&self, source: &str) -> TallyColor {
        TallyColor::resolve(
            self.preview_sources.contains(source),
            self.program_sources.contains(source),
        )
    }
}
