use crate::domain::value_objects::{SceneView, TallyColor};

/// Domain entity tracking the last-published tally color per configured
/// source. Entries are fixed at construction; configuration changes rebuild
/// the whole board.
#[derive(Debug)]
pub struct TallyBoard {
    // Config order, so publishes come out in a stable sequence
    colors: Vec<(String, Option<TallyColor>)>,
}

impl TallyBoard {
    pub fn new(sources: &[String]) -> Self {
        Self {
            colors: sources
                .iter()
                .map(|source| (source.clone(), None))
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// MQTT topic a source's color is published to
    pub fn topic_for(source: &str) -> String {
        format!("cmnd/{}/COLOR", source)
    }

    /// Resolve every source against the view and return the ones whose color
    /// differs from the last published one. A source that has never been
    /// published counts as changed.
    pub fn evaluate(&self, view: &SceneView) -> Vec<(String, TallyColor)> {
        self.colors
            .iter()
            .filter_map(|(source, published)| {
                let resolved = view.color_for(source);
                if *published == Some(resolved) {
                    None
                } else {
                    Some((source.clone(), resolved))
                }
            })
            .collect()
    }

    /// Record that a source's color went out on the wire
    pub fn mark_published(&mut self, source: &str, color: TallyColor) {
        if let Some(entry) = self.colors.iter_mut().find(|(name, _)| name == source) {
            entry.1 = Some(color);
        }
    }

    /// Idle color for every tracked source, published unconditionally on
    /// unload so no light stays lit
    pub fn blackout(&self) -> Vec<(String, TallyColor)> {
        self.colors
            .iter()
            .map(|(source, _)| (source.clone(), TallyColor::Idle))
            .collect()
    }
}
