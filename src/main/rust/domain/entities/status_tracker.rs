use crate::domain::value_objects::StatusSnapshot;

/// Publish actions owed after recording one tick's snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublishPlan {
    /// One-time message marking that streaming or recording just stopped
    pub final_message: bool,
    /// Regular message sent on every tick while streaming or recording
    pub steady_message: bool,
}

impl PublishPlan {
    pub fn is_silent(&self) -> bool {
        !self.final_message && !self.steady_message
    }
}

/// Domain entity holding the current and previous status snapshots and
/// deciding what each tick publishes
#[derive(Debug)]
pub struct StatusTracker {
    current: StatusSnapshot,
    previous: StatusSnapshot,
}

impl StatusTracker {
    pub fn new() -> Self {
        Self {
            current: StatusSnapshot::zeroed(),
            previous: StatusSnapshot::zeroed(),
        }
    }

    pub fn current(&self) -> &StatusSnapshot {
        &self.current
    }

    /// Record one tick's snapshot. The prior snapshot becomes the edge
    /// baseline; a stop edge on streaming or recording owes a final message,
    /// an active snapshot owes a steady message, and both can be owed in the
    /// same tick (stream stopped while recording continues).
    pub fn record(&mut self, snapshot: StatusSnapshot) -> PublishPlan {
        self.previous = self.current;
        self.current = snapshot;

        let streaming_stopped = self.previous.streaming && !self.current.streaming;
        let recording_stopped = self.previous.recording && !self.current.recording;

        PublishPlan {
            final_message: streaming_stopped || recording_stopped,
            steady_message: self.current.is_active(),
        }
    }
}

impl Default for StatusTracker {
    fn default() -> Self {
        Self::new()
    }
}
