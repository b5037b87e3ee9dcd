use serde::Serialize;

/// One polling tick's worth of host status. Field names are the wire
/// contract: they serialize directly into the published JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct StatusSnapshot {
    pub recording: bool,
    pub streaming: bool,
    pub paused: bool,
    pub replay_buffer: bool,
    pub fps: f64,
    pub frame_time_ns: u64,
    pub frames: u64,
    pub lagged_frames: u64,
}

impl StatusSnapshot {
    /// All-false/all-zero snapshot, published as the final message on unload
    pub fn zeroed() -> Self {
        Self {
            recording: false,
            streaming: false,
            paused: false,
            replay_buffer: false,
            fps: 0.0,
            frame_time_ns: 0,
            frames: 0,
            lagged_frames: 0,
        }
    }

    /// True while the host is recording or streaming
    pub fn is_active(&self) -> bool {
        self.recording || self.streaming
    }
}

impl Default for StatusSnapshot {
    fn default() -> Self {
        Self::zeroed()
    }
}
