mod bridge_settings;
mod connection_state;
mod scene_view;
mod status_snapshot;
mod tally_color;

pub use bridge_settings::{BridgeSettings, MAX_INTERVAL_SECS, MIN_INTERVAL_SECS};
pub use connection_state::ConnectionState;
pub use scene_view::SceneView;
pub use status_snapshot::StatusSnapshot;
pub use tally_color::TallyColor;
