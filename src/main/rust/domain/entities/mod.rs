mod connection_lifecycle;
mod status_tracker;
mod tally_board;

pub use connection_lifecycle::{ConnectionLifecycle, StateTransition};
pub use status_tracker::{PublishPlan, StatusTracker};
pub use tally_board::TallyBoard;
