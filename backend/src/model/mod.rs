// Data models for command snapshots shared by the HTTP and WebSocket feeds.

mod snapshot;

pub use control_core::model::{Command, PositionSample, SensorFrame, TipPosition};
pub use snapshot::CommandSnapshot;
