// Core data models for position samples, sensor frames, and drive commands.

mod command;
mod frame;
mod sample;

pub use command::Command;
pub use frame::{SensorFrame, TipPosition};
pub use sample::PositionSample;
