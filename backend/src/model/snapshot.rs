// Read-only command snapshot rendered by presentation clients.

use serde::Serialize;

use super::Command;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct CommandSnapshot {
    pub speed: i32,
    pub angle: i32,
    pub dial_degree: i32,
    pub speed_label: String,
}

impl From<Command> for CommandSnapshot {
    fn from(command: Command) -> Self {
        Self {
            speed: command.speed,
            angle: command.angle,
            dial_degree: command.dial_degree,
            speed_label: command.speed_label(),
        }
    }
}
