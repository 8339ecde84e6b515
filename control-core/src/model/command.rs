// Drive command produced each sampling tick.

// dial_degree is display only and never transmitted.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Command {
    pub speed: i32,
    pub angle: i32,
    pub dial_degree: i32,
}

impl Command {
    pub const STOP: Command = Command {
        speed: 0,
        angle: 0,
        dial_degree: 0,
    };

    pub fn wire_text(&self) -> String {
        format!("{},{}", self.speed, self.angle)
    }

    pub fn speed_label(&self) -> String {
        format!("{:03}", self.speed)
    }
}
