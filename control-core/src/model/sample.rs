// Hand position sample in sensor-native units.

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct PositionSample {
    pub lateral: f64,
    pub longitudinal: f64,
}

impl PositionSample {
    pub fn new(lateral: f64, longitudinal: f64) -> Self {
        Self {
            lateral,
            longitudinal,
        }
    }
}
