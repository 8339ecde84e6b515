// Decoded sensor tracking frame.

use super::PositionSample;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TipPosition {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
pub struct SensorFrame {
    pub id: Option<u64>,
    pub pointables: Vec<TipPosition>,
}

impl SensorFrame {
    pub fn first_sample(&self) -> Option<PositionSample> {
        self.pointables
            .first()
            .map(|tip| PositionSample::new(tip.x.floor(), tip.y.floor()))
    }
}
