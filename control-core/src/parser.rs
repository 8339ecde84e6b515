// Leap Motion WebSocket (JSON protocol v6) frame decoder.
// Invariants: only tracking frames decode; version and device event messages yield None.

use serde::Deserialize;

use crate::model::{SensorFrame, TipPosition};

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeapMessage {
    id: Option<u64>,
    pointables: Option<Vec<LeapPointable>>,
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct LeapPointable {
    stabilized_tip_position: Option<[f64; 3]>,
    tip_position: Option<[f64; 3]>,
}

pub fn parse_leap_message(text: &str) -> Option<SensorFrame> {
    let message: LeapMessage = serde_json::from_str(text).ok()?;
    let pointables = message.pointables?;

    let pointables = pointables
        .into_iter()
        .filter_map(|pointable| {
            let [x, y, z] = pointable
                .stabilized_tip_position
                .or(pointable.tip_position)?;
            Some(TipPosition { x, y, z })
        })
        .collect();

    Some(SensorFrame {
        id: message.id,
        pointables,
    })
}
