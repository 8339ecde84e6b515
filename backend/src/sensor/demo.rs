// Synthetic hand path for running without hardware.
// Sweeps past both ends of the default lateral and height ranges, with a short no-target gap each cycle.

use std::f64::consts::TAU;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::info;

use super::SensorHandler;
use crate::constants::DEMO_FRAME_INTERVAL_MS;
use crate::model::{SensorFrame, TipPosition};
use crate::utils::shutdown_requested;

const LATERAL_AMPLITUDE: f64 = 180.0;
const LATERAL_PERIOD_SECS: f64 = 6.0;
const HEIGHT_CENTER: f64 = 250.0;
const HEIGHT_AMPLITUDE: f64 = 160.0;
const HEIGHT_PERIOD_SECS: f64 = 8.0;
const CYCLE_SECS: f64 = 12.0;
const GAP_SECS: f64 = 1.0;

// The last GAP_SECS of every cycle has no target.
pub fn demo_frame(t: f64) -> SensorFrame {
    if t.rem_euclid(CYCLE_SECS) >= CYCLE_SECS - GAP_SECS {
        return SensorFrame::default();
    }
    let x = LATERAL_AMPLITUDE * (TAU * t / LATERAL_PERIOD_SECS).sin();
    let y = HEIGHT_CENTER + HEIGHT_AMPLITUDE * (TAU * t / HEIGHT_PERIOD_SECS).sin();
    SensorFrame {
        id: None,
        pointables: vec![TipPosition { x, y, z: 0.0 }],
    }
}

pub async fn run<H: SensorHandler>(mut handler: H, mut shutdown: watch::Receiver<bool>) {
    info!("demo sensor source started");
    handler.on_connect();

    let start = Instant::now();
    let mut interval = time::interval(Duration::from_millis(DEMO_FRAME_INTERVAL_MS));
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut id: u64 = 0;
    loop {
        tokio::select! {
            _ = interval.tick() => {
                id += 1;
                let mut frame = demo_frame(start.elapsed().as_secs_f64());
                frame.id = Some(id);
                handler.on_frame(&frame);
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }

    handler.on_disconnect();
}
