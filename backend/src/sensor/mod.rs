// Sensor sources and the handler that feeds the position slot.
// Invariants: sources own their connection lifecycle; the core only supplies the handler.

mod demo;
mod leap;

use tokio::sync::watch;
use tracing::{info, warn};

use crate::model::SensorFrame;
use crate::store::SampleWriter;

pub use demo::demo_frame;

#[derive(Clone, Debug, PartialEq)]
pub enum SensorKind {
    Leap { url: String },
    Demo,
}

pub trait SensorHandler: Send {
    fn on_connect(&mut self);

    fn on_frame(&mut self, frame: &SensorFrame);

    fn on_disconnect(&mut self) {}
}

pub struct SampleRecorder {
    writer: SampleWriter,
    connected: watch::Sender<bool>,
}

impl SampleRecorder {
    pub fn new(writer: SampleWriter, connected: watch::Sender<bool>) -> Self {
        Self { writer, connected }
    }
}

impl SensorHandler for SampleRecorder {
    fn on_connect(&mut self) {
        info!("sensor connected");
        self.connected.send_replace(true);
    }

    fn on_frame(&mut self, frame: &SensorFrame) {
        match frame.first_sample() {
            Some(sample) => self.writer.record(sample),
            None => self.writer.clear(),
        }
    }

    fn on_disconnect(&mut self) {
        warn!("sensor disconnected; clearing position");
        self.writer.clear();
        self.connected.send_replace(false);
    }
}

pub async fn run_source<H: SensorHandler>(
    kind: SensorKind,
    handler: H,
    shutdown: watch::Receiver<bool>,
) {
    match kind {
        SensorKind::Leap { url } => leap::run(url, handler, shutdown).await,
        SensorKind::Demo => demo::run(handler, shutdown).await,
    }
}
