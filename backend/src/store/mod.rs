// Single-value slots shared between the sensor task, control loops, and presentation.
// Invariants: each slot has exactly one writer handle; reads and writes replace the whole value.

use tokio::sync::watch;

use crate::model::{Command, PositionSample};

pub fn sample_slot() -> (SampleWriter, SampleReader) {
    let (tx, rx) = watch::channel(None);
    (SampleWriter { tx }, SampleReader { rx })
}

pub fn command_slot() -> (CommandPublisher, CommandView) {
    let (tx, rx) = watch::channel(Command::STOP);
    (CommandPublisher { tx }, CommandView { rx })
}

#[derive(Debug)]
// Not Clone: the sensor handler is the only writer.
pub struct SampleWriter {
    tx: watch::Sender<Option<PositionSample>>,
}

impl SampleWriter {
    pub fn record(&self, sample: PositionSample) {
        self.tx.send_replace(Some(sample));
    }

    pub fn clear(&self) {
        self.tx.send_replace(None);
    }
}

#[derive(Clone, Debug)]
pub struct SampleReader {
    rx: watch::Receiver<Option<PositionSample>>,
}

impl SampleReader {
    pub fn latest(&self) -> Option<PositionSample> {
        *self.rx.borrow()
    }
}

#[derive(Debug)]
// Not Clone: the sampling loop is the only writer.
pub struct CommandPublisher {
    tx: watch::Sender<Command>,
}

impl CommandPublisher {
    pub fn publish(&self, command: Command) -> bool {
        self.tx.send_if_modified(|current| {
            if *current == command {
                return false;
            }
            *current = command;
            true
        })
    }
}

#[derive(Clone, Debug)]
pub struct CommandView {
    rx: watch::Receiver<Command>,
}

impl CommandView {
    pub fn current(&self) -> Command {
        *self.rx.borrow()
    }
}
