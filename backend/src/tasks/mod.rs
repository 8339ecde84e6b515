// Periodic control tasks: sampling, actuator transmission, and the presentation feed.
// Invariants: the three cadences are independent; no task waits on another.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::time::{self, Instant, MissedTickBehavior};
use tracing::{debug, info, trace};

use crate::constants::SCHEMA_VERSION;
use crate::model::CommandSnapshot;
use crate::store::{CommandPublisher, CommandView, SampleReader};
use crate::transport::{LinkState, Transport};
use crate::utils::{monotonic_ms, next_sequence, now_epoch_ms, shutdown_requested};
use crate::ws::CommandUpdateMessage;
use control_core::config::ControlConfig;
use control_core::translator::translate;

fn ticker(period: Duration) -> time::Interval {
    let mut interval = time::interval(period);
    interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
    interval
}

pub async fn sampling_task(
    samples: SampleReader,
    publisher: CommandPublisher,
    config: ControlConfig,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = ticker(period);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                let command = translate(samples.latest(), &config);
                if publisher.publish(command) {
                    debug!(
                        speed = command.speed,
                        angle = command.angle,
                        dial_degree = command.dial_degree,
                        "command updated"
                    );
                }
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }
    info!("sampling loop stopped");
}

pub async fn transmission_task<T: Transport>(
    transport: T,
    commands: CommandView,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = ticker(period);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if transport.link_state() != LinkState::Open {
                    continue;
                }
                let text = commands.current().wire_text();
                trace!(frame = %text, "sending command");
                if let Err(err) = transport.send(text) {
                    debug!(%err, "command send skipped");
                }
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }
    info!("transmission loop stopped");
}

pub async fn command_feed_task(
    commands: CommandView,
    tx: broadcast::Sender<String>,
    sequence: Arc<AtomicU64>,
    start: Instant,
    period: Duration,
    mut shutdown: watch::Receiver<bool>,
) {
    let mut interval = ticker(period);
    loop {
        tokio::select! {
            _ = interval.tick() => {
                if tx.receiver_count() == 0 {
                    continue;
                }
                let message = CommandUpdateMessage {
                    schema_version: SCHEMA_VERSION,
                    timestamp_ms: now_epoch_ms(),
                    monotonic_ms: monotonic_ms(start),
                    sequence: next_sequence(sequence.as_ref()),
                    message_type: "command_update",
                    command: CommandSnapshot::from(commands.current()),
                };
                if let Ok(payload) = serde_json::to_string(&message) {
                    let _ = tx.send(payload);
                }
            }
            _ = shutdown_requested(&mut shutdown) => break,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;
    use crate::model::{Command, PositionSample};
    use crate::store::{command_slot, sample_slot};
    use crate::transport::TransportError;

    #[derive(Clone)]
    struct RecordingTransport {
        state: Arc<Mutex<LinkState>>,
        sent: Arc<Mutex<Vec<String>>>,
        rejects: Arc<Mutex<usize>>,
    }

    impl RecordingTransport {
        fn new(state: LinkState) -> Self {
            Self {
                state: Arc::new(Mutex::new(state)),
                sent: Arc::new(Mutex::new(Vec::new())),
                rejects: Arc::new(Mutex::new(0)),
            }
        }

        fn set_state(&self, state: LinkState) {
            *self.state.lock().unwrap() = state;
        }

        fn reject_next(&self, count: usize) {
            *self.rejects.lock().unwrap() = count;
        }

        fn sent(&self) -> Vec<String> {
            self.sent.lock().unwrap().clone()
        }
    }

    impl Transport for RecordingTransport {
        fn link_state(&self) -> LinkState {
            *self.state.lock().unwrap()
        }

        fn send(&self, text: String) -> Result<(), TransportError> {
            let mut rejects = self.rejects.lock().unwrap();
            if *rejects > 0 {
                *rejects -= 1;
                return Err(TransportError::Closed);
            }
            self.sent.lock().unwrap().push(text);
            Ok(())
        }
    }

    const SAMPLE_PERIOD: Duration = Duration::from_millis(200);
    const SEND_PERIOD: Duration = Duration::from_millis(50);

    #[tokio::test(start_paused = true)]
    async fn sampling_publishes_latest_sample() {
        let (writer, reader) = sample_slot();
        let (publisher, view) = command_slot();
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        writer.record(PositionSample::new(10.0, 400.0));
        writer.record(PositionSample::new(75.0, 250.0));
        let handle = tokio::spawn(sampling_task(
            reader,
            publisher,
            ControlConfig::default(),
            SAMPLE_PERIOD,
            shutdown_rx,
        ));

        time::sleep(Duration::from_millis(10)).await;
        assert_eq!(
            view.current(),
            Command {
                speed: 59,
                angle: 22,
                dial_degree: 90,
            }
        );

        writer.clear();
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(view.current().speed, 59, "changes wait for the next tick");

        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(view.current(), Command::STOP);

        shutdown_tx.send(true).expect("shutdown");
        handle.await.expect("sampling task");
    }

    #[tokio::test(start_paused = true)]
    async fn transmission_repeats_unchanged_command() {
        let (publisher, view) = command_slot();
        publisher.publish(Command {
            speed: 59,
            angle: -22,
            dial_degree: 90,
        });
        let transport = RecordingTransport::new(LinkState::Open);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(transmission_task(
            transport.clone(),
            view,
            SEND_PERIOD,
            shutdown_rx,
        ));

        time::sleep(Duration::from_millis(175)).await;
        shutdown_tx.send(true).expect("shutdown");
        handle.await.expect("transmission task");

        assert_eq!(transport.sent(), vec!["59,-22"; 4]);
    }

    #[tokio::test(start_paused = true)]
    async fn transmission_continues_after_failed_send() {
        let (_publisher, view) = command_slot();
        let transport = RecordingTransport::new(LinkState::Open);
        transport.reject_next(2);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(transmission_task(
            transport.clone(),
            view,
            SEND_PERIOD,
            shutdown_rx,
        ));

        time::sleep(Duration::from_millis(175)).await;
        shutdown_tx.send(true).expect("shutdown");
        handle.await.expect("transmission task");

        assert_eq!(transport.sent(), vec!["0,0", "0,0"]);
    }

    #[tokio::test(start_paused = true)]
    async fn transmission_skips_until_open() {
        let (_publisher, view) = command_slot();
        let transport = RecordingTransport::new(LinkState::Connecting);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(transmission_task(
            transport.clone(),
            view,
            SEND_PERIOD,
            shutdown_rx,
        ));

        time::sleep(Duration::from_millis(75)).await;
        assert!(transport.sent().is_empty());

        transport.set_state(LinkState::Open);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(transport.sent(), vec!["0,0", "0,0"]);

        transport.set_state(LinkState::Closed);
        time::sleep(Duration::from_millis(100)).await;
        assert_eq!(transport.sent().len(), 2);

        shutdown_tx.send(true).expect("shutdown");
        handle.await.expect("transmission task");
    }

    #[tokio::test(start_paused = true)]
    async fn loops_run_on_independent_cadences() {
        let (writer, reader) = sample_slot();
        let (publisher, view) = command_slot();
        let transport = RecordingTransport::new(LinkState::Open);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);

        writer.record(PositionSample::new(-999.0, 500.0));
        let sampling = tokio::spawn(sampling_task(
            reader,
            publisher,
            ControlConfig::default(),
            SAMPLE_PERIOD,
            shutdown_rx.clone(),
        ));
        let transmission = tokio::spawn(transmission_task(
            transport.clone(),
            view,
            SEND_PERIOD,
            shutdown_rx,
        ));

        time::sleep(Duration::from_millis(390)).await;
        shutdown_tx.send(true).expect("shutdown");
        sampling.await.expect("sampling task");
        transmission.await.expect("transmission task");

        let sent = transport.sent();
        assert_eq!(sent.len(), 8);
        assert!(sent.iter().skip(1).all(|frame| frame == "99,-45"));
    }

    #[tokio::test(start_paused = true)]
    async fn feed_broadcasts_snapshots() {
        let (publisher, view) = command_slot();
        publisher.publish(Command {
            speed: 7,
            angle: 3,
            dial_degree: 12,
        });
        let (tx, mut rx) = broadcast::channel(8);
        let (shutdown_tx, shutdown_rx) = watch::channel(false);
        let handle = tokio::spawn(command_feed_task(
            view,
            tx,
            Arc::new(AtomicU64::new(0)),
            Instant::now(),
            SAMPLE_PERIOD,
            shutdown_rx,
        ));

        let payload = rx.recv().await.expect("snapshot");
        let value: serde_json::Value = serde_json::from_str(&payload).expect("json");
        assert_eq!(value["type"], "command_update");
        assert_eq!(value["sequence"], 1);
        assert_eq!(value["command"]["speed_label"], "007");
        assert_eq!(value["command"]["dial_degree"], 12);

        shutdown_tx.send(true).expect("shutdown");
        handle.await.expect("feed task");
    }
}
