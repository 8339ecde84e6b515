// HandDrive controller: hand position in, drive commands out.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{self, Instant};
use tracing::{error, info, warn};

use handdrive_controller::app::AppState;
use handdrive_controller::config::AppConfig;
use handdrive_controller::constants::{FEED_CHANNEL_CAP, STOP_FRAME_TIMEOUT_MS};
use handdrive_controller::http;
use handdrive_controller::model::Command;
use handdrive_controller::sensor::{self, SampleRecorder};
use handdrive_controller::store;
use handdrive_controller::tasks;
use handdrive_controller::transport::WsLink;
use handdrive_controller::utils::shutdown_requested;

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let config = match AppConfig::from_env() {
        Ok(config) => config,
        Err(err) => {
            error!(%err, "invalid configuration");
            std::process::exit(2);
        }
    };
    info!(
        actuator = %config.actuator_url(),
        sensor = ?config.sensor,
        sample_ms = config.sample_interval.as_millis() as u64,
        send_ms = config.send_interval.as_millis() as u64,
        control = ?config.control,
        "starting handdrive"
    );

    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    let (sample_writer, sample_reader) = store::sample_slot();
    let (publisher, commands) = store::command_slot();
    let (sensor_tx, sensor_rx) = watch::channel(false);
    let start_instant = Instant::now();

    let recorder = SampleRecorder::new(sample_writer, sensor_tx);
    let sensor_task = tokio::spawn(sensor::run_source(
        config.sensor.clone(),
        recorder,
        shutdown_rx.clone(),
    ));

    let (link, link_task) = WsLink::connect(config.actuator_url());

    let sampling_task = tokio::spawn(tasks::sampling_task(
        sample_reader,
        publisher,
        config.control,
        config.sample_interval,
        shutdown_rx.clone(),
    ));
    let transmission_task = tokio::spawn(tasks::transmission_task(
        link.clone(),
        commands.clone(),
        config.send_interval,
        shutdown_rx.clone(),
    ));

    let (tx, _) = broadcast::channel::<String>(FEED_CHANNEL_CAP);
    let sequence = Arc::new(AtomicU64::new(0));
    let feed_task = tokio::spawn(tasks::command_feed_task(
        commands.clone(),
        tx.clone(),
        sequence.clone(),
        start_instant,
        config.sample_interval,
        shutdown_rx.clone(),
    ));

    let app_state = AppState {
        tx,
        sequence,
        start_instant,
        commands,
        link: link.subscribe_state(),
        sensor_connected: sensor_rx,
    };
    let app = http::router(app_state);

    let server = match axum::Server::try_bind(&config.http_addr) {
        Ok(builder) => builder,
        Err(err) => {
            error!(%err, addr = %config.http_addr, "failed to bind presentation server");
            std::process::exit(1);
        }
    };
    let mut server_shutdown = shutdown_rx.clone();
    info!(addr = %config.http_addr, "presentation feed listening");
    let server_task = tokio::spawn(async move {
        let graceful = server
            .serve(app.into_make_service())
            .with_graceful_shutdown(async move { shutdown_requested(&mut server_shutdown).await });
        if let Err(err) = graceful.await {
            warn!(?err, "presentation server exited");
        }
    });

    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(?err, "failed to listen for ctrl-c; shutting down");
    }
    info!("shutdown requested");
    let _ = shutdown_tx.send(true);

    join_named("sampling", sampling_task).await;
    join_named("transmission", transmission_task).await;

    let wait = Duration::from_millis(STOP_FRAME_TIMEOUT_MS);
    link.close_with(Command::STOP.wire_text(), wait, link_task).await;

    join_bounded("sensor", sensor_task, wait).await;
    join_bounded("feed", feed_task, wait).await;
    join_bounded("presentation server", server_task, wait).await;
    info!("stopped");
}

async fn join_named(name: &'static str, task: JoinHandle<()>) {
    if let Err(err) = task.await {
        warn!(task = name, ?err, "task failed");
    }
}

async fn join_bounded(name: &'static str, task: JoinHandle<()>, wait: Duration) {
    let abort = task.abort_handle();
    match time::timeout(wait, task).await {
        Ok(Ok(())) => {}
        Ok(Err(err)) => warn!(task = name, ?err, "task failed"),
        Err(_) => {
            warn!(task = name, "task did not stop in time; aborting");
            abort.abort();
        }
    }
}
