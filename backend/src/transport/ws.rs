// WebSocket client link to the actuator.
// Invariants: one connection attempt per process; the outbound slot holds at most the newest unsent frame.

use std::sync::Arc;
use std::time::Duration;

use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time;
use tokio_tungstenite::tungstenite::Message;
use tracing::{info, warn};

use super::{LinkState, Transport, TransportError};

// Dropping every clone closes the connection.
#[derive(Clone, Debug)]
pub struct WsLink {
    outbound: Arc<watch::Sender<Option<String>>>,
    state: watch::Receiver<LinkState>,
}

impl WsLink {
    pub fn connect(url: String) -> (Self, JoinHandle<()>) {
        let (outbound_tx, outbound_rx) = watch::channel(None);
        let (state_tx, state_rx) = watch::channel(LinkState::Connecting);
        let task = tokio::spawn(link_task(url, outbound_rx, state_tx));
        (
            Self {
                outbound: Arc::new(outbound_tx),
                state: state_rx,
            },
            task,
        )
    }

    pub fn subscribe_state(&self) -> watch::Receiver<LinkState> {
        self.state.clone()
    }

    // The stop frame only goes out on an open link. Closing is bounded by `wait`.
    pub async fn close_with(self, last_frame: String, wait: Duration, task: JoinHandle<()>) {
        match self.send(last_frame) {
            Ok(()) => info!("stop frame queued"),
            Err(err) => info!(%err, "stop frame skipped"),
        }
        drop(self);

        let abort = task.abort_handle();
        if time::timeout(wait, task).await.is_err() {
            warn!("link did not close in time; aborting");
            abort.abort();
        }
    }
}

impl Transport for WsLink {
    fn link_state(&self) -> LinkState {
        *self.state.borrow()
    }

    fn send(&self, text: String) -> Result<(), TransportError> {
        if self.link_state() != LinkState::Open {
            return Err(TransportError::NotOpen);
        }
        if self.outbound.is_closed() {
            return Err(TransportError::Closed);
        }
        // An unsent older frame is overwritten, never queued ahead of this one.
        self.outbound.send_replace(Some(text));
        Ok(())
    }
}

async fn link_task(
    url: String,
    mut outbound_rx: watch::Receiver<Option<String>>,
    state_tx: watch::Sender<LinkState>,
) {
    info!(%url, "connecting to actuator");
    let socket = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((socket, _)) => socket,
        Err(err) => {
            warn!(?err, %url, "actuator connection failed");
            state_tx.send_replace(LinkState::Closed);
            return;
        }
    };
    state_tx.send_replace(LinkState::Open);
    info!(%url, "actuator link open");

    let (mut sink, mut stream) = socket.split();
    loop {
        tokio::select! {
            changed = outbound_rx.changed() => {
                if changed.is_err() {
                    let _ = sink.close().await;
                    break;
                }
                let frame = outbound_rx.borrow_and_update().clone();
                if let Some(text) = frame {
                    if let Err(err) = sink.send(Message::Text(text)).await {
                        warn!(?err, "actuator send failed");
                        break;
                    }
                }
            }
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(Message::Ping(payload))) => {
                        if sink.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(?err, "actuator link error");
                        break;
                    }
                }
            }
        }
    }

    state_tx.send_replace(LinkState::Closed);
    info!("actuator link closed");
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::net::TcpListener;

    async fn actuator() -> (String, JoinHandle<Vec<String>>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        let server = tokio::spawn(async move {
            let (tcp, _) = listener.accept().await.expect("accept");
            let mut socket = tokio_tungstenite::accept_async(tcp).await.expect("handshake");
            let mut frames = Vec::new();
            while let Some(Ok(message)) = socket.next().await {
                match message {
                    Message::Text(text) => frames.push(text),
                    Message::Close(_) => break,
                    _ => {}
                }
            }
            frames
        });
        (format!("ws://{addr}/ws"), server)
    }

    async fn wait_open(link: &WsLink) {
        let mut state = link.subscribe_state();
        while *state.borrow_and_update() != LinkState::Open {
            state.changed().await.expect("state");
        }
    }

    #[tokio::test]
    async fn unreachable_actuator_ends_closed() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let (link, task) = WsLink::connect(format!("ws://{addr}/ws"));
        let state = link.subscribe_state();
        task.await.expect("link task");
        assert_eq!(*state.borrow(), LinkState::Closed);
        assert_eq!(link.send("0,0".to_string()), Err(TransportError::NotOpen));
    }

    #[tokio::test]
    async fn streams_frames_in_order_and_stops() {
        let (url, server) = actuator().await;
        let (link, task) = WsLink::connect(url);
        let state = link.subscribe_state();
        wait_open(&link).await;

        link.send("42,-10".to_string()).expect("send");
        time::sleep(Duration::from_millis(20)).await;
        link.send("42,-10".to_string()).expect("send");
        time::sleep(Duration::from_millis(20)).await;
        link.close_with("0,0".to_string(), Duration::from_secs(2), task).await;

        let frames = server.await.expect("server");
        assert_eq!(frames, vec!["42,-10", "42,-10", "0,0"]);
        assert_eq!(*state.borrow(), LinkState::Closed);
    }

    #[tokio::test]
    async fn newest_frame_replaces_unsent_one() {
        let (url, server) = actuator().await;
        let (link, task) = WsLink::connect(url);
        wait_open(&link).await;

        let results: Vec<_> = (0..6).map(|speed| link.send(format!("{speed},0"))).collect();
        assert!(results.iter().all(Result::is_ok));
        time::sleep(Duration::from_millis(20)).await;
        link.close_with("0,0".to_string(), Duration::from_secs(2), task).await;

        let frames = server.await.expect("server");
        assert_eq!(frames, vec!["5,0", "0,0"]);
    }

    #[tokio::test]
    async fn stop_frame_skipped_while_connecting() {
        // Accepts TCP but never answers the upgrade, so the link stays Connecting.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("addr");

        let (link, task) = WsLink::connect(format!("ws://{addr}/ws"));
        let (_tcp, _) = listener.accept().await.expect("accept");
        let observer = link.clone();
        assert_eq!(observer.link_state(), LinkState::Connecting);

        let wait = Duration::from_millis(100);
        let started = std::time::Instant::now();
        link.close_with("0,0".to_string(), wait, task).await;

        assert!(started.elapsed() < Duration::from_secs(1));
        assert!(observer.outbound.borrow().is_none());
    }
}
