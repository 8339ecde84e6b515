// WebSocket presentation feed for command snapshots.

use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::extract::State as AxumState;
use axum::response::IntoResponse;
use futures::StreamExt;
use serde::Serialize;
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::app::AppState;
use crate::constants::SCHEMA_VERSION;
use crate::model::CommandSnapshot;
use crate::transport::LinkState;
use crate::utils::{monotonic_ms, next_sequence, now_epoch_ms};

#[derive(Serialize)]
pub struct HandshakeHello {
    pub schema_version: &'static str,
    pub timestamp_ms: u64,
    pub monotonic_ms: u64,
    pub sequence: u64,
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub link: LinkState,
    pub command: CommandSnapshot,
}

#[derive(Serialize)]
pub struct CommandUpdateMessage {
    pub schema_version: &'static str,
    pub timestamp_ms: u64,
    pub monotonic_ms: u64,
    pub sequence: u64,
    #[serde(rename = "type")]
    pub message_type: &'static str,
    pub command: CommandSnapshot,
}

pub async fn ws_handler(
    AxumState(app_state): AxumState<AppState>,
    ws: WebSocketUpgrade,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, app_state))
}

fn hello_message(app_state: &AppState) -> HandshakeHello {
    HandshakeHello {
        schema_version: SCHEMA_VERSION,
        timestamp_ms: now_epoch_ms(),
        monotonic_ms: monotonic_ms(app_state.start_instant),
        sequence: next_sequence(app_state.sequence.as_ref()),
        message_type: "handshake_hello",
        link: *app_state.link.borrow(),
        command: CommandSnapshot::from(app_state.commands.current()),
    }
}

async fn handle_socket(mut socket: WebSocket, app_state: AppState) {
    info!("presentation client connected");
    let mut rx = app_state.tx.subscribe();
    if let Ok(payload) = serde_json::to_string(&hello_message(&app_state)) {
        if socket.send(Message::Text(payload)).await.is_err() {
            return;
        }
    }

    loop {
        tokio::select! {
            outbound = rx.recv() => {
                match outbound {
                    Ok(payload) => {
                        if socket.send(Message::Text(payload)).await.is_err() {
                            break;
                        }
                    }
                    Err(broadcast::error::RecvError::Lagged(skipped)) => {
                        debug!(skipped, "presentation client lagging");
                    }
                    Err(_) => break,
                }
            }
            // Inbound messages are never applied; the feed is read-only.
            inbound = socket.next() => {
                match inbound {
                    Some(Ok(Message::Ping(payload))) => {
                        if socket.send(Message::Pong(payload)).await.is_err() {
                            break;
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(?err, "presentation ws error");
                        break;
                    }
                }
            }
        }
    }
    info!("presentation client disconnected");
}
