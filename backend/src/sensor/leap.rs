// Leap Motion WebSocket service source.

use futures::{SinkExt, StreamExt};
use tokio::sync::watch;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, info, warn};

use super::SensorHandler;
use crate::utils::shutdown_requested;
use control_core::parser::parse_leap_message;

// Keep frames flowing while the service's own UI has focus elsewhere.
const BACKGROUND_REQUEST: &str = r#"{"background":true}"#;

pub async fn run<H: SensorHandler>(url: String, mut handler: H, mut shutdown: watch::Receiver<bool>) {
    info!(%url, "connecting to leap service");
    let mut socket = match tokio_tungstenite::connect_async(url.as_str()).await {
        Ok((socket, _)) => socket,
        Err(err) => {
            warn!(?err, %url, "leap service unavailable");
            return;
        }
    };
    handler.on_connect();

    if let Err(err) = socket.send(Message::Text(BACKGROUND_REQUEST.to_string())).await {
        warn!(?err, "failed to request background frames");
    }

    let mut frames: u64 = 0;
    loop {
        tokio::select! {
            inbound = socket.next() => {
                match inbound {
                    Some(Ok(Message::Text(text))) => {
                        if let Some(frame) = parse_leap_message(&text) {
                            frames += 1;
                            handler.on_frame(&frame);
                        }
                    }
                    Some(Ok(Message::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(err)) => {
                        warn!(?err, "leap stream error");
                        break;
                    }
                }
            }
            _ = shutdown_requested(&mut shutdown) => {
                let _ = socket.close(None).await;
                break;
            }
        }
    }

    debug!(frames, "leap source stopped");
    handler.on_disconnect();
}
