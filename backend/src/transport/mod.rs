// Actuator transport seam: connection state plus fire-and-forget text frames.

mod ws;

use serde::Serialize;
use thiserror::Error;

pub use ws::WsLink;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LinkState {
    Connecting,
    Open,
    Closed,
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TransportError {
    #[error("link is not open")]
    NotOpen,
    #[error("link closed")]
    Closed,
}

// send never waits; a frame not yet written is replaced by the next one.
pub trait Transport: Send + Sync {
    fn link_state(&self) -> LinkState;

    fn send(&self, text: String) -> Result<(), TransportError>;
}
