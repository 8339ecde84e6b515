// Shared state handed to the presentation router.

use std::sync::atomic::AtomicU64;
use std::sync::Arc;

use tokio::sync::{broadcast, watch};
use tokio::time::Instant;

use crate::store::CommandView;
use crate::transport::LinkState;

#[derive(Clone)]
pub struct AppState {
    pub tx: broadcast::Sender<String>,
    pub sequence: Arc<AtomicU64>,
    pub start_instant: Instant,
    pub commands: CommandView,
    pub link: watch::Receiver<LinkState>,
    pub sensor_connected: watch::Receiver<bool>,
}
