// HTTP response payload types.

use serde::Serialize;

use crate::transport::LinkState;

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub link: LinkState,
    pub sensor_connected: bool,
}
