// Shared constants for loop timing, endpoints, and protocol.

pub const SCHEMA_VERSION: &str = "1.0";
pub const SAMPLE_INTERVAL_MS: u64 = 200;
pub const SEND_INTERVAL_MS: u64 = 50;
pub const DEMO_FRAME_INTERVAL_MS: u64 = 16;
pub const FEED_CHANNEL_CAP: usize = 64;
pub const STOP_FRAME_TIMEOUT_MS: u64 = 250;
pub const DEFAULT_ACTUATOR_HOST: &str = "localhost";
pub const DEFAULT_ACTUATOR_PORT: u16 = 3000;
pub const DEFAULT_ACTUATOR_PATH: &str = "ws";
pub const DEFAULT_LEAP_URL: &str = "ws://127.0.0.1:6437/v6.json";
pub const DEFAULT_HTTP_BIND: &str = "127.0.0.1";
pub const DEFAULT_HTTP_PORT: u16 = 10087;
