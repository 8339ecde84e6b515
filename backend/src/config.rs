// Process configuration read once from the environment at startup.
// Unparsable numbers fall back to defaults; structural problems are errors.

use std::env;
use std::net::SocketAddr;
use std::time::Duration;

use thiserror::Error;

use crate::constants::{
    DEFAULT_ACTUATOR_HOST, DEFAULT_ACTUATOR_PATH, DEFAULT_ACTUATOR_PORT, DEFAULT_HTTP_BIND,
    DEFAULT_HTTP_PORT, DEFAULT_LEAP_URL, SAMPLE_INTERVAL_MS, SEND_INTERVAL_MS,
};
use crate::sensor::SensorKind;
use control_core::config::{self as control, ControlConfig};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error(transparent)]
    Control(#[from] control::ConfigError),
    #[error("unknown sensor source {0:?} (expected \"leap\" or \"demo\")")]
    UnknownSensor(String),
    #[error("invalid HTTP bind address {0:?}")]
    HttpAddr(String),
    #[error("{0} must be greater than zero")]
    ZeroInterval(&'static str),
}

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub actuator_host: String,
    pub actuator_port: u16,
    pub actuator_path: String,
    pub sensor: SensorKind,
    pub http_addr: SocketAddr,
    pub sample_interval: Duration,
    pub send_interval: Duration,
    pub control: ControlConfig,
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let parsed = |key: &str| lookup(key).and_then(|value| value.trim().parse::<f64>().ok());
        let parsed_int = |key: &str| lookup(key).and_then(|value| value.trim().parse::<i32>().ok());
        let parsed_ms = |key: &str, default: u64| {
            lookup(key)
                .and_then(|value| value.trim().parse::<u64>().ok())
                .unwrap_or(default)
        };

        let sensor = match lookup("SENSOR_SOURCE").as_deref().map(str::trim) {
            None | Some("") | Some("leap") => SensorKind::Leap {
                url: lookup("LEAP_WS_URL").unwrap_or_else(|| DEFAULT_LEAP_URL.to_string()),
            },
            Some("demo") => SensorKind::Demo,
            Some(other) => return Err(ConfigError::UnknownSensor(other.to_string())),
        };

        let http_bind = lookup("HTTP_BIND").unwrap_or_else(|| DEFAULT_HTTP_BIND.to_string());
        let http_port = lookup("HTTP_PORT")
            .and_then(|value| value.parse::<u16>().ok())
            .unwrap_or(DEFAULT_HTTP_PORT);
        let http_text = format!("{}:{}", http_bind, http_port);
        let http_addr = http_text
            .parse::<SocketAddr>()
            .map_err(|_| ConfigError::HttpAddr(http_text))?;

        let sample_ms = parsed_ms("SAMPLE_INTERVAL_MS", SAMPLE_INTERVAL_MS);
        if sample_ms == 0 {
            return Err(ConfigError::ZeroInterval("SAMPLE_INTERVAL_MS"));
        }
        let send_ms = parsed_ms("SEND_INTERVAL_MS", SEND_INTERVAL_MS);
        if send_ms == 0 {
            return Err(ConfigError::ZeroInterval("SEND_INTERVAL_MS"));
        }

        let control = ControlConfig {
            max_lateral_range: parsed("MAX_LATERAL_RANGE").unwrap_or(control::MAX_LATERAL_RANGE),
            min_height: parsed("MIN_HEIGHT").unwrap_or(control::MIN_HEIGHT),
            max_height: parsed("MAX_HEIGHT").unwrap_or(control::MAX_HEIGHT),
            min_speed: parsed_int("MIN_SPEED").unwrap_or(control::MIN_SPEED),
            max_speed: parsed_int("MAX_SPEED").unwrap_or(control::MAX_SPEED),
            max_angle: parsed_int("MAX_ANGLE").unwrap_or(control::MAX_ANGLE),
        };
        control.validate()?;

        Ok(Self {
            actuator_host: lookup("ACTUATOR_WS_HOST")
                .unwrap_or_else(|| DEFAULT_ACTUATOR_HOST.to_string()),
            actuator_port: lookup("ACTUATOR_WS_PORT")
                .and_then(|value| value.parse::<u16>().ok())
                .unwrap_or(DEFAULT_ACTUATOR_PORT),
            actuator_path: lookup("ACTUATOR_WS_PATH")
                .unwrap_or_else(|| DEFAULT_ACTUATOR_PATH.to_string()),
            sensor,
            http_addr,
            sample_interval: Duration::from_millis(sample_ms),
            send_interval: Duration::from_millis(send_ms),
            control,
        })
    }

    pub fn actuator_url(&self) -> String {
        format!(
            "ws://{}:{}/{}",
            self.actuator_host,
            self.actuator_port,
            self.actuator_path.trim_start_matches('/')
        )
    }
}
