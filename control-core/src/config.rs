// Control mapping constants, fixed for the lifetime of the process.
// Invariants: a validated config has non-degenerate input ranges, so mapping never divides by zero.

use thiserror::Error;

pub const MAX_LATERAL_RANGE: f64 = 150.0;
pub const MIN_HEIGHT: f64 = 150.0;
pub const MAX_HEIGHT: f64 = 350.0;
pub const MIN_SPEED: i32 = 20;
pub const MAX_SPEED: i32 = 99;
pub const MAX_ANGLE: i32 = 45;
pub const MAX_DIAL_DEGREE: i32 = 180;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ControlConfig {
    pub max_lateral_range: f64,
    pub min_height: f64,
    pub max_height: f64,
    pub min_speed: i32,
    pub max_speed: i32,
    pub max_angle: i32,
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("max lateral range must be positive, got {0}")]
    LateralRange(f64),
    #[error("height range is empty: min {min} >= max {max}")]
    HeightRange { min: f64, max: f64 },
    #[error("speed range is invalid: min {min}, max {max}")]
    SpeedRange { min: i32, max: i32 },
    #[error("max angle must be positive, got {0}")]
    Angle(i32),
}

impl ControlConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.max_lateral_range > 0.0) {
            return Err(ConfigError::LateralRange(self.max_lateral_range));
        }
        if !(self.min_height < self.max_height) {
            return Err(ConfigError::HeightRange {
                min: self.min_height,
                max: self.max_height,
            });
        }
        if self.min_speed < 0 || self.min_speed > self.max_speed {
            return Err(ConfigError::SpeedRange {
                min: self.min_speed,
                max: self.max_speed,
            });
        }
        if self.max_angle <= 0 {
            return Err(ConfigError::Angle(self.max_angle));
        }
        Ok(())
    }
}

impl Default for ControlConfig {
    fn default() -> Self {
        Self {
            max_lateral_range: MAX_LATERAL_RANGE,
            min_height: MIN_HEIGHT,
            max_height: MAX_HEIGHT,
            min_speed: MIN_SPEED,
            max_speed: MAX_SPEED,
            max_angle: MAX_ANGLE,
        }
    }
}
