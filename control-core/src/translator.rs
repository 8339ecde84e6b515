// Position sample to drive command translation.
// Invariants: pure and total; every output is clamped to its configured range.

use crate::config::{ControlConfig, MAX_DIAL_DEGREE};
use crate::mapping::map_range;
use crate::model::{Command, PositionSample};

pub fn translate(sample: Option<PositionSample>, config: &ControlConfig) -> Command {
    let sample = sample.unwrap_or_default();
    Command {
        speed: speed_for_height(sample.longitudinal, config),
        angle: steering_angle(sample.lateral, config),
        dial_degree: dial_degree(sample.longitudinal, config),
    }
}

pub fn steering_angle(lateral: f64, config: &ControlConfig) -> i32 {
    let magnitude = lateral.abs();
    let deflection = if magnitude > config.max_lateral_range {
        config.max_angle
    } else {
        map_range(
            magnitude,
            0.0,
            config.max_lateral_range,
            0.0,
            f64::from(config.max_angle),
        )
        .floor() as i32
    };
    if lateral < 0.0 {
        -deflection
    } else {
        deflection
    }
}

pub fn speed_for_height(height: f64, config: &ControlConfig) -> i32 {
    if height < config.min_height {
        return 0;
    }
    if height > config.max_height {
        return config.max_speed;
    }
    map_range(
        height,
        config.min_height,
        config.max_height,
        f64::from(config.min_speed),
        f64::from(config.max_speed),
    )
    .floor() as i32
}

pub fn dial_degree(height: f64, config: &ControlConfig) -> i32 {
    if height < config.min_height {
        return 0;
    }
    if height > config.max_height {
        return MAX_DIAL_DEGREE;
    }
    map_range(
        height,
        config.min_height,
        config.max_height,
        0.0,
        f64::from(MAX_DIAL_DEGREE),
    )
    .floor() as i32
}
