// Linear range mapping used by every command derivation.

// Unclamped. Callers guarantee in_min != in_max.
pub fn map_range(x: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    (x - in_min) * (out_max - out_min) / (in_max - in_min) + out_min
}
