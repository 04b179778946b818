//! Dial angle math for the radio volume knob.

#[cfg(test)]
#[path = "dial_math_test.rs"]
mod dial_math_test;

pub const DIAL_MIN_ANGLE_DEG: f64 = -135.0;
pub const DIAL_MAX_ANGLE_DEG: f64 = 135.0;

/// Map a `[0, 1]` level onto the dial sweep. Out-of-range or non-finite
/// levels pin to the nearest end.
pub fn dial_angle_from_level(level: f64) -> f64 {
    let level = if level.is_finite() { level.clamp(0.0, 1.0) } else { 0.0 };
    DIAL_MIN_ANGLE_DEG + level * (DIAL_MAX_ANGLE_DEG - DIAL_MIN_ANGLE_DEG)
}

/// CSS `transform` value that rotates an indicator to `angle`.
pub fn rotate_transform(angle: f64) -> String {
    format!("rotate({angle}deg)")
}
