//! Safe casting utilities for pixel coordinates and color channels

/// Clamp and round f32 to i32 for pixel coordinates
///
/// Non-finite values collapse to `min`.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Acceptable for clamping bounds
#[allow(clippy::cast_possible_truncation)] // Clamping ensures safe truncation
pub fn f32_to_i32_clamp(value: f32, min: i32, max: i32) -> i32 {
    let (min, max) = if min <= max { (min, max) } else { (max, min) };

    if !value.is_finite() {
        return min;
    }

    let clamped = value.round().clamp(min as f32, max as f32);
    (clamped as i32).clamp(min, max)
}

/// Convert a unit-interval intensity (0.0..=1.0) to an 8-bit channel
#[must_use]
#[allow(clippy::cast_possible_truncation)] // Clamped to 0..=255 before the cast
#[allow(clippy::cast_sign_loss)]
pub fn unit_to_u8(value: f32) -> u8 {
    if !value.is_finite() {
        return 0;
    }
    (value.clamp(0.0, 1.0) * 255.0).round() as u8
}
