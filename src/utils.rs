//! Utility functions for numeric conversion, colors and aspect-ratio math.

pub mod color;
pub mod safe_cast;

/// Scale `length` by the ratio `numerator / denominator`
///
/// Returns `None` when the ratio is undefined (zero denominator) or the
/// result is not finite.
#[must_use]
#[allow(clippy::cast_precision_loss)] // Frame dimensions are far below f32 precision limits
pub fn scale_by_ratio(length: f32, numerator: u32, denominator: u32) -> Option<f32> {
    if denominator == 0 {
        return None;
    }
    let scaled = length * (numerator as f32 / denominator as f32);
    scaled.is_finite().then_some(scaled)
}
