#![forbid(unsafe_code)]

//! Easing curves for the smooth-scroll animator.

/// Quartic ease-in-out.
///
/// `8p⁴` for the first half, `1 − (−2p + 2)⁴ / 2` for the second.
/// Input is clamped to `[0, 1]`; NaN maps to `0`.
#[must_use]
pub fn ease_in_out_quart(p: f64) -> f64 {
    let p = if p.is_nan() { 0.0 } else { p.clamp(0.0, 1.0) };
    if p < 0.5 {
        8.0 * p.powi(4)
    } else {
        1.0 - (-2.0 * p + 2.0).powi(4) / 2.0
    }
}
