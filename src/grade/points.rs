//! Power points: a cross-event score from a time and the bracket's top tier.
//!
//! `points = round(1000 * (top * scale / swim)^3)`
//!
//! With the default scale a swim exactly on the top-tier time scores 800, not
//! 1000.

pub const DEFAULT_SCALE: f64 = 0.9283;

/// Power points with an explicit scale. `0` for non-positive or non-finite inputs.
pub fn power_points_scaled(swim_seconds: f64, top_tier_seconds: f64, scale: f64) -> u32 {
    let valid = |v: f64| v.is_finite() && v > 0.0;
    if !(valid(swim_seconds) && valid(top_tier_seconds) && valid(scale)) {
        return 0;
    }
    let base = top_tier_seconds * scale;
    let points = 1000.0 * (base / swim_seconds).powi(3);
    // `as` saturates, which is what we want for absurdly fast inputs.
    points.round() as u32
}
