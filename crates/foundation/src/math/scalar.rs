/// Linear interpolation from `a` toward `b` by factor `t`.
///
/// Used for every exponential-smoothing step in the canvas (velocity, drift,
/// opacity): calling it once per frame with a constant `t` converges on `b`
/// geometrically.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Clamp that tolerates `min > max` by returning `min`, and maps NaN to `min`.
#[inline]
pub fn clamp(v: f64, min: f64, max: f64) -> f64 {
    if v.is_nan() || v < min {
        return min;
    }
    if v > max {
        return max.max(min);
    }
    v
}
