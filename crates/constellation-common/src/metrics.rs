//! Metric primitives shared by every scoring formula

/// Clamp `value` into `[min, max]`.
///
/// NaN collapses to `min` so a malformed intermediate can never escape a
/// bounded score.
#[inline]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if value.is_nan() {
        return min;
    }
    value.max(min).min(max)
}

/// Clamp into the unit interval `[0, 1]`
#[inline]
pub fn clamp_unit(value: f64) -> f64 {
    clamp(value, 0.0, 1.0)
}

/// `numerator / denominator`, or `default` when the denominator is zero
/// or the quotient is not finite.
#[inline]
pub fn ratio_or(numerator: f64, denominator: f64, default: f64) -> f64 {
    if denominator == 0.0 {
        return default;
    }
    let ratio = numerator / denominator;
    if ratio.is_finite() {
        ratio
    } else {
        default
    }
}

/// Linear interpolation from `min` to `max` as `value` moves from
/// `threshold` to `ceiling`. Values outside the band are pinned to its ends.
pub fn scale_between(value: f64, threshold: f64, ceiling: f64, min: f64, max: f64) -> f64 {
    let progress = clamp_unit(ratio_or(value - threshold, ceiling - threshold, 0.0));
    min + (max - min) * progress
}

/// Weighted sum of `(value, weight)` pairs
pub fn weighted_sum(terms: &[(f64, f64)]) -> f64 {
    terms.iter().map(|(value, weight)| value * weight).sum()
}

/// Product of multiplicative modifiers
pub fn product(factors: &[f64]) -> f64 {
    factors.iter().product()
}
