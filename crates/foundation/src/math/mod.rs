pub mod lerp;
pub mod spherical;

pub use lerp::*;
pub use spherical::*;

/// Clamp to `[0, 1]`, mapping NaN and infinities to `0.0`.
///
/// Anything headed for a shader uniform goes through this first: a NaN
/// uniform renders black with no error to catch.
pub fn sanitize_unit(v: f32) -> f32 {
    if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }
}

/// Return `v` when finite, otherwise `fallback`.
pub fn finite_or(v: f32, fallback: f32) -> f32 {
    if v.is_finite() { v } else { fallback }
}

/// Safe division: returns `None` when the divisor is zero, negative or not finite.
pub fn checked_ratio(num: f64, den: f64) -> Option<f64> {
    if den.is_finite() && den > 0.0 && num.is_finite() {
        Some(num / den)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{checked_ratio, finite_or, sanitize_unit};

    #[test]
    fn sanitize_unit_clamps_and_drops_nan() {
        assert_eq!(sanitize_unit(0.25), 0.25);
        assert_eq!(sanitize_unit(-3.0), 0.0);
        assert_eq!(sanitize_unit(7.0), 1.0);
        assert_eq!(sanitize_unit(f32::NAN), 0.0);
        assert_eq!(sanitize_unit(f32::INFINITY), 0.0);
    }

    #[test]
    fn finite_or_falls_back() {
        assert_eq!(finite_or(2.0, 1.0), 2.0);
        assert_eq!(finite_or(f32::NEG_INFINITY, 1.0), 1.0);
    }

    #[test]
    fn checked_ratio_guards_zero_denominator() {
        assert_eq!(checked_ratio(10.0, 0.0), None);
        assert_eq!(checked_ratio(10.0, -5.0), None);
        assert_eq!(checked_ratio(f64::NAN, 5.0), None);
        assert_eq!(checked_ratio(10.0, 4.0), Some(2.5));
    }
}
