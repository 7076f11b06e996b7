use crate::foundation::error::{OrbitcamError, OrbitcamResult};

/// Convert to an integer by discarding the fractional part (toward zero).
///
/// `-19.99` becomes `-19`, not `-20`. Out-of-range values saturate.
pub fn trunc_to_i64(v: f64) -> i64 {
    v.trunc() as i64
}

/// Require a finite, strictly positive value.
pub fn require_positive(name: &str, v: f64) -> OrbitcamResult<f64> {
    if !v.is_finite() {
        return Err(OrbitcamError::invalid_configuration(format!(
            "{name} must be finite, got {v}"
        )));
    }
    if v <= 0.0 {
        return Err(OrbitcamError::invalid_configuration(format!(
            "{name} must be positive, got {v}"
        )));
    }
    Ok(v)
}

/// Require a non-zero unsigned value.
pub fn require_nonzero(name: &str, v: u32) -> OrbitcamResult<u32> {
    if v == 0 {
        return Err(OrbitcamError::invalid_configuration(format!(
            "{name} must be positive, got 0"
        )));
    }
    Ok(v)
}

/// Round `v` to `decimals` places in single precision, half away from zero.
pub(crate) fn quantize_f32(v: f32, decimals: u32) -> f32 {
    let scale = 10f32.powi(decimals as i32);
    (v * scale).round() / scale
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_goes_toward_zero() {
        assert_eq!(trunc_to_i64(19.999), 19);
        assert_eq!(trunc_to_i64(-19.999), -19);
        assert_eq!(trunc_to_i64(-0.4), 0);
        assert_eq!(trunc_to_i64(0.0), 0);
        assert_eq!(trunc_to_i64(-78.539), -78);
    }

    #[test]
    fn truncation_saturates() {
        assert_eq!(trunc_to_i64(f64::INFINITY), i64::MAX);
        assert_eq!(trunc_to_i64(f64::NEG_INFINITY), i64::MIN);
        assert_eq!(trunc_to_i64(f64::NAN), 0);
    }

    #[test]
    fn positive_checks_reject_zero_negative_and_non_finite() {
        assert!(require_positive("scale", 0.0).is_err());
        assert!(require_positive("scale", -1.0).is_err());
        assert!(require_positive("scale", f64::NAN).is_err());
        assert!(require_positive("scale", f64::INFINITY).is_err());
        assert_eq!(require_positive("scale", 0.5).unwrap(), 0.5);

        assert!(require_nonzero("factor", 0).is_err());
        assert_eq!(require_nonzero("factor", 3).unwrap(), 3);
    }

    #[test]
    fn quantize_rounds_half_away_from_zero() {
        assert_eq!(quantize_f32(1.0 / 3.0, 2), 0.33);
        assert_eq!(quantize_f32(-2.0 / 3.0, 2), -0.67);
        assert_eq!(quantize_f32(0.5, 2), 0.5);
    }
}
