//! Common helpers for turbine calculations.

use crate::error::{TurbineError, TurbineResult};
use wf_core::numeric::ensure_finite;

/// Ensure a value is finite, returning TurbineError if not.
pub fn check_finite(value: f64, what: &'static str) -> TurbineResult<()> {
    ensure_finite(value, what).map_err(|_| TurbineError::NonPhysical { what })?;
    Ok(())
}

/// Ensure a value is finite and strictly positive.
pub fn check_positive(value: f64, what: &'static str) -> TurbineResult<()> {
    check_finite(value, what)?;
    if value <= 0.0 {
        return Err(TurbineError::NonPhysical { what });
    }
    Ok(())
}

/// Piecewise-linear interpolation on an increasing table, clamped to the
/// end values outside the table.
pub fn interp(xs: &[f64], ys: &[f64], x: f64) -> f64 {
    debug_assert_eq!(xs.len(), ys.len());
    let n = xs.len();
    if n == 0 {
        return 0.0;
    }
    if x.is_nan() {
        return f64::NAN;
    }
    if x <= xs[0] {
        return ys[0];
    }
    if x >= xs[n - 1] {
        return ys[n - 1];
    }
    // first index with xs[i] > x; guaranteed in 1..n by the checks above
    let i = xs.partition_point(|&v| v <= x).clamp(1, n - 1);
    let (x0, x1) = (xs[i - 1], xs[i]);
    let (y0, y1) = (ys[i - 1], ys[i]);
    y0 + (y1 - y0) * (x - x0) / (x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interp() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert_eq!(interp(&xs, &ys, 0.5), 5.0);
        assert_eq!(interp(&xs, &ys, 2.0), 20.0);
        assert_eq!(interp(&xs, &ys, -1.0), 0.0);
        assert_eq!(interp(&xs, &ys, 9.0), 30.0);
        assert_eq!(interp(&xs, &ys, 1.0), 10.0);
    }

    #[test]
    fn interp_passes_nan_through() {
        let xs = [0.0, 1.0, 3.0];
        let ys = [0.0, 10.0, 30.0];
        assert!(interp(&xs, &ys, f64::NAN).is_nan());
        assert_eq!(interp(&xs, &ys, f64::INFINITY), 30.0);
        assert_eq!(interp(&xs, &ys, f64::NEG_INFINITY), 0.0);
    }

    #[test]
    fn test_check_positive() {
        assert!(check_positive(1.0, "test").is_ok());
        assert!(check_positive(0.0, "test").is_err());
        assert!(check_positive(f64::NAN, "test").is_err());
    }
}
