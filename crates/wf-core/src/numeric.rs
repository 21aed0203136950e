use crate::WfError;

/// Floating point type used for every coordinate and velocity.
pub type Real = f64;

/// Pass `v` through, or report it as non-finite under `what`.
pub fn ensure_finite(v: Real, what: &'static str) -> Result<Real, WfError> {
    if v.is_finite() {
        Ok(v)
    } else {
        Err(WfError::NonFinite { what, value: v })
    }
}
