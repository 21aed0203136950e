//! Fraction of a rotor covered by an upstream wake.

use crate::error::{FlowError, FlowResult};

/// Fraction of swept-area samples that sit inside a wake.
///
/// A sample is outside the wake when its freestream speed exceeds its wake
/// speed by no more than `tolerance`.
pub fn area_overlap(wake: &[f64], freestream: &[f64], tolerance: f64) -> FlowResult<f64> {
    if freestream.is_empty() {
        return Err(FlowError::precondition(
            "area overlap needs at least one swept-area sample",
        ));
    }
    if wake.len() != freestream.len() {
        return Err(FlowError::precondition(format!(
            "area overlap sample counts differ: {} wake vs {} freestream",
            wake.len(),
            freestream.len()
        )));
    }
    let outside = freestream
        .iter()
        .zip(wake)
        .filter(|&(f, w)| f - w <= tolerance)
        .count();
    let n = freestream.len();
    Ok((n - outside) as f64 / n as f64)
}
