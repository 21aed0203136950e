//! Borrowed flow state handed to the wake models, plus the per-point
//! evaluation helpers they share.

use rayon::prelude::*;
use wf_core::{Field, GridPoints};

use crate::error::{WakeError, WakeResult};

/// Read-only view of the flow field a wake model evaluates against.
#[derive(Clone, Copy, Debug)]
pub struct FlowView<'a> {
    /// Ambient streamwise velocity at every sample point.
    pub u_initial: &'a Field,
    /// Current lateral velocity.
    pub v: &'a Field,
    /// Current vertical velocity.
    pub w: &'a Field,
    /// Change of wind direction across the rotor (degrees).
    pub wind_veer: f64,
}

impl<'a> FlowView<'a> {
    pub fn new(u_initial: &'a Field, v: &'a Field, w: &'a Field, wind_veer: f64) -> Self {
        Self {
            u_initial,
            v,
            w,
            wind_veer,
        }
    }

    /// Check that every array matches the sample-point count.
    pub fn check_against(&self, points: GridPoints<'_>) -> WakeResult<()> {
        check_len(self.u_initial, points.len(), "ambient velocity")?;
        check_len(self.v, points.len(), "lateral velocity")?;
        check_len(self.w, points.len(), "vertical velocity")
    }
}

pub(crate) fn check_len(field: &Field, expected: usize, what: &'static str) -> WakeResult<()> {
    if field.len() != expected {
        return Err(WakeError::LengthMismatch {
            what,
            expected,
            actual: field.len(),
        });
    }
    Ok(())
}

/// Evaluate `f(i, x, y, z)` at every sample point in parallel.
pub(crate) fn map_points<F>(points: GridPoints<'_>, f: F) -> Field
where
    F: Fn(usize, f64, f64, f64) -> f64 + Sync + Send,
{
    let mut out = Field::zeros(points.len());
    out.as_mut_slice()
        .par_iter_mut()
        .enumerate()
        .for_each(|(i, value)| {
            let (x, y, z) = points.point(i);
            *value = f(i, x, y, z);
        });
    out
}

/// Like [`map_points`] for a two-component result such as `(v, w)`.
pub(crate) fn map_points_pair<F>(points: GridPoints<'_>, f: F) -> (Field, Field)
where
    F: Fn(usize, f64, f64, f64) -> (f64, f64) + Sync + Send,
{
    let pairs: Vec<(f64, f64)> = (0..points.len())
        .into_par_iter()
        .map(|i| {
            let (x, y, z) = points.point(i);
            f(i, x, y, z)
        })
        .collect();
    let a = Field::from_iterator(pairs.len(), pairs.iter().map(|p| p.0));
    let b = Field::from_iterator(pairs.len(), pairs.iter().map(|p| p.1));
    (a, b)
}
