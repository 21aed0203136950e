//! Sample-point arrays shared by the grid, turbines and wake models.

use nalgebra::DVector;

use crate::{Real, WfError, WfResult};

/// One value per grid sample point.
pub type Field = DVector<Real>;

/// Borrowed view of the sample-point coordinates in one reference frame.
#[derive(Clone, Copy, Debug)]
pub struct GridPoints<'a> {
    pub x: &'a Field,
    pub y: &'a Field,
    pub z: &'a Field,
}

impl<'a> GridPoints<'a> {
    /// Create a view, checking that the three arrays share one length.
    pub fn new(x: &'a Field, y: &'a Field, z: &'a Field) -> WfResult<Self> {
        if y.len() != x.len() {
            return Err(WfError::LengthMismatch {
                what: "grid y coordinates",
                expected: x.len(),
                actual: y.len(),
            });
        }
        if z.len() != x.len() {
            return Err(WfError::LengthMismatch {
                what: "grid z coordinates",
                expected: x.len(),
                actual: z.len(),
            });
        }
        Ok(Self { x, y, z })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }

    /// Coordinates of point `i`.
    #[inline]
    pub fn point(&self, i: usize) -> (Real, Real, Real) {
        (self.x[i], self.y[i], self.z[i])
    }
}

/// `n` evenly spaced values from `start` to `end` inclusive.
pub fn linspace(start: Real, end: Real, n: usize) -> Vec<Real> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as Real;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as Real })
                .collect()
        }
    }
}
