//! Three-component coordinate with rotated-frame copies.

use crate::trig::{cosd, sind};
use crate::Real;

/// Immutable spatial point `(x1, x2, x3)`.
///
/// Rotation never mutates: [`Vec3::rotate_on_x3`] returns a new value whose
/// primed components hold the coordinates in the rotated frame while the
/// unprimed components keep the original position. An unrotated value
/// reports its own components as primes.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Vec3 {
    pub x1: Real,
    pub x2: Real,
    pub x3: Real,
    #[cfg_attr(feature = "serde", serde(skip))]
    prime: Option<[Real; 3]>,
}

impl Vec3 {
    pub const fn new(x1: Real, x2: Real, x3: Real) -> Self {
        Self {
            x1,
            x2,
            x3,
            prime: None,
        }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Rotate about the x3 axis through `center` by `theta` degrees.
    ///
    /// A zero angle reproduces the coordinates bit for bit.
    pub fn rotate_on_x3(&self, theta: Real, center: &Vec3) -> Vec3 {
        let (x1prime, x2prime) = rotate_xy(self.x1, self.x2, theta, center.x1, center.x2);
        Self {
            prime: Some([x1prime, x2prime, self.x3]),
            ..*self
        }
    }

    pub fn x1prime(&self) -> Real {
        self.prime.map_or(self.x1, |p| p[0])
    }

    pub fn x2prime(&self) -> Real {
        self.prime.map_or(self.x2, |p| p[1])
    }

    pub fn x3prime(&self) -> Real {
        self.prime.map_or(self.x3, |p| p[2])
    }

    /// The rotated-frame coordinates as a plain point.
    pub fn primed(&self) -> Vec3 {
        Vec3::new(self.x1prime(), self.x2prime(), self.x3prime())
    }

    pub fn is_finite(&self) -> bool {
        self.x1.is_finite() && self.x2.is_finite() && self.x3.is_finite()
    }
}

/// Rotate a single `(x, y)` pair about `(cx, cy)` by `theta` degrees.
#[inline]
pub(crate) fn rotate_xy(x: Real, y: Real, theta: Real, cx: Real, cy: Real) -> (Real, Real) {
    if theta == 0.0 {
        return (x, y);
    }
    let (c, s) = (cosd(theta), sind(theta));
    let dx = x - cx;
    let dy = y - cy;
    (dx * c - dy * s + cx, dy * c + dx * s + cy)
}

impl core::fmt::Display for Vec3 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "({:.3}, {:.3}, {:.3})", self.x1, self.x2, self.x3)
    }
}
