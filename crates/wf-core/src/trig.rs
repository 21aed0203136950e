//! Trigonometry on degree arguments.

use crate::Real;

#[inline]
pub fn cosd(angle: Real) -> Real {
    angle.to_radians().cos()
}

#[inline]
pub fn sind(angle: Real) -> Real {
    angle.to_radians().sin()
}

#[inline]
pub fn tand(angle: Real) -> Real {
    angle.to_radians().tan()
}
