//! Rotation of sample-point arrays into the wind-aligned frame.
//!
//! Angles are in degrees. The engine's reference frame has the wind blowing
//! from the west, so a meteorological direction `wd` maps to the rotation
//! angle `wd - 270`; a 270° wind is the zero rotation.

use crate::field::Field;
use crate::trig::{cosd, sind};
use crate::vec3::{Vec3, rotate_xy};
use crate::{Real, WfError, WfResult};

/// Meteorological direction that needs no rotation.
pub const REFERENCE_DIRECTION_DEG: Real = 270.0;

/// Rotation angle for a meteorological wind direction.
#[inline]
pub fn rotation_angle(wind_direction: Real) -> Real {
    wind_direction - REFERENCE_DIRECTION_DEG
}

/// Angle(s) applied by [`rotate_points`].
#[derive(Clone, Copy, Debug)]
pub enum RotationAngles<'a> {
    /// One angle for every point (homogeneous wind direction).
    Uniform(Real),
    /// One angle per point (heterogeneous wind direction).
    PerPoint(&'a Field),
}

impl RotationAngles<'_> {
    #[inline]
    fn at(&self, i: usize) -> Real {
        match self {
            RotationAngles::Uniform(a) => *a,
            RotationAngles::PerPoint(a) => a[i],
        }
    }
}

/// Rotate `(x, y)` pairs about `center`; z is untouched by construction.
pub fn rotate_points(
    x: &Field,
    y: &Field,
    angles: RotationAngles<'_>,
    center: &Vec3,
) -> WfResult<(Field, Field)> {
    if y.len() != x.len() {
        return Err(WfError::LengthMismatch {
            what: "rotated y coordinates",
            expected: x.len(),
            actual: y.len(),
        });
    }
    if let RotationAngles::PerPoint(a) = angles {
        if a.len() != x.len() {
            return Err(WfError::LengthMismatch {
                what: "rotation angles",
                expected: x.len(),
                actual: a.len(),
            });
        }
    }

    let mut rx = Field::zeros(x.len());
    let mut ry = Field::zeros(x.len());
    for i in 0..x.len() {
        let (px, py) = rotate_xy(x[i], y[i], angles.at(i), center.x1, center.x2);
        rx[i] = px;
        ry[i] = py;
    }
    Ok((rx, ry))
}

/// Adjust an already rotated grid for one turbine whose wind direction
/// differs from the grid's.
///
/// `offsets` holds `turbine_angle - grid_angle` per point and `pivot` is the
/// turbine's rotated `(x, y)`. Rather than rotating the original grid again,
/// the lateral coordinate is shifted by the pivot's displacement under the
/// extra rotation and the streamwise coordinate by each point's own
/// displacement.
pub fn incremental_rotation(
    initial_x: &Field,
    initial_y: &Field,
    offsets: &Field,
    center: &Vec3,
    pivot: (Real, Real),
) -> WfResult<(Field, Field)> {
    let n = initial_x.len();
    if initial_y.len() != n || offsets.len() != n {
        return Err(WfError::LengthMismatch {
            what: "incremental rotation inputs",
            expected: n,
            actual: initial_y.len().min(offsets.len()),
        });
    }

    let pivot_dx = center.x1 - pivot.0;
    let pivot_dy = center.x2 - pivot.1;

    let mut rx = Field::zeros(n);
    let mut ry = Field::zeros(n);
    for i in 0..n {
        let (c, s) = (cosd(offsets[i]), sind(offsets[i]));
        let y_grid_offset = pivot_dx * s + pivot_dy * c - pivot_dy;
        ry[i] = initial_y[i] - y_grid_offset;

        let dx = center.x1 - initial_x[i];
        let dy = center.x2 - initial_y[i];
        let x_grid_offset = dx * c - dy * s - dx;
        rx[i] = initial_x[i] - x_grid_offset;
    }
    Ok((rx, ry))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reference_direction_is_zero_rotation() {
        assert_eq!(rotation_angle(270.0), 0.0);
        assert_eq!(rotation_angle(300.0), 30.0);
    }

    #[test]
    fn uniform_rotation_quarter_turn() {
        let x = Field::from_vec(vec![1.0, 0.0]);
        let y = Field::from_vec(vec![0.0, 1.0]);
        let (rx, ry) = rotate_points(&x, &y, RotationAngles::Uniform(90.0), &Vec3::origin()).unwrap();
        assert!(rx[0].abs() < 1e-12 && (ry[0] - 1.0).abs() < 1e-12);
        assert!((rx[1] + 1.0).abs() < 1e-12 && ry[1].abs() < 1e-12);
    }

    #[test]
    fn per_point_angles_must_match_length() {
        let x = Field::zeros(3);
        let angles = Field::zeros(2);
        let err = rotate_points(&x, &x, RotationAngles::PerPoint(&angles), &Vec3::origin());
        assert!(err.is_err());
    }

    #[test]
    fn zero_offsets_leave_grid_unchanged() {
        let x = Field::from_vec(vec![0.0, 250.0, 900.0]);
        let y = Field::from_vec(vec![-40.0, 10.0, 75.0]);
        let offsets = Field::zeros(3);
        let center = Vec3::new(450.0, 20.0, 0.0);
        let (rx, ry) = incremental_rotation(&x, &y, &offsets, &center, (250.0, 10.0)).unwrap();
        for i in 0..3 {
            assert!((rx[i] - x[i]).abs() < 1e-9);
            assert!((ry[i] - y[i]).abs() < 1e-9);
        }
    }
}
