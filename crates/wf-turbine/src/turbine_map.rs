//! Array-backed store of turbine coordinates and turbine state.

use crate::common::check_finite;
use crate::error::{TurbineError, TurbineResult};
use crate::turbine::Turbine;
use wf_core::Vec3;

/// Ordered `(coordinate, turbine)` pairs.
///
/// Index `i` of [`TurbineMap::coords`] and [`TurbineMap::turbines`] always
/// refer to the same turbine; that order is the input order and never
/// changes. Coordinates carry the hub height as `x3`.
#[derive(Clone, Debug)]
pub struct TurbineMap {
    coords: Vec<Vec3>,
    turbines: Vec<Turbine>,
}

impl TurbineMap {
    /// Build a map from a planar layout, placing each turbine at its hub
    /// height.
    pub fn new(layout_x: &[f64], layout_y: &[f64], turbines: Vec<Turbine>) -> TurbineResult<Self> {
        if layout_y.len() != layout_x.len() {
            return Err(TurbineError::LengthMismatch {
                what: "layout y",
                expected: layout_x.len(),
                actual: layout_y.len(),
            });
        }
        if turbines.len() != layout_x.len() {
            return Err(TurbineError::LengthMismatch {
                what: "turbines",
                expected: layout_x.len(),
                actual: turbines.len(),
            });
        }
        let coords = layout_x
            .iter()
            .zip(layout_y)
            .zip(&turbines)
            .map(|((&x, &y), t)| Vec3::new(x, y, t.hub_height()))
            .collect();
        Self::from_coords(coords, turbines)
    }

    /// Build a map from explicit coordinates.
    pub fn from_coords(coords: Vec<Vec3>, turbines: Vec<Turbine>) -> TurbineResult<Self> {
        if turbines.len() != coords.len() {
            return Err(TurbineError::LengthMismatch {
                what: "turbines",
                expected: coords.len(),
                actual: turbines.len(),
            });
        }
        for c in &coords {
            check_finite(c.x1, "turbine x coordinate")?;
            check_finite(c.x2, "turbine y coordinate")?;
            check_finite(c.x3, "turbine z coordinate")?;
        }
        for (i, a) in coords.iter().enumerate() {
            if let Some(j) = coords[i + 1..]
                .iter()
                .position(|b| b.x1 == a.x1 && b.x2 == a.x2)
            {
                return Err(TurbineError::CoincidentTurbines {
                    first: i,
                    second: i + 1 + j,
                });
            }
        }
        Ok(Self { coords, turbines })
    }

    pub fn len(&self) -> usize {
        self.coords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.coords.is_empty()
    }

    /// Coordinates in index order.
    pub fn coords(&self) -> &[Vec3] {
        &self.coords
    }

    pub fn turbines(&self) -> &[Turbine] {
        &self.turbines
    }

    pub fn turbines_mut(&mut self) -> &mut [Turbine] {
        &mut self.turbines
    }

    /// Iterate `(coordinate, turbine)` pairs in index order.
    pub fn items(&self) -> impl Iterator<Item = (&Vec3, &Turbine)> {
        self.coords.iter().zip(&self.turbines)
    }

    pub fn layout_x(&self) -> Vec<f64> {
        self.coords.iter().map(|c| c.x1).collect()
    }

    pub fn layout_y(&self) -> Vec<f64> {
        self.coords.iter().map(|c| c.x2).collect()
    }

    /// Largest rotor diameter in the farm (0 for an empty map).
    pub fn max_rotor_diameter(&self) -> f64 {
        self.turbines
            .iter()
            .map(Turbine::rotor_diameter)
            .fold(0.0, f64::max)
    }

    /// Coordinates rotated about `center`, one angle (degrees) per turbine.
    ///
    /// The returned points keep their original components and carry the
    /// rotated position as primes.
    pub fn rotated_coords(&self, angles: &[f64], center: &Vec3) -> TurbineResult<Vec<Vec3>> {
        if angles.len() != self.len() {
            return Err(TurbineError::LengthMismatch {
                what: "rotation angles",
                expected: self.len(),
                actual: angles.len(),
            });
        }
        Ok(self
            .coords
            .iter()
            .zip(angles)
            .map(|(c, &theta)| c.rotate_on_x3(theta, center))
            .collect())
    }

    /// A new map whose coordinates are this map's rotated about `center`.
    pub fn rotated(&self, angles: &[f64], center: &Vec3) -> TurbineResult<TurbineMap> {
        let coords = self
            .rotated_coords(angles, center)?
            .iter()
            .map(Vec3::primed)
            .collect();
        Ok(TurbineMap {
            coords,
            turbines: self.turbines.clone(),
        })
    }

    /// Pairs ordered by streamwise coordinate, upstream first.
    ///
    /// The sort is stable, so turbines at the same `x1` keep index order.
    pub fn sorted_in_x_as_list(&self) -> Vec<(Vec3, &Turbine)> {
        let mut list: Vec<(Vec3, &Turbine)> =
            self.coords.iter().copied().zip(&self.turbines).collect();
        list.sort_by(|a, b| a.0.x1.total_cmp(&b.0.x1));
        list
    }

    /// Set every turbine's yaw angle (degrees), in index order.
    pub fn set_yaw_angles(&mut self, yaw_angles: &[f64]) -> TurbineResult<()> {
        if yaw_angles.len() != self.len() {
            return Err(TurbineError::LengthMismatch {
                what: "yaw angles",
                expected: self.len(),
                actual: yaw_angles.len(),
            });
        }
        for (turbine, &yaw) in self.turbines.iter_mut().zip(yaw_angles) {
            turbine.set_yaw_angle(yaw)?;
        }
        Ok(())
    }
}
