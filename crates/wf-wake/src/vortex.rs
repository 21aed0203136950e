//! Counter-rotating vortex pair shed by a yawed rotor.
//!
//! Two Lamb-Oseen vortices sit at the top and bottom rotor tips. Their
//! induced crossflow steers the wake laterally and decays downstream as the
//! cores diffuse with a mixing-length eddy viscosity.

use std::f64::consts::PI;

use wf_core::{Vec3, cosd, sind};
use wf_turbine::Turbine;

/// Below this squared radius the induced velocity is taken as zero.
const CORE_SINGULARITY: f64 = 1e-12;
/// von Kármán constant of the mixing-length viscosity.
const KAPPA: f64 = 0.41;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VortexPair {
    x_origin: f64,
    y_center: f64,
    hub_height: f64,
    half_span: f64,
    circulation: f64,
    core_radius: f64,
    viscosity: f64,
    advection: f64,
}

impl VortexPair {
    /// Pair shed by `turbine` at the rotated position `coord`.
    ///
    /// Returns `None` when the rotor sheds no circulation (no yaw or no
    /// inflow).
    pub fn for_turbine(turbine: &Turbine, coord: &Vec3, strength: f64, eps_gain: f64) -> Option<Self> {
        let d = turbine.rotor_diameter();
        let u = turbine.average_velocity();
        let yaw = turbine.yaw_angle();
        let circulation = strength * (PI / 8.0) * d * u * turbine.ct() * sind(yaw) * cosd(yaw).powi(2);
        if u <= 0.0 || circulation == 0.0 || !circulation.is_finite() {
            return None;
        }
        Some(Self {
            x_origin: coord.x1,
            y_center: coord.x2,
            hub_height: turbine.hub_height(),
            half_span: d / 2.0,
            circulation,
            core_radius: eps_gain * d,
            viscosity: KAPPA * (d / 8.0) * turbine.turbulence_intensity() * u,
            advection: u,
        })
    }

    pub fn circulation(&self) -> f64 {
        self.circulation
    }

    /// Core growth factor at streamwise position `x`.
    fn decay(&self, x: f64) -> f64 {
        let eps2 = self.core_radius.powi(2);
        eps2 / (eps2 + 4.0 * self.viscosity * (x - self.x_origin) / self.advection)
    }

    fn single(&self, y: f64, z: f64, z_core: f64, gamma: f64) -> (f64, f64) {
        let dy = y - self.y_center;
        let dz = z - z_core;
        let r2 = dy * dy + dz * dz;
        if r2 < CORE_SINGULARITY {
            return (0.0, 0.0);
        }
        let core = 1.0 - (-r2 / self.core_radius.powi(2)).exp();
        let scale = gamma / (2.0 * PI * r2) * core;
        (dz * scale, -dy * scale)
    }

    /// Induced `(v, w)` at a point; zero at and upstream of the rotor.
    pub fn induced(&self, x: f64, y: f64, z: f64) -> (f64, f64) {
        if x <= self.x_origin {
            return (0.0, 0.0);
        }
        let (v_top, w_top) = self.single(y, z, self.hub_height + self.half_span, self.circulation);
        let (v_bot, w_bot) = self.single(y, z, self.hub_height - self.half_span, -self.circulation);
        let decay = self.decay(x);
        ((v_top + v_bot) * decay, (w_top + w_bot) * decay)
    }

    /// Lateral displacement of the wake centre at `x`, integrating the
    /// decaying hub-height crossflow advected at the rotor inflow speed.
    pub fn lateral_drift(&self, x: f64) -> f64 {
        let dx = x - self.x_origin;
        if dx <= 0.0 {
            return 0.0;
        }
        let (v_top, _) = self.single(
            self.y_center,
            self.hub_height,
            self.hub_height + self.half_span,
            self.circulation,
        );
        let (v_bot, _) = self.single(
            self.y_center,
            self.hub_height,
            self.hub_height - self.half_span,
            -self.circulation,
        );
        let v_hub = v_top + v_bot;
        let eps2 = self.core_radius.powi(2);
        let rate = 4.0 * self.viscosity / (self.advection * eps2);
        let travelled = if rate * dx < 1e-9 {
            dx
        } else {
            (1.0 + rate * dx).ln() / rate
        };
        v_hub / self.advection * travelled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::{Field, GridPoints};

    fn spinning_turbine(yaw: f64) -> Turbine {
        let mut t = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let n = t.grid_point_count();
        let x = Field::from_element(n, 0.0);
        let y = Field::from_iterator(n, t.swept_area_grid().iter().map(|p| p.0));
        let z = Field::from_iterator(n, t.swept_area_grid().iter().map(|p| 90.0 + p.1));
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let u = Field::from_element(n, 8.0);
        t.update_velocities(&Field::zeros(n), &coord, &u, points).unwrap();
        t.set_turbulence_intensity(0.06);
        t.set_yaw_angle(yaw).unwrap();
        t
    }

    #[test]
    fn aligned_rotor_sheds_nothing() {
        let t = spinning_turbine(0.0);
        assert!(VortexPair::for_turbine(&t, &Vec3::new(0.0, 0.0, 90.0), 1.0, 0.2).is_none());
    }

    #[test]
    fn positive_yaw_steers_toward_negative_y() {
        let t = spinning_turbine(20.0);
        let pair = VortexPair::for_turbine(&t, &Vec3::new(0.0, 0.0, 90.0), 1.0, 0.2).unwrap();
        let (v, _) = pair.induced(300.0, 0.0, 90.0);
        assert!(v < 0.0);
        assert!(pair.lateral_drift(600.0) < pair.lateral_drift(300.0));
        assert_eq!(pair.induced(-1.0, 0.0, 90.0), (0.0, 0.0));
    }

    #[test]
    fn vortex_core_is_not_singular() {
        let t = spinning_turbine(20.0);
        let pair = VortexPair::for_turbine(&t, &Vec3::new(0.0, 0.0, 90.0), 1.0, 0.2).unwrap();
        let (v, w) = pair.induced(100.0, 0.0, 90.0 + 63.0);
        assert!(v.is_finite() && w.is_finite());
    }
}
