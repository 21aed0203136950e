//! Turbine model.

use crate::common::{check_finite, check_positive};
use crate::error::{TurbineError, TurbineResult};
use crate::power_curve::PowerCurve;
use wf_core::units::{Density, Length, Power, watts};
use wf_core::{Field, GridPoints, Vec3, cosd, linspace};

/// Horizontal-axis wind turbine.
///
/// The flow engine treats a turbine as a rotor disk that samples the flow
/// field on a regular `ngrid × ngrid` patch spanning `±rloc·R` around the
/// hub. From the sampled inflow the turbine derives its operating point:
///
/// ```text
/// U_avg = cbrt(mean(u³))
/// U_eff = U_avg · cos(yaw)^(pP/3)
/// Ct    = Ct(U_avg) · cos(yaw)
/// a     = 0.5 / cos(yaw) · (1 - sqrt(1 - Ct · cos(yaw)))
/// P     = 0.5 · ρ · π R² · Cp(U_eff) · η · U_eff³
/// ```
#[derive(Clone, Debug)]
pub struct Turbine {
    /// Turbine name for debugging
    pub name: String,
    rotor_diameter: f64,
    hub_height: f64,
    ngrid: usize,
    rloc: f64,
    p_p: f64,
    generator_efficiency: f64,
    air_density: f64,
    power_curve: PowerCurve,
    swept_area_grid: Vec<(f64, f64)>,

    yaw_angle: f64,
    turbulence_intensity: f64,
    velocities: Vec<f64>,
}

impl Turbine {
    /// Default number of swept-area sample points per axis.
    pub const DEFAULT_NGRID: usize = 5;
    /// Default radial extent of the sample patch as a fraction of the radius.
    pub const DEFAULT_RLOC: f64 = 0.5;
    /// Default yaw power-loss exponent.
    pub const DEFAULT_P_P: f64 = 1.88;

    /// Create a new turbine.
    ///
    /// # Arguments
    /// * `name` - Turbine identifier
    /// * `rotor_diameter` - Rotor diameter
    /// * `hub_height` - Hub height above ground
    /// * `power_curve` - Cp/Ct table
    ///
    /// # Errors
    /// Returns error if the dimensions are not positive and finite, or if the
    /// default sample patch would reach the ground.
    pub fn new(
        name: impl Into<String>,
        rotor_diameter: Length,
        hub_height: Length,
        power_curve: PowerCurve,
    ) -> TurbineResult<Self> {
        check_positive(rotor_diameter.value, "rotor diameter must be positive")?;
        check_positive(hub_height.value, "hub height must be positive")?;

        let mut turbine = Self {
            name: name.into(),
            rotor_diameter: rotor_diameter.value,
            hub_height: hub_height.value,
            ngrid: Self::DEFAULT_NGRID,
            rloc: Self::DEFAULT_RLOC,
            p_p: Self::DEFAULT_P_P,
            generator_efficiency: 1.0,
            air_density: wf_core::units::constants::AIR_DENSITY_KGPM3,
            power_curve,
            swept_area_grid: Vec::new(),
            yaw_angle: 0.0,
            turbulence_intensity: 0.0,
            velocities: Vec::new(),
        };
        turbine.check_patch_clearance(turbine.rloc)?;
        turbine.rebuild_swept_area_grid();
        Ok(turbine)
    }

    /// NREL 5-MW reference turbine (126 m rotor, 90 m hub).
    pub fn nrel_5mw(name: impl Into<String>) -> Self {
        Self::new(
            name,
            wf_core::units::m(126.0),
            wf_core::units::m(90.0),
            PowerCurve::nrel_5mw(),
        )
        .expect("reference turbine dimensions are valid")
    }

    /// Set the number of swept-area sample points per axis.
    pub fn with_ngrid(mut self, ngrid: usize) -> TurbineResult<Self> {
        if ngrid < 2 {
            return Err(TurbineError::InvalidArg {
                what: "ngrid must be at least 2",
            });
        }
        self.ngrid = ngrid;
        self.rebuild_swept_area_grid();
        Ok(self)
    }

    /// Set the radial extent of the sample patch (fraction of the radius).
    pub fn with_rloc(mut self, rloc: f64) -> TurbineResult<Self> {
        check_positive(rloc, "rloc must be positive")?;
        if rloc > 1.0 {
            return Err(TurbineError::InvalidArg {
                what: "rloc must not exceed 1",
            });
        }
        self.check_patch_clearance(rloc)?;
        self.rloc = rloc;
        self.rebuild_swept_area_grid();
        Ok(self)
    }

    pub fn with_yaw_loss_exponent(mut self, p_p: f64) -> TurbineResult<Self> {
        check_positive(p_p, "yaw loss exponent must be positive")?;
        self.p_p = p_p;
        Ok(self)
    }

    pub fn with_generator_efficiency(mut self, eta: f64) -> TurbineResult<Self> {
        if !(eta > 0.0 && eta <= 1.0) {
            return Err(TurbineError::InvalidArg {
                what: "generator efficiency must be in (0,1]",
            });
        }
        self.generator_efficiency = eta;
        Ok(self)
    }

    pub fn with_air_density(mut self, rho: Density) -> TurbineResult<Self> {
        check_positive(rho.value, "air density must be positive")?;
        self.air_density = rho.value;
        Ok(self)
    }

    /// The lowest sample row, `hub - rloc·R`, must stay above the ground.
    fn check_patch_clearance(&self, rloc: f64) -> TurbineResult<()> {
        if self.hub_height - rloc * self.rotor_radius() <= 0.0 {
            return Err(TurbineError::NonPhysical {
                what: "rotor sample patch must lie above the ground",
            });
        }
        Ok(())
    }

    fn rebuild_swept_area_grid(&mut self) {
        let pt = self.rloc * self.rotor_radius();
        let horizontal = linspace(-pt, pt, self.ngrid);
        let vertical = linspace(-pt, pt, self.ngrid);
        self.swept_area_grid = vertical
            .iter()
            .flat_map(|&v| horizontal.iter().map(move |&h| (h, v)))
            .collect();
        self.velocities = vec![0.0; self.swept_area_grid.len()];
    }

    pub fn rotor_diameter(&self) -> f64 {
        self.rotor_diameter
    }

    pub fn rotor_radius(&self) -> f64 {
        self.rotor_diameter / 2.0
    }

    pub fn hub_height(&self) -> f64 {
        self.hub_height
    }

    pub fn ngrid(&self) -> usize {
        self.ngrid
    }

    pub fn rloc(&self) -> f64 {
        self.rloc
    }

    /// Number of swept-area sample points.
    pub fn grid_point_count(&self) -> usize {
        self.ngrid * self.ngrid
    }

    /// Lateral/vertical offsets `(dy, dz)` of the swept-area sample points,
    /// horizontal index fastest.
    pub fn swept_area_grid(&self) -> &[(f64, f64)] {
        &self.swept_area_grid
    }

    pub fn power_curve(&self) -> &PowerCurve {
        &self.power_curve
    }

    pub fn yaw_angle(&self) -> f64 {
        self.yaw_angle
    }

    /// Set the yaw misalignment in degrees.
    pub fn set_yaw_angle(&mut self, yaw: f64) -> TurbineResult<()> {
        check_finite(yaw, "yaw angle")?;
        if yaw.abs() >= 90.0 {
            return Err(TurbineError::InvalidArg {
                what: "yaw angle must lie strictly between -90 and 90 degrees",
            });
        }
        self.yaw_angle = yaw;
        Ok(())
    }

    pub fn turbulence_intensity(&self) -> f64 {
        self.turbulence_intensity
    }

    pub fn set_turbulence_intensity(&mut self, ti: f64) {
        self.turbulence_intensity = ti;
    }

    /// Most recent swept-area inflow samples.
    pub fn velocities(&self) -> &[f64] {
        &self.velocities
    }

    /// Clear the swept-area inflow samples.
    pub fn reset_velocities(&mut self) {
        self.velocities = vec![0.0; self.grid_point_count()];
    }

    /// Update the rotor inflow from the accumulated wake field.
    ///
    /// The inflow is the ambient field minus the wake deficit of every
    /// turbine combined so far, sampled over the swept area.
    pub fn update_velocities(
        &mut self,
        u_wake: &Field,
        coord: &Vec3,
        u_initial: &Field,
        points: GridPoints<'_>,
    ) -> TurbineResult<()> {
        if u_wake.len() != u_initial.len() {
            return Err(TurbineError::LengthMismatch {
                what: "wake deficit field",
                expected: u_initial.len(),
                actual: u_wake.len(),
            });
        }
        let local_wind_speed = u_initial - u_wake;
        let velocities = self.swept_area_velocities(&local_wind_speed, coord, points)?;
        if velocities.iter().any(|v| !v.is_finite()) {
            return Err(TurbineError::NonPhysical {
                what: "rotor inflow must be finite",
            });
        }
        self.velocities = velocities;
        Ok(())
    }

    /// Sample a field over this rotor's swept area at `coord`.
    pub fn swept_area_velocities(
        &self,
        field: &Field,
        coord: &Vec3,
        points: GridPoints<'_>,
    ) -> TurbineResult<Vec<f64>> {
        let groups = self.nearest_point_groups(coord, points)?;
        check_len(field, points.len(), "sampled field")?;
        Ok(groups.iter().map(|g| mean_over(field, g)).collect())
    }

    /// Sample the ambient field and an additional wake-perturbed field over
    /// this rotor's swept area, returning `(freestream, wake)` velocities.
    pub fn calculate_swept_area_velocities(
        &self,
        ambient_u: &Field,
        coord: &Vec3,
        points: GridPoints<'_>,
        additional_wind_speed: &Field,
    ) -> TurbineResult<(Vec<f64>, Vec<f64>)> {
        let groups = self.nearest_point_groups(coord, points)?;
        check_len(ambient_u, points.len(), "ambient field")?;
        check_len(additional_wind_speed, points.len(), "additional wind speed")?;

        let freestream = groups.iter().map(|g| mean_over(ambient_u, g)).collect();
        let wake = groups
            .iter()
            .map(|g| mean_over(additional_wind_speed, g))
            .collect();
        Ok((freestream, wake))
    }

    /// For every swept-area point, the indices of the grid points at minimum
    /// distance from it.
    fn nearest_point_groups(
        &self,
        coord: &Vec3,
        points: GridPoints<'_>,
    ) -> TurbineResult<Vec<Vec<usize>>> {
        if points.is_empty() {
            return Err(TurbineError::EmptyGrid);
        }

        let groups = self
            .swept_area_grid
            .iter()
            .map(|&(dy, dz)| {
                let (px, py, pz) = (coord.x1, coord.x2 + dy, coord.x3 + dz);
                let mut best = f64::INFINITY;
                let mut nearest = Vec::new();
                for i in 0..points.len() {
                    let (x, y, z) = points.point(i);
                    let d2 = (px - x).powi(2) + (py - y).powi(2) + (pz - z).powi(2);
                    if d2 < best {
                        best = d2;
                        nearest.clear();
                        nearest.push(i);
                    } else if d2 == best {
                        nearest.push(i);
                    }
                }
                nearest
            })
            .collect();
        Ok(groups)
    }

    /// Cube-root of the mean cubed swept-area velocity.
    pub fn average_velocity(&self) -> f64 {
        if self.velocities.is_empty() {
            return 0.0;
        }
        let mean_cube =
            self.velocities.iter().map(|v| v.powi(3)).sum::<f64>() / self.velocities.len() as f64;
        mean_cube.cbrt()
    }

    /// Inflow speed seen by the power curve after yaw losses.
    pub fn yaw_effective_velocity(&self) -> f64 {
        let p_w = self.p_p / 3.0;
        self.average_velocity() * cosd(self.yaw_angle).powf(p_w)
    }

    /// Power coefficient at the yaw-effective inflow.
    pub fn cp(&self) -> f64 {
        self.power_curve.cp(self.yaw_effective_velocity())
    }

    /// Thrust coefficient including the yaw projection.
    pub fn ct(&self) -> f64 {
        self.power_curve.ct(self.average_velocity()) * cosd(self.yaw_angle)
    }

    /// Axial induction factor.
    pub fn axial_induction(&self) -> f64 {
        let cos_yaw = cosd(self.yaw_angle);
        0.5 / cos_yaw * (1.0 - (1.0 - self.ct() * cos_yaw).max(0.0).sqrt())
    }

    /// Electrical power at the current inflow.
    pub fn power(&self) -> Power {
        let area = std::f64::consts::PI * self.rotor_radius().powi(2);
        let u_eff = self.yaw_effective_velocity();
        watts(0.5 * self.air_density * area * self.cp() * self.generator_efficiency * u_eff.powi(3))
    }
}

fn check_len(field: &Field, expected: usize, what: &'static str) -> TurbineResult<()> {
    if field.len() != expected {
        return Err(TurbineError::LengthMismatch {
            what,
            expected,
            actual: field.len(),
        });
    }
    Ok(())
}

fn mean_over(field: &Field, indices: &[usize]) -> f64 {
    indices.iter().map(|&i| field[i]).sum::<f64>() / indices.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use wf_core::units::m;

    /// Rotor points of `turbine` at `coord` laid out as a flat grid.
    fn rotor_grid(turbine: &Turbine, coord: &Vec3) -> (Field, Field, Field) {
        let n = turbine.grid_point_count();
        let x = Field::from_element(n, coord.x1);
        let y = Field::from_iterator(n, turbine.swept_area_grid().iter().map(|p| coord.x2 + p.0));
        let z = Field::from_iterator(n, turbine.swept_area_grid().iter().map(|p| coord.x3 + p.1));
        (x, y, z)
    }

    #[test]
    fn turbine_creation() {
        let turbine = Turbine::new("t", m(126.0), m(90.0), PowerCurve::nrel_5mw());
        assert!(turbine.is_ok());
        assert!(Turbine::new("bad", m(-1.0), m(90.0), PowerCurve::nrel_5mw()).is_err());
    }

    #[test]
    fn sample_patch_must_clear_the_ground() {
        // 126 m rotor: the default patch reaches 31.5 m below the hub
        let err = Turbine::new("low", m(126.0), m(30.0), PowerCurve::nrel_5mw()).unwrap_err();
        assert!(matches!(err, TurbineError::NonPhysical { .. }));
        assert!(Turbine::new("ok", m(126.0), m(32.0), PowerCurve::nrel_5mw()).is_ok());

        let turbine = Turbine::new("t", m(126.0), m(40.0), PowerCurve::nrel_5mw()).unwrap();
        assert!(turbine.clone().with_rloc(0.6).is_ok());
        assert!(turbine.with_rloc(0.7).is_err());
    }

    #[test]
    fn non_finite_inflow_is_rejected() {
        let mut turbine = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let (x, y, z) = rotor_grid(&turbine, &coord);
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let mut u_initial = Field::from_element(x.len(), 8.0);
        u_initial[0] = f64::NAN;

        let err = turbine
            .update_velocities(&Field::zeros(x.len()), &coord, &u_initial, points)
            .unwrap_err();
        assert!(matches!(err, TurbineError::NonPhysical { .. }));
        assert!(turbine.velocities().iter().all(|&v| v == 0.0));
    }

    #[test]
    fn swept_area_grid_has_grid_point_count_entries() {
        let turbine = Turbine::nrel_5mw("t").with_ngrid(4).unwrap();
        assert_eq!(turbine.grid_point_count(), 16);
        assert_eq!(turbine.swept_area_grid().len(), 16);
        let pt = 0.5 * 63.0;
        assert_eq!(turbine.swept_area_grid()[0], (-pt, -pt));
        assert_eq!(turbine.swept_area_grid()[1].1, -pt);
        assert_eq!(turbine.swept_area_grid()[15], (pt, pt));
    }

    #[test]
    fn update_velocities_reads_ambient_minus_wake() {
        let mut turbine = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let (x, y, z) = rotor_grid(&turbine, &coord);
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let u_initial = Field::from_element(x.len(), 8.0);
        let u_wake = Field::from_element(x.len(), 1.5);

        turbine.update_velocities(&u_wake, &coord, &u_initial, points).unwrap();

        assert!(turbine.velocities().iter().all(|&v| (v - 6.5).abs() < 1e-12));
        assert!((turbine.average_velocity() - 6.5).abs() < 1e-9);
    }

    #[test]
    fn swept_area_sampling_averages_equidistant_points() {
        let turbine = Turbine::nrel_5mw("t").with_ngrid(2).unwrap();
        let coord = Vec3::new(0.0, 0.0, 90.0);
        // two grid points straddling every swept-area point in x
        let (mut xs, mut ys, mut zs) = (Vec::new(), Vec::new(), Vec::new());
        for &(dy, dz) in turbine.swept_area_grid() {
            for dx in [-1.0, 1.0] {
                xs.push(dx);
                ys.push(dy);
                zs.push(90.0 + dz);
            }
        }
        let (x, y, z) = (Field::from_vec(xs), Field::from_vec(ys), Field::from_vec(zs));
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let field = Field::from_iterator(x.len(), (0..x.len()).map(|i| if i % 2 == 0 { 6.0 } else { 8.0 }));

        let sampled = turbine.swept_area_velocities(&field, &coord, points).unwrap();
        assert!(sampled.iter().all(|&v| (v - 7.0).abs() < 1e-12));
    }

    #[test]
    fn empty_grid_is_an_error() {
        let turbine = Turbine::nrel_5mw("t");
        let empty = Field::zeros(0);
        let points = GridPoints::new(&empty, &empty, &empty).unwrap();
        let err = turbine
            .swept_area_velocities(&empty, &Vec3::origin(), points)
            .unwrap_err();
        assert_eq!(err, TurbineError::EmptyGrid);
    }

    #[test]
    fn reset_velocities_zeroes_inflow() {
        let mut turbine = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let (x, y, z) = rotor_grid(&turbine, &coord);
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let u = Field::from_element(x.len(), 9.0);
        turbine.update_velocities(&Field::zeros(x.len()), &coord, &u, points).unwrap();
        assert!(turbine.power().value > 0.0);

        turbine.reset_velocities();
        assert_eq!(turbine.average_velocity(), 0.0);
        assert_eq!(turbine.power().value, 0.0);
    }

    #[test]
    fn yaw_reduces_power_and_thrust() {
        let mut turbine = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let (x, y, z) = rotor_grid(&turbine, &coord);
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let u = Field::from_element(x.len(), 8.0);
        turbine.update_velocities(&Field::zeros(x.len()), &coord, &u, points).unwrap();

        let (p0, ct0) = (turbine.power().value, turbine.ct());
        turbine.set_yaw_angle(25.0).unwrap();
        assert!(turbine.power().value < p0);
        assert!(turbine.ct() < ct0);
        assert!(turbine.set_yaw_angle(90.0).is_err());
    }

    #[test]
    fn axial_induction_matches_momentum_theory() {
        let mut turbine = Turbine::nrel_5mw("t");
        let coord = Vec3::new(0.0, 0.0, 90.0);
        let (x, y, z) = rotor_grid(&turbine, &coord);
        let points = GridPoints::new(&x, &y, &z).unwrap();
        let u = Field::from_element(x.len(), 8.0);
        turbine.update_velocities(&Field::zeros(x.len()), &coord, &u, points).unwrap();

        let ct = turbine.ct();
        let a = turbine.axial_induction();
        assert!((4.0 * a * (1.0 - a) - ct).abs() < 1e-9);
    }
}
