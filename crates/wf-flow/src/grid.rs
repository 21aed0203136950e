//! Sample-point domains and their ambient baseline.

use tracing::info;
use wf_core::{DomainBounds, Field, GridResolution, Vec3, cosd, linspace, sind};
use wf_turbine::TurbineMap;

use crate::error::{FlowError, FlowResult};

/// Caller-supplied sample points, in the physical frame.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExtraPoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub z: Vec<f64>,
}

impl ExtraPoints {
    pub fn new(x: Vec<f64>, y: Vec<f64>, z: Vec<f64>) -> FlowResult<Self> {
        if y.len() != x.len() || z.len() != x.len() {
            return Err(FlowError::precondition(format!(
                "extra point coordinates have lengths {}, {}, {}",
                x.len(),
                y.len(),
                z.len()
            )));
        }
        if x.iter().chain(&y).chain(&z).any(|v| !v.is_finite()) {
            return Err(FlowError::precondition("extra point coordinates must be finite"));
        }
        if let Some(&below) = z.iter().find(|&&h| h <= 0.0) {
            return Err(FlowError::precondition(format!(
                "extra point at z = {below} must lie above the ground"
            )));
        }
        Ok(Self { x, y, z })
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// How the sample points were laid out.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DomainKind {
    /// Dense `nx × ny × nz` lattice, x slowest and z fastest.
    Gridded(GridResolution),
    /// Rotor points of every turbine followed by caller points.
    Sparse {
        turbine_points: usize,
        extra_points: usize,
    },
}

/// Sample points with their current and ambient velocities.
///
/// Every array has one entry per sample point.
#[derive(Clone, Debug, PartialEq)]
pub struct Domain {
    kind: DomainKind,
    bounds: DomainBounds,
    pub(crate) x: Field,
    pub(crate) y: Field,
    pub(crate) z: Field,
    pub(crate) u_initial: Field,
    pub(crate) v_initial: Field,
    pub(crate) w_initial: Field,
    pub(crate) u: Field,
    pub(crate) v: Field,
    pub(crate) w: Field,
}

impl Domain {
    fn from_points(kind: DomainKind, bounds: DomainBounds, x: Field, y: Field, z: Field) -> Self {
        let n = x.len();
        Self {
            kind,
            bounds,
            x,
            y,
            z,
            u_initial: Field::zeros(n),
            v_initial: Field::zeros(n),
            w_initial: Field::zeros(n),
            u: Field::zeros(n),
            v: Field::zeros(n),
            w: Field::zeros(n),
        }
    }

    /// Regular lattice spanning `bounds`.
    pub fn gridded(bounds: DomainBounds, resolution: GridResolution) -> FlowResult<Self> {
        resolution.validate()?;
        bounds.validate()?;
        let xs = linspace(bounds.xmin, bounds.xmax, resolution.nx);
        let ys = linspace(bounds.ymin, bounds.ymax, resolution.ny);
        let zs = linspace(bounds.zmin, bounds.zmax, resolution.nz);

        let n = resolution.point_count();
        let (mut x, mut y, mut z) = (Vec::with_capacity(n), Vec::with_capacity(n), Vec::with_capacity(n));
        for &xi in &xs {
            for &yj in &ys {
                for &zk in &zs {
                    x.push(xi);
                    y.push(yj);
                    z.push(zk);
                }
            }
        }
        info!(
            nx = resolution.nx,
            ny = resolution.ny,
            nz = resolution.nz,
            "gridded domain laid out"
        );
        Ok(Self::from_points(
            DomainKind::Gridded(resolution),
            bounds,
            Field::from_vec(x),
            Field::from_vec(y),
            Field::from_vec(z),
        ))
    }

    /// Rotor points of every turbine, each patch turned by `-angles[i]`
    /// about its hub so it faces the wind once the domain is rotated.
    pub fn sparse(turbine_map: &TurbineMap, angles: &[f64], bounds: DomainBounds) -> FlowResult<Self> {
        if angles.len() != turbine_map.len() {
            return Err(FlowError::precondition(format!(
                "{} rotation angles for {} turbines",
                angles.len(),
                turbine_map.len()
            )));
        }
        let (mut x, mut y, mut z) = (Vec::new(), Vec::new(), Vec::new());
        for ((coord, turbine), &angle) in turbine_map.items().zip(angles) {
            let (c, s) = (cosd(-angle), sind(-angle));
            for &(dy, dz) in turbine.swept_area_grid() {
                // the patch lies in the rotor plane, so only dy needs turning
                x.push(coord.x1 - dy * s);
                y.push(coord.x2 + dy * c);
                z.push(coord.x3 + dz);
            }
        }
        let turbine_points = x.len();
        Ok(Self::from_points(
            DomainKind::Sparse {
                turbine_points,
                extra_points: 0,
            },
            bounds,
            Field::from_vec(x),
            Field::from_vec(y),
            Field::from_vec(z),
        ))
    }

    /// Append caller points after the existing ones.
    ///
    /// Existing points are never moved, merged or deduplicated.
    pub fn with_points(self, points: &ExtraPoints) -> FlowResult<Self> {
        let DomainKind::Sparse {
            turbine_points,
            extra_points,
        } = self.kind
        else {
            return Err(FlowError::configuration(
                "extra sample points cannot be added to a gridded domain",
            ));
        };
        let append = |field: &Field, extra: &[f64]| {
            Field::from_iterator(field.len() + extra.len(), field.iter().chain(extra).copied())
        };
        let x = append(&self.x, &points.x);
        let y = append(&self.y, &points.y);
        let z = append(&self.z, &points.z);
        Ok(Self::from_points(
            DomainKind::Sparse {
                turbine_points,
                extra_points: extra_points + points.len(),
            },
            self.bounds,
            x,
            y,
            z,
        ))
    }

    /// Ambient profile `speed · (z / reference_height)^shear`, zero
    /// crossflow; current velocities start from the baseline.
    ///
    /// Every sample point must lie above the ground.
    pub fn initialize_velocities(
        &mut self,
        grid_wind_speed: &Field,
        reference_height: f64,
        shear: f64,
    ) -> FlowResult<()> {
        if grid_wind_speed.len() != self.len() {
            return Err(FlowError::Consistency {
                what: format!(
                    "{} wind speeds for {} sample points",
                    grid_wind_speed.len(),
                    self.len()
                ),
            });
        }
        if !(reference_height > 0.0) {
            return Err(FlowError::precondition(format!(
                "reference wind height {reference_height} must be positive"
            )));
        }
        if let Some(below) = self.z.iter().position(|&h| !(h > 0.0)) {
            return Err(FlowError::precondition(format!(
                "sample point {below} at z = {} is not above the ground",
                self.z[below]
            )));
        }
        self.u_initial = self
            .z
            .zip_map(grid_wind_speed, |z, speed| speed * (z / reference_height).powf(shear));
        self.v_initial = Field::zeros(self.len());
        self.w_initial = Field::zeros(self.len());
        self.reset_uvw();
        Ok(())
    }

    /// Restore current velocities to the ambient baseline.
    pub fn reset_uvw(&mut self) {
        self.u = self.u_initial.clone();
        self.v = self.v_initial.clone();
        self.w = self.w_initial.clone();
    }

    /// Midpoint of the x and y extents of the sample points.
    pub fn center_of_rotation(&self) -> Vec3 {
        let mid = |f: &Field| (f.min() + f.max()) / 2.0;
        if self.is_empty() {
            return Vec3::origin();
        }
        Vec3::new(mid(&self.x), mid(&self.y), 0.0)
    }

    /// Same points, recorded against different bounds.
    pub(crate) fn with_bounds(mut self, bounds: DomainBounds) -> Self {
        self.bounds = bounds;
        self
    }

    pub fn kind(&self) -> DomainKind {
        self.kind
    }

    pub fn bounds(&self) -> DomainBounds {
        self.bounds
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

/// Default extent around a layout: `2L` upstream and sideways, `10L`
/// downstream, ground to `z_factor · H`.
pub(crate) fn default_bounds(
    xs: &[f64],
    ys: &[f64],
    margin: f64,
    reference_height: f64,
    z_factor: f64,
) -> FlowResult<DomainBounds> {
    let min = |v: &[f64]| v.iter().copied().fold(f64::INFINITY, f64::min);
    let max = |v: &[f64]| v.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    let bounds = DomainBounds::new(
        min(xs) - 2.0 * margin,
        max(xs) + 10.0 * margin,
        min(ys) - 2.0 * margin,
        max(ys) + 2.0 * margin,
        0.1,
        z_factor * reference_height,
    )?;
    Ok(bounds)
}
