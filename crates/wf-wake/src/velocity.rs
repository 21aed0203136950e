//! Velocity deficit models.

use wf_core::{Field, GridPoints, GridResolution, Vec3, cosd, sind, tand};
use wf_turbine::Turbine;

use crate::error::{WakeError, WakeResult};
use crate::view::{FlowView, check_len, map_points, map_points_pair};
use crate::vortex::VortexPair;

/// How a model's lateral/vertical output relates to the farm crossflow.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Crossflow {
    /// The model returns the whole `(v, w)` field; it replaces the farm's.
    Absolute,
    /// The model returns one rotor's contribution; it is added to the farm's.
    Incremental,
}

/// One rotor's contribution at every sample point.
#[derive(Clone, Debug, PartialEq)]
pub struct VelocityDeficit {
    pub u: Field,
    pub v: Field,
    pub w: Field,
}

impl VelocityDeficit {
    pub fn zeros(n: usize) -> Self {
        Self {
            u: Field::zeros(n),
            v: Field::zeros(n),
            w: Field::zeros(n),
        }
    }
}

/// Top-hat wake of linearly growing radius.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jensen {
    /// Wake expansion rate.
    pub we: f64,
}

impl Default for Jensen {
    fn default() -> Self {
        Self { we: 0.05 }
    }
}

/// Self-similar Gaussian wake with a linear near-wake transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Gauss {
    pub ka: f64,
    pub kb: f64,
    pub alpha: f64,
    pub beta: f64,
    /// Add the crossflow of the yaw-shed vortex pair.
    pub use_secondary_steering: bool,
}

impl Default for Gauss {
    fn default() -> Self {
        Self {
            ka: 0.38,
            kb: 0.004,
            alpha: 0.58,
            beta: 0.077,
            use_secondary_steering: false,
        }
    }
}

/// Gaussian deficit steered by the yaw-shed vortex pair on a dense grid.
///
/// The crossflow it reports is the farm field so far plus this rotor's
/// vortices, so the engine stores it as is.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Curl {
    pub model_grid_resolution: GridResolution,
    pub vortex_strength: f64,
    pub eps_gain: f64,
    pub ka: f64,
    pub kb: f64,
    pub alpha: f64,
    pub beta: f64,
}

impl Default for Curl {
    fn default() -> Self {
        let gauss = Gauss::default();
        Self {
            model_grid_resolution: GridResolution {
                nx: 100,
                ny: 50,
                nz: 20,
            },
            vortex_strength: 1.0,
            eps_gain: 0.2,
            ka: gauss.ka,
            kb: gauss.kb,
            alpha: gauss.alpha,
            beta: gauss.beta,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum VelocityModel {
    Jensen(Jensen),
    Gauss(Gauss),
    Curl(Curl),
}

impl Default for VelocityModel {
    fn default() -> Self {
        VelocityModel::Gauss(Gauss::default())
    }
}

impl VelocityModel {
    /// Model with default parameters from its configuration name.
    pub fn from_name(name: &str) -> WakeResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jensen" => Ok(VelocityModel::Jensen(Jensen::default())),
            "gauss" | "gauss_legacy" => Ok(VelocityModel::Gauss(Gauss::default())),
            "curl" => Ok(VelocityModel::Curl(Curl::default())),
            _ => Err(WakeError::UnknownModel {
                kind: "velocity",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            VelocityModel::Jensen(_) => "jensen",
            VelocityModel::Gauss(_) => "gauss",
            VelocityModel::Curl(_) => "curl",
        }
    }

    /// Resolution of the dense grid this model needs, if any.
    pub fn model_grid_resolution(&self) -> Option<GridResolution> {
        match self {
            VelocityModel::Curl(c) => Some(c.model_grid_resolution),
            VelocityModel::Jensen(_) | VelocityModel::Gauss(_) => None,
        }
    }

    pub fn crossflow(&self) -> Crossflow {
        match self {
            VelocityModel::Curl(_) => Crossflow::Absolute,
            VelocityModel::Jensen(_) | VelocityModel::Gauss(_) => Crossflow::Incremental,
        }
    }

    /// Whether the grid itself is laid out in the wind-aligned frame while
    /// the wake is computed.
    pub fn rotates_physical_grid(&self) -> bool {
        matches!(self, VelocityModel::Curl(_))
    }

    pub fn validate(&self) -> WakeResult<()> {
        let positive = |v: f64, what| {
            if v.is_finite() && v > 0.0 {
                Ok(())
            } else {
                Err(WakeError::InvalidParameter { what })
            }
        };
        match self {
            VelocityModel::Jensen(j) => positive(j.we, "jensen expansion rate must be positive"),
            VelocityModel::Gauss(g) => {
                positive(g.ka, "gauss ka must be positive")?;
                positive(g.alpha, "gauss alpha must be positive")?;
                positive(g.beta, "gauss beta must be positive")
            }
            VelocityModel::Curl(c) => {
                c.model_grid_resolution.validate()?;
                positive(c.eps_gain, "curl eps gain must be positive")?;
                positive(c.ka, "curl ka must be positive")?;
                positive(c.alpha, "curl alpha must be positive")?;
                positive(c.beta, "curl beta must be positive")
            }
        }
    }

    /// Velocity deficit of `turbine` at every sample point.
    ///
    /// `coord` is the turbine's position in the rotated frame and
    /// `deflection` the lateral wake displacement at every point.
    pub fn function(
        &self,
        points: GridPoints<'_>,
        turbine: &Turbine,
        coord: &Vec3,
        deflection: &Field,
        flow: &FlowView<'_>,
    ) -> WakeResult<VelocityDeficit> {
        flow.check_against(points)?;
        check_len(deflection, points.len(), "deflection field")?;
        let n = points.len();

        match self {
            VelocityModel::Jensen(j) => {
                let u = jensen_deficit(j, points, turbine, coord, deflection, flow.u_initial);
                Ok(VelocityDeficit {
                    u,
                    v: Field::zeros(n),
                    w: Field::zeros(n),
                })
            }
            VelocityModel::Gauss(g) => {
                let profile = GaussProfile::new(g.ka, g.kb, g.alpha, g.beta, turbine, coord, flow.wind_veer);
                let u = map_points(points, |i, x, y, z| {
                    profile.deficit(x, y, z, deflection[i], flow.u_initial[i])
                });
                Ok(VelocityDeficit {
                    u,
                    v: Field::zeros(n),
                    w: Field::zeros(n),
                })
            }
            VelocityModel::Curl(c) => {
                let profile = GaussProfile::new(c.ka, c.kb, c.alpha, c.beta, turbine, coord, flow.wind_veer);
                let pair = VortexPair::for_turbine(turbine, coord, c.vortex_strength, c.eps_gain);
                let u = map_points(points, |i, x, y, z| {
                    let drift = pair.map_or(0.0, |p| p.lateral_drift(x));
                    profile.deficit(x, y, z, deflection[i] + drift, flow.u_initial[i])
                });
                let (v, w) = match pair {
                    Some(p) => map_points_pair(points, |i, x, y, z| {
                        let (dv, dw) = p.induced(x, y, z);
                        (flow.v[i] + dv, flow.w[i] + dw)
                    }),
                    None => (flow.v.clone(), flow.w.clone()),
                };
                Ok(VelocityDeficit { u, v, w })
            }
        }
    }

    /// Extra crossflow of a yawed rotor, for models that provide one.
    ///
    /// The returned `(v, w)` are increments on top of [`Self::function`]'s.
    pub fn secondary_correction(
        &self,
        points: GridPoints<'_>,
        turbine: &Turbine,
        coord: &Vec3,
    ) -> Option<(Field, Field)> {
        match self {
            VelocityModel::Gauss(g) if g.use_secondary_steering => {
                let pair = VortexPair::for_turbine(turbine, coord, 1.0, 0.2);
                Some(match pair {
                    Some(p) => map_points_pair(points, |_, x, y, z| p.induced(x, y, z)),
                    None => (Field::zeros(points.len()), Field::zeros(points.len())),
                })
            }
            VelocityModel::Gauss(_) | VelocityModel::Jensen(_) | VelocityModel::Curl(_) => None,
        }
    }
}

fn jensen_deficit(
    params: &Jensen,
    points: GridPoints<'_>,
    turbine: &Turbine,
    coord: &Vec3,
    deflection: &Field,
    u_initial: &Field,
) -> Field {
    let r = turbine.rotor_radius();
    let hub = turbine.hub_height();
    let a = turbine.axial_induction();
    map_points(points, |i, x, y, z| {
        let dx = x - coord.x1;
        if dx <= 0.0 {
            return 0.0;
        }
        let boundary = params.we * dx + r;
        let dy = y - coord.x2 - deflection[i];
        let dz = z - hub;
        if dy * dy + dz * dz > boundary * boundary {
            return 0.0;
        }
        2.0 * a * (r / boundary).powi(2) * u_initial[i]
    })
}

/// Per-rotor constants of the Gaussian wake profile.
#[derive(Clone, Copy, Debug)]
struct GaussProfile {
    d: f64,
    hub: f64,
    ct: f64,
    yaw: f64,
    x1: f64,
    x2: f64,
    x0: f64,
    k: f64,
    sigma_y0: f64,
    sigma_z0: f64,
    sigma_rotor: f64,
    veer: f64,
}

impl GaussProfile {
    fn new(
        ka: f64,
        kb: f64,
        alpha: f64,
        beta: f64,
        turbine: &Turbine,
        coord: &Vec3,
        veer: f64,
    ) -> Self {
        let d = turbine.rotor_diameter();
        let ct = turbine.ct();
        let ti = turbine.turbulence_intensity();
        // opposite sign convention to the turbine
        let yaw = -turbine.yaw_angle();
        let root = (1.0 - ct).sqrt();

        // uR / (U + u0) reduces to a constant of Ct
        let ur_ratio = ct / (2.0 * (1.0 - root));
        let sigma_z0 = d * 0.5 * (ur_ratio / (1.0 + root)).sqrt();
        let sigma_y0 = sigma_z0 * cosd(yaw) * cosd(veer);

        let x0 = d * (cosd(yaw) * (1.0 + root))
            / (2f64.sqrt() * (4.0 * alpha * ti + 2.0 * beta * (1.0 - root)))
            + coord.x1;

        Self {
            d,
            hub: turbine.hub_height(),
            ct,
            yaw,
            x1: coord.x1,
            x2: coord.x2,
            x0,
            k: ka * ti + kb,
            sigma_y0,
            sigma_z0,
            sigma_rotor: 0.501 * d * (ct / 2.0).sqrt(),
            veer,
        }
    }

    fn deficit(&self, x: f64, y: f64, z: f64, delta: f64, u_initial: f64) -> f64 {
        let x_rotor = (y - self.x2) * tand(self.yaw) + self.x1;
        if x <= x_rotor {
            return 0.0;
        }

        let (sigma_y, sigma_z) = if x < self.x0 {
            let t = (x - x_rotor) / (self.x0 - x_rotor);
            (
                (1.0 - t) * self.sigma_rotor + t * self.sigma_y0,
                (1.0 - t) * self.sigma_rotor + t * self.sigma_z0,
            )
        } else {
            let grow = self.k * (x - self.x0);
            (grow + self.sigma_y0, grow + self.sigma_z0)
        };

        let (sy2, sz2) = (sigma_y * sigma_y, sigma_z * sigma_z);
        let a = cosd(self.veer).powi(2) / (2.0 * sy2) + sind(self.veer).powi(2) / (2.0 * sz2);
        let b = -sind(2.0 * self.veer) / (4.0 * sy2) + sind(2.0 * self.veer) / (4.0 * sz2);
        let c = sind(self.veer).powi(2) / (2.0 * sy2) + cosd(self.veer).powi(2) / (2.0 * sz2);

        let dy = y - self.x2 - delta;
        let dz = z - self.hub;
        let r1 = a * dy * dy - 2.0 * b * dy * dz + c * dz * dz;

        let loading = self.ct * cosd(self.yaw) / (8.0 * sigma_y * sigma_z / (self.d * self.d));
        let centre = 1.0 - (1.0 - loading).max(0.0).sqrt();
        u_initial * centre * (-r1).exp()
    }
}
