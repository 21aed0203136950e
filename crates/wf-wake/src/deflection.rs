//! Wake deflection models.
//!
//! A deflection model returns the lateral displacement of the wake
//! centreline at every sample point, in the rotated frame.

use wf_core::{Field, GridPoints, Vec3, cosd, tand};
use wf_turbine::Turbine;

use crate::error::{WakeError, WakeResult};
use crate::view::{FlowView, map_points};

/// Jiménez yaw deflection with a linear lateral drift.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Jimenez {
    pub kd: f64,
    pub ad: f64,
    pub bd: f64,
}

impl Default for Jimenez {
    fn default() -> Self {
        Self {
            kd: 0.05,
            ad: -4.5,
            bd: -0.01,
        }
    }
}

/// Bastankhah & Porté-Agel deflection: linear in the near wake, logarithmic
/// in the far wake.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct GaussDeflection {
    pub ka: f64,
    pub kb: f64,
    pub alpha: f64,
    pub beta: f64,
    pub ad: f64,
    pub bd: f64,
    pub dm: f64,
}

impl Default for GaussDeflection {
    fn default() -> Self {
        Self {
            ka: 0.38,
            kb: 0.004,
            alpha: 0.58,
            beta: 0.077,
            ad: 0.0,
            bd: 0.0,
            dm: 1.0,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DeflectionModel {
    Jimenez(Jimenez),
    Gauss(GaussDeflection),
    /// Steering is carried by the curl crossflow; the centreline stays put.
    Curl,
}

impl Default for DeflectionModel {
    fn default() -> Self {
        DeflectionModel::Gauss(GaussDeflection::default())
    }
}

impl DeflectionModel {
    pub fn from_name(name: &str) -> WakeResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "jimenez" => Ok(DeflectionModel::Jimenez(Jimenez::default())),
            "gauss" => Ok(DeflectionModel::Gauss(GaussDeflection::default())),
            "curl" => Ok(DeflectionModel::Curl),
            _ => Err(WakeError::UnknownModel {
                kind: "deflection",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            DeflectionModel::Jimenez(_) => "jimenez",
            DeflectionModel::Gauss(_) => "gauss",
            DeflectionModel::Curl => "curl",
        }
    }

    /// Lateral centreline displacement of `turbine`'s wake at every point.
    pub fn function(
        &self,
        points: GridPoints<'_>,
        turbine: &Turbine,
        coord: &Vec3,
        flow: &FlowView<'_>,
    ) -> WakeResult<Field> {
        flow.check_against(points)?;
        Ok(match self {
            DeflectionModel::Jimenez(j) => jimenez(j, points, turbine, coord),
            DeflectionModel::Gauss(g) => gauss(g, points, turbine, coord, flow.wind_veer),
            DeflectionModel::Curl => Field::zeros(points.len()),
        })
    }
}

fn jimenez(params: &Jimenez, points: GridPoints<'_>, turbine: &Turbine, coord: &Vec3) -> Field {
    let d = turbine.rotor_diameter();
    let yaw = turbine.yaw_angle();
    let xi = cosd(yaw) * wf_core::sind(yaw) * turbine.ct() / 2.0;
    let kd = params.kd;

    map_points(points, |_, x, _, _| {
        let dx = x - coord.x1;
        if dx <= 0.0 {
            return 0.0;
        }
        let g = 2.0 * kd * dx / d + 1.0;
        let y_yaw = xi * (15.0 * g.powi(4) + xi * xi) / ((30.0 * kd / d) * g.powi(5))
            - xi * d * (15.0 + xi * xi) / (30.0 * kd);
        y_yaw + params.ad + params.bd * dx
    })
}

fn gauss(
    params: &GaussDeflection,
    points: GridPoints<'_>,
    turbine: &Turbine,
    coord: &Vec3,
    veer: f64,
) -> Field {
    let d = turbine.rotor_diameter();
    let ct = turbine.ct();
    let ti = turbine.turbulence_intensity();
    let yaw = -turbine.yaw_angle();
    let cos_yaw = cosd(yaw);

    let root = (1.0 - ct).sqrt();
    let root_yaw = (1.0 - ct * cos_yaw).sqrt();

    let x0 = d * (cos_yaw * (1.0 + root_yaw))
        / (2f64.sqrt() * (4.0 * params.alpha * ti + 2.0 * params.beta * (1.0 - root)))
        + coord.x1;
    let k = params.ka * ti + params.kb;

    let c0 = 1.0 - root;
    let m0 = c0 * (2.0 - c0);
    let e0 = c0 * c0 - 3.0 * (1.0f64 / 12.0).exp() * c0 + 3.0 * (1.0f64 / 3.0).exp();

    let ur_ratio = ct * cos_yaw / (2.0 * (1.0 - root_yaw));
    let sigma_z0 = d * 0.5 * (ur_ratio / (1.0 + root)).sqrt();
    let sigma_y0 = sigma_z0 * cos_yaw * cosd(veer);

    let theta_c0 = params.dm * (0.3 * yaw.to_radians() / cos_yaw) * (1.0 - root_yaw);
    let delta0 = theta_c0.tan() * (x0 - coord.x1);
    let sqrt_m0 = m0.sqrt();
    let far_scale = theta_c0 * e0 / 5.2 * (sigma_y0 * sigma_z0 / (k * k * m0)).sqrt();

    map_points(points, |_, x, y, _| {
        let x_rotor = (y - coord.x2) * tand(yaw) + coord.x1;
        if x <= x_rotor {
            return 0.0;
        }
        let drift = params.ad + params.bd * (x - coord.x1);
        if x <= x0 {
            return (x - x_rotor) / (x0 - x_rotor) * delta0 + drift;
        }
        let sigma_y = k * (x - x0) + sigma_y0;
        let sigma_z = k * (x - x0) + sigma_z0;
        let spread = 1.6 * (sigma_y * sigma_z / (sigma_y0 * sigma_z0)).sqrt();
        let num = (1.6 + sqrt_m0) * (spread - sqrt_m0);
        let den = (1.6 - sqrt_m0) * (spread + sqrt_m0);
        delta0 + far_scale * (num / den).ln() + drift
    })
}
