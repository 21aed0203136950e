//! Wake-added turbulence models.

use std::f64::consts::PI;

use wf_core::Vec3;
use wf_turbine::Turbine;

use crate::error::{WakeError, WakeResult};

/// Crespo & Hernández empirical wake turbulence.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CrespoHernandez {
    pub initial: f64,
    pub constant: f64,
    pub ai: f64,
    pub downstream: f64,
}

impl Default for CrespoHernandez {
    fn default() -> Self {
        Self {
            initial: 0.1,
            constant: 0.5,
            ai: 0.8,
            downstream: -0.32,
        }
    }
}

/// `const · Ct^ct · TI^ti`
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PowerLaw {
    pub constant: f64,
    pub ct: f64,
    pub ti: f64,
}

impl PowerLaw {
    const fn new(constant: f64, ct: f64, ti: f64) -> Self {
        Self { constant, ct, ti }
    }

    fn eval(&self, ct: f64, ti: f64) -> f64 {
        self.constant * ct.powf(self.ct) * ti.powf(self.ti)
    }
}

/// Ishihara & Qian wake turbulence with radial shape and ground correction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct IshiharaQian {
    pub kstar: PowerLaw,
    pub epsilon: PowerLaw,
    pub d: PowerLaw,
    pub e: PowerLaw,
    pub f: PowerLaw,
}

impl Default for IshiharaQian {
    fn default() -> Self {
        Self {
            kstar: PowerLaw::new(0.11, 1.07, 0.2),
            epsilon: PowerLaw::new(0.23, -0.25, 0.17),
            d: PowerLaw::new(2.3, 1.2, 0.0),
            e: PowerLaw::new(1.0, 0.0, 0.1),
            f: PowerLaw::new(0.7, -3.2, -0.45),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum TurbulenceModel {
    CrespoHernandez(CrespoHernandez),
    IshiharaQian(IshiharaQian),
    None,
}

impl Default for TurbulenceModel {
    fn default() -> Self {
        TurbulenceModel::CrespoHernandez(CrespoHernandez::default())
    }
}

impl TurbulenceModel {
    pub fn from_name(name: &str) -> WakeResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "crespo_hernandez" => Ok(TurbulenceModel::CrespoHernandez(CrespoHernandez::default())),
            "ishihara_qian" => Ok(TurbulenceModel::IshiharaQian(IshiharaQian::default())),
            "none" => Ok(TurbulenceModel::None),
            _ => Err(WakeError::UnknownModel {
                kind: "turbulence",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            TurbulenceModel::CrespoHernandez(_) => "crespo_hernandez",
            TurbulenceModel::IshiharaQian(_) => "ishihara_qian",
            TurbulenceModel::None => "none",
        }
    }

    /// Whether wake-added turbulence is carried to downstream turbines.
    pub fn propagates_downstream(&self) -> bool {
        match self {
            TurbulenceModel::CrespoHernandez(_) | TurbulenceModel::IshiharaQian(_) => true,
            TurbulenceModel::None => false,
        }
    }

    /// Turbulence intensity added by `turbine` (at `coord_upstream`) at a
    /// rotor located at `coord_downstream`, before overlap weighting.
    ///
    /// Zero when the downstream rotor is not actually downstream.
    pub fn function(
        &self,
        ambient_ti: f64,
        coord_downstream: &Vec3,
        coord_upstream: &Vec3,
        turbine: &Turbine,
    ) -> f64 {
        let dx = coord_downstream.x1 - coord_upstream.x1;
        if dx <= 0.0 {
            return 0.0;
        }
        match self {
            TurbulenceModel::CrespoHernandez(p) => {
                p.constant
                    * turbine.axial_induction().powf(p.ai)
                    * ambient_ti.max(0.0).powf(p.initial)
                    * (dx / turbine.rotor_diameter()).powf(p.downstream)
            }
            TurbulenceModel::IshiharaQian(p) => {
                ishihara_qian(p, ambient_ti, coord_downstream, coord_upstream, turbine)
            }
            TurbulenceModel::None => 0.0,
        }
    }
}

fn ishihara_qian(
    p: &IshiharaQian,
    ambient_ti: f64,
    downstream: &Vec3,
    upstream: &Vec3,
    turbine: &Turbine,
) -> f64 {
    // negative TI exponents make a calm inflow singular
    if ambient_ti <= 0.0 {
        return 0.0;
    }
    let d = turbine.rotor_diameter();
    let hub = turbine.hub_height();
    let ct = turbine.ct();

    let local_x = downstream.x1 - upstream.x1;
    let local_y = downstream.x2 - upstream.x2;
    let local_z = downstream.x3 - upstream.x3;
    let r = (local_y * local_y + local_z * local_z).sqrt();

    let k = p.kstar.eval(ct, ambient_ti);
    let epsilon = p.epsilon.eval(ct, ambient_ti);
    let pd = p.d.eval(ct, ambient_ti);
    let pe = p.e.eval(ct, ambient_ti);
    let pf = p.f.eval(ct, ambient_ti);

    let (k1, k2) = if r / d > 0.5 {
        (1.0, 0.0)
    } else {
        (
            (PI / 2.0 * (r / d - 0.5)).cos().powi(2),
            (PI / 2.0 * (r / d + 0.5)).cos().powi(2),
        )
    };

    let width = (k * local_x / d + epsilon) * d;
    let two_w2 = 2.0 * width * width;
    let xd = local_x / d;

    let ground = if local_z >= hub {
        0.0
    } else {
        ambient_ti * (PI * (hub - local_z) / hub).sin().powi(2)
    };

    let amplitude = 1.0 / (pd + pe * xd + pf * (1.0 + xd).powi(-2));
    amplitude
        * (k1 * (-(r - d / 2.0).powi(2) / two_w2).exp() + k2 * (-(r + d / 2.0).powi(2) / two_w2).exp())
        - ground
}
