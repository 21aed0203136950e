//! Project schema definitions.

use serde::{Deserialize, Serialize};
use wf_core::GridResolution;

/// A wind farm and the conditions to evaluate it under.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Project {
    pub version: u32,
    pub name: String,
    #[serde(default)]
    pub turbine_types: Vec<TurbineTypeDef>,
    #[serde(default)]
    pub turbines: Vec<TurbineDef>,
    pub wind: WindDef,
    #[serde(default)]
    pub flow: FlowDef,
    #[serde(default)]
    pub wake: WakeDef,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurbineTypeDef {
    pub id: String,
    pub rotor_diameter_m: f64,
    pub hub_height_m: f64,
    /// Omitted means the NREL 5-MW reference table.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub power_curve: Option<PowerCurveDef>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ngrid: Option<usize>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rloc: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub yaw_loss_exponent: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub generator_efficiency: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub air_density_kg_per_m3: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PowerCurveDef {
    pub wind_speed_mps: Vec<f64>,
    pub power_coefficient: Vec<f64>,
    pub thrust_coefficient: Vec<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct TurbineDef {
    pub id: String,
    pub type_id: String,
    pub x_m: f64,
    pub y_m: f64,
    #[serde(default)]
    pub yaw_deg: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type")]
pub enum WindDef {
    Homogeneous {
        speed_mps: f64,
        direction_deg: f64,
        turbulence_intensity: f64,
    },
    Measured {
        measurements: Vec<MeasurementDef>,
    },
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct MeasurementDef {
    pub x_m: f64,
    pub y_m: f64,
    pub speed_mps: f64,
    pub direction_deg: f64,
    pub turbulence_intensity: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FlowDef {
    #[serde(default = "default_wind_shear")]
    pub wind_shear: f64,
    #[serde(default)]
    pub wind_veer_deg: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_wind_height_m: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reference_turbine_diameter_m: Option<f64>,
    /// `[xmin, xmax, ymin, ymax, zmin, zmax]`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounds_m: Option<[f64; 6]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resolution: Option<GridResolution>,
}

impl Default for FlowDef {
    fn default() -> Self {
        Self {
            wind_shear: default_wind_shear(),
            wind_veer_deg: 0.0,
            reference_wind_height_m: None,
            reference_turbine_diameter_m: None,
            bounds_m: None,
            resolution: None,
        }
    }
}

fn default_wind_shear() -> f64 {
    0.12
}

/// Wake sub-models by name.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WakeDef {
    #[serde(default = "default_velocity_model")]
    pub velocity_model: String,
    #[serde(default = "default_deflection_model")]
    pub deflection_model: String,
    #[serde(default = "default_turbulence_model")]
    pub turbulence_model: String,
    #[serde(default = "default_combination_model")]
    pub combination_model: String,
}

impl Default for WakeDef {
    fn default() -> Self {
        Self {
            velocity_model: default_velocity_model(),
            deflection_model: default_deflection_model(),
            turbulence_model: default_turbulence_model(),
            combination_model: default_combination_model(),
        }
    }
}

fn default_velocity_model() -> String {
    "gauss".to_string()
}

fn default_deflection_model() -> String {
    "gauss".to_string()
}

fn default_turbulence_model() -> String {
    "crespo_hernandez".to_string()
}

fn default_combination_model() -> String {
    "sosfs".to_string()
}
