//! Construction of a ready flow field from a validated project.

use tracing::debug;
use wf_core::units::{kg_per_m3, m};
use wf_flow::{FlowField, FlowFieldConfig, FlowFieldUpdate, Measurement, WindMap};
use wf_turbine::{PowerCurve, Turbine, TurbineMap};
use wf_wake::{VelocityModel, WakeModelBundle};

use crate::schema::{Project, TurbineTypeDef, WindDef};
use crate::{ProjectError, ProjectResult};

pub fn build_flow_field(project: &Project) -> ProjectResult<FlowField> {
    let turbine_map = build_turbine_map(project)?;
    let wind_map = build_wind_map(&project.wind)?;
    let config = build_config(project)?;
    let has_own_grid = config.wake.grid_resolution().is_some();

    let mut flow_field = FlowField::new(config, turbine_map, wind_map)?;
    if let Some(resolution) = project.flow.resolution
        && !has_own_grid
    {
        flow_field.reinitialize(FlowFieldUpdate {
            with_resolution: Some(resolution),
            ..FlowFieldUpdate::default()
        })?;
    }
    debug!(project = %project.name, points = flow_field.x().len(), "flow field built");
    Ok(flow_field)
}

pub fn build_turbine_map(project: &Project) -> ProjectResult<TurbineMap> {
    let mut turbines = Vec::with_capacity(project.turbines.len());
    let mut layout_x = Vec::with_capacity(project.turbines.len());
    let mut layout_y = Vec::with_capacity(project.turbines.len());

    for def in &project.turbines {
        let turbine_type = project
            .turbine_types
            .iter()
            .find(|t| t.id == def.type_id)
            .ok_or_else(|| ProjectError::Build {
                what: format!("turbine '{}' references unknown type '{}'", def.id, def.type_id),
            })?;
        let mut turbine = build_turbine(&def.id, turbine_type)?;
        turbine.set_yaw_angle(def.yaw_deg)?;
        turbines.push(turbine);
        layout_x.push(def.x_m);
        layout_y.push(def.y_m);
    }
    Ok(TurbineMap::new(&layout_x, &layout_y, turbines)?)
}

fn build_turbine(name: &str, def: &TurbineTypeDef) -> ProjectResult<Turbine> {
    let power_curve = match &def.power_curve {
        Some(curve) => PowerCurve::new(
            curve.wind_speed_mps.clone(),
            curve.power_coefficient.clone(),
            curve.thrust_coefficient.clone(),
        )?,
        None => PowerCurve::nrel_5mw(),
    };
    let mut turbine = Turbine::new(name, m(def.rotor_diameter_m), m(def.hub_height_m), power_curve)?;
    if let Some(ngrid) = def.ngrid {
        turbine = turbine.with_ngrid(ngrid)?;
    }
    if let Some(rloc) = def.rloc {
        turbine = turbine.with_rloc(rloc)?;
    }
    if let Some(p_p) = def.yaw_loss_exponent {
        turbine = turbine.with_yaw_loss_exponent(p_p)?;
    }
    if let Some(eta) = def.generator_efficiency {
        turbine = turbine.with_generator_efficiency(eta)?;
    }
    if let Some(rho) = def.air_density_kg_per_m3 {
        turbine = turbine.with_air_density(kg_per_m3(rho))?;
    }
    Ok(turbine)
}

pub fn build_wind_map(wind: &WindDef) -> ProjectResult<WindMap> {
    let wind_map = match wind {
        WindDef::Homogeneous {
            speed_mps,
            direction_deg,
            turbulence_intensity,
        } => WindMap::homogeneous(*speed_mps, *direction_deg, *turbulence_intensity)?,
        WindDef::Measured { measurements } => WindMap::from_measurements(
            measurements
                .iter()
                .map(|m| Measurement {
                    x: m.x_m,
                    y: m.y_m,
                    speed: m.speed_mps,
                    direction: m.direction_deg,
                    turbulence_intensity: m.turbulence_intensity,
                })
                .collect(),
        )?,
    };
    Ok(wind_map)
}

/// Engine configuration. A project resolution sizes the curl model's own
/// grid; for other models it requests a visualisation grid instead.
pub fn build_config(project: &Project) -> ProjectResult<FlowFieldConfig> {
    let wake = &project.wake;
    let mut bundle = WakeModelBundle::from_names(
        &wake.velocity_model,
        &wake.deflection_model,
        &wake.turbulence_model,
        &wake.combination_model,
    )?;
    if let (VelocityModel::Curl(curl), Some(resolution)) =
        (&mut bundle.velocity, project.flow.resolution)
    {
        curl.model_grid_resolution = resolution;
    }

    let flow = &project.flow;
    let bounds = flow
        .bounds_m
        .map(wf_core::DomainBounds::from_array)
        .transpose()?;
    let config = FlowFieldConfig {
        wind_shear: flow.wind_shear,
        wind_veer: flow.wind_veer_deg,
        reference_wind_height: flow.reference_wind_height_m,
        reference_turbine_diameter: flow.reference_turbine_diameter_m,
        bounds,
        wake: bundle,
        ..FlowFieldConfig::default()
    };
    config.validate()?;
    Ok(config)
}
