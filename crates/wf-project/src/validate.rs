//! Project validation logic.

use std::collections::HashSet;

use wf_turbine::Turbine;
use wf_wake::{CombinationModel, DeflectionModel, TurbulenceModel, VelocityModel};

use crate::schema::{FlowDef, MeasurementDef, Project, TurbineTypeDef, WakeDef, WindDef};

pub const LATEST_VERSION: u32 = 1;

#[derive(thiserror::Error, Debug)]
pub enum ValidationError {
    #[error("Duplicate ID: {id} in {context}")]
    DuplicateId { id: String, context: String },

    #[error("Missing reference: {id} in {context}")]
    MissingReference { id: String, context: String },

    #[error("Invalid value: {field} = {value} ({reason})")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Unknown {kind} model: {name}")]
    UnknownModel { kind: &'static str, name: String },

    #[error("Unsupported version: {version}")]
    UnsupportedVersion { version: u32 },
}

pub fn validate_project(project: &Project) -> Result<(), ValidationError> {
    if project.version == 0 || project.version > LATEST_VERSION {
        return Err(ValidationError::UnsupportedVersion {
            version: project.version,
        });
    }

    let mut type_ids = HashSet::new();
    for turbine_type in &project.turbine_types {
        if !type_ids.insert(&turbine_type.id) {
            return Err(ValidationError::DuplicateId {
                id: turbine_type.id.clone(),
                context: "turbine_types".to_string(),
            });
        }
        validate_turbine_type(turbine_type)?;
    }

    if project.turbines.is_empty() {
        return Err(invalid("turbines", "[]", "a farm needs at least one turbine"));
    }
    let mut turbine_ids = HashSet::new();
    for turbine in &project.turbines {
        if !turbine_ids.insert(&turbine.id) {
            return Err(ValidationError::DuplicateId {
                id: turbine.id.clone(),
                context: "turbines".to_string(),
            });
        }
        if !type_ids.contains(&turbine.type_id) {
            return Err(ValidationError::MissingReference {
                id: turbine.type_id.clone(),
                context: format!("turbine '{}' type_id", turbine.id),
            });
        }
        let field = format!("turbine '{}' position", turbine.id);
        finite(&field, turbine.x_m)?;
        finite(&field, turbine.y_m)?;
        if !(turbine.yaw_deg.is_finite() && turbine.yaw_deg.abs() < 90.0) {
            return Err(invalid(
                &format!("turbine '{}' yaw_deg", turbine.id),
                turbine.yaw_deg,
                "yaw must lie strictly between -90 and 90 degrees",
            ));
        }
    }

    validate_wind(&project.wind)?;
    validate_flow(&project.flow)?;
    validate_wake(&project.wake)
}

fn validate_turbine_type(def: &TurbineTypeDef) -> Result<(), ValidationError> {
    let ctx = |name: &str| format!("turbine type '{}' {name}", def.id);
    positive(&ctx("rotor_diameter_m"), def.rotor_diameter_m)?;
    positive(&ctx("hub_height_m"), def.hub_height_m)?;

    if let Some(curve) = &def.power_curve {
        let n = curve.wind_speed_mps.len();
        if n < 2 {
            return Err(invalid(&ctx("power_curve"), n, "at least two table rows are required"));
        }
        if curve.power_coefficient.len() != n || curve.thrust_coefficient.len() != n {
            return Err(invalid(
                &ctx("power_curve"),
                format!(
                    "{}/{}/{}",
                    n,
                    curve.power_coefficient.len(),
                    curve.thrust_coefficient.len()
                ),
                "wind speed, power and thrust tables must have equal lengths",
            ));
        }
        if curve.wind_speed_mps.windows(2).any(|w| w[0] >= w[1]) {
            return Err(invalid(
                &ctx("power_curve.wind_speed_mps"),
                format!("{:?}", curve.wind_speed_mps),
                "wind speeds must be strictly increasing",
            ));
        }
    }
    if let Some(ngrid) = def.ngrid
        && ngrid < 2
    {
        return Err(invalid(&ctx("ngrid"), ngrid, "at least 2 points per axis"));
    }
    if let Some(rloc) = def.rloc
        && !(rloc > 0.0 && rloc <= 1.0)
    {
        return Err(invalid(&ctx("rloc"), rloc, "must be in (0, 1]"));
    }
    let rloc = def.rloc.unwrap_or(Turbine::DEFAULT_RLOC);
    if def.hub_height_m - rloc * def.rotor_diameter_m / 2.0 <= 0.0 {
        return Err(invalid(
            &ctx("hub_height_m"),
            def.hub_height_m,
            "rotor sample patch (hub - rloc·R) must lie above the ground",
        ));
    }
    if let Some(eta) = def.generator_efficiency
        && !(eta > 0.0 && eta <= 1.0)
    {
        return Err(invalid(&ctx("generator_efficiency"), eta, "must be in (0, 1]"));
    }
    if let Some(p) = def.yaw_loss_exponent {
        positive(&ctx("yaw_loss_exponent"), p)?;
    }
    if let Some(rho) = def.air_density_kg_per_m3 {
        positive(&ctx("air_density_kg_per_m3"), rho)?;
    }
    Ok(())
}

fn validate_wind(wind: &WindDef) -> Result<(), ValidationError> {
    match wind {
        WindDef::Homogeneous {
            speed_mps,
            direction_deg,
            turbulence_intensity,
        } => validate_conditions("wind", *speed_mps, *direction_deg, *turbulence_intensity),
        WindDef::Measured { measurements } => {
            if measurements.is_empty() {
                return Err(invalid(
                    "wind.measurements",
                    "[]",
                    "at least one measurement is required",
                ));
            }
            measurements
                .iter()
                .enumerate()
                .try_for_each(|(i, m)| validate_measurement(i, m))
        }
    }
}

fn validate_measurement(index: usize, m: &MeasurementDef) -> Result<(), ValidationError> {
    let ctx = format!("wind.measurements[{index}]");
    finite(&ctx, m.x_m)?;
    finite(&ctx, m.y_m)?;
    validate_conditions(&ctx, m.speed_mps, m.direction_deg, m.turbulence_intensity)
}

fn validate_conditions(ctx: &str, speed: f64, direction: f64, ti: f64) -> Result<(), ValidationError> {
    if !(speed.is_finite() && speed >= 0.0) {
        return Err(invalid(&format!("{ctx} speed_mps"), speed, "must be finite and non-negative"));
    }
    finite(&format!("{ctx} direction_deg"), direction)?;
    if !(0.0..=1.0).contains(&ti) {
        return Err(invalid(&format!("{ctx} turbulence_intensity"), ti, "must be in [0, 1]"));
    }
    Ok(())
}

fn validate_flow(flow: &FlowDef) -> Result<(), ValidationError> {
    finite("flow.wind_shear", flow.wind_shear)?;
    finite("flow.wind_veer_deg", flow.wind_veer_deg)?;
    if let Some(h) = flow.reference_wind_height_m {
        positive("flow.reference_wind_height_m", h)?;
    }
    if let Some(d) = flow.reference_turbine_diameter_m {
        positive("flow.reference_turbine_diameter_m", d)?;
    }
    if let Some(b) = flow.bounds_m
        && wf_core::DomainBounds::from_array(b).is_err()
    {
        return Err(invalid(
            "flow.bounds_m",
            format!("{b:?}"),
            "bounds must be finite, ordered, and above ground",
        ));
    }
    if let Some(r) = flow.resolution
        && r.validate().is_err()
    {
        return Err(invalid(
            "flow.resolution",
            format!("{}x{}x{}", r.nx, r.ny, r.nz),
            "at least 2 points per axis",
        ));
    }
    Ok(())
}

fn validate_wake(wake: &WakeDef) -> Result<(), ValidationError> {
    let unknown = |kind: &'static str, name: &str| ValidationError::UnknownModel {
        kind,
        name: name.to_string(),
    };
    VelocityModel::from_name(&wake.velocity_model)
        .map_err(|_| unknown("velocity", &wake.velocity_model))?;
    DeflectionModel::from_name(&wake.deflection_model)
        .map_err(|_| unknown("deflection", &wake.deflection_model))?;
    TurbulenceModel::from_name(&wake.turbulence_model)
        .map_err(|_| unknown("turbulence", &wake.turbulence_model))?;
    CombinationModel::from_name(&wake.combination_model)
        .map_err(|_| unknown("combination", &wake.combination_model))?;
    Ok(())
}

fn invalid(field: &str, value: impl ToString, reason: &str) -> ValidationError {
    ValidationError::InvalidValue {
        field: field.to_string(),
        value: value.to_string(),
        reason: reason.to_string(),
    }
}

fn finite(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() {
        Ok(())
    } else {
        Err(invalid(field, value, "must be finite"))
    }
}

fn positive(field: &str, value: f64) -> Result<(), ValidationError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(invalid(field, value, "must be positive"))
    }
}
