//! The four wake strategies the flow engine runs together.

use tracing::debug;
use wf_core::{Field, GridPoints, GridResolution, Vec3};
use wf_turbine::Turbine;

use crate::combination::CombinationModel;
use crate::deflection::DeflectionModel;
use crate::error::WakeResult;
use crate::turbulence::TurbulenceModel;
use crate::velocity::{Crossflow, VelocityDeficit, VelocityModel};
use crate::view::FlowView;

/// Velocity, deflection, turbulence and combination models.
///
/// A bundle is immutable while a wake calculation runs; changing a model
/// means building a new bundle and reinitialising the flow field with it.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct WakeModelBundle {
    pub velocity: VelocityModel,
    pub deflection: DeflectionModel,
    pub turbulence: TurbulenceModel,
    pub combination: CombinationModel,
}

impl WakeModelBundle {
    pub fn new(
        velocity: VelocityModel,
        deflection: DeflectionModel,
        turbulence: TurbulenceModel,
        combination: CombinationModel,
    ) -> WakeResult<Self> {
        let bundle = Self {
            velocity,
            deflection,
            turbulence,
            combination,
        };
        bundle.validate()?;
        Ok(bundle)
    }

    /// Build a bundle from configuration names.
    pub fn from_names(
        velocity: &str,
        deflection: &str,
        turbulence: &str,
        combination: &str,
    ) -> WakeResult<Self> {
        let bundle = Self::new(
            VelocityModel::from_name(velocity)?,
            DeflectionModel::from_name(deflection)?,
            TurbulenceModel::from_name(turbulence)?,
            CombinationModel::from_name(combination)?,
        )?;
        debug!(
            velocity = bundle.velocity.name(),
            deflection = bundle.deflection.name(),
            turbulence = bundle.turbulence.name(),
            combination = bundle.combination.name(),
            "wake models selected"
        );
        Ok(bundle)
    }

    pub fn validate(&self) -> WakeResult<()> {
        self.velocity.validate()
    }

    /// Dense-grid resolution required by the velocity model, if any.
    pub fn grid_resolution(&self) -> Option<GridResolution> {
        self.velocity.model_grid_resolution()
    }

    pub fn crossflow(&self) -> Crossflow {
        self.velocity.crossflow()
    }

    /// Deficit of `turbine` with its secondary crossflow already applied.
    pub fn velocity_function(
        &self,
        points: GridPoints<'_>,
        turbine: &Turbine,
        coord: &Vec3,
        deflection: &Field,
        flow: &FlowView<'_>,
    ) -> WakeResult<VelocityDeficit> {
        let mut deficit = self
            .velocity
            .function(points, turbine, coord, deflection, flow)?;
        if let Some((dv, dw)) = self.velocity.secondary_correction(points, turbine, coord) {
            deficit.v += dv;
            deficit.w += dw;
        }
        Ok(deficit)
    }

    pub fn deflection_function(
        &self,
        points: GridPoints<'_>,
        turbine: &Turbine,
        coord: &Vec3,
        flow: &FlowView<'_>,
    ) -> WakeResult<Field> {
        self.deflection.function(points, turbine, coord, flow)
    }

    pub fn turbulence_function(
        &self,
        ambient_ti: f64,
        coord_downstream: &Vec3,
        coord_upstream: &Vec3,
        turbine: &Turbine,
    ) -> f64 {
        self.turbulence
            .function(ambient_ti, coord_downstream, coord_upstream, turbine)
    }

    pub fn combination_function(&self, existing: &Field, new: &Field) -> WakeResult<Field> {
        self.combination.function(existing, new)
    }
}
