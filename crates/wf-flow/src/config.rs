//! Flow field configuration and per-call options.

use std::collections::BTreeMap;

use wf_core::{DomainBounds, GridResolution, TurbineId, Vec3};
use wf_wake::WakeModelBundle;

use crate::error::{FlowError, FlowResult};
use crate::grid::ExtraPoints;
use crate::wind_map::WindMap;

/// Reach of wake-added turbulence, in rotor diameters of the upstream
/// turbine.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PropagationLimits {
    /// Furthest streamwise distance a wake adds turbulence at.
    pub downstream_diameters: f64,
    /// Lateral offset beyond which a rotor is considered outside the wake.
    pub lateral_diameters: f64,
    /// Speed difference below which a rotor sample counts as freestream.
    pub freestream_tolerance: f64,
}

impl Default for PropagationLimits {
    fn default() -> Self {
        Self {
            downstream_diameters: 15.0,
            lateral_diameters: 2.0,
            freestream_tolerance: 0.05,
        }
    }
}

impl PropagationLimits {
    pub fn validate(&self) -> FlowResult<()> {
        for (v, what) in [
            (self.downstream_diameters, "downstream influence distance"),
            (self.lateral_diameters, "lateral influence distance"),
            (self.freestream_tolerance, "freestream tolerance"),
        ] {
            if !(v.is_finite() && v >= 0.0) {
                return Err(FlowError::configuration(format!(
                    "{what} must be finite and non-negative, got {v}"
                )));
            }
        }
        Ok(())
    }

    /// Whether a rotor at `downstream` can receive turbulence from the wake
    /// of a rotor of diameter `diameter` at `upstream` (rotated frame).
    pub fn influences(&self, upstream: &Vec3, downstream: &Vec3, diameter: f64) -> bool {
        downstream.x1 > upstream.x1
            && (upstream.x2 - downstream.x2).abs() < self.lateral_diameters * diameter
            && downstream.x1 <= self.downstream_diameters * diameter + upstream.x1
    }
}

/// Everything needed to build a flow field besides the turbines and wind.
#[derive(Clone, Debug, PartialEq)]
pub struct FlowFieldConfig {
    /// Power-law shear exponent of the ambient profile.
    pub wind_shear: f64,
    /// Change of direction across the rotor (degrees).
    pub wind_veer: f64,
    /// Height at which the wind speed is specified; defaults to the first
    /// turbine's hub height.
    pub reference_wind_height: Option<f64>,
    /// Length scale for default domain margins; defaults to the largest
    /// rotor diameter.
    pub reference_turbine_diameter: Option<f64>,
    /// Explicit domain extent; derived from the layout when `None`.
    pub bounds: Option<DomainBounds>,
    pub wake: WakeModelBundle,
    pub limits: PropagationLimits,
}

impl Default for FlowFieldConfig {
    fn default() -> Self {
        Self {
            wind_shear: 0.12,
            wind_veer: 0.0,
            reference_wind_height: None,
            reference_turbine_diameter: None,
            bounds: None,
            wake: WakeModelBundle::default(),
            limits: PropagationLimits::default(),
        }
    }
}

impl FlowFieldConfig {
    pub fn validate(&self) -> FlowResult<()> {
        if !self.wind_shear.is_finite() {
            return Err(FlowError::configuration("wind shear must be finite"));
        }
        if !self.wind_veer.is_finite() {
            return Err(FlowError::configuration("wind veer must be finite"));
        }
        for (v, what) in [
            (self.reference_wind_height, "reference wind height"),
            (self.reference_turbine_diameter, "reference turbine diameter"),
        ] {
            if let Some(v) = v
                && !(v.is_finite() && v > 0.0)
            {
                return Err(FlowError::configuration(format!("{what} must be positive, got {v}")));
            }
        }
        if let Some(b) = &self.bounds {
            b.validate()?;
        }
        self.wake.validate()?;
        self.limits.validate()
    }
}

/// Partial change applied by [`crate::FlowField::reinitialize`].
///
/// Fields left `None` keep their current value.
#[derive(Clone, Debug, Default)]
pub struct FlowFieldUpdate {
    pub wind_shear: Option<f64>,
    pub wind_veer: Option<f64>,
    pub wake: Option<WakeModelBundle>,
    pub wind_map: Option<WindMap>,
    /// Build a dense grid at this resolution. A model that needs its own
    /// grid rejects a different one.
    pub with_resolution: Option<GridResolution>,
    pub bounds: Option<DomainBounds>,
    pub reference_wind_height: Option<f64>,
    pub reference_turbine_diameter: Option<f64>,
    pub limits: Option<PropagationLimits>,
}

impl FlowFieldUpdate {
    pub fn wind_map(wind_map: WindMap) -> Self {
        Self {
            wind_map: Some(wind_map),
            ..Self::default()
        }
    }

    pub fn wind_shear(wind_shear: f64) -> Self {
        Self {
            wind_shear: Some(wind_shear),
            ..Self::default()
        }
    }

    /// Configuration with this update applied on top of `base`.
    pub(crate) fn merged(&self, base: &FlowFieldConfig) -> FlowFieldConfig {
        FlowFieldConfig {
            wind_shear: self.wind_shear.unwrap_or(base.wind_shear),
            wind_veer: self.wind_veer.unwrap_or(base.wind_veer),
            reference_wind_height: self.reference_wind_height.or(base.reference_wind_height),
            reference_turbine_diameter: self
                .reference_turbine_diameter
                .or(base.reference_turbine_diameter),
            bounds: self.bounds.or(base.bounds),
            wake: self.wake.unwrap_or(base.wake),
            limits: self.limits.unwrap_or(base.limits),
        }
    }
}

/// Options for one [`crate::FlowField::calculate_wake`] call.
#[derive(Clone, Debug, Default)]
pub struct WakeOptions {
    /// Update turbine inflow without imprinting wakes on the flow.
    pub no_wake: bool,
    /// Extra sample points appended to the rotor points.
    pub points: Option<ExtraPoints>,
    /// Count the upstream wakes reaching each turbine.
    pub track_n_upstream_wakes: bool,
}

/// Per-call results besides the flow field itself.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct WakeReport {
    /// Upstream wakes reaching each turbine, when requested.
    pub upstream_wakes: Option<BTreeMap<TurbineId, usize>>,
}
