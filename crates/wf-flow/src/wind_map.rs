//! Ambient wind speed, direction and turbulence across the farm.

use rayon::prelude::*;
use wf_core::rotation::rotation_angle;
use wf_core::Field;

use crate::error::{FlowError, FlowResult};

/// IDW exponent for heterogeneous inflow.
const IDW_POWER: i32 = 2;
/// Squared distance under which a sample sits on a measurement.
const COINCIDENT_D2: f64 = 1e-12;

/// One point measurement of the ambient inflow.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Measurement {
    pub x: f64,
    pub y: f64,
    pub speed: f64,
    /// Meteorological direction the wind blows from (degrees).
    pub direction: f64,
    pub turbulence_intensity: f64,
}

impl Measurement {
    fn validate(&self) -> FlowResult<()> {
        if !(self.x.is_finite() && self.y.is_finite()) {
            return Err(FlowError::configuration("measurement location must be finite"));
        }
        if !(self.speed.is_finite() && self.speed >= 0.0) {
            return Err(FlowError::configuration(format!(
                "wind speed must be finite and non-negative, got {}",
                self.speed
            )));
        }
        if !self.direction.is_finite() {
            return Err(FlowError::configuration("wind direction must be finite"));
        }
        if !(0.0..=1.0).contains(&self.turbulence_intensity) {
            return Err(FlowError::configuration(format!(
                "turbulence intensity must be in [0, 1], got {}",
                self.turbulence_intensity
            )));
        }
        Ok(())
    }
}

/// Inflow conditions resolved at every turbine and every sample point.
///
/// A single measurement is a homogeneous inflow. Several measurements are
/// blended by inverse-distance weighting, with directions averaged on the
/// unit circle.
#[derive(Clone, Debug, PartialEq)]
pub struct WindMap {
    measurements: Vec<Measurement>,

    turbine_wind_speed: Vec<f64>,
    turbine_wind_direction: Vec<f64>,
    turbine_turbulence_intensity: Vec<f64>,

    grid_wind_speed: Field,
    grid_wind_direction: Field,
    grid_turbulence_intensity: Field,
}

impl WindMap {
    pub fn homogeneous(speed: f64, direction: f64, turbulence_intensity: f64) -> FlowResult<Self> {
        Self::from_measurements(vec![Measurement {
            x: 0.0,
            y: 0.0,
            speed,
            direction,
            turbulence_intensity,
        }])
    }

    pub fn from_measurements(measurements: Vec<Measurement>) -> FlowResult<Self> {
        if measurements.is_empty() {
            return Err(FlowError::configuration("wind map needs at least one measurement"));
        }
        for m in &measurements {
            m.validate()?;
        }
        Ok(Self {
            measurements,
            turbine_wind_speed: Vec::new(),
            turbine_wind_direction: Vec::new(),
            turbine_turbulence_intensity: Vec::new(),
            grid_wind_speed: Field::zeros(0),
            grid_wind_direction: Field::zeros(0),
            grid_turbulence_intensity: Field::zeros(0),
        })
    }

    pub fn measurements(&self) -> &[Measurement] {
        &self.measurements
    }

    /// Conditions at `(x, y)`: `(speed, direction, turbulence intensity)`.
    pub fn sample(&self, x: f64, y: f64) -> (f64, f64, f64) {
        if let [only] = self.measurements.as_slice() {
            return (only.speed, only.direction, only.turbulence_intensity);
        }

        let mut weights = Vec::with_capacity(self.measurements.len());
        for m in &self.measurements {
            let d2 = (m.x - x).powi(2) + (m.y - y).powi(2);
            if d2 < COINCIDENT_D2 {
                return (m.speed, m.direction, m.turbulence_intensity);
            }
            weights.push(1.0 / d2.sqrt().powi(IDW_POWER));
        }
        let total: f64 = weights.iter().sum();

        let (mut speed, mut ti, mut sin, mut cos) = (0.0, 0.0, 0.0, 0.0);
        for (m, w) in self.measurements.iter().zip(&weights) {
            let w = w / total;
            speed += w * m.speed;
            ti += w * m.turbulence_intensity;
            sin += w * m.direction.to_radians().sin();
            cos += w * m.direction.to_radians().cos();
        }
        let direction = match self.shared_direction() {
            Some(direction) => direction,
            None => sin.atan2(cos).to_degrees().rem_euclid(360.0),
        };
        (speed, direction, ti)
    }

    /// The direction every measurement agrees on, if any.
    fn shared_direction(&self) -> Option<f64> {
        let (first, rest) = self.measurements.split_first()?;
        rest.iter()
            .all(|m| m.direction == first.direction)
            .then_some(first.direction)
    }

    /// Resolve the inflow at each turbine position.
    pub fn set_turbine_layout(&mut self, x: &[f64], y: &[f64]) -> FlowResult<()> {
        if x.len() != y.len() {
            return Err(FlowError::precondition("turbine layout x and y lengths differ"));
        }
        let samples: Vec<_> = x.iter().zip(y).map(|(&x, &y)| self.sample(x, y)).collect();
        self.turbine_wind_speed = samples.iter().map(|s| s.0).collect();
        self.turbine_wind_direction = samples.iter().map(|s| s.1).collect();
        self.turbine_turbulence_intensity = samples.iter().map(|s| s.2).collect();
        Ok(())
    }

    /// Resolve the inflow at each sample point.
    pub fn set_grid_layout(&mut self, x: &Field, y: &Field) -> FlowResult<()> {
        if x.len() != y.len() {
            return Err(FlowError::precondition("grid layout x and y lengths differ"));
        }
        let samples: Vec<_> = (0..x.len())
            .into_par_iter()
            .map(|i| self.sample(x[i], y[i]))
            .collect();
        self.grid_wind_speed = Field::from_iterator(samples.len(), samples.iter().map(|s| s.0));
        self.grid_wind_direction = Field::from_iterator(samples.len(), samples.iter().map(|s| s.1));
        self.grid_turbulence_intensity =
            Field::from_iterator(samples.len(), samples.iter().map(|s| s.2));
        Ok(())
    }

    pub fn turbine_wind_speed(&self) -> &[f64] {
        &self.turbine_wind_speed
    }

    pub fn turbine_wind_direction(&self) -> &[f64] {
        &self.turbine_wind_direction
    }

    pub fn turbine_turbulence_intensity(&self) -> &[f64] {
        &self.turbine_turbulence_intensity
    }

    pub fn grid_wind_speed(&self) -> &Field {
        &self.grid_wind_speed
    }

    pub fn grid_wind_direction(&self) -> &Field {
        &self.grid_wind_direction
    }

    pub fn grid_turbulence_intensity(&self) -> &Field {
        &self.grid_turbulence_intensity
    }

    /// Rotation angles (degrees) that bring each turbine into the
    /// wind-aligned frame.
    pub fn turbine_rotation_angles(&self) -> Vec<f64> {
        self.turbine_wind_direction
            .iter()
            .map(|&wd| rotation_angle(wd))
            .collect()
    }

    pub fn grid_rotation_angles(&self) -> Field {
        self.grid_wind_direction.map(rotation_angle)
    }

    /// Whether every sample point sees the same wind direction.
    pub fn is_direction_homogeneous(&self) -> bool {
        match self.grid_wind_direction.as_slice().split_first() {
            Some((first, rest)) => rest.iter().all(|d| d == first),
            None => true,
        }
    }
}
