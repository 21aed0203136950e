//! Power and thrust coefficient tables.

use crate::common::{check_finite, interp};
use crate::error::{TurbineError, TurbineResult};

/// Lower clamp for the thrust coefficient.
pub const CT_MIN: f64 = 1e-4;
/// Upper clamp for the thrust coefficient; keeps `sqrt(1 - Ct)` real.
pub const CT_MAX: f64 = 0.9999;
/// Thrust coefficient reported below the first tabulated wind speed.
pub const CT_BELOW_CUT_IN: f64 = 0.99;

/// Tabulated power coefficient (Cp) and thrust coefficient (Ct) against
/// inflow wind speed.
#[derive(Clone, Debug, PartialEq)]
pub struct PowerCurve {
    wind_speed: Vec<f64>,
    power: Vec<f64>,
    thrust: Vec<f64>,
}

impl PowerCurve {
    /// Create a table.
    ///
    /// # Errors
    /// Returns error if the columns differ in length, hold fewer than two
    /// rows, contain non-finite values, or if wind speeds are not strictly
    /// increasing.
    pub fn new(wind_speed: Vec<f64>, power: Vec<f64>, thrust: Vec<f64>) -> TurbineResult<Self> {
        if wind_speed.len() < 2 {
            return Err(TurbineError::InvalidArg {
                what: "power curve needs at least two rows",
            });
        }
        if power.len() != wind_speed.len() {
            return Err(TurbineError::LengthMismatch {
                what: "power coefficient column",
                expected: wind_speed.len(),
                actual: power.len(),
            });
        }
        if thrust.len() != wind_speed.len() {
            return Err(TurbineError::LengthMismatch {
                what: "thrust coefficient column",
                expected: wind_speed.len(),
                actual: thrust.len(),
            });
        }
        for i in 0..wind_speed.len() {
            check_finite(wind_speed[i], "power curve wind speed")?;
            check_finite(power[i], "power coefficient")?;
            check_finite(thrust[i], "thrust coefficient")?;
        }
        if wind_speed.windows(2).any(|w| w[1] <= w[0]) {
            return Err(TurbineError::InvalidArg {
                what: "power curve wind speeds must be strictly increasing",
            });
        }

        Ok(Self {
            wind_speed,
            power,
            thrust,
        })
    }

    /// NREL 5-MW reference turbine table.
    pub fn nrel_5mw() -> Self {
        Self {
            wind_speed: vec![
                2.0, 2.5, 3.0, 3.5, 4.0, 4.5, 5.0, 5.5, 6.0, 6.5, 7.0, 7.5, 8.0, 8.5, 9.0, 9.5,
                10.0, 10.5, 11.0, 11.5, 12.0, 12.5, 13.0, 14.0, 15.0, 16.0, 18.0, 20.0, 25.0,
            ],
            power: vec![
                0.0, 0.0, 0.178085, 0.289075, 0.349022, 0.384728, 0.406059, 0.420228, 0.428823,
                0.433873, 0.436223, 0.436845, 0.436575, 0.436511, 0.436561, 0.436615, 0.436413,
                0.435517, 0.433555, 0.405676, 0.367807, 0.331914, 0.299870, 0.245523, 0.202990,
                0.169557, 0.120938, 0.088483, 0.044749,
            ],
            thrust: vec![
                0.99, 0.99, 0.97373, 0.92826, 0.89211, 0.86101, 0.83542, 0.81238, 0.79226,
                0.77585, 0.76292, 0.76156, 0.76262, 0.76170, 0.75232, 0.74027, 0.72987, 0.70702,
                0.54055, 0.45509, 0.39343, 0.34251, 0.30487, 0.25213, 0.20699, 0.17265, 0.12366,
                0.09144, 0.04667,
            ],
        }
    }

    pub fn wind_speed(&self) -> &[f64] {
        &self.wind_speed
    }

    pub fn power(&self) -> &[f64] {
        &self.power
    }

    pub fn thrust(&self) -> &[f64] {
        &self.thrust
    }

    /// Power coefficient at an inflow speed; zero below the table or for a
    /// NaN speed.
    pub fn cp(&self, at_wind_speed: f64) -> f64 {
        if at_wind_speed.is_nan() || at_wind_speed < self.wind_speed[0] {
            return 0.0;
        }
        interp(&self.wind_speed, &self.power, at_wind_speed).max(0.0)
    }

    /// Thrust coefficient at an inflow speed, clamped to `[CT_MIN, CT_MAX]`.
    /// A NaN speed reads as below cut-in.
    pub fn ct(&self, at_wind_speed: f64) -> f64 {
        let ct = if at_wind_speed.is_nan() || at_wind_speed < self.wind_speed[0] {
            CT_BELOW_CUT_IN
        } else {
            interp(&self.wind_speed, &self.thrust, at_wind_speed)
        };
        ct.clamp(CT_MIN, CT_MAX)
    }
}
