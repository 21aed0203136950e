//! Rules for merging one rotor's deficit into the farm deficit.

use wf_core::Field;

use crate::error::{WakeError, WakeResult};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum CombinationModel {
    /// Freestream linear superposition: `a + b`.
    Fls,
    /// Sum of squares: `sqrt(a² + b²)`.
    #[default]
    Sosfs,
    /// Largest deficit wins.
    Max,
}

impl CombinationModel {
    pub fn from_name(name: &str) -> WakeResult<Self> {
        match name.to_ascii_lowercase().as_str() {
            "fls" => Ok(CombinationModel::Fls),
            "sosfs" => Ok(CombinationModel::Sosfs),
            "max" => Ok(CombinationModel::Max),
            _ => Err(WakeError::UnknownModel {
                kind: "combination",
                name: name.to_string(),
            }),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            CombinationModel::Fls => "fls",
            CombinationModel::Sosfs => "sosfs",
            CombinationModel::Max => "max",
        }
    }

    #[inline]
    pub fn combine(&self, existing: f64, new: f64) -> f64 {
        match self {
            CombinationModel::Fls => existing + new,
            CombinationModel::Sosfs => existing.hypot(new),
            CombinationModel::Max => existing.max(new),
        }
    }

    /// Element-wise combination of two deficit fields.
    pub fn function(&self, existing: &Field, new: &Field) -> WakeResult<Field> {
        if new.len() != existing.len() {
            return Err(WakeError::LengthMismatch {
                what: "combined deficit",
                expected: existing.len(),
                actual: new.len(),
            });
        }
        Ok(existing.zip_map(new, |a, b| self.combine(a, b)))
    }
}
