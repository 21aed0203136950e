//! Error types for turbine operations.

use wf_core::error::WfError;
use thiserror::Error;

/// Errors that can occur while building or evaluating turbines.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TurbineError {
    #[error("Non-physical value: {what}")]
    NonPhysical { what: &'static str },

    #[error("Invalid argument: {what}")]
    InvalidArg { what: &'static str },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error("Turbines {first} and {second} share the same (x, y) position")]
    CoincidentTurbines { first: usize, second: usize },

    #[error("Flow field has no sample points to read turbine inflow from")]
    EmptyGrid,

    #[error(transparent)]
    Core(#[from] WfError),
}

pub type TurbineResult<T> = Result<T, TurbineError>;

impl From<TurbineError> for WfError {
    fn from(e: TurbineError) -> Self {
        match e {
            TurbineError::NonPhysical { what } => WfError::InvalidArg { what },
            TurbineError::InvalidArg { what } => WfError::InvalidArg { what },
            TurbineError::LengthMismatch {
                what,
                expected,
                actual,
            } => WfError::LengthMismatch {
                what,
                expected,
                actual,
            },
            TurbineError::CoincidentTurbines { .. } => WfError::InvalidArg {
                what: "coincident turbines",
            },
            TurbineError::EmptyGrid => WfError::InvalidArg { what: "empty grid" },
            TurbineError::Core(e) => e,
        }
    }
}
