//! Error types for wake model evaluation.

use thiserror::Error;
use wf_core::error::WfError;
use wf_turbine::TurbineError;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum WakeError {
    #[error("Unknown {kind} model: '{name}'")]
    UnknownModel { kind: &'static str, name: String },

    #[error("Invalid wake model parameter: {what}")]
    InvalidParameter { what: &'static str },

    #[error("Length mismatch for {what}: expected {expected}, got {actual}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        actual: usize,
    },

    #[error(transparent)]
    Turbine(#[from] TurbineError),

    #[error(transparent)]
    Core(#[from] WfError),
}

pub type WakeResult<T> = Result<T, WakeError>;

impl From<WakeError> for WfError {
    fn from(e: WakeError) -> Self {
        match e {
            WakeError::UnknownModel { .. } => WfError::InvalidArg {
                what: "unknown wake model",
            },
            WakeError::InvalidParameter { what } => WfError::InvalidArg { what },
            WakeError::LengthMismatch {
                what,
                expected,
                actual,
            } => WfError::LengthMismatch {
                what,
                expected,
                actual,
            },
            WakeError::Turbine(t) => t.into(),
            WakeError::Core(c) => c,
        }
    }
}
