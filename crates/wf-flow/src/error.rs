//! Error types for flow field construction and wake calculation.

use thiserror::Error;
use wf_core::error::WfError;
use wf_turbine::TurbineError;
use wf_wake::WakeError;

/// Errors raised by the flow field.
///
/// `Consistency` means internal state no longer agrees with itself and the
/// call was aborted. `Configuration` rejects a (re)initialisation request and
/// leaves the previous state in place. `Precondition` rejects input that
/// would otherwise produce NaN or ambiguous results.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum FlowError {
    #[error("Consistency error: {what}")]
    Consistency { what: String },

    #[error("Configuration error: {what}")]
    Configuration { what: String },

    #[error("Precondition violated: {what}")]
    Precondition { what: String },

    #[error("Turbine error: {0}")]
    Turbine(#[from] TurbineError),

    #[error("Wake model error: {0}")]
    Wake(#[from] WakeError),

    #[error(transparent)]
    Core(#[from] WfError),
}

impl FlowError {
    pub(crate) fn configuration(what: impl Into<String>) -> Self {
        FlowError::Configuration { what: what.into() }
    }

    pub(crate) fn precondition(what: impl Into<String>) -> Self {
        FlowError::Precondition { what: what.into() }
    }
}

pub type FlowResult<T> = Result<T, FlowError>;

impl From<FlowError> for WfError {
    fn from(e: FlowError) -> Self {
        match e {
            FlowError::Consistency { .. } => WfError::Invariant {
                what: "flow field consistency",
            },
            FlowError::Configuration { .. } => WfError::InvalidArg {
                what: "flow field configuration",
            },
            FlowError::Precondition { .. } => WfError::InvalidArg {
                what: "flow field precondition",
            },
            FlowError::Turbine(t) => t.into(),
            FlowError::Wake(w) => w.into(),
            FlowError::Core(c) => c,
        }
    }
}
