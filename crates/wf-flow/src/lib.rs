//! Steady-state wind-farm flow field.
//!
//! The engine rotates the farm into the wind-aligned frame, walks the
//! turbines from upstream to downstream, and accumulates each rotor's wake
//! deficit, crossflow and added turbulence on a set of sample points. The
//! sample points are either a dense grid (for models that need one) or the
//! rotor points of every turbine plus any points the caller asks for.

pub mod config;
pub mod error;
pub mod flow_field;
pub mod grid;
pub mod overlap;
pub mod wind_map;

pub use config::{FlowFieldConfig, FlowFieldUpdate, PropagationLimits, WakeOptions, WakeReport};
pub use error::{FlowError, FlowResult};
pub use flow_field::FlowField;
pub use grid::{Domain, DomainKind, ExtraPoints};
pub use overlap::area_overlap;
pub use wind_map::{Measurement, WindMap};
