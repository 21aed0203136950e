//! wf-core: stable foundation for wakeflow.
//!
//! Contains:
//! - numeric (Real + finite checks)
//! - ids (compact turbine ids)
//! - units (uom SI types + constructors)
//! - trig / vec3 / rotation (degree-based coordinate rotation)
//! - field / domain (sample-point arrays, grid resolution, domain bounds)
//! - error (shared error types)

pub mod domain;
pub mod error;
pub mod field;
pub mod ids;
pub mod numeric;
pub mod rotation;
pub mod trig;
pub mod units;
pub mod vec3;

// Re-exports: nice ergonomics for downstream crates
pub use domain::{DomainBounds, GridResolution};
pub use error::{WfError, WfResult};
pub use field::{Field, GridPoints, linspace};
pub use ids::*;
pub use numeric::*;
pub use trig::{cosd, sind, tand};
pub use vec3::Vec3;
