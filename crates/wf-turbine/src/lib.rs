//! wf-turbine: turbine state and the array-backed turbine map.
//!
//! Provides:
//! - Power/thrust coefficient tables with interpolation
//! - Turbines that sample their rotor-swept area from a flow field and derive
//!   thrust, axial induction and power from the sampled inflow
//! - `TurbineMap`, the ordered (coordinate, turbine) store the flow engine
//!   rotates, sorts and indexes into
//!
//! # Example
//!
//! ```
//! use wf_turbine::{Turbine, TurbineMap};
//!
//! let turbines = vec![Turbine::nrel_5mw("T0"), Turbine::nrel_5mw("T1")];
//! let map = TurbineMap::new(&[0.0, 630.0], &[0.0, 0.0], turbines).unwrap();
//!
//! assert_eq!(map.len(), 2);
//! assert_eq!(map.coords()[1].x3, 90.0); // hub height
//! ```

pub mod common;
pub mod error;
pub mod power_curve;
pub mod turbine;
pub mod turbine_map;

// Re-exports
pub use error::{TurbineError, TurbineResult};
pub use power_curve::PowerCurve;
pub use turbine::Turbine;
pub use turbine_map::TurbineMap;
