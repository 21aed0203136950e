//! wf-wake: the wake model bundle.
//!
//! Four strategy families, each a closed enum with its parameters:
//! - [`VelocityModel`]: deficit (and crossflow) behind one rotor
//! - [`DeflectionModel`]: lateral displacement of the wake centreline
//! - [`TurbulenceModel`]: wake-added turbulence seen by a downstream rotor
//! - [`CombinationModel`]: merging one rotor's deficit into the farm deficit
//!
//! Every model is a deterministic function of the (rotated) sample points,
//! the upstream turbine and the ambient flow. Per-point evaluation runs on
//! the rayon thread pool; the caller drives turbines one at a time.

pub mod bundle;
pub mod combination;
pub mod deflection;
pub mod error;
pub mod turbulence;
pub mod velocity;
pub mod view;
pub mod vortex;

pub use bundle::WakeModelBundle;
pub use combination::CombinationModel;
pub use deflection::{DeflectionModel, GaussDeflection, Jimenez};
pub use error::{WakeError, WakeResult};
pub use turbulence::{CrespoHernandez, IshiharaQian, TurbulenceModel};
pub use velocity::{Crossflow, Curl, Gauss, Jensen, VelocityDeficit, VelocityModel};
pub use view::FlowView;
pub use vortex::VortexPair;
