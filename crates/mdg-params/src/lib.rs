//! Per-grid physical parameters consumed by the discretizations.
//!
//! A `Parameters` bundle carries the permeability tensor, boundary
//! conditions and their values, apertures, storage coefficients and sources
//! of one grid. Missing fields fall back to the usual defaults (unit tensor,
//! unit aperture, unit storage, zero source).

pub mod bc;
pub mod error;
pub mod params;
pub mod tensor;

pub use bc::{BcKind, BoundaryCondition};
pub use error::{ParamError, ParamResult};
pub use params::Parameters;
pub use tensor::SecondOrderTensor;
