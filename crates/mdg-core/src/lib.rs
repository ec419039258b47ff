//! mdg-core: shared foundation for the mixed-dimensional discretization crates.
//!
//! Contains:
//! - numeric (Real + tolerances + float helpers)
//! - error (shared error types)

pub mod error;
pub mod numeric;

// Re-exports: nice ergonomics for downstream crates
pub use error::{MdgError, MdgResult};
pub use numeric::*;
