//! Error types for parameter handling.

use mdg_core::MdgError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamError {
    #[error("Length mismatch for {what}: expected {expected}, got {found}")]
    LengthMismatch {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Index {index} out of range for {what} of length {len}")]
    IndexOutOfRange {
        what: &'static str,
        index: usize,
        len: usize,
    },

    #[error("Permeability of cell {cell} is not symmetric")]
    NotSymmetric { cell: usize },

    #[error("Permeability of cell {cell} is not positive definite")]
    NotPositiveDefinite { cell: usize },

    #[error("Boundary condition flags and values must be given together ({what})")]
    BoundaryMismatch { what: &'static str },

    #[error("Non-finite value in {what} at index {index}")]
    NonFinite { what: &'static str, index: usize },
}

pub type ParamResult<T> = Result<T, ParamError>;

impl From<ParamError> for MdgError {
    fn from(e: ParamError) -> Self {
        match e {
            ParamError::LengthMismatch {
                what,
                expected,
                found,
            } => MdgError::IndexOob {
                what,
                index: found,
                len: expected,
            },
            ParamError::IndexOutOfRange { what, index, len } => {
                MdgError::IndexOob { what, index, len }
            }
            other => MdgError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}
