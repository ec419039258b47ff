//! Error types for the VEM discretization.

use mdg_core::MdgError;
use mdg_grid::GridError;
use mdg_params::ParamError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum VemError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Shape mismatch for {what} of cell {cell}: expected {expected}, got {found}")]
    Shape {
        cell: usize,
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Cell {cell} is degenerate: {what}")]
    Degenerate { cell: usize, what: &'static str },

    #[error("Cell {cell} fails the consistency check G = F D (max deviation {deviation:e})")]
    Consistency { cell: usize, deviation: f64 },

    #[error("Local projection system of cell {cell} is singular")]
    Singular { cell: usize },

    #[error("Boundary condition has {found} entries, expected one per node ({expected})")]
    BoundaryLength { expected: usize, found: usize },
}

pub type VemResult<T> = Result<T, VemError>;

impl From<VemError> for MdgError {
    fn from(e: VemError) -> Self {
        match e {
            VemError::Grid(e) => e.into(),
            VemError::Param(e) => e.into(),
            VemError::BoundaryLength { expected, found } => MdgError::IndexOob {
                what: "boundary condition",
                index: found,
                len: expected,
            },
            other => MdgError::Invariant {
                what: other.to_string(),
            },
        }
    }
}
