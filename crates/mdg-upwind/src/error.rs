//! Error types for interface coupling.

use mdg_core::MdgError;
use mdg_grid::GridError;
use mdg_params::ParamError;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum UpwindError {
    #[error("Grid error: {0}")]
    Grid(#[from] GridError),

    #[error("Parameter error: {0}")]
    Param(#[from] ParamError),

    #[error("Interface has no normal flux field")]
    MissingFlux,

    #[error("Cannot couple a {dim_h}-d grid to a {dim_l}-d grid")]
    DimensionPair { dim_h: usize, dim_l: usize },

    #[error("Face-cell map has shape {found:?}, expected {expected:?}")]
    MapShape {
        expected: (usize, usize),
        found: (usize, usize),
    },

    #[error("Face-cell map entry ({row}, {col}) outside shape {shape:?}")]
    PairOutOfRange {
        row: usize,
        col: usize,
        shape: (usize, usize),
    },

    #[error("Normal flux has {found} entries, expected one per higher-grid face ({expected})")]
    FluxLength { expected: usize, found: usize },

    #[error("Interface face {face} of the {side} grid has {count} cells, expected 1")]
    NotBoundaryFace {
        side: &'static str,
        face: usize,
        count: usize,
    },
}

pub type UpwindResult<T> = Result<T, UpwindError>;

impl From<UpwindError> for MdgError {
    fn from(e: UpwindError) -> Self {
        match e {
            UpwindError::Grid(e) => e.into(),
            UpwindError::Param(e) => e.into(),
            other => MdgError::InvalidArg {
                what: other.to_string(),
            },
        }
    }
}
