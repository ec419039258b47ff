//! Grid-specific error types.

use mdg_core::MdgError;
use thiserror::Error;

/// Grid construction, validation and geometry errors.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum GridError {
    #[error("Unsupported grid dimension {dim} (expected 0..=3)")]
    UnsupportedDimension { dim: usize },

    #[error("Face {face} refers to non-existent node {node}")]
    InvalidNodeRef { face: usize, node: usize },

    #[error("Cell {cell} refers to non-existent face {face}")]
    InvalidFaceRef { cell: usize, face: usize },

    #[error("Face {face} has {count} nodes, a {dim}-d grid requires {expected}")]
    FaceNodeCount {
        face: usize,
        count: usize,
        dim: usize,
        expected: &'static str,
    },

    #[error("Cell {cell} has orientation sign {sign} for face {face} (expected +1 or -1)")]
    InvalidSign { cell: usize, face: usize, sign: i8 },

    #[error("Cell {cell} lists face {face} more than once")]
    DuplicateFace { cell: usize, face: usize },

    #[error("Cell {cell} has {count} faces, a {dim}-d cell needs at least {min}")]
    TooFewFaces {
        cell: usize,
        count: usize,
        dim: usize,
        min: usize,
    },

    #[error("Face {face} is shared by {count} cells (at most 2 allowed)")]
    OverSharedFace { face: usize, count: usize },

    #[error("Face {face} has the same orientation sign in both incident cells")]
    InconsistentOrientation { face: usize },

    #[error("Face {face} is not a boundary face ({count} incident cells)")]
    NotBoundaryFace { face: usize, count: usize },

    #[error("Geometry array {what} has length {found}, expected {expected}")]
    GeometryShape {
        what: &'static str,
        expected: usize,
        found: usize,
    },

    #[error("Faces of cell {cell} do not form a closed, consistently orientable boundary")]
    OpenCellBoundary { cell: usize },

    #[error("Degenerate geometry: {what}")]
    DegenerateGeometry { what: String },

    #[error("Reference frame has {found} active axes, grid dimension is {dim}")]
    ReferenceFrame { dim: usize, found: usize },
}

pub type GridResult<T> = Result<T, GridError>;

impl From<GridError> for MdgError {
    fn from(err: GridError) -> Self {
        MdgError::Invariant {
            what: err.to_string(),
        }
    }
}
