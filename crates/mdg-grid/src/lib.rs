//! mdg-grid: immutable grids for conforming and mixed-dimensional discretizations.
//!
//! Provides:
//! - Compressed incidence storage (face-node, cell-face with orientation signs)
//! - Incremental grid builder with validation and geometry computation
//! - The face -> (cell, sign) table every discretization reads orientations from
//! - Mapping of embedded 1-d/2-d grids onto their intrinsic reference frame
//! - Cartesian constructors
//!
//! # Example
//!
//! ```
//! use mdg_grid::cartesian::cart_grid_2d;
//!
//! let grid = cart_grid_2d([2, 1], [2.0, 1.0]).unwrap();
//!
//! assert_eq!(grid.num_cells(), 2);
//! assert_eq!(grid.num_nodes(), 6);
//! assert_eq!(grid.num_faces(), 7);
//! ```

pub mod builder;
pub mod cartesian;
pub mod error;
pub mod frame;
pub(crate) mod geometry;
pub mod grid;
pub mod incidence;
pub(crate) mod validate;

// Re-exports for ergonomics
pub use builder::GridBuilder;
pub use error::{GridError, GridResult};
pub use frame::ReferenceFrame;
pub use grid::{Geometry, Grid};
pub use incidence::{Incidence, SignedIncidence};
