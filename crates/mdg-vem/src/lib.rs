//! Lowest-order virtual element discretization of `-div(K grad p) = f`.
//!
//! Unknowns live on the grid nodes. Each cell contributes a local stiffness
//! matrix built from a projection onto linear polynomials plus a
//! stabilization of the non-polynomial remainder; the local matrices are
//! summed into one sparse operator and Dirichlet nodes are enforced by
//! replacing their rows with a weighted identity.
//!
//! ```
//! use mdg_grid::cartesian::cart_grid_2d;
//! use mdg_params::Parameters;
//! use mdg_vem::{PrimalVem, VemConfig};
//!
//! let g = cart_grid_2d([2, 2], [1.0, 1.0]).unwrap();
//! let vem = PrimalVem::new(VemConfig::default());
//! let (a, rhs) = vem.assemble(&g, &Parameters::new()).unwrap();
//! assert_eq!(a.nrows(), 9);
//! assert_eq!(rhs.len(), 9);
//! ```

pub mod assemble;
pub mod config;
pub mod error;
pub mod kernel;

pub use assemble::PrimalVem;
pub use config::VemConfig;
pub use error::{VemError, VemResult};
pub use kernel::{LocalCell, local_stiffness, local_stiffness_with};
