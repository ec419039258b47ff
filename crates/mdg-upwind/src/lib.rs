//! Upwind coupling of transport between two grids joined by an interface.
//!
//! The higher grid `g_h` and the lower grid `g_l` either differ by one in
//! dimension (faces of `g_h` meet cells of `g_l`) or share a dimension (faces
//! of `g_h` meet faces of `g_l`). A signed, area-weighted normal flux on the
//! faces of `g_h` decides which side is upstream for every matched pair.

pub mod cfl;
pub mod coupling;
pub mod error;
pub mod interface;

pub use cfl::cfl_bound;
pub use coupling::{CouplingBlocks, assemble_coupling};
pub use error::{UpwindError, UpwindResult};
pub use interface::{FaceCellMap, InterfaceData};
