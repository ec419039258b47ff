//! Discretization options.

use mdg_core::Tolerances;

/// Options for [`PrimalVem`](crate::PrimalVem).
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct VemConfig {
    /// Use the infinity norm of the assembled matrix as the Dirichlet row
    /// weight instead of 1.
    pub bc_weight: bool,
    /// Permeability is already given in the grid's tangential frame.
    pub is_tangential: bool,
    /// Tolerance for the per-cell check `G = F D`.
    pub consistency: Tolerances,
    /// Evaluate the cell kernels on the rayon pool.
    pub parallel: bool,
}

impl Default for VemConfig {
    fn default() -> Self {
        Self {
            bc_weight: true,
            is_tangential: false,
            consistency: Tolerances::default(),
            parallel: true,
        }
    }
}
