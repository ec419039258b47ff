//! Upwind coupling blocks.

use mdg_core::{negative_part, positive_part};
use mdg_grid::Grid;
use nalgebra_sparse::{CooMatrix, CsrMatrix};

use crate::error::UpwindResult;
use crate::interface::{InterfaceData, Kind, resolve};

/// The 2x2 block operator of one interface, indexed by grid (0 = higher,
/// 1 = lower) with one unknown per cell.
///
/// Diagonal blocks hold the outflow of each cell across the interface,
/// off-diagonal blocks the inflow from the other grid. Every column sums to
/// zero: what leaves one side enters the other.
#[derive(Debug, Clone, PartialEq)]
pub struct CouplingBlocks {
    dof: [usize; 2],
    blocks: [[CsrMatrix<f64>; 2]; 2],
}

impl CouplingBlocks {
    pub fn dof(&self) -> [usize; 2] {
        self.dof
    }

    /// Block `(i, j)`, of size `dof[i] x dof[j]`.
    pub fn block(&self, i: usize, j: usize) -> &CsrMatrix<f64> {
        &self.blocks[i][j]
    }

    /// The blocks stacked into one square matrix, higher grid first.
    pub fn to_matrix(&self) -> CsrMatrix<f64> {
        let n = self.dof[0] + self.dof[1];
        let offset = [0, self.dof[0]];
        let mut coo = CooMatrix::new(n, n);
        for (i, row) in self.blocks.iter().enumerate() {
            for (j, block) in row.iter().enumerate() {
                for (r, c, &v) in block.triplet_iter() {
                    coo.push(offset[i] + r, offset[j] + c, v);
                }
            }
        }
        CsrMatrix::from(&coo)
    }
}

/// Build the upwind coupling between `g_h` and `g_l`.
///
/// For a matched pair let `beta` be the flux of the higher face times its
/// orientation in the higher cell, so that `beta > 0` means flow from the
/// higher cell across the interface.
///
/// * Grids one dimension apart: the higher cell loses `max(beta, 0)` and
///   passes it to the lower cell; the lower cell loses `max(-beta, 0)` and
///   passes it to the higher cell.
/// * Grids of equal dimension: each side reads the flux with its own face
///   orientation and loses the positive part; the receiving side gets the
///   negative part of its own signed flux as inflow.
#[tracing::instrument(
    level = "debug",
    skip_all,
    fields(dim_h = g_h.dim(), dim_l = g_l.dim(), pairs = interface.face_cells.nnz())
)]
pub fn assemble_coupling(
    g_h: &Grid,
    g_l: &Grid,
    interface: &InterfaceData,
) -> UpwindResult<CouplingBlocks> {
    let (kind, beta, matched) = resolve(g_h, g_l, interface)?;
    let dof = [g_h.num_cells(), g_l.num_cells()];

    let mut diag_h = vec![0.0; dof[0]];
    let mut diag_l = vec![0.0; dof[1]];
    let mut cc_hl = CooMatrix::new(dof[0], dof[1]);
    let mut cc_lh = CooMatrix::new(dof[1], dof[0]);

    for m in &matched {
        let beta_h = m.sign_h * beta[m.face_h];
        match kind {
            Kind::Adjacent => {
                diag_h[m.cell_h] += positive_part(beta_h);
                diag_l[m.cell_l] += positive_part(-beta_h);
                cc_lh.push(m.cell_l, m.cell_h, -positive_part(beta_h));
                cc_hl.push(m.cell_h, m.cell_l, negative_part(beta_h));
            }
            Kind::Equal => {
                let beta_l = m.sign_l * beta[m.face_h];
                diag_h[m.cell_h] += positive_part(beta_h);
                diag_l[m.cell_l] += positive_part(beta_l);
                cc_lh.push(m.cell_l, m.cell_h, negative_part(beta_l));
                cc_hl.push(m.cell_h, m.cell_l, negative_part(beta_h));
            }
        }
    }

    tracing::debug!(?kind, matched = matched.len(), "assembled upwind coupling");

    Ok(CouplingBlocks {
        dof,
        blocks: [
            [diagonal(&diag_h), CsrMatrix::from(&cc_hl)],
            [CsrMatrix::from(&cc_lh), diagonal(&diag_l)],
        ],
    })
}

fn diagonal(values: &[f64]) -> CsrMatrix<f64> {
    let n = values.len();
    let mut coo = CooMatrix::new(n, n);
    for (i, &v) in values.iter().enumerate() {
        if v != 0.0 {
            coo.push(i, i, v);
        }
    }
    CsrMatrix::from(&coo)
}
