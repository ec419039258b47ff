//! Local stiffness matrix of one cell.
//!
//! The basis is the scaled monomials `1, (x_i - c_i) / h` of degree one,
//! with `c` the cell center and `h` the cell diameter. With `D` the values of
//! the monomials at the cell nodes, `F` the degree-of-freedom functionals and
//! `G` the monomial energy matrix (its first row replaced by the nodal
//! average of `D`), the projector `Pi` solves `G Pi = F` and
//!
//! ```text
//! A = Pi^T G_K Pi + (I - D Pi)^T (I - D Pi)
//! ```
//!
//! where `G_K` is the energy matrix weighted by the permeability.

use mdg_core::{Tolerances, close_to};
use nalgebra::{DMatrix, DVector};

use crate::error::{VemError, VemResult};

/// Geometry of one cell in the grid's intrinsic coordinates.
#[derive(Debug, Clone, PartialEq)]
pub struct LocalCell {
    /// Cell index, reported in errors.
    pub index: usize,
    pub center: DVector<f64>,
    pub volume: f64,
    /// Area-weighted face normals pointing out of the cell, one column per face.
    pub normals: DMatrix<f64>,
    pub diameter: f64,
    /// Node coordinates, one column per node.
    pub coords: DMatrix<f64>,
    /// `mask[(node, face)]` is set when the node lies on the face.
    pub mask: DMatrix<bool>,
}

impl LocalCell {
    pub fn dim(&self) -> usize {
        self.coords.nrows()
    }

    pub fn num_nodes(&self) -> usize {
        self.coords.ncols()
    }

    pub fn num_faces(&self) -> usize {
        self.normals.ncols()
    }

    fn check_shapes(&self, k: &DMatrix<f64>) -> VemResult<()> {
        let dim = self.dim();
        let checks = [
            ("center", dim, self.center.len()),
            ("normals", dim, self.normals.nrows()),
            ("permeability rows", dim, k.nrows()),
            ("permeability columns", dim, k.ncols()),
            ("mask rows", self.num_nodes(), self.mask.nrows()),
            ("mask columns", self.num_faces(), self.mask.ncols()),
        ];
        for (what, expected, found) in checks {
            if expected != found {
                return Err(VemError::Shape {
                    cell: self.index,
                    what,
                    expected,
                    found,
                });
            }
        }
        if dim == 0 || self.num_nodes() == 0 {
            return Err(VemError::Degenerate {
                cell: self.index,
                what: "no nodes or no intrinsic dimension",
            });
        }
        if !(self.diameter > 0.0 && self.diameter.is_finite()) {
            return Err(VemError::Degenerate {
                cell: self.index,
                what: "non-positive diameter",
            });
        }
        Ok(())
    }
}

/// Local stiffness with the default consistency tolerances.
pub fn local_stiffness(cell: &LocalCell, k: &DMatrix<f64>) -> VemResult<DMatrix<f64>> {
    local_stiffness_with(cell, k, Tolerances::default())
}

/// Local stiffness matrix of `cell` for the permeability `k`.
///
/// Fails with [`VemError::Consistency`] when `G` and `F D` disagree, which
/// happens for malformed geometry or inconsistent face orientation.
pub fn local_stiffness_with(
    cell: &LocalCell,
    k: &DMatrix<f64>,
    tol: Tolerances,
) -> VemResult<DMatrix<f64>> {
    cell.check_shapes(k)?;

    let dim = cell.dim();
    let nn = cell.num_nodes();
    let nm = dim + 1;
    let h = cell.diameter;
    let scale = cell.volume / (h * h);

    let d = DMatrix::from_fn(nn, nm, |j, m| {
        if m == 0 {
            1.0
        } else {
            (cell.coords[(m - 1, j)] - cell.center[m - 1]) / h
        }
    });

    let mut g = DMatrix::zeros(nm, nm);
    let mut g_k = DMatrix::zeros(nm, nm);
    for i in 0..dim {
        g[(i + 1, i + 1)] = scale;
        for j in 0..dim {
            g_k[(i + 1, j + 1)] = k[(i, j)] * scale;
        }
    }
    for m in 0..nm {
        g[(0, m)] = d.column(m).sum() / nn as f64;
    }

    // A node of a d-cell face is shared by 2^(d-1) face corners
    let share = h * f64::from(1u32 << (dim - 1));
    let mut f = DMatrix::zeros(nm, nn);
    for j in 0..nn {
        f[(0, j)] = 1.0 / nn as f64;
        for face in 0..cell.num_faces() {
            if cell.mask[(j, face)] {
                for i in 0..dim {
                    f[(i + 1, j)] += cell.normals[(i, face)] / share;
                }
            }
        }
    }

    let fd = &f * &d;
    let consistent = g
        .iter()
        .zip(fd.iter())
        .all(|(&a, &e)| close_to(a, e, tol));
    if !consistent {
        return Err(VemError::Consistency {
            cell: cell.index,
            deviation: (&g - &fd).amax(),
        });
    }

    let pi = g
        .lu()
        .solve(&f)
        .filter(|pi| pi.iter().all(|v| v.is_finite()))
        .ok_or(VemError::Singular { cell: cell.index })?;
    let i_pi = DMatrix::identity(nn, nn) - &d * &pi;

    Ok(pi.transpose() * g_k * &pi + i_pi.transpose() * &i_pi)
}
