//! Global assembly of the nodal VEM operator.

use std::borrow::Cow;

use mdg_grid::{Grid, ReferenceFrame};
use mdg_params::{BoundaryCondition, Parameters};
use nalgebra::{DMatrix, DVector};
use nalgebra_sparse::{CooMatrix, CsrMatrix};
use rayon::prelude::*;

use crate::config::VemConfig;
use crate::error::{VemError, VemResult};
use crate::kernel::{LocalCell, local_stiffness_with};

/// Node-based virtual element discretization of an elliptic problem.
#[derive(Debug, Clone, Default)]
pub struct PrimalVem {
    config: VemConfig,
}

impl PrimalVem {
    pub fn new(config: VemConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &VemConfig {
        &self.config
    }

    /// One unknown per node.
    pub fn ndof(&self, grid: &Grid) -> usize {
        grid.num_nodes()
    }

    /// Stiffness matrix with Dirichlet rows replaced, and the weight put on
    /// their diagonal.
    ///
    /// A 0-d grid gets a zero matrix with weight 1.
    #[tracing::instrument(
        level = "debug",
        skip_all,
        fields(dim = grid.dim(), cells = grid.num_cells(), nodes = grid.num_nodes())
    )]
    pub fn matrix(&self, grid: &Grid, params: &Parameters) -> VemResult<(CsrMatrix<f64>, f64)> {
        let ndof = self.ndof(grid);
        if grid.dim() == 0 {
            return Ok((CsrMatrix::zeros(ndof, ndof), 1.0));
        }

        let locals = self.local_matrices(grid, params)?;
        let mut coo = CooMatrix::new(ndof, ndof);
        for (nodes, a) in &locals {
            for (i, &row) in nodes.iter().enumerate() {
                for (j, &col) in nodes.iter().enumerate() {
                    coo.push(row, col, a[(i, j)]);
                }
            }
        }
        // Duplicate entries are summed
        let stiffness = CsrMatrix::from(&coo);

        let weight = if self.config.bc_weight {
            infinity_norm(&stiffness)
        } else {
            1.0
        };

        let (matrix, num_dirichlet) = match params.boundary()? {
            Some((bc, _)) => {
                check_bc_len(bc, ndof)?;
                let dirichlet = bc.dirichlet_indices();
                (apply_dirichlet(&stiffness, bc, &dirichlet, weight), dirichlet.len())
            }
            None => (stiffness, 0),
        };

        tracing::debug!(nnz = matrix.nnz(), weight, num_dirichlet, "assembled VEM matrix");
        Ok((matrix, weight))
    }

    /// Right-hand side: `weight * value` on Dirichlet nodes, zero elsewhere.
    /// A 0-d grid returns its source term.
    pub fn rhs(&self, grid: &Grid, params: &Parameters, weight: f64) -> VemResult<DVector<f64>> {
        if grid.dim() == 0 {
            let source = params.source(grid)?;
            return Ok(DVector::from_column_slice(&source));
        }

        let ndof = self.ndof(grid);
        let mut rhs = DVector::zeros(ndof);
        if let Some((bc, values)) = params.boundary()? {
            check_bc_len(bc, ndof)?;
            for i in bc.dirichlet_indices() {
                rhs[i] = weight * values[i];
            }
        }
        Ok(rhs)
    }

    pub fn assemble(
        &self,
        grid: &Grid,
        params: &Parameters,
    ) -> VemResult<(CsrMatrix<f64>, DVector<f64>)> {
        let (matrix, weight) = self.matrix(grid, params)?;
        let rhs = self.rhs(grid, params, weight)?;
        Ok((matrix, rhs))
    }

    /// Cell nodes and local stiffness for every cell, in cell order.
    fn local_matrices(
        &self,
        grid: &Grid,
        params: &Parameters,
    ) -> VemResult<Vec<(Vec<usize>, DMatrix<f64>)>> {
        let dim = grid.dim();
        let frame = grid.reference_frame()?;
        let coords = frame.project_columns(grid.nodes());
        let centers = frame.project_columns(grid.cell_centers());
        let normals = frame.project_columns(grid.face_normals());
        let cell_nodes = grid.cell_nodes();
        let diameters = grid.cell_diameters();
        let permeability = self.cell_permeability(grid, params, &frame)?;
        let tol = self.config.consistency;

        let kernel = |c: usize| -> VemResult<(Vec<usize>, DMatrix<f64>)> {
            let nodes = cell_nodes.row(c);
            let faces: Vec<(usize, i8)> = grid.cell_faces().row(c).collect();
            let cell = LocalCell {
                index: c,
                center: centers.column(c).into_owned(),
                volume: grid.cell_volumes()[c],
                normals: DMatrix::from_fn(dim, faces.len(), |i, q| {
                    let (f, sign) = faces[q];
                    f64::from(sign) * normals[(i, f)]
                }),
                diameter: diameters[c],
                coords: DMatrix::from_fn(dim, nodes.len(), |i, j| coords[(i, nodes[j])]),
                mask: DMatrix::from_fn(nodes.len(), faces.len(), |j, q| {
                    grid.face_nodes().row(faces[q].0).contains(&nodes[j])
                }),
            };
            let a = local_stiffness_with(&cell, &permeability[c], tol)
                .inspect_err(|e| tracing::warn!(cell = c, error = %e, "local stiffness failed"))?;
            Ok((nodes.to_vec(), a))
        };

        if self.config.parallel {
            (0..grid.num_cells()).into_par_iter().map(kernel).collect()
        } else {
            (0..grid.num_cells()).map(kernel).collect()
        }
    }

    /// Per-cell permeability in intrinsic coordinates, scaled by the aperture.
    fn cell_permeability(
        &self,
        grid: &Grid,
        params: &Parameters,
        frame: &ReferenceFrame,
    ) -> VemResult<Vec<DMatrix<f64>>> {
        let dim = grid.dim();
        let aperture = params.aperture(grid)?;
        let k = params.permeability(grid)?;

        let rotate = !self.config.is_tangential && dim < 3;
        let k = if rotate {
            Cow::Owned(k.rotated(frame.rotation()))
        } else {
            k
        };

        Ok((0..grid.num_cells())
            .map(|c| {
                let kc = if rotate {
                    k.restrict(c, frame.active())
                } else {
                    k.leading(c, dim)
                };
                kc * aperture[c]
            })
            .collect())
    }
}

fn check_bc_len(bc: &BoundaryCondition, ndof: usize) -> VemResult<()> {
    if bc.len() != ndof {
        return Err(VemError::BoundaryLength {
            expected: ndof,
            found: bc.len(),
        });
    }
    Ok(())
}

/// Largest absolute row sum, or 1 for an all-zero matrix.
fn infinity_norm(a: &CsrMatrix<f64>) -> f64 {
    let norm = a
        .row_iter()
        .map(|row| row.values().iter().map(|v| v.abs()).sum::<f64>())
        .fold(0.0, f64::max);
    if norm > 0.0 { norm } else { 1.0 }
}

fn apply_dirichlet(
    a: &CsrMatrix<f64>,
    bc: &BoundaryCondition,
    dirichlet: &[usize],
    weight: f64,
) -> CsrMatrix<f64> {
    let mut coo = CooMatrix::new(a.nrows(), a.ncols());
    for (i, j, &v) in a.triplet_iter() {
        if !bc.is_dirichlet(i) {
            coo.push(i, j, v);
        }
    }
    for &i in dirichlet {
        coo.push(i, i, weight);
    }
    CsrMatrix::from(&coo)
}
