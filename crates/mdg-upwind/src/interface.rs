//! Interface descriptor and resolution of matched pairs.

use mdg_grid::{Grid, GridError};

use crate::error::{UpwindError, UpwindResult};

/// Sparse pattern linking the two sides of an interface.
///
/// For grids one dimension apart, rows are cells of the lower grid and columns
/// are faces of the higher grid. For grids of equal dimension, rows are faces
/// of the higher grid and columns are faces of the lower grid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FaceCellMap {
    shape: (usize, usize),
    pairs: Vec<(usize, usize)>,
}

impl FaceCellMap {
    /// Entries must lie inside `shape`. Pairs are kept in the given order.
    pub fn new(shape: (usize, usize), pairs: Vec<(usize, usize)>) -> UpwindResult<Self> {
        if let Some(&(row, col)) = pairs
            .iter()
            .find(|(r, c)| *r >= shape.0 || *c >= shape.1)
        {
            return Err(UpwindError::PairOutOfRange { row, col, shape });
        }
        Ok(Self { shape, pairs })
    }

    pub fn shape(&self) -> (usize, usize) {
        self.shape
    }

    pub fn pairs(&self) -> &[(usize, usize)] {
        &self.pairs
    }

    pub fn nnz(&self) -> usize {
        self.pairs.len()
    }
}

/// Everything known about one interface: its map and the normal flux.
#[derive(Debug, Clone, PartialEq)]
pub struct InterfaceData {
    pub face_cells: FaceCellMap,
    /// Signed normal flux per face of the higher grid, weighted by face area.
    pub beta_n: Option<Vec<f64>>,
}

impl InterfaceData {
    pub fn new(face_cells: FaceCellMap) -> Self {
        Self {
            face_cells,
            beta_n: None,
        }
    }

    pub fn with_flux(mut self, beta_n: Vec<f64>) -> Self {
        self.beta_n = Some(beta_n);
        self
    }

    pub fn flux(&self) -> UpwindResult<&[f64]> {
        self.beta_n.as_deref().ok_or(UpwindError::MissingFlux)
    }
}

/// How the two grids meet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Kind {
    /// Faces of the higher grid against cells of the lower grid.
    Adjacent,
    /// Faces against faces.
    Equal,
}

/// One matched pair with the cells and orientation signs on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct Matched {
    pub face_h: usize,
    pub cell_h: usize,
    pub sign_h: f64,
    pub cell_l: usize,
    /// Orientation of the lower face; 0 in the adjacent case.
    pub sign_l: f64,
}

/// Checks dimensions, map shape and flux length, then resolves every pair.
pub(crate) fn resolve<'a>(
    g_h: &Grid,
    g_l: &Grid,
    interface: &'a InterfaceData,
) -> UpwindResult<(Kind, &'a [f64], Vec<Matched>)> {
    let (dim_h, dim_l) = (g_h.dim(), g_l.dim());
    let kind = match dim_h.checked_sub(dim_l) {
        Some(0) => Kind::Equal,
        Some(1) => Kind::Adjacent,
        _ => return Err(UpwindError::DimensionPair { dim_h, dim_l }),
    };

    let beta = interface.flux()?;
    if beta.len() != g_h.num_faces() {
        return Err(UpwindError::FluxLength {
            expected: g_h.num_faces(),
            found: beta.len(),
        });
    }

    let map = &interface.face_cells;
    let expected = match kind {
        Kind::Adjacent => (g_l.num_cells(), g_h.num_faces()),
        Kind::Equal => (g_h.num_faces(), g_l.num_faces()),
    };
    if map.shape() != expected {
        return Err(UpwindError::MapShape {
            expected,
            found: map.shape(),
        });
    }

    let matched = map
        .pairs()
        .iter()
        .map(|&(row, col)| match kind {
            Kind::Adjacent => {
                let (cell_h, sign_h) = boundary_cell(g_h, col, "higher")?;
                Ok(Matched {
                    face_h: col,
                    cell_h,
                    sign_h,
                    cell_l: row,
                    sign_l: 0.0,
                })
            }
            Kind::Equal => {
                let (cell_h, sign_h) = boundary_cell(g_h, row, "higher")?;
                let (cell_l, sign_l) = boundary_cell(g_l, col, "lower")?;
                Ok(Matched {
                    face_h: row,
                    cell_h,
                    sign_h,
                    cell_l,
                    sign_l,
                })
            }
        })
        .collect::<UpwindResult<Vec<_>>>()?;

    Ok((kind, beta, matched))
}

fn boundary_cell(grid: &Grid, face: usize, side: &'static str) -> UpwindResult<(usize, f64)> {
    match grid.boundary_cell(face) {
        Ok((cell, sign)) => Ok((cell, f64::from(sign))),
        Err(GridError::NotBoundaryFace { face, count }) => {
            Err(UpwindError::NotBoundaryFace { side, face, count })
        }
        Err(e) => Err(e.into()),
    }
}
