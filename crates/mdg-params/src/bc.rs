//! Boundary condition tags.

use mdg_grid::Grid;

use crate::error::{ParamError, ParamResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BcKind {
    Dirichlet,
    Neumann,
}

/// One tag per degree of freedom.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundaryCondition {
    kinds: Vec<BcKind>,
}

impl BoundaryCondition {
    pub fn new(kinds: Vec<BcKind>) -> Self {
        Self { kinds }
    }

    pub fn all_neumann(n: usize) -> Self {
        Self {
            kinds: vec![BcKind::Neumann; n],
        }
    }

    /// Neumann everywhere except on `indices`.
    pub fn from_dirichlet(n: usize, indices: &[usize]) -> ParamResult<Self> {
        let mut kinds = vec![BcKind::Neumann; n];
        for &i in indices {
            let slot = kinds.get_mut(i).ok_or(ParamError::IndexOutOfRange {
                what: "dirichlet index",
                index: i,
                len: n,
            })?;
            *slot = BcKind::Dirichlet;
        }
        Ok(Self { kinds })
    }

    /// Node tags for a node-based discretization: a node is Dirichlet when any
    /// flagged face touches it.
    pub fn on_nodes_from_faces(grid: &Grid, face_flags: &[bool]) -> ParamResult<Self> {
        if face_flags.len() != grid.num_faces() {
            return Err(ParamError::LengthMismatch {
                what: "face flags",
                expected: grid.num_faces(),
                found: face_flags.len(),
            });
        }
        let mut kinds = vec![BcKind::Neumann; grid.num_nodes()];
        for (face, _) in face_flags.iter().enumerate().filter(|(_, flag)| **flag) {
            for &node in grid.face_nodes().row(face) {
                kinds[node] = BcKind::Dirichlet;
            }
        }
        Ok(Self { kinds })
    }

    pub fn len(&self) -> usize {
        self.kinds.len()
    }

    pub fn is_empty(&self) -> bool {
        self.kinds.is_empty()
    }

    pub fn kinds(&self) -> &[BcKind] {
        &self.kinds
    }

    pub fn is_dirichlet(&self, i: usize) -> bool {
        self.kinds.get(i) == Some(&BcKind::Dirichlet)
    }

    pub fn dirichlet_indices(&self) -> Vec<usize> {
        self.kinds
            .iter()
            .enumerate()
            .filter(|(_, k)| **k == BcKind::Dirichlet)
            .map(|(i, _)| i)
            .collect()
    }
}
