//! Core grid data structure.

use nalgebra::{Matrix3, Matrix3xX, Vector3};

use crate::error::{GridError, GridResult};
use crate::frame::{self, ReferenceFrame};
use crate::incidence::{Incidence, SignedIncidence};

/// Geometric quantities of a grid.
///
/// Face normals are weighted by the face area and, combined with the cell-face
/// sign, point out of the cell (`sign * normal` is outward).
#[derive(Debug, Clone, PartialEq)]
pub struct Geometry {
    pub face_areas: Vec<f64>,
    pub face_normals: Matrix3xX<f64>,
    pub face_centers: Matrix3xX<f64>,
    pub cell_volumes: Vec<f64>,
    pub cell_centers: Matrix3xX<f64>,
}

/// An immutable grid: topology, orientation and geometry.
///
/// Points always live in 3-d space; `dim` is the intrinsic (topological)
/// dimension. A 2-d fracture grid embedded in 3-d space has `dim == 2`.
#[derive(Debug, Clone)]
pub struct Grid {
    pub(crate) dim: usize,
    pub(crate) nodes: Matrix3xX<f64>,
    pub(crate) face_nodes: Incidence,
    pub(crate) cell_faces: SignedIncidence,

    /// face -> (cell, sign), derived once from `cell_faces` at build time.
    pub(crate) face_cells: SignedIncidence,

    pub(crate) geometry: Geometry,
}

impl Grid {
    pub fn dim(&self) -> usize {
        self.dim
    }

    pub fn num_nodes(&self) -> usize {
        self.nodes.ncols()
    }

    pub fn num_faces(&self) -> usize {
        self.face_nodes.num_rows()
    }

    pub fn num_cells(&self) -> usize {
        self.cell_faces.num_rows()
    }

    /// Node coordinates, one column per node.
    pub fn nodes(&self) -> &Matrix3xX<f64> {
        &self.nodes
    }

    pub fn node(&self, n: usize) -> Vector3<f64> {
        self.nodes.column(n).into_owned()
    }

    pub fn face_nodes(&self) -> &Incidence {
        &self.face_nodes
    }

    pub fn cell_faces(&self) -> &SignedIncidence {
        &self.cell_faces
    }

    /// Precomputed face -> (cell, sign) table.
    pub fn face_cells(&self) -> &SignedIncidence {
        &self.face_cells
    }

    pub fn face_areas(&self) -> &[f64] {
        &self.geometry.face_areas
    }

    pub fn face_normals(&self) -> &Matrix3xX<f64> {
        &self.geometry.face_normals
    }

    /// Area-weighted normal of face `f`.
    pub fn face_normal(&self, f: usize) -> Vector3<f64> {
        self.geometry.face_normals.column(f).into_owned()
    }

    pub fn cell_volumes(&self) -> &[f64] {
        &self.geometry.cell_volumes
    }

    pub fn cell_centers(&self) -> &Matrix3xX<f64> {
        &self.geometry.cell_centers
    }

    pub fn cell_center(&self, c: usize) -> Vector3<f64> {
        self.geometry.cell_centers.column(c).into_owned()
    }

    /// Cell -> nodes: sorted union of the nodes of each cell's faces.
    ///
    /// Computed on every call; callers needing it repeatedly should keep the
    /// result.
    pub fn cell_nodes(&self) -> Incidence {
        let rows: Vec<Vec<usize>> = (0..self.num_cells())
            .map(|c| {
                let mut nodes: Vec<usize> = self
                    .cell_faces
                    .row_indices(c)
                    .iter()
                    .flat_map(|&f| self.face_nodes.row(f).iter().copied())
                    .collect();
                nodes.sort_unstable();
                nodes.dedup();
                nodes
            })
            .collect();
        Incidence::from_rows(&rows)
    }

    /// Largest distance between two nodes of each cell.
    pub fn cell_diameters(&self) -> Vec<f64> {
        let cell_nodes = self.cell_nodes();
        cell_nodes
            .rows()
            .map(|nodes| {
                let mut diam: f64 = 0.0;
                for (i, &a) in nodes.iter().enumerate() {
                    for &b in &nodes[i + 1..] {
                        let d = (self.nodes.column(a) - self.nodes.column(b)).norm();
                        diam = diam.max(d);
                    }
                }
                diam
            })
            .collect()
    }

    /// Faces with exactly one incident cell.
    pub fn boundary_faces(&self) -> Vec<usize> {
        (0..self.num_faces())
            .filter(|&f| self.face_cells.row_indices(f).len() == 1)
            .collect()
    }

    /// Orientation sign of `face` as seen from `cell`, if they are incident.
    pub fn face_sign(&self, face: usize, cell: usize) -> Option<i8> {
        self.face_cells.sign(face, cell)
    }

    /// The single cell (and its orientation sign) of a boundary face.
    pub fn boundary_cell(&self, face: usize) -> GridResult<(usize, i8)> {
        let count = self.face_cells.row_indices(face).len();
        if count != 1 {
            return Err(GridError::NotBoundaryFace { face, count });
        }
        self.face_cells
            .row(face)
            .next()
            .ok_or(GridError::NotBoundaryFace { face, count })
    }

    /// Map of this grid onto its intrinsic coordinate axes.
    pub fn reference_frame(&self) -> GridResult<ReferenceFrame> {
        frame::reference_frame(self.dim, &self.nodes)
    }

    /// Copy of the grid moved rigidly: `x -> rotation * x + translation`.
    ///
    /// `rotation` must be orthonormal; areas and volumes are kept as they are.
    pub fn transformed(&self, rotation: &Matrix3<f64>, translation: &Vector3<f64>) -> Grid {
        let move_points = |points: &Matrix3xX<f64>| {
            let mut moved = rotation * points;
            for mut col in moved.column_iter_mut() {
                col += translation;
            }
            moved
        };

        Grid {
            dim: self.dim,
            nodes: move_points(&self.nodes),
            face_nodes: self.face_nodes.clone(),
            cell_faces: self.cell_faces.clone(),
            face_cells: self.face_cells.clone(),
            geometry: Geometry {
                face_areas: self.geometry.face_areas.clone(),
                face_normals: rotation * &self.geometry.face_normals,
                face_centers: move_points(&self.geometry.face_centers),
                cell_volumes: self.geometry.cell_volumes.clone(),
                cell_centers: move_points(&self.geometry.cell_centers),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::cartesian::cart_grid_2d;

    #[test]
    fn cell_nodes_are_sorted_and_unique() {
        let g = cart_grid_2d([2, 1], [2.0, 1.0]).unwrap();
        let cn = g.cell_nodes();
        assert_eq!(cn.row(0), &[0, 1, 3, 4]);
        assert_eq!(cn.row(1), &[1, 2, 4, 5]);
    }

    #[test]
    fn diameters_of_unit_squares() {
        let g = cart_grid_2d([2, 1], [2.0, 1.0]).unwrap();
        for d in g.cell_diameters() {
            assert!((d - 2.0_f64.sqrt()).abs() < 1e-12);
        }
    }

    #[test]
    fn boundary_cell_rejects_interior_face() {
        let g = cart_grid_2d([2, 1], [2.0, 1.0]).unwrap();
        // x-face between the two cells
        assert!(g.boundary_cell(1).is_err());
        assert_eq!(g.boundary_cell(0).unwrap(), (0, -1));
        assert_eq!(g.boundary_cell(2).unwrap(), (1, 1));
    }
}
