//! Incremental grid builder.

use nalgebra::{Matrix3xX, Vector3};

use crate::error::GridResult;
use crate::geometry;
use crate::grid::{Geometry, Grid};
use crate::incidence::{Incidence, SignedIncidence};
use crate::validate;

/// Builder for constructing a grid incrementally.
///
/// Add nodes, then faces (as node lists), then cells (as signed face lists),
/// and call `build()` to validate and freeze everything into an immutable
/// `Grid`. Geometry is computed during `build()` unless supplied explicitly.
///
/// Face nodes must be ordered around the face polygon for 3-d grids. A cell's
/// sign for a face is +1 if the face normal points out of the cell; only the
/// relative signs matter, since normals are oriented to agree with them.
#[derive(Debug, Default)]
pub struct GridBuilder {
    dim: usize,
    nodes: Vec<Vector3<f64>>,
    face_nodes: Vec<Vec<usize>>,
    cell_faces: Vec<Vec<(usize, i8)>>,
    geometry: Option<Geometry>,
}

impl GridBuilder {
    /// Create an empty builder for a grid of intrinsic dimension `dim`.
    pub fn new(dim: usize) -> Self {
        Self {
            dim,
            ..Self::default()
        }
    }

    /// Add a node and return its index.
    pub fn add_node(&mut self, point: Vector3<f64>) -> usize {
        self.nodes.push(point);
        self.nodes.len() - 1
    }

    /// Add a face spanned by `nodes` and return its index.
    pub fn add_face(&mut self, nodes: &[usize]) -> usize {
        self.face_nodes.push(nodes.to_vec());
        self.face_nodes.len() - 1
    }

    /// Add a cell bounded by `(face, sign)` pairs and return its index.
    pub fn add_cell(&mut self, faces: &[(usize, i8)]) -> usize {
        self.cell_faces.push(faces.to_vec());
        self.cell_faces.len() - 1
    }

    /// Use externally computed geometry instead of computing it.
    pub fn set_geometry(&mut self, geometry: Geometry) {
        self.geometry = Some(geometry);
    }

    /// Build and validate the grid, returning an immutable `Grid`.
    pub fn build(self) -> GridResult<Grid> {
        validate::validate_structure(
            self.dim,
            self.nodes.len(),
            &self.face_nodes,
            &self.cell_faces,
        )?;

        let num_faces = self.face_nodes.len();
        let face_nodes = Incidence::from_rows(&self.face_nodes);
        let cell_faces = SignedIncidence::from_rows(&self.cell_faces);
        let face_cells = cell_faces.transpose(num_faces);
        validate::validate_face_cells(&face_cells)?;

        let nodes = Matrix3xX::from_fn(self.nodes.len(), |i, j| self.nodes[j][i]);

        let geometry = match self.geometry {
            Some(geometry) => {
                validate::validate_geometry(&geometry, num_faces, cell_faces.num_rows())?;
                geometry
            }
            None => geometry::compute(self.dim, &nodes, &face_nodes, &cell_faces)?,
        };

        Ok(Grid {
            dim: self.dim,
            nodes,
            face_nodes,
            cell_faces,
            face_cells,
            geometry,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GridError;

    fn unit_interval() -> GridBuilder {
        let mut b = GridBuilder::new(1);
        let n0 = b.add_node(Vector3::new(0.0, 0.0, 0.0));
        let n1 = b.add_node(Vector3::new(1.0, 0.0, 0.0));
        let f0 = b.add_face(&[n0]);
        let f1 = b.add_face(&[n1]);
        b.add_cell(&[(f0, -1), (f1, 1)]);
        b
    }

    #[test]
    fn builder_basic() {
        let grid = unit_interval().build().unwrap();
        assert_eq!(grid.dim(), 1);
        assert_eq!(grid.num_nodes(), 2);
        assert_eq!(grid.num_faces(), 2);
        assert_eq!(grid.num_cells(), 1);
        assert!((grid.cell_volumes()[0] - 1.0).abs() < 1e-14);
        assert!((grid.cell_center(0).x - 0.5).abs() < 1e-14);
    }

    #[test]
    fn builder_rejects_bad_sign() {
        let mut b = GridBuilder::new(1);
        let n0 = b.add_node(Vector3::zeros());
        let n1 = b.add_node(Vector3::x());
        let f0 = b.add_face(&[n0]);
        let f1 = b.add_face(&[n1]);
        b.add_cell(&[(f0, 0), (f1, 1)]);
        assert!(matches!(
            b.build(),
            Err(GridError::InvalidSign { cell: 0, .. })
        ));
    }

    #[test]
    fn builder_rejects_geometry_of_wrong_length() {
        let mut b = unit_interval();
        b.set_geometry(Geometry {
            face_areas: vec![1.0],
            face_normals: Matrix3xX::zeros(2),
            face_centers: Matrix3xX::zeros(2),
            cell_volumes: vec![1.0],
            cell_centers: Matrix3xX::zeros(1),
        });
        assert!(matches!(
            b.build(),
            Err(GridError::GeometryShape {
                what: "face_areas",
                ..
            })
        ));
    }
}
