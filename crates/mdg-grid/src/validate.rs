//! Grid validation logic.

use std::collections::HashSet;

use crate::error::{GridError, GridResult};
use crate::grid::Geometry;
use crate::incidence::SignedIncidence;

/// Validate references, face sizes, orientation signs and cell sizes.
pub(crate) fn validate_structure(
    dim: usize,
    num_nodes: usize,
    face_nodes: &[Vec<usize>],
    cell_faces: &[Vec<(usize, i8)>],
) -> GridResult<()> {
    if dim > 3 {
        return Err(GridError::UnsupportedDimension { dim });
    }

    for (face, nodes) in face_nodes.iter().enumerate() {
        let ok = match dim {
            0 => false,
            1 => nodes.len() == 1,
            2 => nodes.len() == 2,
            _ => nodes.len() >= 3,
        };
        if !ok {
            let expected = match dim {
                0 => "no faces",
                1 => "exactly 1",
                2 => "exactly 2",
                _ => "at least 3",
            };
            return Err(GridError::FaceNodeCount {
                face,
                count: nodes.len(),
                dim,
                expected,
            });
        }

        if let Some(&node) = nodes.iter().find(|&&n| n >= num_nodes) {
            return Err(GridError::InvalidNodeRef { face, node });
        }
    }

    let num_faces = face_nodes.len();
    for (cell, faces) in cell_faces.iter().enumerate() {
        // A d-dimensional cell is bounded by at least d + 1 faces
        let min = if dim == 0 { 0 } else { dim + 1 };
        if faces.len() < min {
            return Err(GridError::TooFewFaces {
                cell,
                count: faces.len(),
                dim,
                min,
            });
        }

        let mut seen = HashSet::with_capacity(faces.len());
        for &(face, sign) in faces {
            if face >= num_faces {
                return Err(GridError::InvalidFaceRef { cell, face });
            }
            if sign != 1 && sign != -1 {
                return Err(GridError::InvalidSign { cell, face, sign });
            }
            if !seen.insert(face) {
                return Err(GridError::DuplicateFace { cell, face });
            }
        }
    }

    Ok(())
}

/// Every face has at most two cells, and an interior face is seen with
/// opposite signs from its two cells.
pub(crate) fn validate_face_cells(face_cells: &SignedIncidence) -> GridResult<()> {
    for face in 0..face_cells.num_rows() {
        let signs = face_cells.row_signs(face);
        match signs.len() {
            0 | 1 => {}
            2 => {
                if signs[0] == signs[1] {
                    return Err(GridError::InconsistentOrientation { face });
                }
            }
            count => return Err(GridError::OverSharedFace { face, count }),
        }
    }
    Ok(())
}

/// Supplied geometry must match the topology's entity counts.
pub(crate) fn validate_geometry(
    geometry: &Geometry,
    num_faces: usize,
    num_cells: usize,
) -> GridResult<()> {
    let checks = [
        ("face_areas", num_faces, geometry.face_areas.len()),
        ("face_normals", num_faces, geometry.face_normals.ncols()),
        ("face_centers", num_faces, geometry.face_centers.ncols()),
        ("cell_volumes", num_cells, geometry.cell_volumes.len()),
        ("cell_centers", num_cells, geometry.cell_centers.ncols()),
    ];
    for (what, expected, found) in checks {
        if expected != found {
            return Err(GridError::GeometryShape {
                what,
                expected,
                found,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validate_empty_grid() {
        assert!(validate_structure(2, 0, &[], &[]).is_ok());
    }

    #[test]
    fn validate_rejects_dimension_four() {
        assert_eq!(
            validate_structure(4, 0, &[], &[]),
            Err(GridError::UnsupportedDimension { dim: 4 })
        );
    }

    #[test]
    fn validate_invalid_node_ref() {
        let faces = vec![vec![0, 99]];
        let result = validate_structure(2, 2, &faces, &[]);
        assert_eq!(
            result,
            Err(GridError::InvalidNodeRef { face: 0, node: 99 })
        );
    }

    #[test]
    fn validate_segment_face_in_3d_grid() {
        let faces = vec![vec![0, 1]];
        let result = validate_structure(3, 2, &faces, &[]);
        assert!(matches!(result, Err(GridError::FaceNodeCount { .. })));
    }

    #[test]
    fn validate_duplicate_face_in_cell() {
        let faces = vec![vec![0], vec![1]];
        let cells = vec![vec![(0, -1), (0, 1)]];
        let result = validate_structure(1, 2, &faces, &cells);
        assert_eq!(result, Err(GridError::DuplicateFace { cell: 0, face: 0 }));
    }

    #[test]
    fn validate_equal_signs_on_shared_face() {
        let cf = SignedIncidence::from_rows(&[vec![(0, -1), (1, 1)], vec![(1, 1), (2, 1)]]);
        let fc = cf.transpose(3);
        assert_eq!(
            validate_face_cells(&fc),
            Err(GridError::InconsistentOrientation { face: 1 })
        );
    }

    #[test]
    fn validate_face_in_three_cells() {
        let cf = SignedIncidence::from_rows(&[vec![(0, 1)], vec![(0, -1)], vec![(0, 1)]]);
        let fc = cf.transpose(1);
        assert_eq!(
            validate_face_cells(&fc),
            Err(GridError::OverSharedFace { face: 0, count: 3 })
        );
    }
}
