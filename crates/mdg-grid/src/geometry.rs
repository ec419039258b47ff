//! Geometry computation for grids built without explicit geometry.
//!
//! Face quantities depend on the dimension (points, segments, polygons).
//! Which side of a face is "out" is read off each cell's own boundary: the
//! segments of a 2-d cell are chained into a loop, the polygons of a 3-d cell
//! are oriented edge by edge into a closed surface, and the sign of the
//! enclosed area or volume fixes the outward side. Cells of every dimension
//! are then split into signed cones from a reference point to each face,
//! which gives volume and centroid for convex and non-convex cells alike.

use nalgebra::{Matrix3xX, Vector3};

use crate::error::{GridError, GridResult};
use crate::frame;
use crate::grid::Geometry;
use crate::incidence::{Incidence, SignedIncidence};

pub(crate) fn compute(
    dim: usize,
    nodes: &Matrix3xX<f64>,
    face_nodes: &Incidence,
    cell_faces: &SignedIncidence,
) -> GridResult<Geometry> {
    let num_faces = face_nodes.num_rows();
    let num_cells = cell_faces.num_rows();

    if dim == 0 {
        return Ok(point_geometry(nodes, num_cells));
    }

    let mut face_areas = vec![0.0; num_faces];
    let mut face_normals = Matrix3xX::zeros(num_faces);
    let mut face_centers = Matrix3xX::zeros(num_faces);
    let mut plane = Vector3::z();

    match dim {
        1 => {
            let tangent =
                frame::line_direction(nodes).ok_or_else(|| GridError::DegenerateGeometry {
                    what: "1-d grid nodes are coincident".to_string(),
                })?;
            for f in 0..num_faces {
                let n = face_nodes.row(f)[0];
                face_areas[f] = 1.0;
                face_centers.set_column(f, &nodes.column(n));
                face_normals.set_column(f, &tangent);
            }
        }
        2 => {
            plane = frame::plane_normal(nodes).ok_or_else(|| GridError::DegenerateGeometry {
                what: "2-d grid nodes are collinear".to_string(),
            })?;
            for f in 0..num_faces {
                let fn_ = face_nodes.row(f);
                let p0 = nodes.column(fn_[0]);
                let p1 = nodes.column(fn_[1]);
                let tangent = p1 - p0;
                face_areas[f] = tangent.norm();
                face_centers.set_column(f, &((p0 + p1) * 0.5));
                face_normals.set_column(f, &tangent.cross(&plane));
            }
        }
        _ => {
            for f in 0..num_faces {
                let (area, normal, center) = polygon(nodes, face_nodes.row(f));
                face_areas[f] = area;
                face_normals.set_column(f, &normal);
                face_centers.set_column(f, &center);
            }
        }
    }

    // Orient each normal so that sign * normal leaves the face's first cell
    let mut oriented = vec![false; num_faces];
    for c in 0..num_cells {
        let outward = match dim {
            1 => interval_outward(c, cell_faces, &face_normals, &face_centers),
            2 => loop_outward(c, nodes, face_nodes, cell_faces, &plane)?,
            _ => surface_outward(c, face_nodes, cell_faces, &face_normals, &face_centers)?,
        };
        for ((f, sign), side) in cell_faces.row(c).zip(outward) {
            if !oriented[f] {
                let n = face_normals.column(f) * (f64::from(sign) * side);
                face_normals.set_column(f, &n);
                oriented[f] = true;
            }
        }
    }

    let mut cell_volumes = vec![0.0; num_cells];
    let mut cell_centers = Matrix3xX::zeros(num_cells);
    let d = dim as f64;
    for c in 0..num_cells {
        // Cones are signed, so any reference point gives the same volume
        let faces = cell_faces.row_indices(c);
        let x_ref = faces
            .iter()
            .fold(Vector3::zeros(), |acc, &f| acc + face_centers.column(f))
            / faces.len().max(1) as f64;
        let mut volume = 0.0;
        let mut moment = Vector3::zeros();
        for (f, sign) in cell_faces.row(c) {
            let to_face = face_centers.column(f) - x_ref;
            let cone = f64::from(sign) * face_normals.column(f).dot(&to_face) / d;
            volume += cone;
            moment += (x_ref + to_face * (d / (d + 1.0))) * cone;
        }

        if volume < -1e-12 * face_areas.iter().cloned().fold(0.0, f64::max) {
            return Err(GridError::DegenerateGeometry {
                what: format!("cell {c} has negative volume {volume}"),
            });
        }
        cell_volumes[c] = volume;
        let center = if volume > 0.0 { moment / volume } else { x_ref };
        cell_centers.set_column(c, &center);
    }

    Ok(Geometry {
        face_areas,
        face_normals,
        face_centers,
        cell_volumes,
        cell_centers,
    })
}

/// Factor per cell face (in cell order) that turns the raw face normal into
/// the outward one. A segment is convex, so its midpoint is interior.
fn interval_outward(
    c: usize,
    cell_faces: &SignedIncidence,
    normals: &Matrix3xX<f64>,
    centers: &Matrix3xX<f64>,
) -> Vec<f64> {
    let faces = cell_faces.row_indices(c);
    let mid = faces
        .iter()
        .fold(Vector3::zeros(), |acc, &f| acc + centers.column(f))
        / faces.len().max(1) as f64;
    faces
        .iter()
        .map(|&f| {
            if normals.column(f).dot(&(centers.column(f) - mid)) < 0.0 {
                -1.0
            } else {
                1.0
            }
        })
        .collect()
}

/// Chain the segments of a 2-d cell into one loop. Raw normals are
/// `(p1 - p0) x plane`, which is outward for a counterclockwise traversal.
fn loop_outward(
    c: usize,
    nodes: &Matrix3xX<f64>,
    face_nodes: &Incidence,
    cell_faces: &SignedIncidence,
    plane: &Vector3<f64>,
) -> GridResult<Vec<f64>> {
    let faces = cell_faces.row_indices(c);
    let k = faces.len();
    let mut direction = vec![0.0; k];
    direction[0] = 1.0;
    let start = face_nodes.row(faces[0])[0];
    let mut current = face_nodes.row(faces[0])[1];

    for _ in 1..k {
        let (i, forward) = (0..k)
            .filter(|&i| direction[i] == 0.0)
            .find_map(|i| {
                let seg = face_nodes.row(faces[i]);
                if seg[0] == current {
                    Some((i, true))
                } else if seg[1] == current {
                    Some((i, false))
                } else {
                    None
                }
            })
            .ok_or(GridError::OpenCellBoundary { cell: c })?;
        let seg = face_nodes.row(faces[i]);
        direction[i] = if forward { 1.0 } else { -1.0 };
        current = if forward { seg[1] } else { seg[0] };
    }
    if current != start {
        return Err(GridError::OpenCellBoundary { cell: c });
    }

    let twice_area: f64 = faces
        .iter()
        .zip(&direction)
        .map(|(&f, dir)| {
            let seg = face_nodes.row(f);
            dir * nodes.column(seg[0]).cross(&nodes.column(seg[1])).dot(plane)
        })
        .sum();
    let turn = if twice_area < 0.0 { -1.0 } else { 1.0 };
    Ok(direction.into_iter().map(|dir| dir * turn).collect())
}

/// Orient the polygons of a 3-d cell consistently: a shared edge must be
/// traversed in opposite directions by its two faces. The sign of the
/// enclosed volume then tells whether the common orientation is outward.
fn surface_outward(
    c: usize,
    face_nodes: &Incidence,
    cell_faces: &SignedIncidence,
    normals: &Matrix3xX<f64>,
    centers: &Matrix3xX<f64>,
) -> GridResult<Vec<f64>> {
    let faces = cell_faces.row_indices(c);
    let k = faces.len();
    let mut side = vec![0.0; k];
    side[0] = 1.0;
    let mut stack = vec![0];

    while let Some(i) = stack.pop() {
        let ring = face_nodes.row(faces[i]);
        for (a, b) in ring_edges(ring) {
            // Edge a -> b as traversed by face i in its current orientation
            let (a, b) = if side[i] > 0.0 { (a, b) } else { (b, a) };
            for j in (0..k).filter(|&j| j != i) {
                let other = face_nodes.row(faces[j]);
                let required = if ring_edges(other).any(|e| e == (a, b)) {
                    -1.0
                } else if ring_edges(other).any(|e| e == (b, a)) {
                    1.0
                } else {
                    continue;
                };
                if side[j] == 0.0 {
                    side[j] = required;
                    stack.push(j);
                } else if side[j] != required {
                    return Err(GridError::OpenCellBoundary { cell: c });
                }
            }
        }
    }
    if side.contains(&0.0) {
        return Err(GridError::OpenCellBoundary { cell: c });
    }

    let volume: f64 = faces
        .iter()
        .zip(&side)
        .map(|(&f, s)| s * normals.column(f).dot(&centers.column(f)))
        .sum();
    let turn = if volume < 0.0 { -1.0 } else { 1.0 };
    Ok(side.into_iter().map(|s| s * turn).collect())
}

fn ring_edges(ring: &[usize]) -> impl Iterator<Item = (usize, usize)> + '_ {
    let k = ring.len();
    (0..k).map(move |i| (ring[i], ring[(i + 1) % k]))
}

/// 0-d grids: cell `c` sits on node `c` and has unit volume.
fn point_geometry(nodes: &Matrix3xX<f64>, num_cells: usize) -> Geometry {
    let mut cell_centers = Matrix3xX::zeros(num_cells);
    for c in 0..num_cells.min(nodes.ncols()) {
        cell_centers.set_column(c, &nodes.column(c));
    }
    Geometry {
        face_areas: Vec::new(),
        face_normals: Matrix3xX::zeros(0),
        face_centers: Matrix3xX::zeros(0),
        cell_volumes: vec![1.0; num_cells],
        cell_centers,
    }
}

/// Area, area-weighted normal (Newell) and centroid of a planar polygon whose
/// nodes are listed in order around its boundary.
fn polygon(nodes: &Matrix3xX<f64>, ring: &[usize]) -> (f64, Vector3<f64>, Vector3<f64>) {
    let k = ring.len();
    let mut normal = Vector3::zeros();
    for i in 0..k {
        let a = nodes.column(ring[i]);
        let b = nodes.column(ring[(i + 1) % k]);
        normal += a.cross(&b);
    }
    normal *= 0.5;
    let area = normal.norm();

    let mean = ring
        .iter()
        .fold(Vector3::zeros(), |acc, &n| acc + nodes.column(n))
        / k as f64;
    if area == 0.0 {
        return (0.0, normal, mean);
    }

    let unit = normal / area;
    let mut weight = 0.0;
    let mut moment = Vector3::zeros();
    for i in 0..k {
        let a = nodes.column(ring[i]);
        let b = nodes.column(ring[(i + 1) % k]);
        let tri = 0.5 * (a - mean).cross(&(b - mean)).dot(&unit);
        weight += tri;
        moment += (mean + a + b) / 3.0 * tri;
    }
    let center = if weight != 0.0 { moment / weight } else { mean };

    (area, normal, center)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unit_square_polygon() {
        let nodes = Matrix3xX::from_column_slice(&[
            0.0, 0.0, 1.0, //
            1.0, 0.0, 1.0, //
            1.0, 1.0, 1.0, //
            0.0, 1.0, 1.0, //
        ]);
        let (area, normal, center) = polygon(&nodes, &[0, 1, 2, 3]);
        assert!((area - 1.0).abs() < 1e-14);
        assert!((normal - Vector3::z()).norm() < 1e-14);
        assert!((center - Vector3::new(0.5, 0.5, 1.0)).norm() < 1e-14);
    }

    #[test]
    fn triangle_centroid() {
        let nodes = Matrix3xX::from_column_slice(&[
            0.0, 0.0, 0.0, //
            3.0, 0.0, 0.0, //
            0.0, 3.0, 0.0, //
        ]);
        let (area, _, center) = polygon(&nodes, &[0, 1, 2]);
        assert!((area - 4.5).abs() < 1e-12);
        assert!((center - Vector3::new(1.0, 1.0, 0.0)).norm() < 1e-12);
    }
}
