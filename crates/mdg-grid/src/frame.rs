//! Mapping of embedded grids onto their intrinsic coordinate axes.
//!
//! A 1-d grid is rotated onto the x-axis and a 2-d grid onto the xy-plane;
//! the axes along which the rotated points still vary are the active ones.

use std::f64::consts::PI;

use nalgebra::{DMatrix, DVector, Matrix3, Matrix3xX, Rotation3, Unit, Vector3};

use crate::error::{GridError, GridResult};

/// Relative spread below which an axis is considered inactive.
const AXIS_TOL: f64 = 1e-5;

/// Rotation onto the intrinsic axes plus the mask of axes that are kept.
#[derive(Debug, Clone, PartialEq)]
pub struct ReferenceFrame {
    rotation: Matrix3<f64>,
    active: [bool; 3],
}

impl ReferenceFrame {
    /// Identity frame keeping the first `dim` axes.
    pub fn identity(dim: usize) -> Self {
        let mut active = [false; 3];
        for flag in active.iter_mut().take(dim) {
            *flag = true;
        }
        Self {
            rotation: Matrix3::identity(),
            active,
        }
    }

    pub fn rotation(&self) -> &Matrix3<f64> {
        &self.rotation
    }

    pub fn active(&self) -> [bool; 3] {
        self.active
    }

    /// Number of active axes.
    pub fn dim(&self) -> usize {
        self.active.iter().filter(|&&a| a).count()
    }

    /// Rotate `v` and keep the active components.
    pub fn project_vector(&self, v: &Vector3<f64>) -> DVector<f64> {
        let rotated = self.rotation * v;
        DVector::from_iterator(
            self.dim(),
            (0..3).filter(|&i| self.active[i]).map(|i| rotated[i]),
        )
    }

    /// Column-wise `project_vector`.
    pub fn project_columns(&self, points: &Matrix3xX<f64>) -> DMatrix<f64> {
        let rotated = self.rotation * points;
        let axes: Vec<usize> = (0..3).filter(|&i| self.active[i]).collect();
        DMatrix::from_fn(axes.len(), points.ncols(), |i, j| rotated[(axes[i], j)])
    }
}

pub(crate) fn reference_frame(dim: usize, nodes: &Matrix3xX<f64>) -> GridResult<ReferenceFrame> {
    if dim == 0 || dim == 3 {
        return Ok(ReferenceFrame::identity(dim));
    }

    let rotation = if dim == 1 {
        let tangent = line_direction(nodes).ok_or_else(|| GridError::DegenerateGeometry {
            what: "1-d grid nodes are coincident".to_string(),
        })?;
        align(&tangent, &Vector3::x())
    } else {
        let normal = plane_normal(nodes).ok_or_else(|| GridError::DegenerateGeometry {
            what: "2-d grid nodes are collinear".to_string(),
        })?;
        align(&normal, &Vector3::z())
    };

    let rotated = rotation * nodes;
    let mut spread = [0.0; 3];
    for (axis, s) in spread.iter_mut().enumerate() {
        let first = rotated[(axis, 0)];
        *s = rotated.row(axis).iter().map(|x| (x - first).abs()).sum();
    }
    let total: f64 = spread.iter().sum();
    if total <= 0.0 {
        return Err(GridError::ReferenceFrame { dim, found: 0 });
    }

    let active = spread.map(|s| s / total > AXIS_TOL);
    let found = active.iter().filter(|&&a| a).count();
    if found != dim {
        return Err(GridError::ReferenceFrame { dim, found });
    }

    Ok(ReferenceFrame { rotation, active })
}

/// Unit direction of a set of (nearly) collinear points.
pub(crate) fn line_direction(points: &Matrix3xX<f64>) -> Option<Vector3<f64>> {
    if points.ncols() < 2 {
        return None;
    }
    let p0 = points.column(0).into_owned();
    let (_, far) = farthest_from(points, &p0)?;
    let dir = far - p0;
    let len = dir.norm();
    if len <= f64::EPSILON * p0.norm().max(1.0) {
        return None;
    }
    Some(canonical(dir / len))
}

/// Unit normal of a set of (nearly) coplanar points.
pub(crate) fn plane_normal(points: &Matrix3xX<f64>) -> Option<Vector3<f64>> {
    if points.ncols() < 3 {
        return None;
    }
    let p0 = points.column(0).into_owned();
    let (len, p1) = farthest_from(points, &p0)?;
    let edge = p1 - p0;

    let mut best = Vector3::zeros();
    for col in points.column_iter() {
        let candidate = edge.cross(&(col - p0));
        if candidate.norm() > best.norm() {
            best = candidate;
        }
    }

    // |edge x v| is an area; compare against the squared extent of the set
    if best.norm() <= 1e-12 * len * len {
        return None;
    }
    Some(canonical(best.normalize()))
}

fn farthest_from(points: &Matrix3xX<f64>, origin: &Vector3<f64>) -> Option<(f64, Vector3<f64>)> {
    points
        .column_iter()
        .map(|col| ((col - origin).norm(), col.into_owned()))
        .max_by(|a, b| a.0.total_cmp(&b.0))
}

/// Flip `v` so that its largest-magnitude component is positive.
fn canonical(v: Vector3<f64>) -> Vector3<f64> {
    let imax = v.iamax();
    if v[imax] < 0.0 { -v } else { v }
}

/// Proper rotation taking unit vector `from` onto unit vector `to`.
fn align(from: &Vector3<f64>, to: &Vector3<f64>) -> Matrix3<f64> {
    match Rotation3::rotation_between(from, to) {
        Some(rot) => rot.into_inner(),
        None => {
            // Antiparallel: half turn about any axis orthogonal to `from`
            let helper = if from.x.abs() < 0.9 {
                Vector3::x()
            } else {
                Vector3::y()
            };
            let axis = Unit::new_normalize(from.cross(&helper));
            Rotation3::from_axis_angle(&axis, PI).into_inner()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flat_grid_keeps_xy() {
        let nodes = Matrix3xX::from_column_slice(&[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            1.0, 2.0, 0.0, //
        ]);
        let frame = reference_frame(2, &nodes).unwrap();
        assert_eq!(frame.active(), [true, true, false]);
        assert!((frame.rotation() - Matrix3::identity()).norm() < 1e-14);
    }

    #[test]
    fn tilted_line_maps_onto_x_axis() {
        let nodes = Matrix3xX::from_column_slice(&[
            0.0, 0.0, 0.0, //
            1.0, 1.0, 1.0, //
            2.0, 2.0, 2.0, //
        ]);
        let frame = reference_frame(1, &nodes).unwrap();
        assert_eq!(frame.active(), [true, false, false]);
        let x = frame.project_columns(&nodes);
        assert_eq!(x.nrows(), 1);
        assert!((x[(0, 2)] - x[(0, 0)] - 2.0 * 3.0_f64.sqrt()).abs() < 1e-12);
    }

    #[test]
    fn vertical_plane_maps_onto_xy() {
        // Plane x = 1
        let nodes = Matrix3xX::from_column_slice(&[
            1.0, 0.0, 0.0, //
            1.0, 1.0, 0.0, //
            1.0, 1.0, 1.0, //
            1.0, 0.0, 1.0, //
        ]);
        let frame = reference_frame(2, &nodes).unwrap();
        assert_eq!(frame.active(), [true, true, false]);
        let n = frame.project_vector(&Vector3::x());
        assert!(n.norm() < 1e-12);
    }

    #[test]
    fn collinear_nodes_have_no_plane() {
        let nodes = Matrix3xX::from_column_slice(&[
            0.0, 0.0, 0.0, //
            1.0, 0.0, 0.0, //
            2.0, 0.0, 0.0, //
        ]);
        assert!(reference_frame(2, &nodes).is_err());
    }

    #[test]
    fn align_handles_antiparallel() {
        let r = align(&(-Vector3::z()), &Vector3::z());
        assert!((r * (-Vector3::z()) - Vector3::z()).norm() < 1e-12);
    }
}
