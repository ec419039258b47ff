//! Symmetric second-order tensors, one per cell.
//!
//! Tensors are always stored as full 3x3 matrices. Data for 1-d and 2-d
//! problems is padded with a unit diagonal in the unused directions, so the
//! same storage serves grids of every dimension and survives rotations.

use nalgebra::{DMatrix, Matrix3};

use crate::error::{ParamError, ParamResult};

/// Relative asymmetry accepted before a tensor is rejected.
const SYMMETRY_TOL: f64 = 1e-10;

#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SecondOrderTensor {
    values: Vec<Matrix3<f64>>,
}

impl SecondOrderTensor {
    /// Identity tensor on every cell.
    pub fn unit(num_cells: usize) -> Self {
        Self {
            values: vec![Matrix3::identity(); num_cells],
        }
    }

    /// `k[c] * I` on cell `c`.
    pub fn isotropic(k: &[f64]) -> ParamResult<Self> {
        Self::diagonal(k, k, k)
    }

    /// Diagonal tensor with the given principal values per cell.
    pub fn diagonal(kxx: &[f64], kyy: &[f64], kzz: &[f64]) -> ParamResult<Self> {
        for (what, values) in [("kyy", kyy), ("kzz", kzz)] {
            if values.len() != kxx.len() {
                return Err(ParamError::LengthMismatch {
                    what,
                    expected: kxx.len(),
                    found: values.len(),
                });
            }
        }
        let values = (0..kxx.len())
            .map(|c| Matrix3::from_diagonal(&nalgebra::Vector3::new(kxx[c], kyy[c], kzz[c])))
            .collect();
        Self::from_matrices(values)
    }

    /// Full tensors per cell, checked for symmetry and positive definiteness.
    pub fn from_matrices(values: Vec<Matrix3<f64>>) -> ParamResult<Self> {
        for (cell, k) in values.iter().enumerate() {
            if k.iter().any(|v| !v.is_finite()) {
                return Err(ParamError::NonFinite {
                    what: "permeability",
                    index: cell,
                });
            }
            let scale = k.amax().max(f64::MIN_POSITIVE);
            if (k - k.transpose()).amax() > SYMMETRY_TOL * scale {
                return Err(ParamError::NotSymmetric { cell });
            }
            if k.cholesky().is_none() {
                return Err(ParamError::NotPositiveDefinite { cell });
            }
        }
        Ok(Self { values })
    }

    pub fn num_cells(&self) -> usize {
        self.values.len()
    }

    pub fn values(&self) -> &[Matrix3<f64>] {
        &self.values
    }

    pub fn cell(&self, c: usize) -> &Matrix3<f64> {
        &self.values[c]
    }

    /// Rotate every tensor in place: `K <- R K R^T`.
    pub fn rotate(&mut self, rotation: &Matrix3<f64>) {
        let rt = rotation.transpose();
        for k in &mut self.values {
            *k = rotation * *k * rt;
        }
    }

    pub fn rotated(&self, rotation: &Matrix3<f64>) -> Self {
        let mut copy = self.clone();
        copy.rotate(rotation);
        copy
    }

    /// The tensor of `cell` restricted to the `active` axes.
    pub fn restrict(&self, cell: usize, active: [bool; 3]) -> DMatrix<f64> {
        let axes: Vec<usize> = (0..3).filter(|&i| active[i]).collect();
        let k = &self.values[cell];
        DMatrix::from_fn(axes.len(), axes.len(), |i, j| k[(axes[i], axes[j])])
    }

    /// Leading `dim x dim` block of the tensor of `cell`.
    pub fn leading(&self, cell: usize, dim: usize) -> DMatrix<f64> {
        let dim = dim.min(3);
        let k = &self.values[cell];
        DMatrix::from_fn(dim, dim, |i, j| k[(i, j)])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Rotation3, Vector3};

    #[test]
    fn isotropic_is_scaled_identity() {
        let k = SecondOrderTensor::isotropic(&[2.0, 3.0]).unwrap();
        assert_eq!(k.num_cells(), 2);
        assert_eq!(*k.cell(1), Matrix3::identity() * 3.0);
    }

    #[test]
    fn rejects_asymmetric_tensor() {
        let mut m = Matrix3::identity();
        m[(0, 1)] = 0.5;
        assert_eq!(
            SecondOrderTensor::from_matrices(vec![Matrix3::identity(), m]),
            Err(ParamError::NotSymmetric { cell: 1 })
        );
    }

    #[test]
    fn rejects_indefinite_tensor() {
        let m = Matrix3::from_diagonal(&Vector3::new(1.0, -1.0, 1.0));
        assert_eq!(
            SecondOrderTensor::from_matrices(vec![m]),
            Err(ParamError::NotPositiveDefinite { cell: 0 })
        );
    }

    #[test]
    fn rejects_mismatched_diagonals() {
        let err = SecondOrderTensor::diagonal(&[1.0, 1.0], &[1.0], &[1.0, 1.0]).unwrap_err();
        assert!(matches!(err, ParamError::LengthMismatch { what: "kyy", .. }));
    }

    #[test]
    fn rotation_moves_principal_axis() {
        let k = SecondOrderTensor::diagonal(&[4.0], &[1.0], &[1.0]).unwrap();
        // Quarter turn about z sends x onto y
        let r = Rotation3::from_axis_angle(&Vector3::z_axis(), std::f64::consts::FRAC_PI_2);
        let rotated = k.rotated(r.matrix());
        assert!((rotated.cell(0)[(1, 1)] - 4.0).abs() < 1e-12);
        assert!((rotated.cell(0)[(0, 0)] - 1.0).abs() < 1e-12);
        // Original is untouched
        assert_eq!(k.cell(0)[(0, 0)], 4.0);
    }

    #[test]
    fn restrict_and_leading_blocks() {
        let k = SecondOrderTensor::diagonal(&[1.0], &[2.0], &[3.0]).unwrap();
        let xz = k.restrict(0, [true, false, true]);
        assert_eq!(xz, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 3.0]));
        let lead = k.leading(0, 2);
        assert_eq!(lead, DMatrix::from_row_slice(2, 2, &[1.0, 0.0, 0.0, 2.0]));
        assert_eq!(k.leading(0, 0).nrows(), 0);
    }
}
