//! Per-grid parameter bundle.

use std::borrow::Cow;

use mdg_grid::Grid;

use crate::bc::BoundaryCondition;
use crate::error::{ParamError, ParamResult};
use crate::tensor::SecondOrderTensor;

/// Physical data attached to one grid.
///
/// Every field is optional. The accessors check lengths against the grid and
/// fill in defaults for absent cell fields: unit permeability, unit aperture,
/// unit storage coefficient and zero source.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Parameters {
    permeability: Option<SecondOrderTensor>,
    bc: Option<BoundaryCondition>,
    bc_values: Option<Vec<f64>>,
    aperture: Option<Vec<f64>>,
    phi: Option<Vec<f64>>,
    source: Option<Vec<f64>>,
}

impl Parameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_permeability(mut self, k: SecondOrderTensor) -> Self {
        self.permeability = Some(k);
        self
    }

    pub fn with_bc(mut self, bc: BoundaryCondition) -> Self {
        self.bc = Some(bc);
        self
    }

    pub fn with_bc_values(mut self, values: Vec<f64>) -> Self {
        self.bc_values = Some(values);
        self
    }

    pub fn with_aperture(mut self, aperture: Vec<f64>) -> Self {
        self.aperture = Some(aperture);
        self
    }

    /// Porosity or storage coefficient.
    pub fn with_phi(mut self, phi: Vec<f64>) -> Self {
        self.phi = Some(phi);
        self
    }

    pub fn with_source(mut self, source: Vec<f64>) -> Self {
        self.source = Some(source);
        self
    }

    pub fn permeability(&self, grid: &Grid) -> ParamResult<Cow<'_, SecondOrderTensor>> {
        match &self.permeability {
            Some(k) => {
                check_len("permeability", grid.num_cells(), k.num_cells())?;
                Ok(Cow::Borrowed(k))
            }
            None => Ok(Cow::Owned(SecondOrderTensor::unit(grid.num_cells()))),
        }
    }

    pub fn aperture(&self, grid: &Grid) -> ParamResult<Cow<'_, [f64]>> {
        cell_field("aperture", self.aperture.as_deref(), grid.num_cells(), 1.0)
    }

    pub fn phi(&self, grid: &Grid) -> ParamResult<Cow<'_, [f64]>> {
        cell_field("phi", self.phi.as_deref(), grid.num_cells(), 1.0)
    }

    pub fn source(&self, grid: &Grid) -> ParamResult<Cow<'_, [f64]>> {
        cell_field("source", self.source.as_deref(), grid.num_cells(), 0.0)
    }

    /// Boundary tags and values, which must be given together and have equal
    /// length. `None` when neither is set.
    pub fn boundary(&self) -> ParamResult<Option<(&BoundaryCondition, &[f64])>> {
        match (&self.bc, &self.bc_values) {
            (None, None) => Ok(None),
            (Some(_), None) => Err(ParamError::BoundaryMismatch {
                what: "condition given without values",
            }),
            (None, Some(_)) => Err(ParamError::BoundaryMismatch {
                what: "values given without condition",
            }),
            (Some(bc), Some(values)) => {
                check_len("boundary values", bc.len(), values.len())?;
                Ok(Some((bc, values.as_slice())))
            }
        }
    }
}

fn check_len(what: &'static str, expected: usize, found: usize) -> ParamResult<()> {
    if expected != found {
        return Err(ParamError::LengthMismatch {
            what,
            expected,
            found,
        });
    }
    Ok(())
}

fn cell_field<'a>(
    what: &'static str,
    values: Option<&'a [f64]>,
    num_cells: usize,
    default: f64,
) -> ParamResult<Cow<'a, [f64]>> {
    match values {
        Some(v) => {
            check_len(what, num_cells, v.len())?;
            if let Some(index) = v.iter().position(|x| !x.is_finite()) {
                return Err(ParamError::NonFinite { what, index });
            }
            Ok(Cow::Borrowed(v))
        }
        None => Ok(Cow::Owned(vec![default; num_cells])),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mdg_grid::cartesian::cart_grid_1d;

    #[test]
    fn defaults_fill_cell_fields() {
        let g = cart_grid_1d(3, 1.0).unwrap();
        let p = Parameters::new();
        assert_eq!(&*p.aperture(&g).unwrap(), &[1.0; 3]);
        assert_eq!(&*p.phi(&g).unwrap(), &[1.0; 3]);
        assert_eq!(&*p.source(&g).unwrap(), &[0.0; 3]);
        assert_eq!(p.permeability(&g).unwrap().num_cells(), 3);
        assert_eq!(p.boundary(), Ok(None));
    }

    #[test]
    fn explicit_fields_are_borrowed() {
        let g = cart_grid_1d(2, 1.0).unwrap();
        let p = Parameters::new().with_aperture(vec![0.1, 0.2]);
        assert!(matches!(p.aperture(&g).unwrap(), Cow::Borrowed(_)));
    }

    #[test]
    fn wrong_length_is_reported() {
        let g = cart_grid_1d(2, 1.0).unwrap();
        let p = Parameters::new().with_source(vec![1.0]);
        assert_eq!(
            p.source(&g),
            Err(ParamError::LengthMismatch {
                what: "source",
                expected: 2,
                found: 1
            })
        );
    }

    #[test]
    fn non_finite_field_is_reported() {
        let g = cart_grid_1d(2, 1.0).unwrap();
        let p = Parameters::new().with_phi(vec![1.0, f64::NAN]);
        assert_eq!(
            p.phi(&g),
            Err(ParamError::NonFinite {
                what: "phi",
                index: 1
            })
        );
    }

    #[test]
    fn boundary_requires_both_parts() {
        let only_bc = Parameters::new().with_bc(BoundaryCondition::all_neumann(2));
        assert!(matches!(
            only_bc.boundary(),
            Err(ParamError::BoundaryMismatch { .. })
        ));
        let only_values = Parameters::new().with_bc_values(vec![0.0; 2]);
        assert!(matches!(
            only_values.boundary(),
            Err(ParamError::BoundaryMismatch { .. })
        ));
        let short = Parameters::new()
            .with_bc(BoundaryCondition::all_neumann(2))
            .with_bc_values(vec![0.0]);
        assert!(matches!(
            short.boundary(),
            Err(ParamError::LengthMismatch { .. })
        ));
    }
}
