/// Floating point type used throughout system
pub type Real = f64;

/// Absolute/relative tolerance pair. The default matches numpy's `allclose`.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Tolerances {
    pub abs: Real,
    pub rel: Real,
}

impl Default for Tolerances {
    fn default() -> Self {
        Self {
            abs: 1e-8,
            rel: 1e-5,
        }
    }
}

/// One-sided closeness test: `|actual - expected| <= abs + rel * |expected|`.
///
/// Same shape as numpy's `allclose`, applied to a single pair.
pub fn close_to(actual: Real, expected: Real, tol: Tolerances) -> bool {
    (actual - expected).abs() <= tol.abs + tol.rel * expected.abs()
}

/// Positive part, `max(v, 0)`.
#[inline]
pub fn positive_part(v: Real) -> Real {
    v.max(0.0)
}

/// Negative part kept signed, `min(v, 0)`.
#[inline]
pub fn negative_part(v: Real) -> Real {
    v.min(0.0)
}


#[cfg(test)]
mod proptests {
    use super::*;
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn parts_recombine(v in -1e6_f64..1e6_f64) {
            prop_assert_eq!(positive_part(v) + negative_part(v), v);
            prop_assert!(positive_part(v) >= 0.0);
            prop_assert!(negative_part(v) <= 0.0);
        }
    }
}
