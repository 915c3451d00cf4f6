//! Hermitian transpose node.

use crate::proxy::{quasi_unwrap, AccessMode, Accessor, PartialUnwrap, Proxy};
use crate::storage::{BufferId, Shape};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;

/// `m^H`: rows and columns swapped, complex elements conjugated.
#[derive(Debug, Clone, Copy)]
pub struct Trans<E> {
    m: E,
}

impl<E: Proxy> Trans<E> {
    pub fn new(m: E) -> Self {
        Self { m }
    }

    #[inline]
    pub fn operand(&self) -> &E {
        &self.m
    }

    /// A real-valued vector has the same memory order either way round.
    #[inline]
    fn is_reorder_free(&self) -> bool {
        !<E::Elem as Element>::IS_COMPLEX && self.m.shape().is_vector()
    }
}

impl<E: Proxy> Proxy for Trans<E> {
    type Elem = E::Elem;

    const MODE: AccessMode = match E::MODE {
        AccessMode::Materialize => AccessMode::Materialize,
        _ => AccessMode::At,
    };
    const IS_ROW: bool = E::IS_COL;
    const IS_COL: bool = E::IS_ROW;
    const FAST_UNWRAP: bool = E::FAST_UNWRAP && !<E::Elem as Element>::IS_COMPLEX;

    #[inline]
    fn shape(&self) -> Shape {
        let s = self.m.shape();
        Shape::mat(s.n_cols, s.n_rows)
    }

    #[inline]
    fn at(&self, row: usize, col: usize, _slice: usize) -> E::Elem {
        self.m.at(col, row, 0).conj()
    }

    fn as_slice(&self) -> Option<&[E::Elem]> {
        if self.is_reorder_free() {
            self.m.as_slice()
        } else {
            None
        }
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.m.is_alias(dest)
    }

    fn validate(&self) -> Result<()> {
        self.m.validate()?;
        let s = self.m.shape();
        if s.n_slices != 1 {
            return Err(LinalgError::Conformance {
                op: "trans()",
                detail: format!("cannot transpose a {s} object"),
            });
        }
        Ok(())
    }

    fn write_to(&self, out: &mut [E::Elem]) -> Result<()> {
        if let Some(src) = self.as_slice() {
            out.copy_from_slice(src);
            return Ok(());
        }
        let acc = Accessor::new(&self.m)?;
        let s = self.m.shape();
        let mut i = 0;
        for r in 0..s.n_rows {
            for c in 0..s.n_cols {
                out[i] = acc.at(r, c, 0).conj();
                i += 1;
            }
        }
        Ok(())
    }

    fn partial_unwrap(&self) -> Result<PartialUnwrap<'_, E::Elem>> {
        if self.is_reorder_free() {
            return self.m.partial_unwrap();
        }
        Ok(PartialUnwrap {
            mem: quasi_unwrap(self)?,
            scale: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::{EOp, Scale};
    use crate::{Col, Cube, Mat};
    use num_complex::Complex64;
    use std::borrow::Cow;

    #[test]
    fn test_transpose_values() {
        let a = Mat::from_fn(2, 3, |r, c| (10 * r + c) as f64);
        let t = Trans::new(&a);
        assert_eq!(t.shape(), Shape::mat(3, 2));
        let mut out = Mat::new();
        out.assign(t).unwrap();
        assert_eq!(out[(2, 1)], 12.0);
        assert_eq!(out.as_slice(), &[0.0, 1.0, 2.0, 10.0, 11.0, 12.0]);
    }

    #[test]
    fn test_complex_transpose_conjugates() {
        let a = Mat::from_fn(2, 2, |r, c| Complex64::new(r as f64, c as f64));
        let t = Trans::new(&a);
        assert_eq!(t.at(1, 0, 0), Complex64::new(0.0, -1.0));
        assert!(!<Trans<&Mat<Complex64>> as Proxy>::FAST_UNWRAP);
    }

    #[test]
    fn test_real_vector_transpose_borrows() {
        let v = Col::from_vec(vec![1.0f64, 2.0, 3.0]);
        let t = Trans::new(EOp::<_, Scale>::new(&v, 2.0));
        assert!(<Trans<EOp<&Col<f64>, Scale>> as Proxy>::IS_ROW);
        let pu = t.partial_unwrap().unwrap();
        assert!(matches!(pu.mem, Cow::Borrowed(_)));
        assert_eq!(pu.factor(), 2.0);

        let plain = Trans::new(&v);
        assert!(plain.as_slice().is_some());
    }

    #[test]
    fn test_cube_rejected() {
        let q = Cube::<f64>::zeros(2, 2, 2);
        let err = Trans::new(&q).validate().unwrap_err();
        assert!(err.is_conformance());
    }
}
