//! Element-wise binary node.

use crate::proxy::{AccessMode, Accessor, Proxy};
use crate::storage::{BufferId, Shape};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;
use std::marker::PhantomData;

pub trait GlueKind<T: Element>: Copy + Default + Send + Sync + 'static {
    const NAME: &'static str;

    fn apply(a: T, b: T) -> T;
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Plus;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Minus;

/// Element-wise (Hadamard) product.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Schur;

impl<T: Element> GlueKind<T> for Plus {
    const NAME: &'static str = "addition";

    #[inline(always)]
    fn apply(a: T, b: T) -> T {
        a + b
    }
}

impl<T: Element> GlueKind<T> for Minus {
    const NAME: &'static str = "subtraction";

    #[inline(always)]
    fn apply(a: T, b: T) -> T {
        a - b
    }
}

impl<T: Element> GlueKind<T> for Schur {
    const NAME: &'static str = "element-wise multiplication";

    #[inline(always)]
    fn apply(a: T, b: T) -> T {
        a * b
    }
}

/// `G(a, b)` element by element. Both operands must have the same extents.
#[derive(Debug, Clone, Copy)]
pub struct Glue<A, B, G> {
    a: A,
    b: B,
    _kind: PhantomData<G>,
}

impl<A, B, G> Glue<A, B, G>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
    G: GlueKind<A::Elem>,
{
    pub fn new(a: A, b: B) -> Self {
        Self {
            a,
            b,
            _kind: PhantomData,
        }
    }
}

impl<A, B, G> Proxy for Glue<A, B, G>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
    G: GlueKind<A::Elem>,
{
    type Elem = A::Elem;

    const MODE: AccessMode = A::MODE.combine(B::MODE);
    const IS_ROW: bool = A::IS_ROW || B::IS_ROW;
    const IS_COL: bool = A::IS_COL || B::IS_COL;

    #[inline]
    fn shape(&self) -> Shape {
        self.a.shape()
    }

    #[inline]
    fn at(&self, row: usize, col: usize, slice: usize) -> A::Elem {
        G::apply(self.a.at(row, col, slice), self.b.at(row, col, slice))
    }

    #[inline]
    fn get(&self, i: usize) -> A::Elem {
        G::apply(self.a.get(i), self.b.get(i))
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.a.is_alias(dest) || self.b.is_alias(dest)
    }

    fn validate(&self) -> Result<()> {
        self.a.validate()?;
        self.b.validate()?;
        let (sa, sb) = (self.a.shape(), self.b.shape());
        if sa != sb {
            return Err(LinalgError::SizeMismatch {
                op: G::NAME,
                left: sa,
                right: sb,
            });
        }
        Ok(())
    }

    fn write_to(&self, out: &mut [A::Elem]) -> Result<()> {
        let ea = Accessor::new(&self.a)?;
        let eb = Accessor::new(&self.b)?;
        if ea.prefers_at() || eb.prefers_at() {
            let s = self.a.shape();
            let mut i = 0;
            for sl in 0..s.n_slices {
                for c in 0..s.n_cols {
                    for r in 0..s.n_rows {
                        out[i] = G::apply(ea.at(r, c, sl), eb.at(r, c, sl));
                        i += 1;
                    }
                }
            }
        } else if let (Some(xa), Some(xb)) = (ea.as_slice(), eb.as_slice()) {
            for ((dst, &x), &y) in out.iter_mut().zip(xa).zip(xb) {
                *dst = G::apply(x, y);
            }
        } else {
            for (i, dst) in out.iter_mut().enumerate() {
                *dst = G::apply(ea.get(i), eb.get(i));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Trans;
    use crate::Mat;

    #[test]
    fn test_elementwise_values() {
        let a = Mat::from_fn(2, 2, |r, c| (r + 2 * c) as i64);
        let b = Mat::from_fn(2, 2, |_, _| 3i64);
        let mut out = Mat::new();
        out.assign(Glue::<_, _, Plus>::new(&a, &b)).unwrap();
        assert_eq!(out.as_slice(), &[3, 4, 5, 6]);
        out.assign(Glue::<_, _, Minus>::new(&a, &b)).unwrap();
        assert_eq!(out.as_slice(), &[-3, -2, -1, 0]);
        out.assign(Glue::<_, _, Schur>::new(&a, &b)).unwrap();
        assert_eq!(out.as_slice(), &[0, 3, 6, 9]);
    }

    #[test]
    fn test_mixed_modes() {
        let a = Mat::from_fn(3, 3, |r, c| (3 * r + c) as f64);
        let g = Glue::<_, _, Minus>::new(&a, Trans::new(&a));
        assert_eq!(<Glue<&Mat<f64>, Trans<&Mat<f64>>, Minus> as Proxy>::MODE, AccessMode::At);
        let mut out = Mat::new();
        out.assign(g).unwrap();
        for r in 0..3 {
            for c in 0..3 {
                assert_eq!(out[(r, c)], -out[(c, r)]);
            }
        }
    }

    #[test]
    fn test_shape_mismatch_names_operation() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(3, 2);
        let err = Glue::<_, _, Plus>::new(&a, &b).validate().unwrap_err();
        assert!(err.to_string().starts_with("addition"));
    }
}
