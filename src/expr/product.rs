//! Matrix product node.

use crate::proxy::{quasi_unwrap, AccessMode, Proxy};
use crate::storage::{BufferId, Shape};
use crate::{LinalgError, Result};
use lazy_linalg_kernel::KernelElement;

/// `a * b`. Evaluated once into a temporary before any element is read.
#[derive(Debug, Clone, Copy)]
pub struct Product<A, B> {
    a: A,
    b: B,
}

impl<A, B> Product<A, B>
where
    A: Proxy,
    A::Elem: KernelElement,
    B: Proxy<Elem = A::Elem>,
{
    pub fn new(a: A, b: B) -> Self {
        Self { a, b }
    }
}

impl<A, B> Proxy for Product<A, B>
where
    A: Proxy,
    A::Elem: KernelElement,
    B: Proxy<Elem = A::Elem>,
{
    type Elem = A::Elem;

    const MODE: AccessMode = AccessMode::Materialize;
    const IS_ROW: bool = A::IS_ROW;
    const IS_COL: bool = B::IS_COL;

    #[inline]
    fn shape(&self) -> Shape {
        Shape::mat(self.a.n_rows(), self.b.n_cols())
    }

    fn at(&self, row: usize, col: usize, _slice: usize) -> A::Elem {
        (0..self.a.n_cols()).fold(<A::Elem as num_traits::Zero>::zero(), |acc, k| {
            acc + self.a.at(row, k, 0) * self.b.at(k, col, 0)
        })
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.a.is_alias(dest) || self.b.is_alias(dest)
    }

    fn validate(&self) -> Result<()> {
        self.a.validate()?;
        self.b.validate()?;
        let (sa, sb) = (self.a.shape(), self.b.shape());
        if sa.n_slices != 1 || sb.n_slices != 1 || sa.n_cols != sb.n_rows {
            return Err(LinalgError::InnerDimMismatch {
                op: "matrix multiplication",
                left: sa,
                right: sb,
            });
        }
        Ok(())
    }

    fn write_to(&self, out: &mut [A::Elem]) -> Result<()> {
        let ma = quasi_unwrap(&self.a)?;
        let mb = quasi_unwrap(&self.b)?;
        let (m, k, n) = (self.a.n_rows(), self.a.n_cols(), self.b.n_cols());
        lazy_linalg_kernel::gemm(m, n, k, &ma, &mb, out);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::expr::Trans;
    use crate::Mat;
    use approx::assert_relative_eq;

    #[test]
    fn test_product_values() {
        let a = Mat::from_fn(2, 3, |r, c| (r + c) as f64);
        let b = Mat::from_fn(3, 2, |r, c| (r * c) as f64 + 1.0);
        let p = Product::new(&a, &b);
        let mut out = Mat::new();
        out.assign(p).unwrap();
        assert_eq!(out.shape(), Shape::mat(2, 2));
        for r in 0..2 {
            for c in 0..2 {
                let expected: f64 = (0..3).map(|k| a[(r, k)] * b[(k, c)]).sum();
                assert_relative_eq!(out[(r, c)], expected);
                assert_relative_eq!(p.at(r, c, 0), expected);
            }
        }
    }

    #[test]
    fn test_gram_matrix_is_symmetric() {
        let a = Mat::from_fn(6, 5, |r, c| ((r * 7 + c * 3) % 5) as f64 - 2.0);
        let mut g = Mat::new();
        g.assign(Product::new(&a, Trans::new(&a))).unwrap();
        for r in 0..6 {
            for c in 0..6 {
                assert_relative_eq!(g[(r, c)], g[(c, r)]);
            }
        }
    }

    #[test]
    fn test_inner_dimension_checked() {
        let a = Mat::<f32>::zeros(2, 3);
        let err = Product::new(&a, &a).validate().unwrap_err();
        assert!(matches!(err, LinalgError::InnerDimMismatch { .. }));
        assert!(err.to_string().contains("2x3 and 2x3"));
    }
}
