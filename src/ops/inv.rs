//! Diagonal inverse.

use crate::mat::Mat;
use crate::proxy::{Accessor, Proxy};
use crate::{LinalgError, Result};
use num_traits::{One, Zero};

/// Inverse of `x` treated as a diagonal matrix.
///
/// A vector operand supplies the diagonal; the result is `n x n` with the
/// reciprocals on its diagonal. A matrix operand must be square and only its
/// diagonal is read. A zero on the diagonal is reported as
/// [`LinalgError::Singular`].
pub fn inv_diag<P: Proxy>(x: P) -> Result<Mat<P::Elem>> {
    let acc = Accessor::new(&x)?;
    let shape = acc.shape();
    if shape.n_slices != 1 {
        return Err(LinalgError::Conformance {
            op: "inv()",
            detail: format!("cannot invert a {shape} object"),
        });
    }

    let n = if shape.is_vector() {
        shape.n_elem()
    } else if shape.is_square() {
        shape.n_rows
    } else {
        return Err(LinalgError::Conformance {
            op: "inv()",
            detail: "given matrix must be square sized".into(),
        });
    };
    let diag = |i: usize| {
        if shape.is_vector() {
            acc.get(i)
        } else {
            acc.at(i, i, 0)
        }
    };

    let mut out = Mat::zeros(n, n);
    for i in 0..n {
        let d = diag(i);
        if d == P::Elem::zero() {
            return Err(LinalgError::Singular { op: "inv()" });
        }
        out[(i, i)] = P::Elem::one() / d;
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Col, ExprExt};
    use num_complex::Complex64;

    #[test]
    fn test_from_vector() {
        let v = Col::from_vec(vec![2.0f64, 4.0, -0.5]);
        let d = inv_diag(&v).unwrap();
        assert_eq!(d.shape().n_rows, 3);
        assert_eq!(d[(0, 0)], 0.5);
        assert_eq!(d[(2, 2)], -2.0);
        assert_eq!(d[(0, 1)], 0.0);
    }

    #[test]
    fn test_from_square_matrix_reads_diagonal() {
        let m = Mat::from_fn(3, 3, |r, c| if r == c { (r + 1) as f64 } else { 9.0 });
        let d = inv_diag(m.t()).unwrap();
        assert_eq!(d[(1, 1)], 0.5);
        assert_eq!(d[(1, 0)], 0.0);

        let z = Mat::from_fn(2, 2, |r, c| Complex64::new((r + c) as f64 + 1.0, 1.0));
        let d = inv_diag(&z).unwrap();
        assert_eq!(d[(0, 0)], Complex64::new(0.5, -0.5));
    }

    #[test]
    fn test_errors() {
        let rect = Mat::<f64>::zeros(2, 3);
        let err = inv_diag(&rect).unwrap_err();
        assert!(err.is_conformance());
        assert!(err.to_string().contains("square sized"));

        let v = Col::from_vec(vec![1.0f64, 0.0]);
        assert!(matches!(
            inv_diag(&v).unwrap_err(),
            LinalgError::Singular { .. }
        ));
    }
}
