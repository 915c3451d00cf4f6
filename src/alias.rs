//! Alias-safe assignment of an expression to a destination container.

use crate::proxy::Proxy;
use crate::storage::{Shape, Storage};
use crate::{LinalgError, Result};
use lazy_linalg_traits::Element;

/// Evaluation target used when the destination overlaps an operand.
struct Scratch<T> {
    data: Vec<T>,
    shape: Shape,
}

impl<T: Element> Scratch<T> {
    fn new() -> Self {
        Self {
            data: Vec::new(),
            shape: Shape::default(),
        }
    }
}

impl<T: Element> Storage<T> for Scratch<T> {
    fn shape(&self) -> Shape {
        self.shape
    }

    fn as_slice(&self) -> &[T] {
        &self.data
    }

    fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    fn set_size(&mut self, shape: Shape) -> Result<()> {
        self.data.resize(shape.n_elem(), T::zero());
        self.shape = shape;
        Ok(())
    }
}

/// Evaluate `expr` into `dest`.
///
/// The expression is validated first, so a conformance error leaves `dest`
/// untouched. When `dest`'s buffer overlaps any buffer the expression reads,
/// the expression is evaluated into a temporary that is then handed to
/// `dest`; otherwise it is evaluated in place.
pub fn assign<E, D>(dest: &mut D, expr: &E) -> Result<()>
where
    E: Proxy + ?Sized,
    D: Storage<E::Elem> + ?Sized,
{
    expr.validate()?;
    if expr.is_alias(dest.buffer_id()) {
        log::debug!(
            "assign: destination overlaps an operand; evaluating {} through a temporary",
            expr.shape()
        );
        let mut tmp = Scratch::new();
        expr.eval_into(&mut tmp)?;
        let Scratch { data, shape } = tmp;
        return dest.take_buffer(shape, data);
    }
    expr.eval_into(dest)
}

/// Error unless `dest` can take `shape` without a reallocation of its extents.
pub(crate) fn check_fixed(current: Shape, shape: Shape, op: &'static str) -> Result<()> {
    if current == shape {
        Ok(())
    } else {
        Err(LinalgError::FixedSize {
            op,
            from: current,
            to: shape,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abs, trans, Mat, MatMut, MatRef};

    #[test]
    fn test_assign_in_place_when_disjoint() {
        let a = Mat::from_fn(3, 3, |r, c| r as f64 - c as f64);
        let mut b = Mat::zeros(1, 1);
        assign(&mut b, &abs(&a)).unwrap();
        assert_eq!(b.shape(), Shape::mat(3, 3));
        assert_eq!(b[(0, 2)], 2.0);
    }

    #[test]
    fn test_self_abs_through_raw_wraps() {
        let mut a = Mat::from_fn(4, 3, |r, c| (r as f64) - 2.0 * (c as f64));
        let mut expected = Mat::new();
        expected.assign(abs(&a)).unwrap();

        let (p, nr, nc) = (a.as_mut_ptr(), a.n_rows(), a.n_cols());
        let src = unsafe { MatRef::from_raw_parts(p as *const f64, nr, nc) };
        let mut dst = unsafe { MatMut::from_raw_parts(p, nr, nc) };
        assert!(abs(src).is_alias(Storage::buffer_id(&dst)));
        dst.assign(abs(src)).unwrap();
        assert_eq!(a, expected);
    }

    #[test]
    fn test_self_transpose_through_raw_wraps() {
        let mut a = Mat::from_fn(3, 3, |r, c| (3 * r + c) as f64);
        let expected = Mat::from_fn(3, 3, |r, c| (3 * c + r) as f64);

        let p = a.as_mut_ptr();
        let src = unsafe { MatRef::from_raw_parts(p as *const f64, 3, 3) };
        let mut dst = unsafe { MatMut::from_raw_parts(p, 3, 3) };
        dst.assign(trans(src)).unwrap();
        assert_eq!(a, expected);
    }

    #[test]
    fn test_conformance_error_leaves_destination() {
        let a = Mat::from_fn(2, 3, |r, c| (r + c) as f64);
        let mut buf = vec![9.0; 4];
        let mut dst = MatMut::from_slice(&mut buf, 2, 2).unwrap();
        let err = dst.assign(&a).unwrap_err();
        assert!(matches!(err, LinalgError::FixedSize { .. }));
        assert_eq!(buf, vec![9.0; 4]);
    }

    #[test]
    fn test_check_fixed() {
        assert!(check_fixed(Shape::mat(2, 2), Shape::mat(2, 2), "x").is_ok());
        assert!(check_fixed(Shape::mat(2, 2), Shape::mat(4, 1), "x").is_err());
    }
}
