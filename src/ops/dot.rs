//! Inner products over arbitrary operands.
//!
//! `dot` picks the cheapest way to reach memory for each operand pair:
//!
//! ```text
//!   operands                                   | path
//! ---------------------------------------------|---------------------------------
//!   single-row subviews of single-row parents  | kernel dot on the parent rows
//!   a subview and an equally shaped operand    | per-column kernel dots, summed
//!   real vectors with free partial unwrap      | kernel dot on inner memory * k
//!   direct memory, or At / Materialize modes   | quasi-unwrap, kernel dot
//!   anything else                              | manual loop over get(i)
//! ```
//!
//! The kernel dot then routes on length and element type (see
//! [`lazy_linalg_kernel::dispatch`]).

use crate::proxy::{quasi_unwrap, AccessMode, Accessor, Proxy};
use crate::subview::Subview;
use crate::{LinalgError, Result};
use lazy_linalg_kernel::{manual, norm2, KernelElement};
use lazy_linalg_traits::{Element, Promote};
use num_traits::{Float, Zero};
use std::borrow::Cow;

fn check_counts<A: Proxy, B: Proxy>(op: &'static str, a: &A, b: &B) -> Result<usize> {
    a.validate()?;
    b.validate()?;
    let (na, nb) = (a.n_elem(), b.n_elem());
    if na != nb {
        return Err(LinalgError::ElemCountMismatch {
            op,
            left: na,
            right: nb,
        });
    }
    Ok(na)
}

/// Columns of one operand in a per-column dot.
enum Columns<'a, T: Clone> {
    View(Subview<'a, T>),
    Mem(Cow<'a, [T]>, usize),
}

impl<'a, T: Element> Columns<'a, T> {
    fn of<P: Proxy<Elem = T>>(p: &'a P) -> Result<Self> {
        match p.as_subview() {
            Some(sv) => Ok(Columns::View(sv)),
            None => Ok(Columns::Mem(quasi_unwrap(p)?, p.n_rows())),
        }
    }

    fn col(&self, c: usize) -> &[T] {
        match self {
            Columns::View(sv) => sv.col(c),
            Columns::Mem(m, n) => &m[c * n..(c + 1) * n],
        }
    }
}

fn is_row_of_row<T: Element>(sv: &Subview<'_, T>) -> bool {
    sv.n_rows() == 1 && sv.parent_shape().n_rows == 1
}

/// `sum(a[i] * b[i])` over the elements of `a` and `b` in column-major
/// order. Shapes may differ; element counts may not.
pub fn dot<A, B>(a: A, b: B) -> Result<A::Elem>
where
    A: Proxy,
    A::Elem: KernelElement,
    B: Proxy<Elem = A::Elem>,
{
    let n = check_counts("dot()", &a, &b)?;

    if let (Some(sa), Some(sb)) = (a.as_subview(), b.as_subview()) {
        if is_row_of_row(&sa) && is_row_of_row(&sb) {
            if let (Some(x), Some(y)) = (sa.as_contiguous(), sb.as_contiguous()) {
                log::trace!("dot: {n} elements, contiguous row subviews");
                return Ok(lazy_linalg_kernel::dot(x, y));
            }
        }
    }

    if (a.as_subview().is_some() || b.as_subview().is_some()) && a.shape() == b.shape() {
        log::trace!("dot: {} per column", a.shape());
        let ca = Columns::of(&a)?;
        let cb = Columns::of(&b)?;
        let total = (0..a.n_cols()).fold(A::Elem::zero(), |acc, c| {
            acc + lazy_linalg_kernel::dot(ca.col(c), cb.col(c))
        });
        return Ok(total);
    }

    if !<A::Elem as Element>::IS_COMPLEX
        && A::FAST_UNWRAP
        && B::FAST_UNWRAP
        && a.shape().is_vector()
        && b.shape().is_vector()
    {
        let pa = a.partial_unwrap()?;
        let pb = b.partial_unwrap()?;
        log::trace!("dot: {n} elements after partial unwrap");
        let val = lazy_linalg_kernel::dot(&pa.mem, &pb.mem);
        return Ok(pb.apply(pa.apply(val)));
    }

    let direct = matches!((A::MODE, B::MODE), (AccessMode::Direct, AccessMode::Direct));
    if direct || A::MODE.prefers_at() || B::MODE.prefers_at() {
        let ma = quasi_unwrap(&a)?;
        let mb = quasi_unwrap(&b)?;
        return Ok(lazy_linalg_kernel::dot(&ma, &mb));
    }

    log::trace!("dot: {n} elements through linear access");
    Ok(manual::dot_indexed(n, |i| a.get(i), |i| b.get(i)))
}

/// `sum(conj(a[i]) * b[i])`. The same as [`dot`] for real element types.
pub fn cdot<A, B>(a: A, b: B) -> Result<A::Elem>
where
    A: Proxy,
    A::Elem: KernelElement,
    B: Proxy<Elem = A::Elem>,
{
    if !<A::Elem as Element>::IS_COMPLEX {
        return dot(a, b);
    }
    check_counts("cdot()", &a, &b)?;
    let ma = quasi_unwrap(&a)?;
    let mb = quasi_unwrap(&b)?;
    Ok(lazy_linalg_kernel::cdot(&ma, &mb))
}

/// Dot product of operands with different element types, accumulated in
/// their common type. Always computed by the manual kernel.
pub fn dot_mixed<A, B>(a: A, b: B) -> Result<<A::Elem as Promote<B::Elem>>::Output>
where
    A: Proxy,
    B: Proxy,
    A::Elem: Promote<B::Elem>,
{
    let n = check_counts("dot()", &a, &b)?;
    let ea = Accessor::new(&a)?;
    let eb = Accessor::new(&b)?;
    Ok(manual::dot_indexed(
        n,
        |i| ea.get(i).promote(),
        |i| <A::Elem as Promote<B::Elem>>::promote_rhs(eb.get(i)),
    ))
}

/// `dot(a, b) / (|a| * |b|)`, or zero when either norm is zero.
pub fn norm_dot<A, B>(a: A, b: B) -> Result<A::Elem>
where
    A: Proxy,
    A::Elem: KernelElement,
    <A::Elem as Element>::Real: Float,
    B: Proxy<Elem = A::Elem>,
{
    check_counts("norm_dot()", &a, &b)?;
    let ma = quasi_unwrap(&a)?;
    let mb = quasi_unwrap(&b)?;
    let denom = norm2(&ma) * norm2(&mb);
    if denom == <<A::Elem as Element>::Real as Zero>::zero() {
        return Ok(A::Elem::zero());
    }
    let num = lazy_linalg_kernel::dot(&ma, &mb);
    Ok(num / A::Elem::from_real(denom))
}

/// `sum(a[i] * b[i] * c[i])`.
pub fn dot3<A, B, C>(a: A, b: B, c: C) -> Result<A::Elem>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
    C: Proxy<Elem = A::Elem>,
{
    check_counts("dot3()", &a, &b)?;
    check_counts("dot3()", &a, &c)?;
    let ma = quasi_unwrap(&a)?;
    let mb = quasi_unwrap(&b)?;
    let mc = quasi_unwrap(&c)?;
    Ok(lazy_linalg_kernel::dot3(&ma, &mb, &mc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{trans, Col, ExprExt, Mat, Rect, Row};
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    fn naive(a: &[f64], b: &[f64]) -> f64 {
        a.iter().zip(b).map(|(x, y)| x * y).sum()
    }

    #[test]
    fn test_count_mismatch_names_both_counts() {
        let a = Mat::<f64>::zeros(2, 3);
        let b = Mat::<f64>::zeros(5, 1);
        let err = dot(&a, &b).unwrap_err();
        assert!(matches!(
            err,
            LinalgError::ElemCountMismatch {
                op: "dot()",
                left: 6,
                right: 5
            }
        ));
        assert!(err.to_string().contains("6 vs 5"));
    }

    #[test]
    fn test_shapes_may_differ() {
        let a = Mat::from_fn(2, 3, |r, c| (r + c) as f64);
        let b = Mat::from_fn(3, 2, |r, c| (r * c) as f64);
        assert_eq!(dot(&a, &b).unwrap(), naive(a.as_slice(), b.as_slice()));
    }

    #[test]
    fn test_row_subviews_of_row_parents() {
        let r1 = Row::from_fn(10, |i| i as f64);
        let r2 = Row::from_fn(10, |i| 1.0 + i as f64);
        let m1 = Mat::from_col_major(1, 10, r1.as_slice().to_vec()).unwrap();
        let m2 = Mat::from_col_major(1, 10, r2.as_slice().to_vec()).unwrap();
        let s1 = m1.submat(Rect::new(0, 2, 1, 5)).unwrap();
        let s2 = m2.submat(Rect::new(0, 4, 1, 5)).unwrap();
        let v = dot(s1, s2).unwrap();
        assert_eq!(v, naive(&r1.as_slice()[2..7], &r2.as_slice()[4..9]));
    }

    #[test]
    fn test_subview_per_column() {
        let m = Mat::from_fn(6, 6, |r, c| (r as f64) - 0.5 * (c as f64));
        let sv = m.submat(Rect::new(1, 2, 3, 4)).unwrap();
        let other = Mat::from_fn(3, 4, |r, c| (r + 2 * c) as f64);
        let mut expected = 0.0;
        for c in 0..4 {
            for r in 0..3 {
                expected += sv.at(r, c) * other[(r, c)];
            }
        }
        assert_relative_eq!(dot(sv, &other).unwrap(), expected);
        assert_relative_eq!(dot(&other, sv).unwrap(), expected);
    }

    #[test]
    fn test_scaled_and_transposed_vectors() {
        let x = Col::from_fn(50, |i| (i as f64).sin());
        let y = Col::from_fn(50, |i| (i as f64).cos());
        let base = naive(x.as_slice(), y.as_slice());
        assert_relative_eq!(
            dot(x.scaled(2.0), trans(y.scaled(3.0))).unwrap(),
            6.0 * base,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_linear_access_path() {
        let a = Mat::from_fn(5, 5, |r, c| (r * 5 + c) as i64);
        let b = Mat::from_fn(5, 5, |_, _| 2i64);
        let got = dot(a.plus(&b), &b).unwrap();
        let want: i64 = a.as_slice().iter().map(|x| (x + 2) * 2).sum();
        assert_eq!(got, want);
    }

    #[test]
    fn test_product_operand_is_materialized_once() {
        let a = Mat::from_fn(3, 3, |r, c| (r + c) as f64);
        let i3 = Mat::<f64>::eye(3);
        let v = dot(a.matmul(&i3), &a).unwrap();
        assert_relative_eq!(v, naive(a.as_slice(), a.as_slice()));
    }

    #[test]
    fn test_cdot_conjugates_first() {
        let a = Col::from_vec(vec![Complex64::new(1.0, 2.0), Complex64::new(0.0, -1.0)]);
        let b = Col::from_vec(vec![Complex64::new(3.0, 0.0), Complex64::new(2.0, 2.0)]);
        // conj(1+2i)*3 + conj(-i)*(2+2i) = (3-6i) + (i)(2+2i) = 1 - 4i
        assert_eq!(cdot(&a, &b).unwrap(), Complex64::new(1.0, -4.0));
        // (1+2i)*3 + (-i)(2+2i) = 3+6i + 2-2i = 5+4i
        assert_eq!(dot(&a, &b).unwrap(), Complex64::new(5.0, 4.0));
    }

    #[test]
    fn test_dot_mixed_promotes() {
        let a = Col::from_vec(vec![1i32, 2, 3]);
        let b = Col::from_vec(vec![0.5f64, 0.25, 1.0]);
        let v: f64 = dot_mixed(&a, &b).unwrap();
        assert_eq!(v, 4.0);
        let z = Col::from_vec(vec![Complex64::new(0.0, 1.0); 3]);
        let w = dot_mixed(&b, &z).unwrap();
        assert_eq!(w, Complex64::new(0.0, 1.75));
    }

    #[test]
    fn test_norm_dot() {
        let a = Col::from_vec(vec![3.0f64, 4.0]);
        let b = Col::from_vec(vec![6.0f64, 8.0]);
        assert_relative_eq!(norm_dot(&a, &b).unwrap(), 1.0);
        let zero = Col::<f64>::zeros(2);
        assert_eq!(norm_dot(&a, &zero).unwrap(), 0.0);
        let z = Col::<Complex64>::zeros(2);
        assert_eq!(norm_dot(&z, &z).unwrap(), Complex64::zero());
    }

    #[test]
    fn test_dot3() {
        let a = Col::from_vec(vec![1.0f64, 2.0, 3.0]);
        let b = Col::from_vec(vec![2.0f64, 2.0, 2.0]);
        assert_eq!(dot3(&a, &b, &a).unwrap(), 28.0);
        let short = Col::from_vec(vec![1.0f64]);
        assert!(dot3(&a, &b, &short).unwrap_err().is_conformance());
    }
}
