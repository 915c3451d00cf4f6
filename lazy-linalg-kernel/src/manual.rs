//! Hand-written kernels used when no external backend applies.
//!
//! Real inner products alternate between two accumulators (even and odd
//! indices) so consecutive multiply-adds do not serialize on one register.
//! Complex inner products keep separate accumulators for the real and
//! imaginary parts and expand the complex multiply by hand, which is both
//! faster and more accurate than accumulating full complex products.

use lazy_linalg_traits::Element;
use num_traits::{Float, Zero};

/// `sum(a[i] * b[i])` over two equal-length slices.
pub fn dot_unrolled<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    dot_indexed(a.len(), |i| a[i], |i| b[i])
}

/// `sum(conj(a[i]) * b[i])`. The first operand is conjugated.
pub fn cdot_unrolled<T: Element>(a: &[T], b: &[T]) -> T {
    debug_assert_eq!(a.len(), b.len());
    cdot_indexed(a.len(), |i| a[i], |i| b[i])
}

/// Inner product over two linear element accessors.
///
/// This is the kernel behind every dot product whose operands cannot expose
/// contiguous memory; slices reuse it through [`dot_unrolled`].
#[inline]
pub fn dot_indexed<T, A, B>(n: usize, a: A, b: B) -> T
where
    T: Element,
    A: Fn(usize) -> T,
    B: Fn(usize) -> T,
{
    if T::IS_COMPLEX {
        let mut val_re = <T::Real as Zero>::zero();
        let mut val_im = <T::Real as Zero>::zero();
        for i in 0..n {
            let (x, y) = (a(i), b(i));
            let (ax, ay) = (x.real(), x.imag());
            let (bx, by) = (y.real(), y.imag());
            val_re = val_re + (ax * bx - ay * by);
            val_im = val_im + (ax * by + ay * bx);
        }
        return T::from_parts(val_re, val_im);
    }

    let mut acc1 = T::zero();
    let mut acc2 = T::zero();
    let mut i = 0;
    let mut j = 1;
    while j < n {
        acc1 = acc1.wrapping_add(a(i).wrapping_mul(b(i)));
        acc2 = acc2.wrapping_add(a(j).wrapping_mul(b(j)));
        i += 2;
        j += 2;
    }
    if i < n {
        acc1 = acc1.wrapping_add(a(i).wrapping_mul(b(i)));
    }
    acc1.wrapping_add(acc2)
}

/// Conjugated inner product over two linear element accessors.
#[inline]
pub fn cdot_indexed<T, A, B>(n: usize, a: A, b: B) -> T
where
    T: Element,
    A: Fn(usize) -> T,
    B: Fn(usize) -> T,
{
    if !T::IS_COMPLEX {
        return dot_indexed(n, a, b);
    }

    let mut val_re = <T::Real as Zero>::zero();
    let mut val_im = <T::Real as Zero>::zero();
    for i in 0..n {
        let (x, y) = (a(i), b(i));
        let (ax, ay) = (x.real(), x.imag());
        let (bx, by) = (y.real(), y.imag());
        val_re = val_re + (ax * bx + ay * by);
        val_im = val_im + (ax * by - ay * bx);
    }
    T::from_parts(val_re, val_im)
}

/// `sum(a[i] * b[i] * c[i])` over three equal-length slices.
pub fn dot3<T: Element>(a: &[T], b: &[T], c: &[T]) -> T {
    debug_assert!(a.len() == b.len() && b.len() == c.len());
    let n = a.len();
    let mut acc1 = T::zero();
    let mut acc2 = T::zero();
    let mut i = 0;
    let mut j = 1;
    let term = |k: usize| a[k].wrapping_mul(b[k]).wrapping_mul(c[k]);
    while j < n {
        acc1 = acc1.wrapping_add(term(i));
        acc2 = acc2.wrapping_add(term(j));
        i += 2;
        j += 2;
    }
    if i < n {
        acc1 = acc1.wrapping_add(term(i));
    }
    acc1.wrapping_add(acc2)
}

/// Euclidean norm of a slice.
///
/// The direct sum of squares is tried first. If it overflowed or underflowed
/// the computation is repeated on values scaled by the largest magnitude.
pub fn norm2<T>(a: &[T]) -> T::Real
where
    T: Element,
    T::Real: Float,
{
    let zero = <T::Real as Zero>::zero();
    let sum = a.iter().fold(zero, |acc, &x| acc + x.norm_sqr());
    let direct = sum.sqrt();
    if Float::is_finite(direct) && direct > T::Real::min_positive_value() {
        return direct;
    }

    let max_abs = a.iter().fold(zero, |acc, &x| acc.max(x.abs()));
    if max_abs == zero || !Float::is_finite(max_abs) {
        return if max_abs == zero { zero } else { max_abs };
    }
    let scaled = a.iter().fold(zero, |acc, &x| {
        let r = x.abs() / max_abs;
        acc + r * r
    });
    max_abs * scaled.sqrt()
}

/// Column-major `C = A * B` with `A: m x k`, `B: k x n`, `C: m x n`.
pub fn gemm_naive<T: Element>(m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]) {
    debug_assert_eq!(a.len(), m * k);
    debug_assert_eq!(b.len(), k * n);
    debug_assert_eq!(c.len(), m * n);
    c.fill(T::zero());
    for j in 0..n {
        let c_col = &mut c[j * m..(j + 1) * m];
        for p in 0..k {
            let bpj = b[p + j * k];
            let a_col = &a[p * m..(p + 1) * m];
            for (ci, &ai) in c_col.iter_mut().zip(a_col) {
                *ci = ci.wrapping_add(ai.wrapping_mul(bpj));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use num_complex::Complex64;

    #[test]
    fn test_dot_odd_and_even_lengths() {
        let a = [1.0, 2.0, 3.0, 4.0, 5.0];
        let b = [5.0, 4.0, 3.0, 2.0, 1.0];
        assert_eq!(dot_unrolled(&a, &b), 35.0);
        assert_eq!(dot_unrolled(&a[..4], &b[..4]), 30.0);
        assert_eq!(dot_unrolled::<f64>(&[], &[]), 0.0);
    }

    #[test]
    fn test_dot_integers() {
        let a = [1i64, -2, 3];
        let b = [4i64, 5, 6];
        assert_eq!(dot_unrolled(&a, &b), 12);
    }

    #[test]
    fn test_integer_overflow_wraps() {
        let a = [i32::MAX, 2];
        let b = [2i32, 2];
        assert_eq!(dot_unrolled(&a, &b), i32::MAX.wrapping_mul(2).wrapping_add(4));
        assert_eq!(dot3(&[u32::MAX], &[2], &[1]), u32::MAX - 1);
    }

    #[test]
    fn test_complex_dot_and_cdot() {
        let a = [Complex64::new(1.0, 2.0), Complex64::new(3.0, -1.0)];
        let b = [Complex64::new(0.5, 1.0), Complex64::new(-2.0, 4.0)];
        let plain: Complex64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let conj: Complex64 = a.iter().zip(&b).map(|(x, y)| x.conj() * y).sum();
        let d = dot_unrolled(&a, &b);
        let c = cdot_unrolled(&a, &b);
        assert_relative_eq!(d.re, plain.re, epsilon = 1e-12);
        assert_relative_eq!(d.im, plain.im, epsilon = 1e-12);
        assert_relative_eq!(c.re, conj.re, epsilon = 1e-12);
        assert_relative_eq!(c.im, conj.im, epsilon = 1e-12);
    }

    #[test]
    fn test_cdot_real_equals_dot() {
        let a = [1.0f32, -2.0, 0.5];
        let b = [3.0f32, 1.0, 4.0];
        assert_eq!(cdot_unrolled(&a, &b), dot_unrolled(&a, &b));
    }

    #[test]
    fn test_dot3() {
        let a = [1.0, 2.0, 3.0];
        let b = [2.0, 2.0, 2.0];
        let c = [1.0, 0.0, -1.0];
        assert_eq!(dot3(&a, &b, &c), -4.0);
    }

    #[test]
    fn test_norm2_plain_and_extreme() {
        assert_relative_eq!(norm2(&[3.0f64, 4.0]), 5.0);
        assert_relative_eq!(norm2(&[1e200f64, 1e200]), 2f64.sqrt() * 1e200, max_relative = 1e-12);
        assert_relative_eq!(norm2(&[3e-200f64, 4e-200]), 5e-200, max_relative = 1e-12);
        assert_eq!(norm2::<f64>(&[0.0, 0.0]), 0.0);
        assert_relative_eq!(norm2(&[Complex64::new(3.0, 4.0)]), 5.0);
    }

    #[test]
    fn test_gemm_naive() {
        // A = [1 3; 2 4], B = [5 7; 6 8] (column-major)
        let a = [1.0, 2.0, 3.0, 4.0];
        let b = [5.0, 6.0, 7.0, 8.0];
        let mut c = [f64::NAN; 4];
        gemm_naive(2, 2, 2, &a, &b, &mut c);
        assert_eq!(c, [23.0, 34.0, 31.0, 46.0]);
    }
}
