//! CBLAS bindings for [`BlasBackend`].
//!
//! Slices are reinterpreted as the concrete BLAS type only after the element
//! type has been identified, so the casts in here never change meaning.

use crate::backend::{BlasBackend, NumericBackend};
use crate::{KernelError, Result};
use cblas::{Layout, Transpose};
use lazy_linalg_traits::{ElemKind, Element};
use num_complex::{Complex32, Complex64};
use std::any::TypeId;

fn blas_int(n: usize) -> Result<i32> {
    i32::try_from(n).map_err(|_| KernelError::DimensionOverflow(n))
}

#[inline]
fn is<T: 'static, U: 'static>() -> bool {
    TypeId::of::<T>() == TypeId::of::<U>()
}

#[inline]
fn as_blas<T: Element, U: Element>(s: &[T]) -> &[U] {
    debug_assert!(is::<T, U>());
    bytemuck::cast_slice(s)
}

#[inline]
fn as_blas_mut<T: Element, U: Element>(s: &mut [T]) -> &mut [U] {
    debug_assert!(is::<T, U>());
    bytemuck::cast_slice_mut(s)
}

#[inline]
fn from_blas<U: Element, T: Element>(v: U) -> T {
    bytemuck::cast(v)
}

fn unsupported<T: Element>(op: &'static str) -> KernelError {
    KernelError::TypeSupport {
        backend: BlasBackend::NAME,
        op,
        ty: T::KIND.name(),
    }
}

impl NumericBackend for BlasBackend {
    const NAME: &'static str = "cblas";

    fn is_available(&self) -> bool {
        true
    }

    fn dot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T> {
        let n = blas_int(a.len())?;
        // SAFETY: both slices hold `n` elements of the type the routine expects.
        unsafe {
            match T::KIND {
                ElemKind::F64 if is::<T, f64>() => {
                    Ok(from_blas(cblas::ddot(n, as_blas::<T, f64>(a), 1, as_blas(b), 1)))
                }
                ElemKind::F32 if is::<T, f32>() => {
                    Ok(from_blas(cblas::sdot(n, as_blas::<T, f32>(a), 1, as_blas(b), 1)))
                }
                ElemKind::C64 if is::<T, Complex64>() => {
                    let mut out = [Complex64::new(0.0, 0.0)];
                    cblas::zdotu_sub(n, as_blas::<T, Complex64>(a), 1, as_blas(b), 1, &mut out);
                    Ok(from_blas(out[0]))
                }
                ElemKind::C32 if is::<T, Complex32>() => {
                    let mut out = [Complex32::new(0.0, 0.0)];
                    cblas::cdotu_sub(n, as_blas::<T, Complex32>(a), 1, as_blas(b), 1, &mut out);
                    Ok(from_blas(out[0]))
                }
                _ => Err(unsupported::<T>("dot")),
            }
        }
    }

    /// Conjugated inner product as a one-column `gemv('C')`: the first
    /// operand is viewed as an `n x 1` matrix whose conjugate transpose is
    /// applied to the second operand.
    fn cdot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T> {
        if !T::IS_COMPLEX {
            return self.dot(a, b);
        }
        let n = blas_int(a.len())?;
        // SAFETY: `a` is n x 1 with lda = n, `b` has n elements, `y` has 1.
        unsafe {
            match T::KIND {
                ElemKind::C64 if is::<T, Complex64>() => {
                    let (one, zero) = (Complex64::new(1.0, 0.0), Complex64::new(0.0, 0.0));
                    let mut y = [zero];
                    cblas::zgemv(
                        Layout::ColumnMajor,
                        Transpose::Conjugate,
                        n,
                        1,
                        one,
                        as_blas::<T, Complex64>(a),
                        n.max(1),
                        as_blas(b),
                        1,
                        zero,
                        &mut y,
                        1,
                    );
                    Ok(from_blas(y[0]))
                }
                ElemKind::C32 if is::<T, Complex32>() => {
                    let (one, zero) = (Complex32::new(1.0, 0.0), Complex32::new(0.0, 0.0));
                    let mut y = [zero];
                    cblas::cgemv(
                        Layout::ColumnMajor,
                        Transpose::Conjugate,
                        n,
                        1,
                        one,
                        as_blas::<T, Complex32>(a),
                        n.max(1),
                        as_blas(b),
                        1,
                        zero,
                        &mut y,
                        1,
                    );
                    Ok(from_blas(y[0]))
                }
                _ => Err(unsupported::<T>("cdot")),
            }
        }
    }

    fn gemm<T: Element>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &[T],
        c: &mut [T],
    ) -> Result<()> {
        let (mi, ni, ki) = (blas_int(m)?, blas_int(n)?, blas_int(k)?);
        let (lda, ldb, ldc) = (mi.max(1), ki.max(1), mi.max(1));
        let (nn, cm) = (Transpose::None, Layout::ColumnMajor);

        // SAFETY: column-major operands with the leading dimensions above.
        unsafe {
            match T::KIND {
                ElemKind::F64 if is::<T, f64>() => cblas::dgemm(
                    cm,
                    nn,
                    nn,
                    mi,
                    ni,
                    ki,
                    1.0,
                    as_blas::<T, f64>(a),
                    lda,
                    as_blas(b),
                    ldb,
                    0.0,
                    as_blas_mut(c),
                    ldc,
                ),
                ElemKind::F32 if is::<T, f32>() => cblas::sgemm(
                    cm,
                    nn,
                    nn,
                    mi,
                    ni,
                    ki,
                    1.0,
                    as_blas::<T, f32>(a),
                    lda,
                    as_blas(b),
                    ldb,
                    0.0,
                    as_blas_mut(c),
                    ldc,
                ),
                ElemKind::C64 if is::<T, Complex64>() => cblas::zgemm(
                    cm,
                    nn,
                    nn,
                    mi,
                    ni,
                    ki,
                    Complex64::new(1.0, 0.0),
                    as_blas::<T, Complex64>(a),
                    lda,
                    as_blas(b),
                    ldb,
                    Complex64::new(0.0, 0.0),
                    as_blas_mut(c),
                    ldc,
                ),
                ElemKind::C32 if is::<T, Complex32>() => cblas::cgemm(
                    cm,
                    nn,
                    nn,
                    mi,
                    ni,
                    ki,
                    Complex32::new(1.0, 0.0),
                    as_blas::<T, Complex32>(a),
                    lda,
                    as_blas(b),
                    ldb,
                    Complex32::new(0.0, 0.0),
                    as_blas_mut(c),
                    ldc,
                ),
                _ => return Err(unsupported::<T>("gemm")),
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_blas_dot_real_and_complex() {
        let a: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let b: Vec<f64> = (0..100).map(|i| 1.0 / (1.0 + i as f64)).collect();
        let expected: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        assert_relative_eq!(BlasBackend.dot(&a, &b).unwrap(), expected, max_relative = 1e-12);

        let z: Vec<Complex64> = (0..40).map(|i| Complex64::new(i as f64, 1.0)).collect();
        let w: Vec<Complex64> = (0..40).map(|i| Complex64::new(1.0, -(i as f64))).collect();
        let expected: Complex64 = z.iter().zip(&w).map(|(x, y)| x.conj() * y).sum();
        let got = BlasBackend.cdot(&z, &w).unwrap();
        assert_relative_eq!(got.re, expected.re, max_relative = 1e-12);
        assert_relative_eq!(got.im, expected.im, max_relative = 1e-12);
    }

    #[test]
    fn test_blas_rejects_integers() {
        let a = [1i64, 2, 3];
        assert!(matches!(
            BlasBackend.dot(&a, &a),
            Err(KernelError::TypeSupport { .. })
        ));
    }

    #[test]
    fn test_blas_gemm_matches_naive() {
        let (m, n, k) = (5, 4, 3);
        let a: Vec<f64> = (0..m * k).map(|i| i as f64 * 0.5).collect();
        let b: Vec<f64> = (0..k * n).map(|i| 2.0 - i as f64).collect();
        let mut c1 = vec![0.0; m * n];
        let mut c2 = vec![0.0; m * n];
        BlasBackend.gemm(m, n, k, &a, &b, &mut c1).unwrap();
        crate::manual::gemm_naive(m, n, k, &a, &b, &mut c2);
        for (x, y) in c1.iter().zip(&c2) {
            assert_relative_eq!(x, y, epsilon = 1e-12);
        }
    }
}
