//! Numeric backend abstraction.
//!
//! A backend executes the heavy reductions (inner products and matrix
//! products) on contiguous column-major memory. [`NaiveBackend`] is always
//! compiled and runs the manual kernels; [`BlasBackend`] forwards to CBLAS
//! when the `blas` feature is enabled. [`ActiveBackend`] is the single point
//! of backend selection.

use crate::{manual, Result};
use lazy_linalg_traits::Element;

/// A strategy for the operations the dispatcher may hand off.
///
/// All slices are contiguous and already conformance-checked by the caller.
/// A backend that cannot handle `T` returns [`KernelError::TypeSupport`]
/// instead of computing a wrong answer.
///
/// [`KernelError::TypeSupport`]: crate::KernelError::TypeSupport
pub trait NumericBackend {
    /// Short name used in log output.
    const NAME: &'static str;

    /// Whether calling this backend is worthwhile. The dispatcher skips
    /// unavailable backends and runs the manual kernels directly.
    fn is_available(&self) -> bool;

    /// `sum(a[i] * b[i])`.
    fn dot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T>;

    /// `sum(conj(a[i]) * b[i])`.
    fn cdot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T>;

    /// Column-major `C = A * B` with `A: m x k`, `B: k x n`.
    fn gemm<T: Element>(
        &self,
        m: usize,
        n: usize,
        k: usize,
        a: &[T],
        b: &[T],
        c: &mut [T],
    ) -> Result<()>;
}

/// Fallback backend using the manual kernels (no external library).
#[derive(Debug, Clone, Copy, Default)]
pub struct NaiveBackend;

impl NumericBackend for NaiveBackend {
    const NAME: &'static str = "naive";

    fn is_available(&self) -> bool {
        false
    }

    fn dot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T> {
        Ok(manual::dot_unrolled(a, b))
    }

    fn cdot<T: Element>(&self, a: &[T], b: &[T]) -> Result<T> {
        Ok(manual::cdot_unrolled(a, b))
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
        manual::gemm_naive(m, n, k, a, b, c);
        Ok(())
    }
}

/// Backend forwarding to the system CBLAS library.
#[cfg(feature = "blas")]
#[derive(Debug, Clone, Copy, Default)]
pub struct BlasBackend;

/// The backend selected by Cargo features.
///
/// - `blas` -> [`BlasBackend`]
/// - otherwise -> [`NaiveBackend`]
#[cfg(feature = "blas")]
pub type ActiveBackend = BlasBackend;

#[cfg(not(feature = "blas"))]
pub type ActiveBackend = NaiveBackend;
