//! Size- and type-based routing between manual kernels and the backend.
//!
//! ```text
//!   op    | element       | n <= threshold | n > threshold
//! --------|---------------|----------------|-----------------------------
//!   dot   | f32 / f64     | manual (32)    | backend, else SIMD/manual
//!   dot   | C32 / C64     | manual (16)    | backend, else manual
//!   dot   | integral      | manual         | manual
//!   cdot  | any float     | manual (32)    | backend gemv('C'), else manual
//!   gemm  | any float     | manual (dim 4) | backend, else manual
//! ```
//!
//! Lengths and dimensions above [`BACKEND_MAX_DIM`] never reach the backend.
//! A backend that still reports [`KernelError::DimensionOverflow`] is served
//! by the SIMD or manual kernel instead. A backend that rejects an element
//! type it was routed is a programming error: the dispatcher logs it and
//! panics.

use crate::backend::{ActiveBackend, NumericBackend};
use crate::config::{config, KernelConfig};
use crate::simd::MaybeSimdOps;
use crate::{manual, KernelError};
use lazy_linalg_traits::Element;

/// Real inner products up to this length use the manual kernel.
pub const DOT_SMALL_REAL: usize = 32;
/// Complex inner products up to this length use the manual kernel.
pub const DOT_SMALL_COMPLEX: usize = 16;
/// Conjugated inner products up to this length use the manual kernel.
pub const CDOT_SMALL: usize = 32;
/// Matrix products whose every dimension is at most this use the manual kernel.
pub const GEMM_SMALL_DIM: usize = 4;
/// Largest length or dimension the backend's 32-bit integer arguments hold.
pub const BACKEND_MAX_DIM: usize = i32::MAX as usize;

/// Element types the dispatcher can route.
pub trait KernelElement: Element + MaybeSimdOps {}

impl<T: Element + MaybeSimdOps> KernelElement for T {}

/// Which kernel served a request. Returned by the `*_with` entry points so
/// callers (and tests) can observe the routing decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KernelPath {
    Manual,
    Simd,
    Backend,
}

#[cold]
#[inline(never)]
fn backend_failure(err: KernelError) -> ! {
    log::error!("numeric backend failed on a routed call: {err}");
    panic!("{err}")
}

#[inline]
fn use_backend<B: NumericBackend>(backend: &B, cfg: &KernelConfig) -> bool {
    cfg.use_backend && backend.is_available()
}

/// `Some(v)` for a backend result, `None` when the manual kernel must take over.
fn backend_result<V>(op: &str, res: crate::Result<V>) -> Option<V> {
    match res {
        Ok(v) => Some(v),
        Err(KernelError::DimensionOverflow(n)) => {
            log::warn!("{op}: dimension {n} out of backend range, using manual kernel");
            None
        }
        Err(e) => backend_failure(e),
    }
}

/// `sum(a[i] * b[i])` with the active backend and the global configuration.
pub fn dot<T: KernelElement>(a: &[T], b: &[T]) -> T {
    dot_with(&ActiveBackend::default(), &config(), a, b).0
}

pub fn dot_with<T, B>(backend: &B, cfg: &KernelConfig, a: &[T], b: &[T]) -> (T, KernelPath)
where
    T: KernelElement,
    B: NumericBackend,
{
    debug_assert_eq!(a.len(), b.len());
    let n = a.len();
    let small = if T::IS_COMPLEX {
        DOT_SMALL_COMPLEX
    } else {
        DOT_SMALL_REAL
    };

    if n <= small || !T::KIND.is_blas() {
        return (manual::dot_unrolled(a, b), KernelPath::Manual);
    }
    if n <= BACKEND_MAX_DIM && use_backend(backend, cfg) {
        log::trace!("dot: n={n} {} via {}", T::KIND.name(), B::NAME);
        if let Some(v) = backend_result("dot", backend.dot(a, b)) {
            return (v, KernelPath::Backend);
        }
    }
    if let Some(v) = T::try_simd_dot(a, b) {
        return (v, KernelPath::Simd);
    }
    (manual::dot_unrolled(a, b), KernelPath::Manual)
}

/// `sum(conj(a[i]) * b[i])` with the active backend and the global configuration.
pub fn cdot<T: KernelElement>(a: &[T], b: &[T]) -> T {
    cdot_with(&ActiveBackend::default(), &config(), a, b).0
}

pub fn cdot_with<T, B>(backend: &B, cfg: &KernelConfig, a: &[T], b: &[T]) -> (T, KernelPath)
where
    T: KernelElement,
    B: NumericBackend,
{
    debug_assert_eq!(a.len(), b.len());
    if !T::IS_COMPLEX {
        return dot_with(backend, cfg, a, b);
    }
    let n = a.len();
    if n > CDOT_SMALL && n <= BACKEND_MAX_DIM && use_backend(backend, cfg) {
        log::trace!("cdot: n={n} {} via {} gemv", T::KIND.name(), B::NAME);
        if let Some(v) = backend_result("cdot", backend.cdot(a, b)) {
            return (v, KernelPath::Backend);
        }
    }
    (manual::cdot_unrolled(a, b), KernelPath::Manual)
}

/// `sum(a[i] * b[i] * c[i])`. Always manual; no backend offers it.
pub fn dot3<T: Element>(a: &[T], b: &[T], c: &[T]) -> T {
    manual::dot3(a, b, c)
}

/// Column-major `C = A * B` with the active backend and the global configuration.
pub fn gemm<T: KernelElement>(m: usize, n: usize, k: usize, a: &[T], b: &[T], c: &mut [T]) {
    gemm_with(&ActiveBackend::default(), &config(), m, n, k, a, b, c);
}

#[allow(clippy::too_many_arguments)]
pub fn gemm_with<T, B>(
    backend: &B,
    cfg: &KernelConfig,
    m: usize,
    n: usize,
    k: usize,
    a: &[T],
    b: &[T],
    c: &mut [T],
) -> KernelPath
where
    T: KernelElement,
    B: NumericBackend,
{
    let tiny = m <= GEMM_SMALL_DIM && n <= GEMM_SMALL_DIM && k <= GEMM_SMALL_DIM;
    let fits = m.max(n).max(k) <= BACKEND_MAX_DIM;
    if !tiny && fits && T::KIND.is_blas() && use_backend(backend, cfg) {
        log::trace!("gemm: {m}x{k} * {k}x{n} {} via {}", T::KIND.name(), B::NAME);
        if backend_result("gemm", backend.gemm(m, n, k, a, b, c)).is_some() {
            return KernelPath::Backend;
        }
    }
    manual::gemm_naive(m, n, k, a, b, c);
    KernelPath::Manual
}
