//! Numeric kernels for lazy-linalg.
//!
//! This crate owns everything that touches raw contiguous memory:
//!
//! - [`manual`]: unrolled inner products, norms and a reference matrix product
//! - [`simd`]: pulp-vectorized inner products (feature `simd`)
//! - [`backend`]: the [`NumericBackend`] strategy and its CBLAS implementation
//!   (feature `blas`)
//! - [`dispatch`]: size/type routing between the above
//! - [`threading`]: rayon-based element-wise fill (feature `parallel`)
//! - [`config`]: process-wide knobs read from the environment
//!
//! Callers pass slices that are already conformance-checked; nothing in here
//! validates shapes.

pub mod backend;
#[cfg(feature = "blas")]
mod blas;
pub mod config;
pub mod dispatch;
pub mod manual;
pub mod maybe_sync;
pub mod simd;
pub mod threading;

#[cfg(feature = "blas")]
pub use backend::BlasBackend;
pub use backend::{ActiveBackend, NaiveBackend, NumericBackend};
pub use config::{config, set_config, KernelConfig, MIN_PAR_LEN};
pub use dispatch::{
    cdot, cdot_with, dot, dot3, dot_with, gemm, gemm_with, KernelElement, KernelPath,
    BACKEND_MAX_DIM, CDOT_SMALL, DOT_SMALL_COMPLEX, DOT_SMALL_REAL, GEMM_SMALL_DIM,
};
pub use manual::norm2;
pub use maybe_sync::{MaybeSend, MaybeSync};
pub use simd::MaybeSimdOps;
pub use threading::fill_indexed;

/// Errors reported by numeric backends.
#[derive(Debug, thiserror::Error)]
pub enum KernelError {
    #[error("{backend} backend does not support element type {ty} in {op}")]
    TypeSupport {
        backend: &'static str,
        op: &'static str,
        ty: &'static str,
    },

    #[error("dimension {0} exceeds the backend integer range")]
    DimensionOverflow(usize),
}

pub type Result<T> = std::result::Result<T, KernelError>;
