//! Lazy expression evaluation for dense column-major linear algebra.
//!
//! Expressions such as `abs(&a)`, `a.t()` or `a.plus(&b).scaled(2.0)` build
//! small typed trees that borrow their operands. Nothing is computed until a
//! tree is assigned to a destination container or consumed by a reduction
//! such as [`dot`].
//!
//! # Core Types
//!
//! - [`Mat`], [`Col`], [`Row`], [`Cube`]: owning column-major containers
//! - [`MatRef`] / [`MatMut`]: no-copy wraps of caller memory
//! - [`Subview`] / [`SubviewMut`]: rectangular windows of one matrix
//! - [`MtOp`], [`EOp`], [`Trans`], [`Glue`], [`Product`]: lazy nodes
//! - [`Proxy`]: the uniform element access contract every operand implements
//!
//! # Evaluation
//!
//! Each operand type reports a static [`AccessMode`]. Contiguous operands are
//! read in place, simple element-wise nodes are read by linear index,
//! transposes by `(row, col)`, and matrix products are materialized once into
//! a temporary. Assignment checks whether the destination overlaps any buffer
//! the expression reads and, if so, evaluates into a temporary first.
//!
//! ```rust
//! use lazy_linalg::{abs, dot, ExprExt, Mat};
//!
//! let a = Mat::from_fn(3, 2, |r, c| r as f64 - c as f64);
//! let mut b = Mat::new();
//! b.assign(abs(&a)).unwrap();
//! assert_eq!(b[(2, 0)], 2.0);
//!
//! let s = dot(&a, a.scaled(2.0)).unwrap();
//! assert_eq!(s, 2.0 * dot(&a, &a).unwrap());
//! ```
//!
//! # Features
//!
//! - `parallel` (default): rayon-parallel element-wise fills for large inputs
//! - `simd`: pulp-vectorized real dot products on the manual path
//! - `blas`: CBLAS backend for large dot products and matrix products

mod alias;
mod cube;
pub mod expr;
mod mat;
pub mod ops;
mod proxy;
mod storage;
mod subview;
mod vector;

pub use alias::assign;
pub use cube::Cube;
pub use expr::{
    abs, add_scalar, arg, imag, matmul, minus, neg, plus, real, replace, scale, schur, trans,
    EOp, ExprExt, Glue, MtOp, MtOpAux, Product, Trans,
};
pub use mat::{Mat, MatMut, MatRef};
pub use ops::{
    check_diag_imag, cdot, dot, dot3, dot_mixed, guess_sympd, guess_sympd_min, inv_diag,
    is_approx_sym, is_approx_sym_min, norm_dot,
};
pub use proxy::{materialize, quasi_unwrap, AccessMode, Accessor, PartialUnwrap, Proxy};
pub use storage::{BufferId, Shape, Storage};
pub use subview::{Rect, Subview, SubviewMut};
pub use vector::{Col, Row};

pub use lazy_linalg_kernel::{config, set_config, KernelConfig, KernelError};
pub use lazy_linalg_traits::{ElemKind, Element, Promote, RealElement};

/// Errors raised while validating or evaluating an expression.
///
/// Every variant is reported before the destination is modified.
#[derive(Debug, thiserror::Error)]
pub enum LinalgError {
    /// Two operands that must have the same number of elements do not.
    #[error("{op}: objects must have the same number of elements: {left} vs {right}")]
    ElemCountMismatch {
        op: &'static str,
        left: usize,
        right: usize,
    },

    /// Element-wise operands with different extents.
    #[error("{op}: incompatible dimensions: {left} and {right}")]
    SizeMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// Matrix product operands whose inner dimensions differ.
    #[error("{op}: incompatible inner dimensions: {left} and {right}")]
    InnerDimMismatch {
        op: &'static str,
        left: Shape,
        right: Shape,
    },

    /// Any other shape requirement that does not hold.
    #[error("{op}: {detail}")]
    Conformance { op: &'static str, detail: String },

    /// A no-copy wrap was asked to change its extents.
    #[error("{op}: memory is fixed size: cannot change {from} to {to}")]
    FixedSize {
        op: &'static str,
        from: Shape,
        to: Shape,
    },

    /// A subview rectangle does not fit in its parent.
    #[error("{op}: index out of bounds: {detail}")]
    OutOfBounds { op: &'static str, detail: String },

    #[error("{op}: matrix is singular")]
    Singular { op: &'static str },

    #[error(transparent)]
    Kernel(#[from] KernelError),
}

impl LinalgError {
    /// Whether this is one of the shape-conformance errors.
    pub fn is_conformance(&self) -> bool {
        matches!(
            self,
            LinalgError::ElemCountMismatch { .. }
                | LinalgError::SizeMismatch { .. }
                | LinalgError::InnerDimMismatch { .. }
                | LinalgError::Conformance { .. }
        )
    }
}

/// Result type for lazy-linalg operations.
pub type Result<T> = std::result::Result<T, LinalgError>;
