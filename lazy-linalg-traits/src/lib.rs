//! Element traits shared across the lazy-linalg crates.
//!
//! This crate defines what an element of a dense container is allowed to be
//! (`Element`), how its category is reported to the kernel dispatcher
//! (`ElemKind`), and how two element types combine in a mixed-type reduction
//! (`Promote`).
//!
//! It has no knowledge of containers or expressions, so both the kernel crate
//! and the expression crate can depend on it without cycles.

pub mod promote;
pub mod scalar;

pub use promote::{Promote, Upgrade};
pub use scalar::{ElemKind, Element, RealElement};
