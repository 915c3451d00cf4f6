//! Reductions and matrix classifiers that consume expressions eagerly.

mod dot;
mod inv;
pub(crate) mod misc;
mod sym;

pub use dot::{cdot, dot, dot3, dot_mixed, norm_dot};
pub use inv::inv_diag;
pub use sym::{check_diag_imag, guess_sympd, guess_sympd_min, is_approx_sym, is_approx_sym_min};
