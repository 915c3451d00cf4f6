//! Cheap structural classifiers for square matrices.
//!
//! These are used to pick a solver route, so they only check necessary
//! conditions. A `true` from [`guess_sympd`] means "worth trying a
//! symmetric positive definite method", not a proof.

use crate::mat::MatRef;
use lazy_linalg_traits::Element;
use num_traits::{Float, NumCast, Zero};

/// `k * epsilon` of the real type.
fn eps_tol<R: Float>(k: f64) -> R {
    <R as NumCast>::from(k).unwrap_or_else(R::one) * R::epsilon()
}

fn square_at_least<T: Element>(a: &MatRef<'_, T>, min_n_rows: usize) -> bool {
    a.n_rows() == a.n_cols() && a.n_rows() >= min_n_rows
}

/// Whether `x` looks symmetric (Hermitian for complex elements) positive
/// definite. Matrices smaller than `4x4` are never classified.
///
/// Checks, with a tolerance of `100 * eps`:
/// - the diagonal is real, finite and positive, and not all near zero
/// - the largest-magnitude element lies on the diagonal
/// - `A_ij` matches `A_ji` (conjugated for complex elements)
/// - `2 * |re(A_ij)| < re(A_ii) + re(A_jj)`
pub fn guess_sympd<'a, T>(x: impl Into<MatRef<'a, T>>) -> bool
where
    T: Element,
    T::Real: Float,
{
    guess_sympd_min(x, 4)
}

/// [`guess_sympd`] with a caller-chosen minimum size.
pub fn guess_sympd_min<'a, T>(x: impl Into<MatRef<'a, T>>, min_n_rows: usize) -> bool
where
    T: Element,
    T::Real: Float,
{
    let a = x.into();
    if !square_at_least(&a, min_n_rows) {
        return false;
    }
    if T::IS_COMPLEX {
        sympd_complex(&a)
    } else {
        sympd_real(&a)
    }
}

fn sympd_real<T>(a: &MatRef<'_, T>) -> bool
where
    T: Element,
    T::Real: Float,
{
    let tol: T::Real = eps_tol(100.0);
    let n = a.n_rows();
    let zero = <T::Real as Zero>::zero();

    let mut diag_below_tol = true;
    let mut max_diag = zero;
    for j in 0..n {
        let d = a.at(j, j).real();
        if d <= zero || !Float::is_finite(d) {
            return false;
        }
        if d >= tol {
            diag_below_tol = false;
        }
        max_diag = max_diag.max(d);
    }
    if diag_below_tol {
        return false;
    }

    for j in 0..n.saturating_sub(1) {
        let a_jj = a.at(j, j).real();
        for i in j + 1..n {
            let a_ij = a.at(i, j).real();
            let a_ji = a.at(j, i).real();
            let ij_abs = Float::abs(a_ij);
            if ij_abs >= max_diag {
                return false;
            }
            let delta = Float::abs(a_ij - a_ji);
            if delta > tol && delta > ij_abs.max(Float::abs(a_ji)) * tol {
                return false;
            }
            let a_ii = a.at(i, i).real();
            if ij_abs + ij_abs >= a_ii + a_jj {
                return false;
            }
        }
    }
    true
}

fn sympd_complex<T>(a: &MatRef<'_, T>) -> bool
where
    T: Element,
    T::Real: Float,
{
    let tol: T::Real = eps_tol(100.0);
    let n = a.n_rows();
    let zero = <T::Real as Zero>::zero();

    let mut diag_below_tol = true;
    let mut max_diag = zero;
    for j in 0..n {
        let d = a.at(j, j);
        let (re, im) = (d.real(), d.imag());
        if re <= zero || !Float::is_finite(re) {
            return false;
        }
        if Float::abs(im) > tol || Float::abs(im) > Float::abs(re) {
            return false;
        }
        if re >= tol {
            diag_below_tol = false;
        }
        max_diag = max_diag.max(re);
    }
    if diag_below_tol {
        return false;
    }
    let square_max_diag = max_diag * max_diag;
    if !Float::is_finite(square_max_diag) {
        return false;
    }

    for j in 0..n.saturating_sub(1) {
        let a_jj = a.at(j, j).real();
        for i in j + 1..n {
            let a_ij = a.at(i, j);
            let a_ji = a.at(j, i);
            let sq = a_ij.norm_sqr();
            if !Float::is_finite(sq) || sq >= square_max_diag {
                return false;
            }
            if !conj_matches(a_ij, a_ji, tol) {
                return false;
            }
            let re_abs = Float::abs(a_ij.real());
            if re_abs + re_abs >= a.at(i, i).real() + a_jj {
                return false;
            }
        }
    }
    true
}

/// `a_ij` equals `conj(a_ji)` within `tol`, checked per component.
fn conj_matches<T>(a_ij: T, a_ji: T, tol: T::Real) -> bool
where
    T: Element,
    T::Real: Float,
{
    let (ij_re, ij_im) = (a_ij.real(), a_ij.imag());
    let (ji_re, ji_im) = (a_ji.real(), a_ji.imag());

    let re_delta = Float::abs(ij_re - ji_re);
    if re_delta > tol && re_delta > Float::abs(ij_re).max(Float::abs(ji_re)) * tol {
        return false;
    }
    let im_delta = Float::abs(ij_im + ji_im);
    !(im_delta > tol && im_delta > Float::abs(ij_im).max(Float::abs(ji_im)) * tol)
}

/// Whether `x` is symmetric (Hermitian for complex elements) within a
/// tolerance of `100 * eps`. Matrices smaller than `4x4` are never
/// classified. A diagonal that is entirely near zero is treated as suspect.
pub fn is_approx_sym<'a, T>(x: impl Into<MatRef<'a, T>>) -> bool
where
    T: Element,
    T::Real: Float,
{
    is_approx_sym_min(x, 4)
}

/// [`is_approx_sym`] with a caller-chosen minimum size.
pub fn is_approx_sym_min<'a, T>(x: impl Into<MatRef<'a, T>>, min_n_rows: usize) -> bool
where
    T: Element,
    T::Real: Float,
{
    let a = x.into();
    if !square_at_least(&a, min_n_rows) {
        return false;
    }
    let tol: T::Real = eps_tol(100.0);
    let n = a.n_rows();

    let mut diag_below_tol = true;
    for j in 0..n {
        let d = a.at(j, j);
        let (re, im) = (d.real(), d.imag());
        if T::IS_COMPLEX && (Float::abs(im) > tol || Float::abs(im) > Float::abs(re)) {
            return false;
        }
        if !Float::is_finite(re) {
            return false;
        }
        if Float::abs(re) >= tol {
            diag_below_tol = false;
        }
    }
    if diag_below_tol {
        return false;
    }

    for j in 0..n.saturating_sub(1) {
        for i in j + 1..n {
            if !conj_matches(a.at(i, j), a.at(j, i), tol) {
                return false;
            }
        }
    }
    true
}

/// Whether every diagonal element has an imaginary part within
/// `10000 * eps` of zero. Always true for real element types.
pub fn check_diag_imag<'a, T>(x: impl Into<MatRef<'a, T>>) -> bool
where
    T: Element,
    T::Real: Float,
{
    let a = x.into();
    let tol: T::Real = eps_tol(10000.0);
    let n = a.n_rows().min(a.n_cols());
    (0..n).all(|i| Float::abs(a.at(i, i).imag()) <= tol)
}
