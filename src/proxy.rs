//! The evaluation proxy: uniform element access over every operand type.
//!
//! ```text
//!   mode        | cheap access            | examples
//! --------------|-------------------------|-------------------------------
//!   Direct      | as_slice(), get(i)      | Mat, MatRef, Col, Row, Cube
//!   Linear      | get(i)                  | Subview, MtOp/EOp/Glue of the above
//!   At          | at(row, col, slice)     | Trans
//!   Materialize | none; evaluate first    | Product, nodes over a Product
//! ```
//!
//! Consumers never branch on concrete types. They read `P::MODE` (a
//! compile-time constant) and use [`Accessor`], [`quasi_unwrap`] or
//! [`materialize`] to get the cheapest correct view of the elements.

use crate::storage::{BufferId, Shape, Storage};
use crate::subview::Subview;
use crate::Result;
use lazy_linalg_kernel::MaybeSync;
use lazy_linalg_traits::Element;
use std::borrow::Cow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessMode {
    Direct,
    Linear,
    At,
    Materialize,
}

impl AccessMode {
    /// Mode of an element-wise node over one operand in mode `self`.
    pub const fn mapped(self) -> Self {
        match self {
            AccessMode::Direct | AccessMode::Linear => AccessMode::Linear,
            other => other,
        }
    }

    /// Mode of an element-wise node over two operands.
    pub const fn combine(self, other: Self) -> Self {
        match (self, other) {
            (AccessMode::Materialize, _) | (_, AccessMode::Materialize) => AccessMode::Materialize,
            (AccessMode::At, _) | (_, AccessMode::At) => AccessMode::At,
            _ => AccessMode::Linear,
        }
    }

    #[inline]
    pub const fn prefers_at(self) -> bool {
        matches!(self, AccessMode::At | AccessMode::Materialize)
    }
}

/// Element access contract for every right-hand-side object.
///
/// Implementors must make `at`, `get`, and `as_slice` agree: `get(i)` is the
/// `i`-th element in column-major order, and `as_slice()` (when `Some`) holds
/// exactly those elements.
pub trait Proxy: MaybeSync {
    type Elem: Element;

    const MODE: AccessMode;
    const IS_ROW: bool = false;
    const IS_COL: bool = false;

    /// Whether [`partial_unwrap`](Proxy::partial_unwrap) is free: the object
    /// is plain memory, possibly under a scalar factor or a real-valued
    /// vector transpose.
    const FAST_UNWRAP: bool = false;

    fn shape(&self) -> Shape;

    #[inline]
    fn n_rows(&self) -> usize {
        self.shape().n_rows
    }

    #[inline]
    fn n_cols(&self) -> usize {
        self.shape().n_cols
    }

    #[inline]
    fn n_slices(&self) -> usize {
        self.shape().n_slices
    }

    #[inline]
    fn n_elem(&self) -> usize {
        self.shape().n_elem()
    }

    fn at(&self, row: usize, col: usize, slice: usize) -> Self::Elem;

    #[inline]
    fn get(&self, i: usize) -> Self::Elem {
        let (r, c, s) = self.shape().unravel(i);
        self.at(r, c, s)
    }

    /// Contiguous column-major memory, when the object has it.
    #[inline]
    fn as_slice(&self) -> Option<&[Self::Elem]> {
        None
    }

    /// The object as a subview, when it is one.
    #[inline]
    fn as_subview(&self) -> Option<Subview<'_, Self::Elem>> {
        None
    }

    /// Whether `dest` overlaps any buffer this object reads.
    fn is_alias(&self, dest: BufferId) -> bool;

    /// Check the shape requirements of the whole tree.
    #[inline]
    fn validate(&self) -> Result<()> {
        Ok(())
    }

    /// Write every element into `out` in column-major order.
    /// `out.len()` must equal `n_elem()`.
    fn write_to(&self, out: &mut [Self::Elem]) -> Result<()> {
        fill_by_mode(self, out);
        Ok(())
    }

    /// Inner memory plus an optional trailing scalar factor.
    fn partial_unwrap(&self) -> Result<PartialUnwrap<'_, Self::Elem>> {
        Ok(PartialUnwrap {
            mem: quasi_unwrap(self)?,
            scale: None,
        })
    }

    /// Resize `out` and evaluate into it. Assumes `out` does not alias any
    /// operand; use [`assign`](crate::assign) when it might.
    fn eval_into<D>(&self, out: &mut D) -> Result<()>
    where
        D: Storage<Self::Elem> + ?Sized,
    {
        self.validate()?;
        out.set_size(self.shape())?;
        self.write_to(out.as_mut_slice())
    }
}

impl<P: Proxy + ?Sized> Proxy for &P {
    type Elem = P::Elem;

    const MODE: AccessMode = P::MODE;
    const IS_ROW: bool = P::IS_ROW;
    const IS_COL: bool = P::IS_COL;
    const FAST_UNWRAP: bool = P::FAST_UNWRAP;

    #[inline]
    fn shape(&self) -> Shape {
        (**self).shape()
    }

    #[inline]
    fn at(&self, row: usize, col: usize, slice: usize) -> P::Elem {
        (**self).at(row, col, slice)
    }

    #[inline]
    fn get(&self, i: usize) -> P::Elem {
        (**self).get(i)
    }

    #[inline]
    fn as_slice(&self) -> Option<&[P::Elem]> {
        (**self).as_slice()
    }

    #[inline]
    fn as_subview(&self) -> Option<Subview<'_, P::Elem>> {
        (**self).as_subview()
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        (**self).is_alias(dest)
    }

    #[inline]
    fn validate(&self) -> Result<()> {
        (**self).validate()
    }

    #[inline]
    fn write_to(&self, out: &mut [P::Elem]) -> Result<()> {
        (**self).write_to(out)
    }

    #[inline]
    fn partial_unwrap(&self) -> Result<PartialUnwrap<'_, P::Elem>> {
        (**self).partial_unwrap()
    }

    #[inline]
    fn eval_into<D>(&self, out: &mut D) -> Result<()>
    where
        D: Storage<P::Elem> + ?Sized,
    {
        (**self).eval_into(out)
    }
}

/// Generic element fill used by [`Proxy::write_to`]: a straight copy for
/// contiguous objects, nested `(slice, col, row)` loops for `At` objects, and
/// linear reads otherwise.
pub(crate) fn fill_by_mode<P: Proxy + ?Sized>(p: &P, out: &mut [P::Elem]) {
    debug_assert_eq!(out.len(), p.n_elem());
    if let Some(src) = p.as_slice() {
        out.copy_from_slice(src);
        return;
    }
    if P::MODE.prefers_at() {
        let s = p.shape();
        let mut i = 0;
        for sl in 0..s.n_slices {
            for c in 0..s.n_cols {
                for r in 0..s.n_rows {
                    out[i] = p.at(r, c, sl);
                    i += 1;
                }
            }
        }
    } else {
        for (i, dst) in out.iter_mut().enumerate() {
            *dst = p.get(i);
        }
    }
}

/// Evaluate `p` into a fresh column-major buffer.
pub fn materialize<P: Proxy + ?Sized>(p: &P) -> Result<Vec<P::Elem>> {
    p.validate()?;
    let shape = p.shape();
    log::trace!("materializing a {shape} temporary");
    let mut out = vec![<P::Elem as num_traits::Zero>::zero(); shape.n_elem()];
    p.write_to(&mut out)?;
    Ok(out)
}

/// Contiguous column-major elements of `p`: borrowed when `p` already has
/// them in memory, otherwise exactly one owned temporary.
pub fn quasi_unwrap<P: Proxy + ?Sized>(p: &P) -> Result<Cow<'_, [P::Elem]>> {
    p.validate()?;
    match p.as_slice() {
        Some(s) => Ok(Cow::Borrowed(s)),
        None => Ok(Cow::Owned(materialize(p)?)),
    }
}

/// Result of [`Proxy::partial_unwrap`].
#[derive(Debug, Clone)]
pub struct PartialUnwrap<'a, T: Clone> {
    pub mem: Cow<'a, [T]>,
    /// Factor every element of `mem` must be multiplied by.
    pub scale: Option<T>,
}

impl<T: Element> PartialUnwrap<'_, T> {
    #[inline]
    pub fn factor(&self) -> T {
        self.scale.unwrap_or_else(T::one)
    }

    /// Apply the peeled factor to a value computed from `mem`.
    #[inline]
    pub fn apply(&self, value: T) -> T {
        match self.scale {
            Some(k) => value * k,
            None => value,
        }
    }
}

enum Source<'a, P: Proxy + ?Sized> {
    Mem(Cow<'a, [P::Elem]>),
    Proxy(&'a P),
}

/// Linear/positional element reader chosen from the operand's access mode.
///
/// Direct operands are read from memory, `Linear`/`At` operands through the
/// proxy, and `Materialize` operands are evaluated into one temporary up
/// front.
pub struct Accessor<'a, P: Proxy + ?Sized> {
    shape: Shape,
    src: Source<'a, P>,
}

impl<'a, P: Proxy + ?Sized> Accessor<'a, P> {
    pub fn new(p: &'a P) -> Result<Self> {
        p.validate()?;
        let shape = p.shape();
        let src = match p.as_slice() {
            Some(s) => Source::Mem(Cow::Borrowed(s)),
            None if matches!(P::MODE, AccessMode::Materialize) => {
                Source::Mem(Cow::Owned(materialize(p)?))
            }
            None => Source::Proxy(p),
        };
        Ok(Self { shape, src })
    }

    #[inline]
    pub fn shape(&self) -> Shape {
        self.shape
    }

    #[inline]
    pub fn as_slice(&self) -> Option<&[P::Elem]> {
        match &self.src {
            Source::Mem(m) => Some(m.as_ref()),
            Source::Proxy(_) => None,
        }
    }

    #[inline]
    pub fn get(&self, i: usize) -> P::Elem {
        match &self.src {
            Source::Mem(m) => m[i],
            Source::Proxy(p) => p.get(i),
        }
    }

    #[inline]
    pub fn at(&self, row: usize, col: usize, slice: usize) -> P::Elem {
        match &self.src {
            Source::Mem(m) => {
                let s = self.shape;
                m[row + col * s.n_rows + slice * s.n_rows * s.n_cols]
            }
            Source::Proxy(p) => p.at(row, col, slice),
        }
    }

    /// Whether traversal should use `at` rather than `get`.
    #[inline]
    pub fn prefers_at(&self) -> bool {
        matches!(self.src, Source::Proxy(_)) && P::MODE.prefers_at()
    }
}

/// `out[i] = f(acc[i])` for every element, traversing in the order the
/// accessor prefers.
pub(crate) fn map_fill<P, U, F>(out: &mut [U], acc: &Accessor<'_, P>, f: F)
where
    P: Proxy + ?Sized,
    F: Fn(P::Elem) -> U,
{
    if acc.prefers_at() {
        let s = acc.shape();
        let mut i = 0;
        for sl in 0..s.n_slices {
            for c in 0..s.n_cols {
                for r in 0..s.n_rows {
                    out[i] = f(acc.at(r, c, sl));
                    i += 1;
                }
            }
        }
    } else if let Some(src) = acc.as_slice() {
        for (dst, &x) in out.iter_mut().zip(src) {
            *dst = f(x);
        }
    } else {
        for (i, dst) in out.iter_mut().enumerate() {
            *dst = f(acc.get(i));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{abs, matmul, trans, Mat};

    #[test]
    fn test_mode_combination() {
        use AccessMode::*;
        assert_eq!(Direct.mapped(), Linear);
        assert_eq!(At.mapped(), At);
        assert_eq!(Direct.combine(Linear), Linear);
        assert_eq!(Linear.combine(At), At);
        assert_eq!(At.combine(Materialize), Materialize);
    }

    #[test]
    fn test_static_modes() {
        fn mode<P: Proxy>(_: &P) -> AccessMode {
            P::MODE
        }
        let a = Mat::from_fn(2, 3, |r, c| (r + c) as f64);
        assert_eq!(mode(&&a), AccessMode::Direct);
        assert_eq!(mode(&abs(&a)), AccessMode::Linear);
        assert_eq!(mode(&trans(&a)), AccessMode::At);
        assert_eq!(mode(&matmul(&a, trans(&a))), AccessMode::Materialize);
        assert_eq!(mode(&abs(matmul(&a, trans(&a)))), AccessMode::Materialize);
    }

    #[test]
    fn test_quasi_unwrap_borrows_direct_memory() {
        let a = Mat::from_fn(3, 2, |r, c| (r * 2 + c) as f64);
        let mem = quasi_unwrap(&a).unwrap();
        assert!(matches!(mem, Cow::Borrowed(_)));
        assert_eq!(mem.as_ptr(), a.as_ptr());

        let t = trans(&a);
        let mem = quasi_unwrap(&t).unwrap();
        assert!(matches!(mem, Cow::Owned(_)));
        assert_eq!(mem.len(), 6);
        assert_eq!(mem[1], a[(0, 1)]);
    }

    #[test]
    fn test_accessor_at_over_materialized() {
        let a = Mat::from_fn(2, 2, |r, c| (1 + r + 2 * c) as f64);
        let p = matmul(&a, &a);
        let acc = Accessor::new(&p).unwrap();
        assert!(acc.as_slice().is_some());
        // [1 3; 2 4]^2 = [7 15; 10 22]
        assert_eq!(acc.at(1, 0, 0), 10.0);
        assert_eq!(acc.get(2), 15.0);
    }
}
