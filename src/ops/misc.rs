//! Element-wise maps: `abs`, `real`, `imag`, `arg`, `replace`.
//!
//! Each kind writes the whole destination after resizing it to the
//! operand's extents; matrices and cubes go through the same code.

use crate::expr::{MtOp, MtOpAux, MtOpKind};
use crate::proxy::{map_fill, Accessor, Proxy};
use crate::storage::{replace_matches, Storage};
use crate::Result;
use lazy_linalg_kernel::{config, fill_indexed, KernelConfig};
use lazy_linalg_traits::Element;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Abs;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Real;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Imag;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Arg;

/// Substitutes `aux` with `aux_out`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Replace;

impl<T: Element> MtOpKind<T> for Abs {
    type Out = T::Real;
    const NAME: &'static str = "abs()";

    #[inline(always)]
    fn map(x: T, _aux: &MtOpAux<T, Self::Out>) -> Self::Out {
        x.abs()
    }

    /// Large linearly readable operands are filled in parallel.
    fn apply<E, D>(out: &mut D, node: &MtOp<E, Self>) -> Result<()>
    where
        E: Proxy<Elem = T>,
        D: Storage<Self::Out> + ?Sized,
    {
        let acc = Accessor::new(node.operand())?;
        out.set_size(node.shape())?;
        fill_abs(out.as_mut_slice(), &acc, &config());
        Ok(())
    }
}

fn fill_abs<T, E>(dst: &mut [T::Real], acc: &Accessor<'_, E>, cfg: &KernelConfig)
where
    T: Element,
    E: Proxy<Elem = T>,
{
    if acc.prefers_at() {
        map_fill(dst, acc, |x| x.abs());
    } else if let Some(src) = acc.as_slice() {
        fill_indexed(dst, cfg, |i| src[i].abs());
    } else {
        fill_indexed(dst, cfg, |i| acc.get(i).abs());
    }
}

impl<T: Element> MtOpKind<T> for Real {
    type Out = T::Real;
    const NAME: &'static str = "real()";

    #[inline(always)]
    fn map(x: T, _aux: &MtOpAux<T, Self::Out>) -> Self::Out {
        x.real()
    }
}

impl<T: Element> MtOpKind<T> for Imag {
    type Out = T::Real;
    const NAME: &'static str = "imag()";

    #[inline(always)]
    fn map(x: T, _aux: &MtOpAux<T, Self::Out>) -> Self::Out {
        x.imag()
    }

    fn apply<E, D>(out: &mut D, node: &MtOp<E, Self>) -> Result<()>
    where
        E: Proxy<Elem = T>,
        D: Storage<Self::Out> + ?Sized,
    {
        if !T::IS_COMPLEX {
            node.validate()?;
            return out.zeros(node.shape());
        }
        crate::expr::eval_mapped(out, node)
    }
}

impl<T: Element> MtOpKind<T> for Arg {
    type Out = T::Real;
    const NAME: &'static str = "arg()";

    #[inline(always)]
    fn map(x: T, _aux: &MtOpAux<T, Self::Out>) -> Self::Out {
        x.arg()
    }
}

impl<T: Element> MtOpKind<T> for Replace {
    type Out = T;
    const NAME: &'static str = "replace()";

    #[inline(always)]
    fn map(x: T, aux: &MtOpAux<T, T>) -> T {
        if replace_matches(x, aux.aux) {
            aux.aux_out
        } else {
            x
        }
    }

    /// Copies the operand, then substitutes in place.
    fn apply<E, D>(out: &mut D, node: &MtOp<E, Self>) -> Result<()>
    where
        E: Proxy<Elem = T>,
        D: Storage<Self::Out> + ?Sized,
    {
        node.operand().eval_into(out)?;
        let aux = node.aux();
        out.replace(aux.aux, aux.aux_out);
        Ok(())
    }
}
