//! Type-changing unary map node.

use crate::proxy::{map_fill, AccessMode, Accessor, Proxy};
use crate::storage::{BufferId, Shape, Storage};
use crate::Result;
use lazy_linalg_traits::Element;
use std::marker::PhantomData;

/// Auxiliary data carried by an [`MtOp`]: one scalar of the input element
/// type, one of the output element type, and two indices.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MtOpAux<T, U> {
    pub aux: T,
    pub aux_out: U,
    pub aux_uword_a: usize,
    pub aux_uword_b: usize,
}

impl<T: Element, U: Element> Default for MtOpAux<T, U> {
    fn default() -> Self {
        Self {
            aux: T::zero(),
            aux_out: U::zero(),
            aux_uword_a: 0,
            aux_uword_b: 0,
        }
    }
}

/// An operation kind for [`MtOp`], mapping elements of type `T` to
/// elements of type `Self::Out`.
pub trait MtOpKind<T: Element>: Copy + Default + Send + Sync + 'static {
    type Out: Element;

    /// Operation name used in diagnostics.
    const NAME: &'static str;

    fn map(x: T, aux: &MtOpAux<T, Self::Out>) -> Self::Out;

    /// Resize `out` to the node's shape and fill it.
    fn apply<E, D>(out: &mut D, node: &MtOp<E, Self>) -> Result<()>
    where
        E: Proxy<Elem = T>,
        D: Storage<Self::Out> + ?Sized,
    {
        eval_mapped(out, node)
    }
}

/// The generic evaluation used by [`MtOpKind::apply`]: validate, resize,
/// then map every element through the chosen access mode.
pub(crate) fn eval_mapped<T, E, K, D>(out: &mut D, node: &MtOp<E, K>) -> Result<()>
where
    T: Element,
    E: Proxy<Elem = T>,
    K: MtOpKind<T>,
    D: Storage<K::Out> + ?Sized,
{
    node.validate()?;
    out.set_size(node.shape())?;
    node.write_to(out.as_mut_slice())
}

/// `K(m)` evaluated lazily. The output element type is fixed by `K`.
#[derive(Debug, Clone, Copy)]
pub struct MtOp<E, K>
where
    E: Proxy,
    K: MtOpKind<E::Elem>,
{
    m: E,
    aux: MtOpAux<E::Elem, K::Out>,
    _kind: PhantomData<K>,
}

impl<E, K> MtOp<E, K>
where
    E: Proxy,
    K: MtOpKind<E::Elem>,
{
    pub fn new(m: E) -> Self {
        Self {
            m,
            aux: MtOpAux::default(),
            _kind: PhantomData,
        }
    }

    pub fn with_aux(m: E, aux: E::Elem) -> Self {
        Self {
            m,
            aux: MtOpAux {
                aux,
                ..MtOpAux::default()
            },
            _kind: PhantomData,
        }
    }

    pub fn with_indices(m: E, a: usize, b: usize) -> Self {
        Self {
            m,
            aux: MtOpAux {
                aux_uword_a: a,
                aux_uword_b: b,
                ..MtOpAux::default()
            },
            _kind: PhantomData,
        }
    }

    pub fn with_aux_indices(m: E, aux: E::Elem, a: usize, b: usize) -> Self {
        Self {
            m,
            aux: MtOpAux {
                aux,
                aux_out: <K::Out as num_traits::Zero>::zero(),
                aux_uword_a: a,
                aux_uword_b: b,
            },
            _kind: PhantomData,
        }
    }

    pub fn with_out_aux(m: E, aux_out: K::Out) -> Self {
        Self {
            m,
            aux: MtOpAux {
                aux_out,
                ..MtOpAux::default()
            },
            _kind: PhantomData,
        }
    }

    pub fn dual_aux(m: E, aux_in: E::Elem, aux_out: K::Out) -> Self {
        Self {
            m,
            aux: MtOpAux {
                aux: aux_in,
                aux_out,
                ..MtOpAux::default()
            },
            _kind: PhantomData,
        }
    }

    #[inline]
    pub fn operand(&self) -> &E {
        &self.m
    }

    #[inline]
    pub fn aux(&self) -> &MtOpAux<E::Elem, K::Out> {
        &self.aux
    }
}

impl<E, K> Proxy for MtOp<E, K>
where
    E: Proxy,
    K: MtOpKind<E::Elem>,
{
    type Elem = K::Out;

    const MODE: AccessMode = E::MODE.mapped();
    const IS_ROW: bool = E::IS_ROW;
    const IS_COL: bool = E::IS_COL;

    #[inline]
    fn shape(&self) -> Shape {
        self.m.shape()
    }

    #[inline]
    fn at(&self, row: usize, col: usize, slice: usize) -> K::Out {
        K::map(self.m.at(row, col, slice), &self.aux)
    }

    #[inline]
    fn get(&self, i: usize) -> K::Out {
        K::map(self.m.get(i), &self.aux)
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.m.is_alias(dest)
    }

    #[inline]
    fn validate(&self) -> Result<()> {
        self.m.validate()
    }

    fn write_to(&self, out: &mut [K::Out]) -> Result<()> {
        let acc = Accessor::new(&self.m)?;
        map_fill(out, &acc, |x| K::map(x, &self.aux));
        Ok(())
    }

    fn eval_into<D>(&self, out: &mut D) -> Result<()>
    where
        D: Storage<K::Out> + ?Sized,
    {
        K::apply(out, self)
    }
}
