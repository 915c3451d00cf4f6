//! Same-type element-wise node with one scalar operand.

use crate::proxy::{map_fill, quasi_unwrap, AccessMode, Accessor, PartialUnwrap, Proxy};
use crate::storage::{BufferId, Shape};
use crate::Result;
use lazy_linalg_traits::Element;
use std::marker::PhantomData;

/// An operation kind for [`EOp`]: `f(x, k)` with `x` an element and `k` the
/// node's scalar.
pub trait EOpKind<T: Element>: Copy + Default + Send + Sync + 'static {
    const NAME: &'static str;

    /// Whether the kind is multiplication by `k`, which a consumer may
    /// apply after the fact.
    const IS_SCALE: bool = false;

    fn apply(x: T, k: T) -> T;
}

/// `x * k`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Scale;

/// `x + k`
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AddScalar;

/// `-x`; the scalar is unused.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Neg;

impl<T: Element> EOpKind<T> for Scale {
    const NAME: &'static str = "scale";
    const IS_SCALE: bool = true;

    #[inline(always)]
    fn apply(x: T, k: T) -> T {
        x * k
    }
}

impl<T: Element> EOpKind<T> for AddScalar {
    const NAME: &'static str = "add_scalar";

    #[inline(always)]
    fn apply(x: T, k: T) -> T {
        x + k
    }
}

impl<T: Element + std::ops::Neg<Output = T>> EOpKind<T> for Neg {
    const NAME: &'static str = "neg";

    #[inline(always)]
    fn apply(x: T, _k: T) -> T {
        -x
    }
}

#[derive(Debug, Clone, Copy)]
pub struct EOp<E, K>
where
    E: Proxy,
    K: EOpKind<E::Elem>,
{
    m: E,
    k: E::Elem,
    _kind: PhantomData<K>,
}

impl<E, K> EOp<E, K>
where
    E: Proxy,
    K: EOpKind<E::Elem>,
{
    pub fn new(m: E, k: E::Elem) -> Self {
        Self {
            m,
            k,
            _kind: PhantomData,
        }
    }

    #[inline]
    pub fn operand(&self) -> &E {
        &self.m
    }

    #[inline]
    pub fn scalar(&self) -> E::Elem {
        self.k
    }
}

impl<E, K> Proxy for EOp<E, K>
where
    E: Proxy,
    K: EOpKind<E::Elem>,
{
    type Elem = E::Elem;

    const MODE: AccessMode = E::MODE.mapped();
    const IS_ROW: bool = E::IS_ROW;
    const IS_COL: bool = E::IS_COL;
    const FAST_UNWRAP: bool = K::IS_SCALE && E::FAST_UNWRAP;

    #[inline]
    fn shape(&self) -> Shape {
        self.m.shape()
    }

    #[inline]
    fn at(&self, row: usize, col: usize, slice: usize) -> E::Elem {
        K::apply(self.m.at(row, col, slice), self.k)
    }

    #[inline]
    fn get(&self, i: usize) -> E::Elem {
        K::apply(self.m.get(i), self.k)
    }

    #[inline]
    fn is_alias(&self, dest: BufferId) -> bool {
        self.m.is_alias(dest)
    }

    #[inline]
    fn validate(&self) -> Result<()> {
        self.m.validate()
    }

    fn write_to(&self, out: &mut [E::Elem]) -> Result<()> {
        let acc = Accessor::new(&self.m)?;
        map_fill(out, &acc, |x| K::apply(x, self.k));
        Ok(())
    }

    fn partial_unwrap(&self) -> Result<PartialUnwrap<'_, E::Elem>> {
        if K::IS_SCALE {
            let inner = self.m.partial_unwrap()?;
            let scale = inner.factor() * self.k;
            return Ok(PartialUnwrap {
                mem: inner.mem,
                scale: Some(scale),
            });
        }
        Ok(PartialUnwrap {
            mem: quasi_unwrap(self)?,
            scale: None,
        })
    }
}
