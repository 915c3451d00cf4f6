//! Lazy expression nodes and the functions that build them.
//!
//! Every builder takes its operands by value. Pass `&m` for a container
//! (`&Mat`, `&Col`, `&Cube`) and views or nodes directly; both are cheap
//! handles. A node therefore borrows every container it reads and cannot
//! outlive them.
//!
//! | builder                | node                       | output element |
//! |------------------------|----------------------------|----------------|
//! | `abs`, `real`, `imag`, `arg` | `MtOp<E, Abs/...>`   | `T::Real`      |
//! | `replace`              | `MtOp<E, Replace>`         | `T`            |
//! | `scale`, `add_scalar`, `neg` | `EOp<E, Scale/...>`  | `T`            |
//! | `trans`                | `Trans<E>`                 | `T`            |
//! | `plus`, `minus`, `schur` | `Glue<A, B, Plus/...>`   | `T`            |
//! | `matmul`               | `Product<A, B>`            | `T`            |

mod eop;
mod glue;
mod mtop;
mod product;
mod trans;

pub use eop::{AddScalar, EOp, EOpKind, Neg, Scale};
pub use glue::{Glue, GlueKind, Minus, Plus, Schur};
pub(crate) use mtop::eval_mapped;
pub use mtop::{MtOp, MtOpAux, MtOpKind};
pub use product::Product;
pub use trans::Trans;

pub use crate::ops::misc::{Abs, Arg, Imag, Real, Replace};

use crate::proxy::Proxy;
use lazy_linalg_kernel::KernelElement;

/// Element magnitudes (`|z|` for complex elements).
pub fn abs<E: Proxy>(m: E) -> MtOp<E, Abs> {
    MtOp::new(m)
}

pub fn real<E: Proxy>(m: E) -> MtOp<E, Real> {
    MtOp::new(m)
}

/// Imaginary parts; all zero for real element types.
pub fn imag<E: Proxy>(m: E) -> MtOp<E, Imag> {
    MtOp::new(m)
}

/// Phase angles.
pub fn arg<E: Proxy>(m: E) -> MtOp<E, Arg> {
    MtOp::new(m)
}

/// `m` with every element equal to `old` replaced by `new`. A NaN `old`
/// matches every NaN.
pub fn replace<E: Proxy>(m: E, old: E::Elem, new: E::Elem) -> MtOp<E, Replace> {
    MtOp::dual_aux(m, old, new)
}

pub fn scale<E: Proxy>(m: E, k: E::Elem) -> EOp<E, Scale> {
    EOp::new(m, k)
}

pub fn add_scalar<E: Proxy>(m: E, k: E::Elem) -> EOp<E, AddScalar> {
    EOp::new(m, k)
}

pub fn neg<E>(m: E) -> EOp<E, Neg>
where
    E: Proxy,
    E::Elem: std::ops::Neg<Output = E::Elem>,
{
    EOp::new(m, <E::Elem as num_traits::Zero>::zero())
}

/// Hermitian transpose.
pub fn trans<E: Proxy>(m: E) -> Trans<E> {
    Trans::new(m)
}

pub fn plus<A, B>(a: A, b: B) -> Glue<A, B, Plus>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
{
    Glue::new(a, b)
}

pub fn minus<A, B>(a: A, b: B) -> Glue<A, B, Minus>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
{
    Glue::new(a, b)
}

/// Element-wise product.
pub fn schur<A, B>(a: A, b: B) -> Glue<A, B, Schur>
where
    A: Proxy,
    B: Proxy<Elem = A::Elem>,
{
    Glue::new(a, b)
}

/// Matrix product.
pub fn matmul<A, B>(a: A, b: B) -> Product<A, B>
where
    A: Proxy,
    A::Elem: KernelElement,
    B: Proxy<Elem = A::Elem>,
{
    Product::new(a, b)
}

/// Method-call builders for every [`Proxy`] type.
///
/// Each method borrows `self`, so `a.t().matmul(&b)` leaves `a` usable.
pub trait ExprExt: Proxy + Sized {
    fn abs(&self) -> MtOp<&Self, Abs> {
        MtOp::new(self)
    }

    fn real(&self) -> MtOp<&Self, Real> {
        MtOp::new(self)
    }

    fn imag(&self) -> MtOp<&Self, Imag> {
        MtOp::new(self)
    }

    fn arg(&self) -> MtOp<&Self, Arg> {
        MtOp::new(self)
    }

    /// Hermitian transpose.
    fn t(&self) -> Trans<&Self> {
        Trans::new(self)
    }

    fn scaled(&self, k: Self::Elem) -> EOp<&Self, Scale> {
        EOp::new(self, k)
    }

    fn plus<B: Proxy<Elem = Self::Elem>>(&self, b: B) -> Glue<&Self, B, Plus> {
        Glue::new(self, b)
    }

    fn minus<B: Proxy<Elem = Self::Elem>>(&self, b: B) -> Glue<&Self, B, Minus> {
        Glue::new(self, b)
    }

    fn schur<B: Proxy<Elem = Self::Elem>>(&self, b: B) -> Glue<&Self, B, Schur> {
        Glue::new(self, b)
    }

    fn matmul<B>(&self, b: B) -> Product<&Self, B>
    where
        Self::Elem: KernelElement,
        B: Proxy<Elem = Self::Elem>,
    {
        Product::new(self, b)
    }
}

impl<P: Proxy> ExprExt for P {}
