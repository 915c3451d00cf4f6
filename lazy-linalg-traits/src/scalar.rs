//! Element type bounds and per-element operations.
//!
//! The supported element types are the single/double precision reals, their
//! complex counterparts, and the 32/64-bit signed and unsigned integers:
//!
//! ```text
//!   type       | KIND     | IS_COMPLEX | IS_INTEGRAL | Real
//! -------------|----------|------------|-------------|------
//!   f32        | F32      | no         | no          | f32
//!   f64        | F64      | no         | no          | f64
//!   Complex32  | C32      | yes        | no          | f32
//!   Complex64  | C64      | yes        | no          | f64
//!   i32 ...    | Integral | no         | yes         | self
//! ```
//!
//! Everything a lazy node needs to know about an element is static: the
//! dispatcher decides between manual and backend kernels from `KIND` alone,
//! so no runtime type inspection happens on the hot path.

use num_complex::Complex;
use num_traits::{One, Zero};
use std::fmt::Debug;
use std::ops::{Add, Div, Mul, Sub};

/// Category of an element type, used by the kernel dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElemKind {
    F32,
    F64,
    C32,
    C64,
    Integral,
}

impl ElemKind {
    /// Whether an external numeric backend can handle this category.
    #[inline]
    pub const fn is_blas(self) -> bool {
        !matches!(self, ElemKind::Integral)
    }

    /// Whether the category is a complex type.
    #[inline]
    pub const fn is_complex(self) -> bool {
        matches!(self, ElemKind::C32 | ElemKind::C64)
    }

    pub const fn name(self) -> &'static str {
        match self {
            ElemKind::F32 => "f32",
            ElemKind::F64 => "f64",
            ElemKind::C32 => "Complex<f32>",
            ElemKind::C64 => "Complex<f64>",
            ElemKind::Integral => "integral",
        }
    }
}

/// An element that can be stored in a dense container and flow through a
/// lazy expression.
///
/// `bytemuck::Pod` is required so kernel backends can reinterpret slices of a
/// concrete element type without copying once the category has been checked.
pub trait Element:
    Copy
    + Send
    + Sync
    + Debug
    + Default
    + PartialEq
    + Zero
    + One
    + Add<Output = Self>
    + Sub<Output = Self>
    + Mul<Output = Self>
    + Div<Output = Self>
    + bytemuck::Pod
    + 'static
{
    /// The real counterpart (`f64` for `Complex<f64>`, `Self` for reals).
    type Real: RealElement;

    const KIND: ElemKind;
    const IS_COMPLEX: bool = Self::KIND.is_complex();
    const IS_INTEGRAL: bool = matches!(Self::KIND, ElemKind::Integral);
    const IS_FLOAT: bool = !Self::IS_INTEGRAL;

    fn real(self) -> Self::Real;
    fn imag(self) -> Self::Real;

    /// Magnitude (modulus for complex values).
    fn abs(self) -> Self::Real;

    /// Phase angle. For real floats this is `atan2(0, x)`: `0` for `+0.0` and
    /// positive inputs, `pi` for negative ones including `-0.0`, NaN for NaN.
    /// Signed integers give `3` for negative values.
    fn arg(self) -> Self::Real;

    fn conj(self) -> Self;

    /// `re^2 + im^2` without the square root.
    fn norm_sqr(self) -> Self::Real;

    /// Build a value from real and imaginary parts. The imaginary part is
    /// dropped for real types.
    fn from_parts(re: Self::Real, im: Self::Real) -> Self;

    #[inline(always)]
    fn from_real(re: Self::Real) -> Self {
        Self::from_parts(re, <Self::Real as Zero>::zero())
    }

    /// Addition used by accumulating kernels. Integers wrap on overflow.
    #[inline(always)]
    fn wrapping_add(self, rhs: Self) -> Self {
        self + rhs
    }

    /// Multiplication used by accumulating kernels. Integers wrap on overflow.
    #[inline(always)]
    fn wrapping_mul(self, rhs: Self) -> Self {
        self * rhs
    }

    #[inline(always)]
    fn is_nan(self) -> bool {
        false
    }

    #[inline(always)]
    fn is_finite(self) -> bool {
        true
    }
}

/// An element that is its own real counterpart and is totally ordered apart
/// from NaN.
pub trait RealElement: Element<Real = Self> + PartialOrd {}

impl<T: Element<Real = T> + PartialOrd> RealElement for T {}

macro_rules! impl_element_float {
    ($t:ty, $kind:ident) => {
        impl Element for $t {
            type Real = $t;
            const KIND: ElemKind = ElemKind::$kind;

            #[inline(always)]
            fn real(self) -> $t {
                self
            }
            #[inline(always)]
            fn imag(self) -> $t {
                0.0
            }
            #[inline(always)]
            fn abs(self) -> $t {
                <$t>::abs(self)
            }
            #[inline(always)]
            fn arg(self) -> $t {
                if self.is_nan() {
                    self
                } else if self.is_sign_negative() {
                    core::f64::consts::PI as $t
                } else {
                    0.0
                }
            }
            #[inline(always)]
            fn conj(self) -> $t {
                self
            }
            #[inline(always)]
            fn norm_sqr(self) -> $t {
                self * self
            }
            #[inline(always)]
            fn from_parts(re: $t, _im: $t) -> $t {
                re
            }
            #[inline(always)]
            fn is_nan(self) -> bool {
                <$t>::is_nan(self)
            }
            #[inline(always)]
            fn is_finite(self) -> bool {
                <$t>::is_finite(self)
            }
        }
    };
}

impl_element_float!(f32, F32);
impl_element_float!(f64, F64);

macro_rules! impl_element_complex {
    ($t:ty, $kind:ident) => {
        impl Element for Complex<$t> {
            type Real = $t;
            const KIND: ElemKind = ElemKind::$kind;

            #[inline(always)]
            fn real(self) -> $t {
                self.re
            }
            #[inline(always)]
            fn imag(self) -> $t {
                self.im
            }
            #[inline(always)]
            fn abs(self) -> $t {
                self.norm()
            }
            #[inline(always)]
            fn arg(self) -> $t {
                Complex::arg(self)
            }
            #[inline(always)]
            fn conj(self) -> Self {
                Complex::conj(&self)
            }
            #[inline(always)]
            fn norm_sqr(self) -> $t {
                Complex::norm_sqr(&self)
            }
            #[inline(always)]
            fn from_parts(re: $t, im: $t) -> Self {
                Complex::new(re, im)
            }
            #[inline(always)]
            fn is_nan(self) -> bool {
                self.re.is_nan() || self.im.is_nan()
            }
            #[inline(always)]
            fn is_finite(self) -> bool {
                self.re.is_finite() && self.im.is_finite()
            }
        }
    };
}

impl_element_complex!(f32, C32);
impl_element_complex!(f64, C64);

// Integer magnitudes wrap on MIN rather than panicking; the phase of a
// negative value is pi truncated to the integer type.
macro_rules! impl_element_signed {
    ($($t:ty),*) => {$(
        impl Element for $t {
            type Real = $t;
            const KIND: ElemKind = ElemKind::Integral;

            #[inline(always)]
            fn real(self) -> $t {
                self
            }
            #[inline(always)]
            fn imag(self) -> $t {
                0
            }
            #[inline(always)]
            fn abs(self) -> $t {
                self.wrapping_abs()
            }
            #[inline(always)]
            fn arg(self) -> $t {
                if self < 0 {
                    3
                } else {
                    0
                }
            }
            #[inline(always)]
            fn conj(self) -> $t {
                self
            }
            #[inline(always)]
            fn norm_sqr(self) -> $t {
                self.wrapping_mul(self)
            }
            #[inline(always)]
            fn from_parts(re: $t, _im: $t) -> $t {
                re
            }
            #[inline(always)]
            fn wrapping_add(self, rhs: $t) -> $t {
                <$t>::wrapping_add(self, rhs)
            }
            #[inline(always)]
            fn wrapping_mul(self, rhs: $t) -> $t {
                <$t>::wrapping_mul(self, rhs)
            }
        }
    )*};
}

macro_rules! impl_element_unsigned {
    ($($t:ty),*) => {$(
        impl Element for $t {
            type Real = $t;
            const KIND: ElemKind = ElemKind::Integral;

            #[inline(always)]
            fn real(self) -> $t {
                self
            }
            #[inline(always)]
            fn imag(self) -> $t {
                0
            }
            #[inline(always)]
            fn abs(self) -> $t {
                self
            }
            #[inline(always)]
            fn arg(self) -> $t {
                0
            }
            #[inline(always)]
            fn conj(self) -> $t {
                self
            }
            #[inline(always)]
            fn norm_sqr(self) -> $t {
                self.wrapping_mul(self)
            }
            #[inline(always)]
            fn from_parts(re: $t, _im: $t) -> $t {
                re
            }
            #[inline(always)]
            fn wrapping_add(self, rhs: $t) -> $t {
                <$t>::wrapping_add(self, rhs)
            }
            #[inline(always)]
            fn wrapping_mul(self, rhs: $t) -> $t {
                <$t>::wrapping_mul(self, rhs)
            }
        }
    )*};
}

impl_element_signed!(i32, i64);
impl_element_unsigned!(u32, u64);
