//! Type promotion for mixed-element reductions.
//!
//! When two operands of different element types meet in a reduction (for
//! example a mixed-type dot product) both are converted to a common type
//! before combining:
//!
//! ```text
//!   lhs \ rhs | i32  | i64  | u32  | u64  | f32  | f64  | C32  | C64
//! ------------|------|------|------|------|------|------|------|------
//!   i32       | i32  | i64  | .    | .    | f32  | f64  | .    | C64
//!   i64       | i64  | i64  | .    | .    | .    | f64  | .    | C64
//!   u32       | .    | .    | u32  | u64  | f32  | f64  | .    | C64
//!   u64       | .    | .    | u64  | u64  | .    | f64  | .    | C64
//!   f32       | f32  | .    | f32  | .    | f32  | f64  | C32  | C64
//!   f64       | f64  | f64  | f64  | f64  | f64  | f64  | C64  | C64
//!   C32       | .    | .    | .    | .    | C32  | C64  | C32  | C64
//!   C64       | C64  | C64  | C64  | C64  | C64  | C64  | C64  | C64
//! ```
//!
//! Pairs marked `.` are not implemented. Integer to float conversions round
//! once the value exceeds the float mantissa.

use crate::scalar::Element;
use num_complex::{Complex32, Complex64};

/// Conversion into the common type of a promoted pair.
pub trait Upgrade<To> {
    fn upgrade(self) -> To;
}

/// The common type of `Self` and `Rhs`.
pub trait Promote<Rhs: Element>: Element {
    type Output: Element;

    /// Convert the left operand.
    fn promote(self) -> <Self as Promote<Rhs>>::Output;

    /// Convert the right operand.
    fn promote_rhs(rhs: Rhs) -> <Self as Promote<Rhs>>::Output;
}

macro_rules! upgrade_identity {
    ($($t:ty),*) => {$(
        impl Upgrade<$t> for $t {
            #[inline(always)]
            fn upgrade(self) -> $t {
                self
            }
        }
    )*};
}

upgrade_identity!(i32, i64, u32, u64, f32, f64, Complex32, Complex64);

macro_rules! upgrade_cast {
    ($($from:ty => $to:ty),* $(,)?) => {$(
        impl Upgrade<$to> for $from {
            #[inline(always)]
            fn upgrade(self) -> $to {
                self as $to
            }
        }
    )*};
}

upgrade_cast!(
    i32 => i64, i32 => f32, i32 => f64,
    i64 => f64,
    u32 => u64, u32 => f32, u32 => f64,
    u64 => f64,
    f32 => f64,
);

macro_rules! upgrade_to_complex {
    ($cx:ident, $re:ty; $($from:ty),*) => {$(
        impl Upgrade<$cx> for $from {
            #[inline(always)]
            fn upgrade(self) -> $cx {
                $cx::new(self as $re, 0.0)
            }
        }
    )*};
}

upgrade_to_complex!(Complex32, f32; f32);
upgrade_to_complex!(Complex64, f64; i32, i64, u32, u64, f32, f64);

impl Upgrade<Complex64> for Complex32 {
    #[inline(always)]
    fn upgrade(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }
}

macro_rules! promote {
    ($($lhs:ty, $rhs:ty => $out:ty);* $(;)?) => {$(
        impl Promote<$rhs> for $lhs {
            type Output = $out;

            #[inline(always)]
            fn promote_rhs(rhs: $rhs) -> $out {
                <$rhs as Upgrade<$out>>::upgrade(rhs)
            }

            #[inline(always)]
            fn promote(self) -> $out {
                <$lhs as Upgrade<$out>>::upgrade(self)
            }
        }
    )*};
}

promote!(
    i32, i32 => i32; i32, i64 => i64; i32, f32 => f32; i32, f64 => f64; i32, Complex64 => Complex64;
    i64, i32 => i64; i64, i64 => i64; i64, f64 => f64; i64, Complex64 => Complex64;
    u32, u32 => u32; u32, u64 => u64; u32, f32 => f32; u32, f64 => f64; u32, Complex64 => Complex64;
    u64, u32 => u64; u64, u64 => u64; u64, f64 => f64; u64, Complex64 => Complex64;
    f32, i32 => f32; f32, u32 => f32; f32, f32 => f32; f32, f64 => f64;
    f32, Complex32 => Complex32; f32, Complex64 => Complex64;
    f64, i32 => f64; f64, i64 => f64; f64, u32 => f64; f64, u64 => f64;
    f64, f32 => f64; f64, f64 => f64; f64, Complex32 => Complex64; f64, Complex64 => Complex64;
    Complex32, f32 => Complex32; Complex32, f64 => Complex64;
    Complex32, Complex32 => Complex32; Complex32, Complex64 => Complex64;
    Complex64, i32 => Complex64; Complex64, i64 => Complex64; Complex64, u32 => Complex64;
    Complex64, u64 => Complex64; Complex64, f32 => Complex64; Complex64, f64 => Complex64;
    Complex64, Complex32 => Complex64; Complex64, Complex64 => Complex64;
);
