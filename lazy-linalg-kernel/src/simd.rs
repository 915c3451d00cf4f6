//! Vectorized inner products for the manual fallback path.
//!
//! When no external backend is configured, long real dot products go through
//! pulp's runtime-dispatched SIMD kernels. Every other element type reports
//! `None` and the caller falls back to the unrolled scalar kernel.

/// Below this length the runtime dispatch costs more than it saves.
pub const SIMD_MIN_LEN: usize = 64;

/// Element types that may have a SIMD-accelerated dot product.
///
/// The default returns `None`. `f32`/`f64` override it when the `simd`
/// feature is enabled.
pub trait MaybeSimdOps: Copy + Sized {
    fn try_simd_dot(_a: &[Self], _b: &[Self]) -> Option<Self> {
        None
    }
}

macro_rules! impl_no_simd {
    ($($t:ty),*) => {
        $(impl MaybeSimdOps for $t {})*
    };
}

impl_no_simd!(i32, i64, u32, u64);

impl MaybeSimdOps for num_complex::Complex32 {}
impl MaybeSimdOps for num_complex::Complex64 {}

#[cfg(not(feature = "simd"))]
impl MaybeSimdOps for f32 {}

#[cfg(not(feature = "simd"))]
impl MaybeSimdOps for f64 {}

#[cfg(feature = "simd")]
mod simd_impls {
    use super::{MaybeSimdOps, SIMD_MIN_LEN};
    use pulp::{Simd, WithSimd};

    macro_rules! impl_simd_dot {
        ($t:ty, $as_simd:ident, $splat:ident, $mul_add:ident, $add:ident, $reduce:ident) => {
            impl MaybeSimdOps for $t {
                fn try_simd_dot(a: &[$t], b: &[$t]) -> Option<$t> {
                    if a.len() < SIMD_MIN_LEN {
                        return None;
                    }

                    struct Dot<'a> {
                        a: &'a [$t],
                        b: &'a [$t],
                    }

                    impl<'a> WithSimd for Dot<'a> {
                        type Output = $t;

                        #[inline(always)]
                        fn with_simd<S: Simd>(self, simd: S) -> Self::Output {
                            let (a_head, a_tail) = S::$as_simd(self.a);
                            let (b_head, b_tail) = S::$as_simd(self.b);

                            let mut acc0 = simd.$splat(0.0);
                            let mut acc1 = simd.$splat(0.0);

                            let mut i = 0usize;
                            while i + 2 <= a_head.len() {
                                acc0 = simd.$mul_add(a_head[i], b_head[i], acc0);
                                acc1 = simd.$mul_add(a_head[i + 1], b_head[i + 1], acc1);
                                i += 2;
                            }
                            if i < a_head.len() {
                                acc0 = simd.$mul_add(a_head[i], b_head[i], acc0);
                            }

                            let mut sum = simd.$reduce(simd.$add(acc0, acc1));
                            for (&x, &y) in a_tail.iter().zip(b_tail) {
                                sum += x * y;
                            }
                            sum
                        }
                    }

                    debug_assert_eq!(a.len(), b.len());
                    Some(pulp::Arch::new().dispatch(Dot { a, b }))
                }
            }
        };
    }

    impl_simd_dot!(
        f32,
        as_simd_f32s,
        splat_f32s,
        mul_add_f32s,
        add_f32s,
        reduce_sum_f32s
    );
    impl_simd_dot!(
        f64,
        as_simd_f64s,
        splat_f64s,
        mul_add_f64s,
        add_f64s,
        reduce_sum_f64s
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_complex_and_integer_have_no_simd() {
        let a = [num_complex::Complex64::new(1.0, 1.0); 128];
        assert!(num_complex::Complex64::try_simd_dot(&a, &a).is_none());
        let b = [3i64; 128];
        assert!(i64::try_simd_dot(&b, &b).is_none());
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_simd_dot_matches_scalar() {
        let a: Vec<f64> = (0..203).map(|i| i as f64 * 0.5).collect();
        let b: Vec<f64> = (0..203).map(|i| 1.0 - i as f64 * 0.25).collect();
        let expected: f64 = a.iter().zip(&b).map(|(x, y)| x * y).sum();
        let got = f64::try_simd_dot(&a, &b).unwrap();
        approx::assert_relative_eq!(got, expected, max_relative = 1e-12);
    }

    #[cfg(feature = "simd")]
    #[test]
    fn test_simd_dot_short_input_declines() {
        let a = [1.0f32; 8];
        assert!(f32::try_simd_dot(&a, &a).is_none());
    }
}
