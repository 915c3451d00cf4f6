//! Feature-gated Send/Sync marker traits.
//!
//! With `parallel` enabled, [`MaybeSend`] is [`Send`] and [`MaybeSync`] is
//! [`Sync`], so closures handed to [`fill_indexed`](crate::fill_indexed) can
//! run on the rayon pool. Without it both are blanket-implemented and the
//! bounds vanish.

#[cfg(feature = "parallel")]
pub trait MaybeSend: Send {}
#[cfg(feature = "parallel")]
impl<T: Send> MaybeSend for T {}

#[cfg(feature = "parallel")]
pub trait MaybeSync: Sync {}
#[cfg(feature = "parallel")]
impl<T: Sync> MaybeSync for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSend {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSend for T {}

#[cfg(not(feature = "parallel"))]
pub trait MaybeSync {}
#[cfg(not(feature = "parallel"))]
impl<T> MaybeSync for T {}
