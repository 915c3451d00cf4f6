//! Rayon-based parallel fill for element-wise kernels.
//!
//! The output is split recursively in two with `rayon::join`, handing half
//! of the thread budget to each side, until a piece is either below the
//! parallel threshold or owns a single thread. Each leaf then runs the plain
//! sequential loop over its index range.

use crate::config::KernelConfig;
use crate::maybe_sync::{MaybeSend, MaybeSync};

/// Write `f(i)` into `out[i]` for every index.
///
/// Runs in parallel when the `parallel` feature is on, the loop is at least
/// `cfg.parallel_threshold` long and more than one thread is allowed.
/// Results are identical either way; only the schedule changes.
pub fn fill_indexed<T, F>(out: &mut [T], cfg: &KernelConfig, f: F)
where
    T: MaybeSend,
    F: Fn(usize) -> T + MaybeSync,
{
    #[cfg(feature = "parallel")]
    {
        let nthreads = cfg.effective_threads();
        if nthreads > 1 && out.len() >= cfg.parallel_threshold {
            log::trace!(
                "fill_indexed: {} elements on up to {} threads",
                out.len(),
                nthreads
            );
            fill_threaded(out, 0, nthreads, cfg.parallel_threshold, &f);
            return;
        }
    }
    #[cfg(not(feature = "parallel"))]
    let _ = cfg;

    fill_serial(out, 0, &f);
}

#[inline]
fn fill_serial<T, F: Fn(usize) -> T>(out: &mut [T], base: usize, f: &F) {
    for (j, dst) in out.iter_mut().enumerate() {
        *dst = f(base + j);
    }
}

#[cfg(feature = "parallel")]
fn fill_threaded<T, F>(out: &mut [T], base: usize, nthreads: usize, min_len: usize, f: &F)
where
    T: Send,
    F: Fn(usize) -> T + Sync,
{
    if nthreads <= 1 || out.len() < min_len.max(2) {
        fill_serial(out, base, f);
        return;
    }
    let left_threads = nthreads / 2;
    let mid = out.len() * left_threads / nthreads;
    let (left, right) = out.split_at_mut(mid);
    rayon::join(
        || fill_threaded(left, base, left_threads, min_len, f),
        || fill_threaded(right, base + mid, nthreads - left_threads, min_len, f),
    );
}
