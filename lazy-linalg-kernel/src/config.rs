//! Process-wide kernel configuration.
//!
//! The configuration is read once from the environment on first use and can
//! be replaced at runtime with [`set_config`]:
//!
//! - `LAZY_LINALG_NUM_THREADS`: upper bound on worker threads for element-wise
//!   kernels (`0` or unset means "use the rayon pool size").
//! - `LAZY_LINALG_NO_BACKEND`: when set to anything other than `0`, external
//!   numeric backends are never called and the manual kernels are used.

use std::sync::{OnceLock, PoisonError, RwLock};

/// Element-wise loops shorter than this are never split across threads.
pub const MIN_PAR_LEN: usize = 1 << 15;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KernelConfig {
    /// Whether the external backend may be used for large reductions.
    pub use_backend: bool,
    /// Upper bound on worker threads; `0` means no explicit bound.
    pub max_threads: usize,
    /// Minimum element count before a loop is parallelized.
    pub parallel_threshold: usize,
}

impl Default for KernelConfig {
    fn default() -> Self {
        Self {
            use_backend: true,
            max_threads: 0,
            parallel_threshold: MIN_PAR_LEN,
        }
    }
}

impl KernelConfig {
    /// Defaults overridden by the `LAZY_LINALG_*` environment variables.
    pub fn from_env() -> Self {
        let mut cfg = Self::default();
        if let Ok(v) = std::env::var("LAZY_LINALG_NUM_THREADS") {
            match v.trim().parse::<usize>() {
                Ok(n) => cfg.max_threads = n,
                Err(_) => log::warn!("ignoring invalid LAZY_LINALG_NUM_THREADS={v:?}"),
            }
        }
        if let Ok(v) = std::env::var("LAZY_LINALG_NO_BACKEND") {
            cfg.use_backend = v.trim() == "0";
        }
        cfg
    }

    /// Number of workers an element-wise loop may use.
    pub fn effective_threads(&self) -> usize {
        #[cfg(feature = "parallel")]
        let pool = rayon::current_num_threads();
        #[cfg(not(feature = "parallel"))]
        let pool = 1;

        if self.max_threads == 0 {
            pool
        } else {
            self.max_threads.min(pool)
        }
    }
}

static CONFIG: OnceLock<RwLock<KernelConfig>> = OnceLock::new();

fn global() -> &'static RwLock<KernelConfig> {
    CONFIG.get_or_init(|| {
        let cfg = KernelConfig::from_env();
        log::debug!("kernel configuration initialized: {cfg:?}");
        RwLock::new(cfg)
    })
}

/// Snapshot of the current configuration.
pub fn config() -> KernelConfig {
    *global().read().unwrap_or_else(PoisonError::into_inner)
}

/// Replace the process-wide configuration.
pub fn set_config(cfg: KernelConfig) {
    *global().write().unwrap_or_else(PoisonError::into_inner) = cfg;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_values() {
        let cfg = KernelConfig::default();
        assert!(cfg.use_backend);
        assert_eq!(cfg.max_threads, 0);
        assert_eq!(cfg.parallel_threshold, MIN_PAR_LEN);
    }

    #[test]
    fn test_effective_threads_is_bounded() {
        let cfg = KernelConfig {
            max_threads: 1,
            ..KernelConfig::default()
        };
        assert_eq!(cfg.effective_threads(), 1);
        assert!(KernelConfig::default().effective_threads() >= 1);
    }
}
