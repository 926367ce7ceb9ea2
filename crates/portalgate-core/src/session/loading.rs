use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Process-wide "sign-in in progress" flag.
///
/// Only one [`LoadingGuard`] can exist at a time. Attempts made while the
/// flag is held are rejected, not queued.
#[derive(Debug, Clone, Default)]
pub struct LoadingFlag {
    inner: Arc<AtomicBool>,
}

impl LoadingFlag {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_loading(&self) -> bool {
        self.inner.load(Ordering::Acquire)
    }

    /// Set the flag if it is clear. The flag is cleared again when the
    /// returned guard is dropped.
    pub fn try_acquire(&self) -> Option<LoadingGuard> {
        self.inner
            .compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| LoadingGuard {
                flag: Arc::clone(&self.inner),
            })
    }
}

/// Holds the loading flag; releases it on drop.
#[derive(Debug)]
#[must_use = "the loading flag is released as soon as the guard is dropped"]
pub struct LoadingGuard {
    flag: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.flag.store(false, Ordering::Release);
    }
}
