//! Shared in-progress flag for UI gating.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

/// Cloneable view of whether a sync operation is running.
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

    /// Marks an operation as running until the guard is dropped.
    pub(crate) fn begin(&self) -> LoadingGuard {
        self.inner.store(true, Ordering::Release);
        LoadingGuard {
            inner: Arc::clone(&self.inner),
        }
    }
}

pub(crate) struct LoadingGuard {
    inner: Arc<AtomicBool>,
}

impl Drop for LoadingGuard {
    fn drop(&mut self) {
        self.inner.store(false, Ordering::Release);
    }
}
