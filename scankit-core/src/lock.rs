//! Scoped lock-screen suppression.
//!
//! Suppression is reference counted per scanner: the platform's
//! [`LockSuppressor::acquire`] runs when the first guard is taken and
//! [`LockSuppressor::release`] when the last guard is dropped. Overlapping
//! holders therefore never re-enable the lock screen early.

use std::sync::{Arc, Mutex, PoisonError};

use crate::platform::LockSuppressor;

struct Shared {
    suppressor: Arc<dyn LockSuppressor>,
    holders: Mutex<usize>,
}

/// Per-scanner suppression counter.
#[derive(Clone)]
pub(crate) struct LockSuppression {
    shared: Arc<Shared>,
}

/// Keeps the lock screen suppressed for its lifetime.
#[must_use = "suppression ends when the guard is dropped"]
pub(crate) struct SuppressionGuard {
    shared: Arc<Shared>,
}

impl LockSuppression {
    pub(crate) fn new(suppressor: Arc<dyn LockSuppressor>) -> Self {
        Self {
            shared: Arc::new(Shared {
                suppressor,
                holders: Mutex::new(0),
            }),
        }
    }

    pub(crate) fn acquire(&self) -> SuppressionGuard {
        let mut holders = self
            .shared
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if *holders == 0 {
            log::debug!("Suppressing background lock screen");
            self.shared.suppressor.acquire();
        }
        *holders += 1;

        SuppressionGuard {
            shared: Arc::clone(&self.shared),
        }
    }

    #[cfg(test)]
    fn holders(&self) -> usize {
        *self.shared.holders.lock().unwrap()
    }
}

impl Drop for SuppressionGuard {
    fn drop(&mut self) {
        let mut holders = self
            .shared
            .holders
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        *holders = holders.saturating_sub(1);
        if *holders == 0 {
            log::debug!("Restoring background lock screen");
            self.shared.suppressor.release();
        }
    }
}
