//! In-memory implementations of the platform traits.
//!
//! They record every call so tests (and host apps' own tests) can assert on
//! what the scanner did.

#![allow(clippy::missing_panics_doc)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use super::{HapticFeedback, LockSuppressor, Telemetry};

/// Lock suppressor that counts calls and tracks whether suppression is active.
#[derive(Debug, Default)]
pub struct MemoryLockSuppressor {
    acquired: AtomicUsize,
    released: AtomicUsize,
}

impl MemoryLockSuppressor {
    /// Creates a suppressor with no calls recorded.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of `acquire` calls.
    pub fn acquired(&self) -> usize {
        self.acquired.load(Ordering::SeqCst)
    }

    /// Number of `release` calls.
    pub fn released(&self) -> usize {
        self.released.load(Ordering::SeqCst)
    }

    /// Whether the lock screen is currently suppressed.
    pub fn is_suppressed(&self) -> bool {
        self.acquired() > self.released()
    }
}

impl LockSuppressor for MemoryLockSuppressor {
    fn acquire(&self) {
        self.acquired.fetch_add(1, Ordering::SeqCst);
    }

    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }
}

/// Telemetry sink that keeps every report.
#[derive(Debug, Default)]
pub struct MemoryTelemetry {
    reports: Mutex<Vec<(String, String)>>,
}

impl MemoryTelemetry {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Reported `(error, context)` pairs, oldest first.
    pub fn reports(&self) -> Vec<(String, String)> {
        self.reports.lock().unwrap().clone()
    }
}

impl Telemetry for MemoryTelemetry {
    fn report_exception(&self, error: String, context: String) {
        self.reports.lock().unwrap().push((error, context));
    }
}

/// Haptics that count vibrations.
#[derive(Debug, Default)]
pub struct MemoryHaptics {
    vibrations: AtomicUsize,
}

impl MemoryHaptics {
    /// Creates a counter at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of vibrations played.
    pub fn vibrations(&self) -> usize {
        self.vibrations.load(Ordering::SeqCst)
    }
}

impl HapticFeedback for MemoryHaptics {
    fn vibrate(&self) {
        self.vibrations.fetch_add(1, Ordering::SeqCst);
    }
}
