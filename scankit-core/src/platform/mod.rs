//! Platform capabilities the scanner drives besides the two hardware sources.
//!
//! Each host app provides implementations:
//!
//! ## iOS (Swift)
//! - `LockSuppressor`: flag read by the PIN cover before it presents itself
//! - `Telemetry`: Sentry `captureException` with the context as extra
//! - `HapticFeedback`: `UINotificationFeedbackGenerator`
//!
//! ## Android (Kotlin)
//! - `LockSuppressor`: same flag as iOS
//! - `Telemetry`: Sentry
//! - `HapticFeedback`: `Vibrator` (unused with the default Android policy)

pub mod memory;

/// Suppresses the PIN lock screen that normally covers the app when it goes
/// to the background.
///
/// The iOS NFC sheet sends the app to the inactive state; without
/// suppression the lock screen would appear in the middle of a chip read.
/// Calls always come in `acquire`/`release` pairs.
#[uniffi::export(with_foreign)]
pub trait LockSuppressor: Send + Sync {
    /// Stops the lock screen from showing on backgrounding.
    fn acquire(&self);

    /// Lets the lock screen show on backgrounding again.
    fn release(&self);
}

/// Exception reporting.
#[uniffi::export(with_foreign)]
pub trait Telemetry: Send + Sync {
    /// Reports `error`, annotated with where it happened.
    fn report_exception(&self, error: String, context: String);
}

/// Haptic feedback.
#[uniffi::export(with_foreign)]
pub trait HapticFeedback: Send + Sync {
    /// Plays a single short vibration.
    fn vibrate(&self);
}
