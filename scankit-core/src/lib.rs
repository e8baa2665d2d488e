#![deny(clippy::all, clippy::pedantic, clippy::nursery)]
//! Passport capture and chip-read orchestration.
//!
//! `scankit-core` drives the two hardware steps of onboarding an ICAO-9303
//! passport into a wallet:
//!
//! 1. a camera-fed recognizer extracts the Machine-Readable Zone (MRZ), which
//!    the user confirms;
//! 2. the NFC chip is read, authenticated with key material derived from the
//!    confirmed MRZ.
//!
//! Recognition, the chip protocol and every other platform concern are
//! provided by the host app through foreign traits ([`MrzCapture`],
//! [`ChipReader`], [`LockSuppressor`], [`Telemetry`], ...). The
//! [`PassportScanner`] ties them together and exposes a single
//! [`PassportScanStatus`] to the UI.
//!
//! ```rust,ignore
//! let scanner = PassportScanner::new(
//!     ScannerConfig::for_platform(Platform::Ios),
//!     mrz_capture,
//!     chip_reader,
//!     lock_suppressor,
//!     telemetry,
//!     haptics,
//!     None,
//! )?;
//!
//! scanner.on_camera_ready();
//! scanner.on_text_recognized(frame).await?;
//! if let PassportScanStatus::MrzCheck { mrz } = scanner.status() {
//!     scanner.confirm_mrz_scan().await?;
//!     scanner.start_nfc_scan().await?;
//! }
//! ```

use strum::EnumString;

/// Mobile platform the scanner runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum, EnumString)]
#[strum(serialize_all = "lowercase")]
pub enum Platform {
    /// Apple iOS. The OS presents its own NFC sheet.
    Ios,
    /// Android.
    Android,
}

mod config;
pub use config::*;

mod error;
pub use error::*;

pub mod logger;

mod lock;

pub mod chip;
pub use chip::{
    ChipReadProgress, ChipReader, ChipScanParams, NfcAvailability, ProgressStage, ScanResult,
    SessionLabels, Translator,
};

pub mod mrz;
pub use mrz::{MrzCandidate, MrzCapture, MrzCaptureOptions, MrzField, MrzRecord, RecognizedText};

pub mod platform;
pub use platform::{HapticFeedback, LockSuppressor, Telemetry};

mod scanner;
pub use scanner::{
    PassportScanStatus, PassportScanner, ScanStage, ScanStatusListener, NFC_TRANSFER_FAILURE,
};

uniffi::setup_scaffolding!("scankit_core");
