use strum::{Display, EnumString};

use crate::chip::ScanResult;
use crate::mrz::MrzRecord;

/// The stages of a passport scan, without their data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, uniffi::Enum)]
pub enum ScanStage {
    /// Waiting for camera frames.
    #[strum(serialize = "scanMRZ")]
    ScanMrz,
    /// The recognizer is evaluating a frame.
    #[strum(serialize = "hold")]
    Hold,
    /// The MRZ was captured and awaits the user's confirmation.
    #[strum(serialize = "mrzCheck")]
    MrzCheck,
    /// MRZ confirmed, chip read not started yet.
    #[strum(serialize = "nfcStart")]
    NfcStartPrompt,
    /// Chip read running.
    #[strum(serialize = "nfcInProgress")]
    NfcTransferInProgress,
    /// Chip read finished.
    #[strum(serialize = "nfcSuccess")]
    NfcScanSuccess,
    /// The last chip read failed; it can be retried.
    #[strum(serialize = "nfcFailure")]
    NfcScanFailure,
}

/// What the UI should show, with the data and actions of the current stage.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Enum)]
pub enum PassportScanStatus {
    /// Show the camera; feed frames to `on_text_recognized`.
    ScanMrz,
    /// Show the camera with a "hold still" hint.
    Hold,
    /// Show the captured MRZ; offer `confirm_mrz_scan` and `restart_mrz_scan`.
    MrzCheck {
        /// The captured fields.
        mrz: MrzRecord,
    },
    /// Ask the user to hold the passport to the phone.
    NfcStartPrompt {
        /// Whether to offer a button calling `start_nfc_scan`. When `false`,
        /// the read starts by itself.
        can_start: bool,
    },
    /// Show read progress.
    NfcTransferInProgress {
        /// Percent complete; 0 until the chip has been discovered.
        progress: u8,
    },
    /// The chip was read.
    NfcScanSuccess {
        /// The confirmed MRZ.
        mrz: MrzRecord,
        /// The chip data.
        result: ScanResult,
    },
    /// The chip read failed; offer `start_nfc_scan` to retry or
    /// `restart_mrz_scan` to capture again.
    NfcScanFailure {
        /// Human-readable failure reason.
        reason: String,
    },
}

impl PassportScanStatus {
    /// The stage this status belongs to.
    #[must_use]
    pub const fn stage(&self) -> ScanStage {
        match self {
            Self::ScanMrz => ScanStage::ScanMrz,
            Self::Hold => ScanStage::Hold,
            Self::MrzCheck { .. } => ScanStage::MrzCheck,
            Self::NfcStartPrompt { .. } => ScanStage::NfcStartPrompt,
            Self::NfcTransferInProgress { .. } => ScanStage::NfcTransferInProgress,
            Self::NfcScanSuccess { .. } => ScanStage::NfcScanSuccess,
            Self::NfcScanFailure { .. } => ScanStage::NfcScanFailure,
        }
    }
}

/// Receives a status snapshot after every change.
#[uniffi::export(with_foreign)]
pub trait ScanStatusListener: Send + Sync {
    /// Called with the new status. Must not call back into the scanner
    /// synchronously.
    fn on_status_changed(&self, status: PassportScanStatus);
}
