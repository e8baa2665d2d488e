//! The scan workflow as a pure state machine.
//!
//! ```text
//!  ScanMrz ──frame──▶ Hold ──candidate──▶ MrzCheck ──confirm──▶ NfcStartPrompt
//!     ▲                │                     │                       │
//!     └────no MRZ──────┘                     │                  chip read
//!     ▲                                      │                       ▼
//!     └─────────────restart──────────────────┘            NfcTransferInProgress
//!                                                           │              │
//!                                   NfcScanFailure ◀──rejected      resolved──▶ NfcScanSuccess
//!                                         │
//!                                       retry ──▶ NfcStartPrompt
//! ```
//!
//! Data lives only in the variants that need it, so a result without an MRZ,
//! or progress while no read is running, cannot be represented.

use crate::chip::ScanResult;
use crate::config::PlatformPolicy;
use crate::error::{ChipReadError, ScanError};
use crate::mrz::{ChipAccessKey, MrzRecord};

use super::status::{PassportScanStatus, ScanStage};

/// State of one scan session.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) enum ScanState {
    #[default]
    ScanMrz,
    Hold,
    MrzCheck {
        mrz: MrzRecord,
    },
    NfcStartPrompt {
        mrz: MrzRecord,
        /// A read was attempted before; the prompt was reached by retrying.
        retried: bool,
    },
    NfcTransferInProgress {
        mrz: MrzRecord,
        progress: u8,
    },
    NfcScanSuccess {
        mrz: MrzRecord,
        result: ScanResult,
    },
    NfcScanFailure {
        mrz: MrzRecord,
        error: ChipReadError,
    },
}

/// Inputs that move the state machine.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum ScanEvent {
    /// The recognizer started evaluating a frame.
    FrameAccepted,
    /// The recognizer finished; `None` means the frame had no usable MRZ.
    RecognitionFinished(Option<MrzRecord>),
    Confirm,
    Restart,
    Retry,
    ChipReadStarted,
    Progress(u8),
    ChipReadSucceeded(ScanResult),
    ChipReadFailed(ChipReadError),
}

impl ScanEvent {
    const fn name(&self) -> &'static str {
        match self {
            Self::FrameAccepted => "evaluate frame",
            Self::RecognitionFinished(_) => "finish recognition",
            Self::Confirm => "confirm MRZ",
            Self::Restart => "restart MRZ scan",
            Self::Retry => "retry chip read",
            Self::ChipReadStarted => "start chip read",
            Self::Progress(_) => "report progress",
            Self::ChipReadSucceeded(_) => "complete chip read",
            Self::ChipReadFailed(_) => "fail chip read",
        }
    }
}

impl ScanState {
    pub(crate) const fn stage(&self) -> ScanStage {
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

    /// The captured MRZ, once there is one.
    pub(crate) const fn mrz(&self) -> Option<&MrzRecord> {
        match self {
            Self::ScanMrz | Self::Hold => None,
            Self::MrzCheck { mrz }
            | Self::NfcStartPrompt { mrz, .. }
            | Self::NfcTransferInProgress { mrz, .. }
            | Self::NfcScanSuccess { mrz, .. }
            | Self::NfcScanFailure { mrz, .. } => Some(mrz),
        }
    }

    /// Access key of the captured MRZ.
    pub(crate) fn chip_access_key(&self) -> Result<ChipAccessKey, ScanError> {
        self.mrz().map_or_else(
            || {
                Err(ScanError::InvalidTransition {
                    state: self.stage().to_string(),
                    action: ScanEvent::ChipReadStarted.name().to_string(),
                })
            },
            MrzRecord::chip_access_key,
        )
    }

    /// Whether the session sits at the prompt without ever having tried a
    /// read, which is when auto-start policies kick in.
    pub(crate) const fn awaits_first_chip_read(&self) -> bool {
        matches!(self, Self::NfcStartPrompt { retried: false, .. })
    }

    /// Computes the state that follows `event`.
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidTransition`] if `event` is not accepted in this state.
    /// - [`ScanError::Validation`] if a chip read would start without the
    ///   document number, date of birth and date of expiry.
    pub(crate) fn apply(&self, event: ScanEvent) -> Result<Self, ScanError> {
        let next = match (self, event) {
            (Self::ScanMrz, ScanEvent::FrameAccepted) => Self::Hold,
            (Self::Hold, ScanEvent::RecognitionFinished(None)) => Self::ScanMrz,
            (Self::Hold, ScanEvent::RecognitionFinished(Some(mrz))) => Self::MrzCheck { mrz },

            (Self::MrzCheck { mrz }, ScanEvent::Confirm) => Self::NfcStartPrompt {
                mrz: mrz.clone(),
                retried: false,
            },
            (
                Self::MrzCheck { .. } | Self::NfcStartPrompt { .. } | Self::NfcScanFailure { .. },
                ScanEvent::Restart,
            ) => Self::ScanMrz,

            (Self::NfcScanFailure { mrz, .. }, ScanEvent::Retry) => Self::NfcStartPrompt {
                mrz: mrz.clone(),
                retried: true,
            },
            (Self::NfcStartPrompt { mrz, .. }, ScanEvent::ChipReadStarted) => {
                mrz.chip_access_key()?;
                Self::NfcTransferInProgress {
                    mrz: mrz.clone(),
                    progress: 0,
                }
            }

            (Self::NfcTransferInProgress { mrz, .. }, ScanEvent::Progress(progress)) => {
                Self::NfcTransferInProgress {
                    mrz: mrz.clone(),
                    progress: progress.min(100),
                }
            }
            (Self::NfcTransferInProgress { mrz, .. }, ScanEvent::ChipReadSucceeded(result)) => {
                Self::NfcScanSuccess {
                    mrz: mrz.clone(),
                    result,
                }
            }
            (Self::NfcTransferInProgress { mrz, .. }, ScanEvent::ChipReadFailed(error)) => {
                Self::NfcScanFailure {
                    mrz: mrz.clone(),
                    error,
                }
            }

            (state, event) => {
                return Err(ScanError::InvalidTransition {
                    state: state.stage().to_string(),
                    action: event.name().to_string(),
                })
            }
        };
        Ok(next)
    }

    /// Snapshot for the UI.
    pub(crate) fn status(&self, policy: &PlatformPolicy) -> PassportScanStatus {
        match self {
            Self::ScanMrz => PassportScanStatus::ScanMrz,
            Self::Hold => PassportScanStatus::Hold,
            Self::MrzCheck { mrz } => PassportScanStatus::MrzCheck { mrz: mrz.clone() },
            Self::NfcStartPrompt { .. } => PassportScanStatus::NfcStartPrompt {
                can_start: !policy.auto_start_chip_read,
            },
            Self::NfcTransferInProgress { progress, .. } => {
                PassportScanStatus::NfcTransferInProgress {
                    progress: *progress,
                }
            }
            Self::NfcScanSuccess { mrz, result } => PassportScanStatus::NfcScanSuccess {
                mrz: mrz.clone(),
                result: result.clone(),
            },
            Self::NfcScanFailure { error, .. } => PassportScanStatus::NfcScanFailure {
                reason: error.to_string(),
            },
        }
    }
}
