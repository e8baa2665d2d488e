use thiserror::Error;

/// Error outputs from the passport scanner.
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum ScanError {
    /// Required MRZ fields are missing, so no chip read can be attempted.
    ///
    /// Raised before the chip reader is called; never reported as a hardware failure.
    #[error("passport MRZ data missing: {missing:?}")]
    Validation {
        /// The MRZ fields that were empty or absent.
        missing: Vec<String>,
    },
    /// The requested action is not valid in the current state.
    #[error("invalid_transition: cannot {action} while in {state}")]
    InvalidTransition {
        /// Name of the state the session was in.
        state: String,
        /// The rejected action.
        action: String,
    },
    /// The scanner was unmounted; the session no longer accepts actions.
    #[error("scanner_unmounted")]
    Unmounted,
    /// The provided configuration is not valid.
    #[error("invalid_config: {reason}")]
    InvalidConfig {
        /// Why the configuration was rejected.
        reason: String,
    },
}

/// Failure reported by the NFC chip reader.
///
/// These are hardware failures: they move the session to
/// [`PassportScanStatus::NfcScanFailure`](crate::PassportScanStatus::NfcScanFailure)
/// and are reported to telemetry, but they are not returned as errors from
/// [`PassportScanner::start_nfc_scan`](crate::PassportScanner::start_nfc_scan).
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum ChipReadError {
    /// The tag left the field before the read completed.
    #[error("tag lost: {0}")]
    TagLost(String),
    /// Access control (BAC/PACE) rejected the MRZ-derived keys.
    #[error("authentication failed: {0}")]
    Authentication(String),
    /// The driver gave up waiting for the tag.
    #[error("timeout: {0}")]
    Timeout(String),
    /// The user dismissed the system NFC sheet.
    #[error("cancelled by user")]
    Cancelled,
    /// The device cannot read NFC chips.
    #[error("nfc not supported")]
    Unsupported,
    /// Any other reader failure.
    #[error("{0}")]
    Generic(String),
    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for ChipReadError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}

/// Failure reported by the MRZ recognizer.
///
/// OCR failures are owned by the recognizer: the scanner logs them and goes
/// back to waiting for frames.
#[derive(Debug, Clone, PartialEq, Eq, Error, uniffi::Error)]
pub enum CaptureError {
    /// The frame could not be evaluated.
    #[error("recognition failed: {0}")]
    Recognition(String),
    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for CaptureError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}
