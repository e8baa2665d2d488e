//! NFC chip reading.
//!
//! The secure-channel protocol (BAC/PACE, secure messaging, data group
//! parsing) is implemented by the host app's reader. The scanner passes it the
//! MRZ-derived key material and a label per [`ProgressStage`], and receives
//! progress through a [`ChipReadProgress`] handle.

mod availability;
mod labels;

pub use availability::{AppState, NfcAvailability};
pub use labels::{ProgressStage, SessionLabels, Translator};

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::error::ChipReadError;
use crate::mrz::ChipAccessKey;

/// Parameters for one chip read.
#[derive(Debug, Clone, PartialEq, Eq, uniffi::Record)]
pub struct ChipScanParams {
    /// Document number from the MRZ.
    pub document_number: String,
    /// Date of birth, `YYMMDD`.
    pub date_of_birth: String,
    /// Date of expiry, `YYMMDD`.
    pub date_of_expiry: String,
    /// Label to show for each stage.
    pub session_labels: HashMap<ProgressStage, String>,
}

impl ChipScanParams {
    pub(crate) fn new(key: ChipAccessKey, labels: SessionLabels) -> Self {
        Self {
            document_number: key.document_number,
            date_of_birth: key.date_of_birth,
            date_of_expiry: key.date_of_expiry,
            session_labels: labels.into_map(),
        }
    }
}

/// Data read from the passport chip.
///
/// The scanner does not interpret it; it is handed on to credential issuance.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct ScanResult {
    /// Raw data groups, keyed by data group number (1 = MRZ, 2 = portrait, ...).
    pub data_groups: HashMap<u8, Vec<u8>>,
    /// Document security object (`EF.SOD`).
    pub security_object: Vec<u8>,
}

/// Handle the reader uses to report progress of a running read.
///
/// Reports are in percent; values above 100 are clamped. Reports that arrive
/// after the read finished are ignored.
#[derive(uniffi::Object)]
pub struct ChipReadProgress {
    on_progress: Box<dyn Fn(u8) + Send + Sync>,
}

impl ChipReadProgress {
    pub(crate) fn new(on_progress: impl Fn(u8) + Send + Sync + 'static) -> Self {
        Self {
            on_progress: Box::new(on_progress),
        }
    }
}

#[uniffi::export]
impl ChipReadProgress {
    /// Reports that the read is `percent` complete.
    pub fn report(&self, percent: u8) {
        (self.on_progress)(percent.min(100));
    }
}

impl fmt::Debug for ChipReadProgress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ChipReadProgress").finish_non_exhaustive()
    }
}

/// NFC passport reader provided by the host app.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait ChipReader: Send + Sync {
    /// Whether the device has NFC hardware able to read passports.
    fn is_supported(&self) -> bool;

    /// Whether NFC is currently switched on.
    ///
    /// # Errors
    ///
    /// Returns an error if the state cannot be determined.
    async fn is_enabled(&self) -> Result<bool, ChipReadError>;

    /// Opens the system NFC settings.
    fn open_settings(&self);

    /// Reads the chip, authenticating with the MRZ-derived keys in `params`.
    ///
    /// # Errors
    ///
    /// Returns an error if the read did not complete (tag lost, access
    /// control failed, timeout, ...).
    async fn scan(
        &self,
        params: ChipScanParams,
        progress: Arc<ChipReadProgress>,
    ) -> Result<ScanResult, ChipReadError>;
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use super::*;

    #[test]
    fn test_progress_is_clamped() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        let progress = ChipReadProgress::new(move |percent| sink.lock().unwrap().push(percent));

        progress.report(10);
        progress.report(250);

        assert_eq!(*seen.lock().unwrap(), vec![10, 100]);
    }

    #[test]
    fn test_params_from_access_key() {
        let key = ChipAccessKey {
            document_number: "P1234567".to_string(),
            date_of_birth: "900101".to_string(),
            date_of_expiry: "300101".to_string(),
        };

        let params = ChipScanParams::new(key, SessionLabels::default());
        assert_eq!(params.document_number, "P1234567");
        assert_eq!(params.date_of_birth, "900101");
        assert_eq!(params.date_of_expiry, "300101");
        assert_eq!(
            params.session_labels.get(&ProgressStage::Authenticating).map(String::as_str),
            Some("Authenticating with the passport")
        );
    }
}
