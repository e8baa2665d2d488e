use serde::{Deserialize, Serialize};

use crate::error::ScanError;
use crate::mrz::{DocumentFilter, MrzCaptureOptions};
use crate::Platform;

/// Platform-dependent behavior of the scanner.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct PlatformPolicy {
    /// Start the chip read as soon as the MRZ is confirmed instead of waiting
    /// for an explicit `start_nfc_scan`.
    ///
    /// Must be off where the OS shows its own modal NFC sheet (iOS), which
    /// should never appear unsolicited.
    pub auto_start_chip_read: bool,
    /// Vibrate once when the chip is first discovered.
    pub vibrate_on_discovery: bool,
}

impl PlatformPolicy {
    /// The default policy for `platform`.
    #[must_use]
    pub const fn for_platform(platform: Platform) -> Self {
        match platform {
            Platform::Android => Self {
                auto_start_chip_read: true,
                vibrate_on_discovery: false,
            },
            Platform::Ios => Self {
                auto_start_chip_read: false,
                vibrate_on_discovery: true,
            },
        }
    }
}

/// Scanner configuration.
///
/// ```json
/// {
///   "policy": { "auto_start_chip_read": false, "vibrate_on_discovery": true },
///   "capture": {
///     "fields": ["documentNumber", "birthDateYYMMDD", "expirationDateYYMMDD"],
///     "document_filters": ["^P\\w?"]
///   }
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct ScannerConfig {
    /// Platform-dependent behavior.
    pub policy: PlatformPolicy,
    /// What the MRZ recognizer looks for.
    #[serde(default)]
    pub capture: MrzCaptureOptions,
}

impl ScannerConfig {
    /// Defaults for `platform`, capturing passports.
    #[must_use]
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            policy: PlatformPolicy::for_platform(platform),
            capture: MrzCaptureOptions::passport(),
        }
    }

    /// Parses and validates a JSON configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfig`] if the JSON is malformed or the
    /// configuration fails [`ScannerConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, ScanError> {
        let config: Self = serde_json::from_str(json).map_err(|e| ScanError::InvalidConfig {
            reason: format!("failed to parse scanner config: {e}"),
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Checks that the capture options can drive a chip read.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfig`] if a chip access field is not
    /// captured or a document filter is not a valid regular expression.
    pub fn validate(&self) -> Result<(), ScanError> {
        self.document_filter().map(|_| ())
    }

    pub(crate) fn document_filter(&self) -> Result<DocumentFilter, ScanError> {
        if let Some(field) = crate::mrz::CHIP_ACCESS_FIELDS
            .iter()
            .find(|field| !self.capture.fields.contains(field))
        {
            return Err(ScanError::InvalidConfig {
                reason: format!("capture fields must include {field}"),
            });
        }
        DocumentFilter::new(&self.capture.document_filters)
    }
}

/// Default configuration for `platform`.
#[uniffi::export]
#[must_use]
pub fn default_scanner_config(platform: Platform) -> ScannerConfig {
    ScannerConfig::for_platform(platform)
}

/// Parses a JSON scanner configuration.
///
/// # Errors
///
/// See [`ScannerConfig::from_json`].
#[uniffi::export]
pub fn scanner_config_from_json(json: String) -> Result<ScannerConfig, ScanError> {
    ScannerConfig::from_json(&json)
}
