use regex::RegexSet;
use serde::{Deserialize, Serialize};

use super::record::{MrzField, PASSPORT_MRZ_FIELDS};
use crate::error::ScanError;

/// Document codes accepted for passports: `P` optionally followed by one more
/// character (`PP`, `PO`, `PD`, ...).
pub const PASSPORT_DOCUMENT_FILTER: &str = r"^P\w?";

/// What the recognizer should look for in each frame.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct MrzCaptureOptions {
    /// Fields to extract.
    pub fields: Vec<MrzField>,
    /// Regular expressions; a document code must match at least one of them.
    pub document_filters: Vec<String>,
}

impl Default for MrzCaptureOptions {
    fn default() -> Self {
        Self::passport()
    }
}

impl MrzCaptureOptions {
    /// Options for passport data pages.
    #[must_use]
    pub fn passport() -> Self {
        Self {
            fields: PASSPORT_MRZ_FIELDS.to_vec(),
            document_filters: vec![PASSPORT_DOCUMENT_FILTER.to_string()],
        }
    }
}

/// Compiled form of [`MrzCaptureOptions::document_filters`].
#[derive(Debug, Clone)]
pub(crate) struct DocumentFilter(RegexSet);

impl DocumentFilter {
    pub(crate) fn new(patterns: &[String]) -> Result<Self, ScanError> {
        if patterns.is_empty() {
            return Err(ScanError::InvalidConfig {
                reason: "at least one document filter is required".to_string(),
            });
        }
        RegexSet::new(patterns)
            .map(Self)
            .map_err(|e| ScanError::InvalidConfig {
                reason: format!("invalid document filter: {e}"),
            })
    }

    /// A candidate without a document code is accepted; the recognizer was
    /// already given the same filter.
    pub(crate) fn accepts(&self, document_code: Option<&str>) -> bool {
        document_code.is_none_or(|code| self.0.is_match(code.trim()))
    }
}
