use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, IntoEnumIterator};

const TRANSLATION_PREFIX: &str = "onboarding.passportScan.nfcInProgress.status";

/// Milestones of a chip read, in protocol order, followed by the error
/// outcomes. Each one gets a label the reader may show (the iOS NFC sheet
/// displays it as the sheet message).
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Display,
    EnumIter,
    Serialize,
    Deserialize,
    uniffi::Enum,
)]
#[strum(serialize_all = "camelCase")]
#[serde(rename_all = "camelCase")]
pub enum ProgressStage {
    /// Waiting for the passport to be held against the phone.
    #[strum(serialize = "lookingForNFCTag")]
    #[serde(rename = "lookingForNFCTag")]
    LookingForNfcTag,
    /// Running access control with the MRZ-derived keys.
    Authenticating,
    /// Reading DG1 (the MRZ stored on the chip).
    #[strum(serialize = "readingDG1")]
    #[serde(rename = "readingDG1")]
    ReadingDg1,
    /// Reading DG2 (the portrait).
    #[strum(serialize = "readingDG2")]
    #[serde(rename = "readingDG2")]
    ReadingDg2,
    /// Reading remaining data groups and the security object.
    ReadingGeneric,
    /// Read finished.
    Success,
    /// The chip rejected the MRZ-derived keys.
    #[strum(serialize = "errorInvalidMRZ")]
    #[serde(rename = "errorInvalidMRZ")]
    ErrorInvalidMrz,
    /// The tag is not an eMRTD chip.
    ErrorInvalidTag,
    /// Connection to the tag was lost.
    ErrorConnection,
    /// Any other failure.
    ErrorGeneric,
}

impl ProgressStage {
    /// Translation key of this stage's label.
    #[must_use]
    pub fn translation_key(self) -> String {
        let suffix = match self {
            Self::LookingForNfcTag => "looking",
            Self::Authenticating => "authenticating",
            Self::ReadingDg1 => "details",
            Self::ReadingDg2 => "photo",
            Self::ReadingGeneric => "verifying",
            Self::Success => "success",
            Self::ErrorInvalidMrz => "error.invalidMRZ",
            Self::ErrorInvalidTag => "error.invalidTag",
            Self::ErrorConnection => "error.connection",
            Self::ErrorGeneric => "error.generic",
        };
        format!("{TRANSLATION_PREFIX}.{suffix}")
    }

    /// Built-in English label, used when no translation is available.
    #[must_use]
    pub const fn fallback_label(self) -> &'static str {
        match self {
            Self::LookingForNfcTag => "Hold your phone near the passport",
            Self::Authenticating => "Authenticating with the passport",
            Self::ReadingDg1 => "Reading personal details",
            Self::ReadingDg2 => "Reading photo",
            Self::ReadingGeneric => "Verifying document",
            Self::Success => "Passport read successfully",
            Self::ErrorInvalidMrz => "The scanned MRZ does not match this passport",
            Self::ErrorInvalidTag => "This tag is not a supported passport chip",
            Self::ErrorConnection => "Connection to the passport was lost",
            Self::ErrorGeneric => "Reading the passport failed",
        }
    }

    /// Whether the stage reports a failed read.
    #[must_use]
    pub const fn is_error(self) -> bool {
        matches!(
            self,
            Self::ErrorInvalidMrz
                | Self::ErrorInvalidTag
                | Self::ErrorConnection
                | Self::ErrorGeneric
        )
    }
}

/// Resolves translation keys to strings in the user's language.
#[uniffi::export(with_foreign)]
pub trait Translator: Send + Sync {
    /// Returns the localized string for `key`, or `None` if it has no entry.
    fn translate(&self, key: String) -> Option<String>;
}

/// Label for every [`ProgressStage`], handed to the chip reader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionLabels(HashMap<ProgressStage, String>);

impl Default for SessionLabels {
    fn default() -> Self {
        Self::resolve(None)
    }
}

impl SessionLabels {
    /// Builds the label table, falling back to English for missing or blank
    /// translations.
    #[must_use]
    pub fn resolve(translator: Option<&dyn Translator>) -> Self {
        let labels = ProgressStage::iter()
            .map(|stage| {
                let label = translator
                    .and_then(|translator| translator.translate(stage.translation_key()))
                    .filter(|label| !label.trim().is_empty())
                    .unwrap_or_else(|| stage.fallback_label().to_string());
                (stage, label)
            })
            .collect();
        Self(labels)
    }

    /// Label of `stage`.
    #[must_use]
    pub fn get(&self, stage: ProgressStage) -> Option<&str> {
        self.0.get(&stage).map(String::as_str)
    }

    /// Consumes the table into the map passed over FFI.
    #[must_use]
    pub fn into_map(self) -> HashMap<ProgressStage, String> {
        self.0
    }
}
