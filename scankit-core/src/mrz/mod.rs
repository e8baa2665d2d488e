//! Machine-Readable Zone capture.
//!
//! The optical recognition itself lives in the host app (ML Kit on Android,
//! Vision on iOS). The scanner only hands it camera text frames together with
//! [`MrzCaptureOptions`] and consumes the resulting [`MrzCandidate`].

mod filter;
mod record;

pub use filter::{MrzCaptureOptions, PASSPORT_DOCUMENT_FILTER};
pub(crate) use filter::DocumentFilter;
pub(crate) use record::ChipAccessKey;
pub use record::{MrzCandidate, MrzField, MrzRecord, CHIP_ACCESS_FIELDS, PASSPORT_MRZ_FIELDS};

use crate::error::CaptureError;

/// Text recognized by the camera in one frame.
#[derive(Debug, Clone, Default, PartialEq, Eq, uniffi::Record)]
pub struct RecognizedText {
    /// Recognized text blocks, top to bottom.
    pub blocks: Vec<String>,
}

impl RecognizedText {
    /// Whether the frame contains no text at all.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.blocks.iter().all(|block| block.trim().is_empty())
    }
}

/// MRZ recognizer provided by the host app.
#[uniffi::export(with_foreign)]
#[async_trait::async_trait]
pub trait MrzCapture: Send + Sync {
    /// Evaluates one frame.
    ///
    /// Returns `Ok(None)` when the frame holds no MRZ matching `options`.
    ///
    /// # Errors
    ///
    /// Returns an error if the recognizer failed on this frame.
    async fn recognize(
        &self,
        frame: RecognizedText,
        options: MrzCaptureOptions,
    ) -> Result<Option<MrzCandidate>, CaptureError>;

    /// Discards any accumulated recognition state so capture starts over.
    fn retry(&self);
}
