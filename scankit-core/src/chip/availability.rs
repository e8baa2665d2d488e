use std::sync::{Arc, Mutex, PoisonError};

use super::ChipReader;

/// Foreground state of the host app.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AppState {
    /// In the foreground and receiving events.
    Active,
    /// Transitioning, e.g. a system sheet or the app switcher is shown.
    Inactive,
    /// In the background.
    Background,
}

/// NFC support and on/off probes, used to warn the user before a scan.
///
/// Neither probe blocks a chip read: a scan attempted with NFC switched off
/// simply fails like any other hardware failure.
#[derive(uniffi::Object)]
pub struct NfcAvailability {
    reader: Arc<dyn ChipReader>,
    supported: bool,
    enabled: Mutex<Option<bool>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl NfcAvailability {
    /// Creates the probes. Hardware support is queried once, here.
    #[uniffi::constructor]
    #[must_use]
    pub fn new(reader: Arc<dyn ChipReader>) -> Self {
        let supported = reader.is_supported();
        log::debug!("NFC supported: {supported}");
        Self {
            reader,
            supported,
            enabled: Mutex::new(None),
        }
    }

    /// Whether the device can read passport chips.
    #[must_use]
    pub fn is_supported(&self) -> bool {
        self.supported
    }

    /// Last known on/off state; `None` until probed or if probing failed.
    #[must_use]
    pub fn is_enabled(&self) -> Option<bool> {
        *self.enabled.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Queries the reader for the on/off state and caches the answer.
    pub async fn refresh_enabled(&self) -> Option<bool> {
        let enabled = if self.supported {
            match self.reader.is_enabled().await {
                Ok(enabled) => Some(enabled),
                Err(e) => {
                    log::warn!("Failed to query NFC state: {e}");
                    None
                }
            }
        } else {
            Some(false)
        };

        *self.enabled.lock().unwrap_or_else(PoisonError::into_inner) = enabled;
        enabled
    }

    /// Re-probes the on/off state when the app returns to the foreground,
    /// since the user may have toggled NFC in the system settings meanwhile.
    pub async fn on_app_state_changed(&self, state: AppState) -> Option<bool> {
        match state {
            AppState::Active => self.refresh_enabled().await,
            AppState::Inactive | AppState::Background => self.is_enabled(),
        }
    }

    /// Opens the system NFC settings.
    pub fn open_settings(&self) {
        self.reader.open_settings();
    }
}
