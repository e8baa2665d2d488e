//! The passport scan orchestrator.
//!
//! [`PassportScanner`] owns one scan session for as long as the scan screen
//! is mounted. It feeds camera frames to the MRZ recognizer, gates the chip
//! read behind the user's confirmation of the MRZ, runs the read with the
//! lock screen suppressed and turns the outcome into a
//! [`PassportScanStatus`].
//!
//! Session state is kept behind a mutex that is only held to compute and
//! commit a transition, never across a call into the recognizer or the
//! reader.

mod state;
mod status;

pub use status::{PassportScanStatus, ScanStage, ScanStatusListener};

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use tokio::sync::watch;

use crate::chip::{ChipReadProgress, ChipReader, ChipScanParams, ScanResult, SessionLabels, Translator};
use crate::config::{PlatformPolicy, ScannerConfig};
use crate::error::{ChipReadError, ScanError};
use crate::lock::LockSuppression;
use crate::mrz::{DocumentFilter, MrzCapture, MrzCaptureOptions, MrzRecord, RecognizedText};
use crate::platform::{HapticFeedback, LockSuppressor, Telemetry};

use state::{ScanEvent, ScanState};

/// Telemetry context of chip read failures.
pub const NFC_TRANSFER_FAILURE: &str = "NFC transfer failure";

struct ScanSession {
    state: ScanState,
    camera_ready: bool,
    mounted: bool,
    /// Bumped for every chip read; reports carrying an older attempt are stale.
    attempt: u64,
    tag_discovered: bool,
    /// Bumped for every committed transition.
    version: u64,
}

impl ScanSession {
    const fn ensure_mounted(&self) -> Result<(), ScanError> {
        if self.mounted {
            Ok(())
        } else {
            Err(ScanError::Unmounted)
        }
    }
}

#[derive(Default)]
struct ListenerSlot {
    listener: Option<Arc<dyn ScanStatusListener>>,
    delivered: u64,
}

/// State shared with the progress handles given to the reader.
struct Shared {
    session: Mutex<ScanSession>,
    policy: PlatformPolicy,
    haptics: Arc<dyn HapticFeedback>,
    listener: Mutex<ListenerSlot>,
    status_tx: watch::Sender<PassportScanStatus>,
}

/// A committed transition, to be announced once the session lock is released.
#[must_use]
struct Published {
    version: u64,
    status: PassportScanStatus,
}

impl Shared {
    fn session(&self) -> MutexGuard<'_, ScanSession> {
        self.session.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn commit(&self, session: &mut ScanSession, next: ScanState) -> Published {
        log::debug!(
            "Passport scan: {} -> {}",
            session.state.stage(),
            next.stage()
        );
        session.state = next;
        session.version += 1;

        let status = session.state.status(&self.policy);
        self.status_tx.send_replace(status.clone());
        Published {
            version: session.version,
            status,
        }
    }

    /// Tells the listener about a transition. Outdated announcements that
    /// lost a race with a newer one are dropped.
    fn announce(&self, published: Published) -> PassportScanStatus {
        let listener = {
            let mut slot = self.listener.lock().unwrap_or_else(PoisonError::into_inner);
            if published.version <= slot.delivered {
                None
            } else {
                slot.delivered = published.version;
                slot.listener.clone()
            }
        };
        if let Some(listener) = listener {
            listener.on_status_changed(published.status.clone());
        }
        published.status
    }

    fn transition(&self, event: ScanEvent) -> Result<PassportScanStatus, ScanError> {
        let published = {
            let mut session = self.session();
            session.ensure_mounted()?;
            let next = session.state.apply(event)?;
            self.commit(&mut session, next)
        };
        Ok(self.announce(published))
    }

    fn on_progress(&self, attempt: u64, percent: u8) {
        let (published, discovered) = {
            let mut session = self.session();
            let current = session.mounted
                && session.attempt == attempt
                && matches!(session.state, ScanState::NfcTransferInProgress { .. });
            if !current {
                log::debug!("Ignoring stale chip read progress ({percent}%)");
                return;
            }
            let Ok(next) = session.state.apply(ScanEvent::Progress(percent)) else {
                return;
            };
            let discovered = percent > 0 && !session.tag_discovered;
            session.tag_discovered |= discovered;
            (self.commit(&mut session, next), discovered)
        };

        if discovered {
            log::debug!("Passport chip discovered");
            if self.policy.vibrate_on_discovery {
                self.haptics.vibrate();
            }
        }
        self.announce(published);
    }

    fn settle(&self, attempt: u64, event: ScanEvent) -> Result<PassportScanStatus, ScanError> {
        let published = {
            let mut session = self.session();
            if !session.mounted {
                log::info!("Discarding chip read outcome, scanner was unmounted");
                return Err(ScanError::Unmounted);
            }
            if session.attempt != attempt {
                log::warn!("Discarding outcome of superseded chip read {attempt}");
                return Ok(session.state.status(&self.policy));
            }
            let next = session.state.apply(event)?;
            self.commit(&mut session, next)
        };
        Ok(self.announce(published))
    }
}

/// Marks a chip read as cancelled if its future is dropped before the reader
/// answered, so the session does not stay in progress forever.
struct PendingChipRead<'a> {
    shared: &'a Shared,
    attempt: u64,
    settled: bool,
}

impl PendingChipRead<'_> {
    fn settle(mut self, event: ScanEvent) -> Result<PassportScanStatus, ScanError> {
        self.settled = true;
        self.shared.settle(self.attempt, event)
    }
}

impl Drop for PendingChipRead<'_> {
    fn drop(&mut self) {
        if !self.settled {
            log::warn!("Chip read {} abandoned before completion", self.attempt);
            let _ = self
                .shared
                .settle(self.attempt, ScanEvent::ChipReadFailed(ChipReadError::Cancelled));
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Trigger {
    User,
    AutoStart,
}

/// Orchestrates MRZ capture and the NFC chip read of one passport.
///
/// Create one per mount of the scan screen and call [`unmount`](Self::unmount)
/// when it goes away.
#[derive(uniffi::Object)]
pub struct PassportScanner {
    shared: Arc<Shared>,
    capture_options: MrzCaptureOptions,
    document_filter: DocumentFilter,
    mrz_capture: Arc<dyn MrzCapture>,
    chip_reader: Arc<dyn ChipReader>,
    lock_suppression: LockSuppression,
    telemetry: Arc<dyn Telemetry>,
    translator: Option<Arc<dyn Translator>>,
}

#[uniffi::export(async_runtime = "tokio")]
impl PassportScanner {
    /// Creates a scanner with a fresh session in [`ScanStage::ScanMrz`].
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::InvalidConfig`] if `config` does not validate.
    #[uniffi::constructor]
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        config: ScannerConfig,
        mrz_capture: Arc<dyn MrzCapture>,
        chip_reader: Arc<dyn ChipReader>,
        lock_suppressor: Arc<dyn LockSuppressor>,
        telemetry: Arc<dyn Telemetry>,
        haptics: Arc<dyn HapticFeedback>,
        translator: Option<Arc<dyn Translator>>,
    ) -> Result<Self, ScanError> {
        let document_filter = config.document_filter()?;
        let state = ScanState::default();
        let (status_tx, _) = watch::channel(state.status(&config.policy));

        Ok(Self {
            shared: Arc::new(Shared {
                session: Mutex::new(ScanSession {
                    state,
                    camera_ready: false,
                    mounted: true,
                    attempt: 0,
                    tag_discovered: false,
                    version: 0,
                }),
                policy: config.policy,
                haptics,
                listener: Mutex::new(ListenerSlot::default()),
                status_tx,
            }),
            capture_options: config.capture,
            document_filter,
            mrz_capture,
            chip_reader,
            lock_suppression: LockSuppression::new(lock_suppressor),
            telemetry,
            translator,
        })
    }

    /// Current status.
    #[must_use]
    pub fn status(&self) -> PassportScanStatus {
        self.shared.session().state.status(&self.shared.policy)
    }

    /// Registers the listener told about every status change, replacing any
    /// previous one. `None` unregisters.
    pub fn set_status_listener(&self, listener: Option<Arc<dyn ScanStatusListener>>) {
        self.shared
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listener = listener;
    }

    /// Signals that the camera is running. Frames are ignored until then.
    pub fn on_camera_ready(&self) {
        let mut session = self.shared.session();
        if session.mounted {
            log::debug!("Camera ready");
            session.camera_ready = true;
        }
    }

    /// Hands a camera text frame to the MRZ recognizer.
    ///
    /// The session holds in [`ScanStage::Hold`] while the frame is evaluated.
    /// A usable passport MRZ moves it to [`ScanStage::MrzCheck`]; anything
    /// else (no MRZ, another document type, a recognizer error) returns it to
    /// [`ScanStage::ScanMrz`]. Frames arriving before the camera is ready,
    /// during an evaluation or once an MRZ is held are dropped.
    ///
    /// # Errors
    ///
    /// Returns [`ScanError::Unmounted`] after [`unmount`](Self::unmount).
    pub async fn on_text_recognized(
        &self,
        frame: RecognizedText,
    ) -> Result<PassportScanStatus, ScanError> {
        let published = {
            let mut session = self.shared.session();
            session.ensure_mounted()?;
            let accepting = session.camera_ready
                && !frame.is_blank()
                && matches!(session.state, ScanState::ScanMrz);
            if !accepting {
                log::trace!("Dropping frame in {}", session.state.stage());
                return Ok(session.state.status(&self.shared.policy));
            }
            let next = session.state.apply(ScanEvent::FrameAccepted)?;
            self.shared.commit(&mut session, next)
        };
        self.shared.announce(published);

        let record = match self
            .mrz_capture
            .recognize(frame, self.capture_options.clone())
            .await
        {
            Ok(Some(candidate)) => {
                if self
                    .document_filter
                    .accepts(candidate.document_code.as_deref())
                {
                    MrzRecord::from_candidate(&candidate, &self.capture_options.fields)
                } else {
                    log::debug!(
                        "Ignoring MRZ of document type {:?}",
                        candidate.document_code
                    );
                    None
                }
            }
            Ok(None) => None,
            Err(e) => {
                log::warn!("MRZ recognition failed: {e}");
                None
            }
        };

        if record.is_some() {
            log::info!("Passport MRZ captured");
        }
        self.shared
            .transition(ScanEvent::RecognitionFinished(record))
    }

    /// Accepts the captured MRZ.
    ///
    /// Under an auto-start policy this goes straight on to the chip read and
    /// resolves when the read has finished, like
    /// [`start_nfc_scan`](Self::start_nfc_scan).
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidTransition`] unless the session is in [`ScanStage::MrzCheck`].
    /// - [`ScanError::Validation`] if auto-start is on and the MRZ lacks chip access fields.
    /// - [`ScanError::Unmounted`] after [`unmount`](Self::unmount).
    pub async fn confirm_mrz_scan(&self) -> Result<PassportScanStatus, ScanError> {
        let status = self.shared.transition(ScanEvent::Confirm)?;
        if self.shared.policy.auto_start_chip_read {
            log::debug!("Starting chip read automatically");
            return self.run_chip_read(Trigger::AutoStart).await;
        }
        Ok(status)
    }

    /// Discards the captured MRZ and starts capturing again.
    ///
    /// # Errors
    ///
    /// - [`ScanError::InvalidTransition`] unless an MRZ is held and no chip
    ///   read is running or has succeeded.
    /// - [`ScanError::Unmounted`] after [`unmount`](Self::unmount).
    pub fn restart_mrz_scan(&self) -> Result<PassportScanStatus, ScanError> {
        let status = self.shared.transition(ScanEvent::Restart)?;
        self.mrz_capture.retry();
        Ok(status)
    }

    /// Reads the passport chip with the confirmed MRZ.
    ///
    /// Valid at the start prompt and after a failed read (as a retry). While a
    /// read is already running this returns the current status without
    /// starting another one. Reader failures are not errors: they resolve to
    /// [`PassportScanStatus::NfcScanFailure`] and are reported to telemetry.
    ///
    /// # Errors
    ///
    /// - [`ScanError::Validation`] if the document number, date of birth or
    ///   date of expiry is missing; the reader is not called.
    /// - [`ScanError::InvalidTransition`] if no MRZ has been confirmed.
    /// - [`ScanError::Unmounted`] after [`unmount`](Self::unmount).
    pub async fn start_nfc_scan(&self) -> Result<PassportScanStatus, ScanError> {
        self.run_chip_read(Trigger::User).await
    }

    /// Ends the session. Frames and actions are refused from now on; a chip
    /// read still running is left to finish, but its outcome is discarded.
    pub fn unmount(&self) {
        {
            let mut session = self.shared.session();
            session.mounted = false;
            session.camera_ready = false;
        }
        self.set_status_listener(None);
        log::debug!("Passport scanner unmounted");
    }
}

impl PassportScanner {
    /// Watches status changes from Rust.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<PassportScanStatus> {
        self.shared.status_tx.subscribe()
    }

    async fn run_chip_read(&self, trigger: Trigger) -> Result<PassportScanStatus, ScanError> {
        let (published, attempt, key) = {
            let mut session = self.shared.session();
            session.ensure_mounted()?;

            if matches!(session.state, ScanState::NfcTransferInProgress { .. }) {
                log::debug!("Chip read already running");
                return Ok(session.state.status(&self.shared.policy));
            }
            if trigger == Trigger::AutoStart && !session.state.awaits_first_chip_read() {
                return Ok(session.state.status(&self.shared.policy));
            }

            let prompt = match session.state {
                ScanState::NfcScanFailure { .. } => session.state.apply(ScanEvent::Retry)?,
                _ => session.state.clone(),
            };
            let next = prompt
                .apply(ScanEvent::ChipReadStarted)
                .inspect_err(|e| {
                    if matches!(e, ScanError::Validation { .. }) {
                        log::warn!("Refusing to start chip read: {e}");
                    }
                })?;
            let key = next.chip_access_key()?;

            session.attempt += 1;
            session.tag_discovered = false;
            let attempt = session.attempt;
            (self.shared.commit(&mut session, next), attempt, key)
        };
        self.shared.announce(published);

        log::info!("Starting chip read {attempt}");
        let params = ChipScanParams::new(key, SessionLabels::resolve(self.translator.as_deref()));
        let progress = Arc::new(progress_handle(Arc::downgrade(&self.shared), attempt));
        let pending = PendingChipRead {
            shared: &self.shared,
            attempt,
            settled: false,
        };

        let outcome = {
            let _suppressed = self.lock_suppression.acquire();
            self.chip_reader.scan(params, progress).await
        };
        pending.settle(self.chip_read_outcome(outcome))
    }

    fn chip_read_outcome(&self, outcome: Result<ScanResult, ChipReadError>) -> ScanEvent {
        match outcome {
            Ok(result) => {
                log::info!("Chip read completed");
                ScanEvent::ChipReadSucceeded(result)
            }
            Err(error) => {
                log::error!("{NFC_TRANSFER_FAILURE}: {error}");
                self.telemetry
                    .report_exception(error.to_string(), NFC_TRANSFER_FAILURE.to_string());
                ScanEvent::ChipReadFailed(error)
            }
        }
    }
}

fn progress_handle(shared: Weak<Shared>, attempt: u64) -> ChipReadProgress {
    ChipReadProgress::new(move |percent| {
        if let Some(shared) = shared.upgrade() {
            shared.on_progress(attempt, percent);
        }
    })
}
