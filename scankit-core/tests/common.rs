#![allow(dead_code, missing_docs)]

//! Common test utilities shared across integration tests.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use scankit_core::platform::memory::{MemoryHaptics, MemoryLockSuppressor, MemoryTelemetry};
use scankit_core::{
    CaptureError, ChipReadError, ChipReadProgress, ChipReader, ChipScanParams, MrzCandidate,
    MrzCapture, MrzCaptureOptions, MrzField, PassportScanStatus, PassportScanner, Platform,
    RecognizedText, ScanResult, ScanStatusListener, ScannerConfig,
};
use tokio::sync::{mpsc, Notify};

pub fn init_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

/// Recognizer answering frames from a script. An exhausted script yields no MRZ.
#[derive(Default)]
pub struct ScriptedCapture {
    script: Mutex<VecDeque<Result<Option<MrzCandidate>, CaptureError>>>,
    frames: AtomicUsize,
    retries: AtomicUsize,
}

impl ScriptedCapture {
    pub fn push(&self, outcome: Result<Option<MrzCandidate>, CaptureError>) {
        self.script.lock().unwrap().push_back(outcome);
    }

    pub fn frames(&self) -> usize {
        self.frames.load(Ordering::SeqCst)
    }

    pub fn retries(&self) -> usize {
        self.retries.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl MrzCapture for ScriptedCapture {
    async fn recognize(
        &self,
        _frame: RecognizedText,
        _options: MrzCaptureOptions,
    ) -> Result<Option<MrzCandidate>, CaptureError> {
        self.frames.fetch_add(1, Ordering::SeqCst);
        self.script.lock().unwrap().pop_front().unwrap_or(Ok(None))
    }

    fn retry(&self) {
        self.retries.fetch_add(1, Ordering::SeqCst);
    }
}

/// Chip reader whose reads block until the test hands them an outcome.
///
/// Outcomes queued before a read starts are consumed immediately.
pub struct GatedReader {
    outcomes_tx: mpsc::UnboundedSender<Result<ScanResult, ChipReadError>>,
    outcomes_rx: tokio::sync::Mutex<mpsc::UnboundedReceiver<Result<ScanResult, ChipReadError>>>,
    started: Notify,
    scans: AtomicUsize,
    params: Mutex<Vec<ChipScanParams>>,
    progress: Mutex<Option<Arc<ChipReadProgress>>>,
}

impl Default for GatedReader {
    fn default() -> Self {
        let (outcomes_tx, outcomes_rx) = mpsc::unbounded_channel();
        Self {
            outcomes_tx,
            outcomes_rx: tokio::sync::Mutex::new(outcomes_rx),
            started: Notify::new(),
            scans: AtomicUsize::new(0),
            params: Mutex::new(Vec::new()),
            progress: Mutex::new(None),
        }
    }
}

impl GatedReader {
    /// Completes the pending (or next) read.
    pub fn finish(&self, outcome: Result<ScanResult, ChipReadError>) {
        self.outcomes_tx.send(outcome).unwrap();
    }

    /// Waits until a read has called into the reader.
    pub async fn started(&self) {
        self.started.notified().await;
    }

    /// Reports progress through the handle of the latest read.
    pub fn report(&self, percent: u8) {
        let progress = self.progress.lock().unwrap().clone();
        progress.expect("no read started").report(percent);
    }

    pub fn scans(&self) -> usize {
        self.scans.load(Ordering::SeqCst)
    }

    pub fn last_params(&self) -> ChipScanParams {
        self.params.lock().unwrap().last().cloned().expect("no read started")
    }
}

#[async_trait::async_trait]
impl ChipReader for GatedReader {
    fn is_supported(&self) -> bool {
        true
    }

    async fn is_enabled(&self) -> Result<bool, ChipReadError> {
        Ok(true)
    }

    fn open_settings(&self) {}

    async fn scan(
        &self,
        params: ChipScanParams,
        progress: Arc<ChipReadProgress>,
    ) -> Result<ScanResult, ChipReadError> {
        self.scans.fetch_add(1, Ordering::SeqCst);
        self.params.lock().unwrap().push(params);
        *self.progress.lock().unwrap() = Some(progress);
        self.started.notify_one();

        self.outcomes_rx
            .lock()
            .await
            .recv()
            .await
            .unwrap_or(Err(ChipReadError::Cancelled))
    }
}

#[derive(Default)]
pub struct RecordingListener {
    statuses: Mutex<Vec<PassportScanStatus>>,
}

impl RecordingListener {
    pub fn statuses(&self) -> Vec<PassportScanStatus> {
        self.statuses.lock().unwrap().clone()
    }
}

impl ScanStatusListener for RecordingListener {
    fn on_status_changed(&self, status: PassportScanStatus) {
        self.statuses.lock().unwrap().push(status);
    }
}

/// A scanner wired to recording fakes.
pub struct Harness {
    pub scanner: Arc<PassportScanner>,
    pub capture: Arc<ScriptedCapture>,
    pub reader: Arc<GatedReader>,
    pub suppressor: Arc<MemoryLockSuppressor>,
    pub telemetry: Arc<MemoryTelemetry>,
    pub haptics: Arc<MemoryHaptics>,
    pub listener: Arc<RecordingListener>,
}

impl Harness {
    pub fn new(platform: Platform) -> Self {
        Self::with_config(ScannerConfig::for_platform(platform))
    }

    pub fn with_config(config: ScannerConfig) -> Self {
        init_logging();

        let capture = Arc::new(ScriptedCapture::default());
        let reader = Arc::new(GatedReader::default());
        let suppressor = Arc::new(MemoryLockSuppressor::new());
        let telemetry = Arc::new(MemoryTelemetry::new());
        let haptics = Arc::new(MemoryHaptics::new());
        let listener = Arc::new(RecordingListener::default());

        let scanner = Arc::new(
            PassportScanner::new(
                config,
                capture.clone(),
                reader.clone(),
                suppressor.clone(),
                telemetry.clone(),
                haptics.clone(),
                None,
            )
            .unwrap(),
        );
        let status_listener: Arc<dyn ScanStatusListener> = listener.clone();
        scanner.set_status_listener(Some(status_listener));

        Self {
            scanner,
            capture,
            reader,
            suppressor,
            telemetry,
            haptics,
            listener,
        }
    }

    /// Runs one frame with `candidate` through a ready camera.
    pub async fn capture(&self, candidate: MrzCandidate) -> PassportScanStatus {
        self.scanner.on_camera_ready();
        self.capture.push(Ok(Some(candidate)));
        self.scanner.on_text_recognized(frame()).await.unwrap()
    }

    /// Captures and confirms the sample passport.
    pub async fn confirm_passport(&self) -> PassportScanStatus {
        self.capture(passport_candidate()).await;
        self.scanner.confirm_mrz_scan().await.unwrap()
    }
}

pub fn frame() -> RecognizedText {
    RecognizedText {
        blocks: vec![
            "P<UTOERIKSSON<<ANNA<MARIA<<<<<<<<<<<<<<<<<<<".to_string(),
            "L898902C36UTO7408122F1204159ZE184226B<<<<<10".to_string(),
        ],
    }
}

pub fn passport_candidate() -> MrzCandidate {
    MrzCandidate {
        document_code: Some("P<".to_string()),
        fields: HashMap::from([
            (MrzField::DocumentNumber, "L898902C3".to_string()),
            (MrzField::BirthDateYymmdd, "740812".to_string()),
            (MrzField::ExpirationDateYymmdd, "120415".to_string()),
            (MrzField::IssuingState, "UTO".to_string()),
            (MrzField::Nationality, "UTO".to_string()),
        ]),
    }
}

pub fn scan_result() -> ScanResult {
    ScanResult {
        data_groups: HashMap::from([(1, vec![0x61, 0x5B]), (2, vec![0x75, 0x82])]),
        security_object: vec![0x77, 0x82],
    }
}
