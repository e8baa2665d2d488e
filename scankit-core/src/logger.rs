//! Bridge from the `log` facade to the host app's logger.
//!
//! Swift/Kotlin apps register a [`Logger`] once at startup; every record the
//! scanner emits is then forwarded to it.
//!
//! ```swift
//! final class ScanKitLoggerBridge: ScanKit.Logger {
//!     static let shared = ScanKitLoggerBridge()
//!
//!     func log(level: ScanKit.LogLevel, message: String) {
//!         Log.log(level.toCoreLevel(), message)
//!     }
//! }
//!
//! ScanKit.setLogger(logger: ScanKitLoggerBridge.shared) // once, in the app delegate
//! ```

use std::sync::{Arc, OnceLock};

/// Receiver for log messages, implemented by the host app.
#[uniffi::export(with_foreign)]
pub trait Logger: Sync + Send {
    /// Records `message` at `level`.
    fn log(&self, level: LogLevel, message: String);
}

/// Severity of a log message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum LogLevel {
    /// Very detailed tracing output.
    Trace,
    /// Debugging information, such as state transitions.
    Debug,
    /// Normal progress of a scan.
    Info,
    /// Recoverable problems, such as rejected actions.
    Warn,
    /// Failures, such as chip reads that did not complete.
    Error,
}

impl From<log::Level> for LogLevel {
    fn from(level: log::Level) -> Self {
        match level {
            log::Level::Error => Self::Error,
            log::Level::Warn => Self::Warn,
            log::Level::Info => Self::Info,
            log::Level::Debug => Self::Debug,
            log::Level::Trace => Self::Trace,
        }
    }
}

static LOGGER_INSTANCE: OnceLock<Arc<dyn Logger>> = OnceLock::new();

/// `log::Log` implementation that hands records to [`LOGGER_INSTANCE`].
struct ForeignLogger;

impl ForeignLogger {
    /// Verbose records from dependencies are noise for the host app.
    fn forwards(level: log::Level, module_path: Option<&str>) -> bool {
        let verbose = matches!(level, log::Level::Debug | log::Level::Trace);
        !verbose || module_path.is_some_and(|path| path.starts_with("scankit"))
    }
}

impl log::Log for ForeignLogger {
    fn enabled(&self, _metadata: &log::Metadata) -> bool {
        true
    }

    fn log(&self, record: &log::Record) {
        if !Self::forwards(record.level(), record.module_path()) {
            return;
        }

        match LOGGER_INSTANCE.get() {
            Some(logger) => logger.log(record.level().into(), record.args().to_string()),
            None => eprintln!("Logger not set: {}", record.args()),
        }
    }

    fn flush(&self) {}
}

/// Registers the host app's logger.
///
/// Only the first registration takes effect; later calls are ignored.
#[uniffi::export]
pub fn set_logger(logger: Arc<dyn Logger>) {
    if LOGGER_INSTANCE.set(logger).is_err() {
        println!("Logger already set");
        return;
    }

    static LOGGER: ForeignLogger = ForeignLogger;
    if let Err(e) = log::set_logger(&LOGGER) {
        eprintln!("Failed to set logger: {e}");
        return;
    }
    log::set_max_level(log::LevelFilter::Trace);
}
