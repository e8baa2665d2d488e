//! Library packaged into the iOS and Android frameworks.
//!
//! Everything lives in [`scankit_core`]; this crate only adds what the
//! generated bindings need at the package level.

pub use scankit_core::*;

/// Version of the native library, for host apps to log next to their own.
#[uniffi::export]
#[must_use]
pub fn scankit_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

uniffi::setup_scaffolding!("scankit");
