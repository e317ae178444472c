//! UniFFI export layer for host keyboard apps.
//!
//! Each public type here maps to a generated Kotlin/Swift class, struct, or
//! enum. Calls return a [`GkKeyResponse`] whose events the host applies in
//! order; `SchedulePoll` asks the host to call [`GkSession::poll`] once the
//! background worker has had a chance to run.

mod engine;
mod session;
mod types;

pub use engine::GkEngine;
pub use session::GkSession;
pub use types::{
    GkError, GkEvent, GkKey, GkKeyFrame, GkKeyResponse, GkKeyboardMode, GkOrigin, GkPoint,
    GkSuggestion, GkSurrounding,
};

use std::path::Path;

// ---------------------------------------------------------------------------
// Top-level functions
// ---------------------------------------------------------------------------

#[uniffi::export]
fn engine_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

/// The default configuration as the host-facing JSON payload.
#[uniffi::export]
fn settings_default_json() -> String {
    serde_json::to_string_pretty(&crate::settings::Settings::default()).unwrap_or_default()
}

#[uniffi::export]
fn trace_init(log_dir: String) {
    crate::trace_init::init_tracing(Path::new(&log_dir));
}
