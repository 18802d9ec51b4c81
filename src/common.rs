//! Common utilities shared across modules.
//!
//! This module provides shared time and path helpers to reduce code
//! duplication and ensure consistent behavior across the engine.

use chrono::{DateTime, Local, TimeZone};
use std::path::PathBuf;

use crate::error::{MurmrError, Result};

/// Milliseconds since the Unix epoch, the engine's only ordering key.
pub type Millis = i64;

/// Gets the current instant in milliseconds since the Unix epoch.
pub fn now_ms() -> Millis {
    Local::now().timestamp_millis()
}

/// Converts an epoch-millisecond timestamp to a local `DateTime`.
///
/// Fails only for timestamps outside chrono's representable range.
pub fn ms_to_local(ms: Millis) -> Result<DateTime<Local>> {
    Local
        .timestamp_millis_opt(ms)
        .single()
        .ok_or_else(|| MurmrError::timestamp(format!("{} is out of range", ms)))
}

/// Gets the application data directory using XDG Base Directory specification.
///
/// Respects `$XDG_DATA_HOME` when set, falling back to `~/.local/share`.
/// Returns `~/.local/share/murmr/` on Unix-like systems.
pub fn get_data_dir() -> PathBuf {
    // XDG_DATA_HOME is checked first so tests can redirect the data dir
    let base_dir = std::env::var("XDG_DATA_HOME")
        .map(PathBuf::from)
        .ok()
        .or_else(dirs::data_dir)
        .unwrap_or_else(|| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".local").join("share")
        });

    base_dir.join("murmr")
}
