//! Error handling module for the murmr engine.
//!
//! This module provides a unified error type using the `thiserror` crate,
//! consolidating all error types from various operations into a single enum.

use std::io;
use thiserror::Error;

/// Unified error type for the murmr engine.
///
/// This enum represents all possible errors that can occur in the engine,
/// providing automatic conversions from underlying error types.
#[derive(Error, Debug)]
pub enum MurmrError {
    /// I/O operation errors
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// JSON parsing errors
    #[error("JSON parsing error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Timestamp validation errors
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),

    /// Period offset errors (offsets into the future are rejected)
    #[error("Invalid period offset: {0} (offsets must be <= 0)")]
    InvalidOffset(i32),

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// Import/snapshot errors
    #[error("Import failed: {0}")]
    Import(String),

    /// Generic operation errors
    #[error("{0}")]
    Other(String),
}

/// Result type alias for murmr operations
pub type Result<T> = std::result::Result<T, MurmrError>;

// Helper implementations for common conversions
impl MurmrError {
    /// Create an invalid timestamp error
    pub fn timestamp(msg: impl Into<String>) -> Self {
        MurmrError::InvalidTimestamp(msg.into())
    }

    /// Create a configuration error
    pub fn config(msg: impl Into<String>) -> Self {
        MurmrError::Config(msg.into())
    }

    /// Create an import error
    pub fn import(msg: impl Into<String>) -> Self {
        MurmrError::Import(msg.into())
    }

    /// Create a generic other error
    pub fn other(msg: impl Into<String>) -> Self {
        MurmrError::Other(msg.into())
    }
}

// Allow conversion from string for convenience
impl From<String> for MurmrError {
    fn from(s: String) -> Self {
        MurmrError::Other(s)
    }
}

impl From<&str> for MurmrError {
    fn from(s: &str) -> Self {
        MurmrError::Other(s.to_string())
    }
}
