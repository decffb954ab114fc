//! Error types for envready operations.
//!
//! This module defines [`EnvReadyError`], the primary error type used throughout
//! the application, and a [`Result`] type alias for convenience.
//!
//! # Error Handling Strategy
//!
//! - Use `EnvReadyError` for domain-specific errors that need distinct handling
//! - Use `anyhow::Error` (via `EnvReadyError::Other`) for unexpected errors
//! - Errors raised inside a probe check never reach the user as errors; the
//!   probe converts them into check results (see [`crate::probe::ProbeFailure`])

use std::path::PathBuf;
use thiserror::Error;

/// Core error type for envready operations.
#[derive(Debug, Error)]
pub enum EnvReadyError {
    /// Configuration file not found at expected location.
    #[error("Configuration not found: {path}")]
    ConfigNotFound { path: PathBuf },

    /// Failed to parse configuration file.
    #[error("Failed to parse config at {path}: {message}")]
    ConfigParseError { path: PathBuf, message: String },

    /// Invalid configuration structure or values.
    #[error("Invalid configuration: {message}")]
    ConfigValidationError { message: String },

    /// A subprocess could not be started or exited unsuccessfully.
    #[error("Command failed with exit code {code:?}: {command}")]
    CommandFailed { command: String, code: Option<i32> },

    /// A subprocess exceeded its time budget and was killed.
    #[error("Command timed out after {timeout_secs}s: {command}")]
    ProbeTimeout { command: String, timeout_secs: u64 },

    /// Downloading an installer failed.
    #[error("Download failed for {url}: {message}")]
    DownloadFailed { url: String, message: String },

    /// A downloaded file did not match its published checksum.
    #[error("Checksum mismatch for {url}: expected {expected}, got {actual}")]
    ChecksumMismatch {
        url: String,
        expected: String,
        actual: String,
    },

    /// IO error wrapper.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic wrapped error for anyhow interop.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

/// Result type alias for envready operations.
pub type Result<T> = std::result::Result<T, EnvReadyError>;
