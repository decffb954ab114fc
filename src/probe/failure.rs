//! Probe failure taxonomy.
//!
//! Every way a check can go wrong is a [`ProbeFailure`], and every kind maps
//! to exactly one [`CheckStatus`]. Checks return `Result<CheckResult,
//! ProbeFailure>`; the probe turns the `Err` side into a result with
//! [`ProbeFailure::into_result`], so nothing escapes a check.

use std::path::PathBuf;
use thiserror::Error;

use crate::error::EnvReadyError;
use crate::report::{CheckResult, CheckStatus};

/// Why a check did not pass.
#[derive(Debug, Error)]
pub enum ProbeFailure {
    /// Tool or SDK absent.
    #[error("{what} not found{}", hint_suffix(.hint))]
    MissingDependency { what: String, hint: Option<String> },

    /// Found, but older than required.
    #[error("{what} {found} is below the minimum {minimum}{}", hint_suffix(.hint))]
    VersionTooLow {
        what: String,
        found: String,
        minimum: String,
        hint: Option<String>,
    },

    /// A fix needs elevated privileges.
    #[error("{action} requires elevated privileges (run as Administrator)")]
    PermissionDenied { action: String },

    /// A subprocess exceeded its time budget.
    #[error("`{command}` did not respond within {timeout_secs}s")]
    ProbeTimeout { command: String, timeout_secs: u64 },

    /// Not run from the expected project root.
    #[error("{marker} not found in {}", .root.display())]
    WorkspaceMismatch {
        marker: String,
        root: PathBuf,
        primary: bool,
    },

    /// Anything else that went wrong while probing.
    #[error(transparent)]
    Unexpected(EnvReadyError),
}

fn hint_suffix(hint: &Option<String>) -> String {
    hint.as_deref()
        .map(|h| format!(". {}", h))
        .unwrap_or_default()
}

impl ProbeFailure {
    /// The status this failure is reported as.
    pub fn status(&self) -> CheckStatus {
        match self {
            ProbeFailure::MissingDependency { .. } => CheckStatus::Fail,
            ProbeFailure::WorkspaceMismatch { primary: true, .. } => CheckStatus::Fail,
            ProbeFailure::WorkspaceMismatch { primary: false, .. } => CheckStatus::Warn,
            ProbeFailure::VersionTooLow { .. } => CheckStatus::Warn,
            ProbeFailure::PermissionDenied { .. } => CheckStatus::Warn,
            ProbeFailure::ProbeTimeout { .. } => CheckStatus::Warn,
            ProbeFailure::Unexpected(_) => CheckStatus::Fail,
        }
    }

    /// Convert into the result for check `name`.
    pub fn into_result(self, name: &str) -> CheckResult {
        CheckResult::new(name, self.status(), self.to_string())
    }
}

impl From<EnvReadyError> for ProbeFailure {
    fn from(err: EnvReadyError) -> Self {
        match err {
            EnvReadyError::ProbeTimeout {
                command,
                timeout_secs,
            } => ProbeFailure::ProbeTimeout {
                command,
                timeout_secs,
            },
            other => ProbeFailure::Unexpected(other),
        }
    }
}
