//! Opt-in fixes for known problems (`--fix`).
//!
//! Only non-passing results with a known fix are touched. After a fix the
//! affected check alone is re-probed. The re-probed result replaces the
//! original only when it is better; otherwise the original status stands
//! with a note of the attempt, so a Warn is never escalated to Fail.

use std::cmp::Ordering;
use std::time::Duration;
use tracing::{info, warn};

use crate::error::EnvReadyError;
use crate::report::{CheckResult, CheckStatus};
use crate::shell::{command_line, Platform};

use super::checks::{CheckKind, Probe, FILESYSTEM_KEY, LONG_PATHS_VALUE};
use super::failure::ProbeFailure;
use super::installer::ToolchainInstaller;

/// Applies fixes and re-probes.
pub struct Remediator<'a> {
    probe: Probe<'a>,
    installer: &'a dyn ToolchainInstaller,
}

impl<'a> Remediator<'a> {
    pub fn new(probe: Probe<'a>, installer: &'a dyn ToolchainInstaller) -> Self {
        Self { probe, installer }
    }

    pub fn probe(&self) -> &Probe<'a> {
        &self.probe
    }

    /// Whether `kind` has an automatic fix on this platform.
    pub fn has_fix(&self, kind: &CheckKind) -> bool {
        match kind {
            CheckKind::GitLongPaths | CheckKind::CompilerToolchain => true,
            CheckKind::LongPathSupport => self.probe.context().platform() == Platform::Windows,
            _ => false,
        }
    }

    /// Fix what can be fixed. Result order and cardinality are preserved.
    pub fn apply(&mut self, results: Vec<CheckResult>) -> Vec<CheckResult> {
        let plan = self.probe.plan();
        let mut fixed = Vec::with_capacity(results.len());

        for original in results {
            if matches!(original.status(), CheckStatus::Pass | CheckStatus::Info) {
                fixed.push(original);
                continue;
            }
            match plan.iter().find(|k| k.name() == original.name()) {
                Some(kind) if self.has_fix(kind) => {
                    let kind = kind.clone();
                    fixed.push(self.remediate(&kind, original));
                }
                _ => fixed.push(original),
            }
        }
        fixed
    }

    fn remediate(&mut self, kind: &CheckKind, original: CheckResult) -> CheckResult {
        let name = kind.name();
        info!("Attempting fix for '{}'", name);

        match self.fix(kind) {
            Ok(()) => {
                let reprobed = self.probe.run(kind);
                match reprobed.status().cmp(&original.status()) {
                    Ordering::Less => {
                        info!("Fix for '{}' -> {:?}", name, reprobed.status());
                        reprobed
                    }
                    Ordering::Equal => {
                        warn!("Fix for '{}' ran but the check is still {:?}", name, original.status());
                        original.with_note(&format!("auto-fix attempted: {}", reprobed.detail()))
                    }
                    Ordering::Greater => {
                        warn!("Fix for '{}' made things worse; keeping original", name);
                        original.with_note(&format!("auto-fix failed: {}", reprobed.detail()))
                    }
                }
            }
            Err(failure) => {
                warn!("Fix for '{}' failed: {}", name, failure);
                original.with_note(&format!("auto-fix failed: {}", failure))
            }
        }
    }

    /// Apply the fix for `kind`. Safe to repeat.
    pub fn fix(&mut self, kind: &CheckKind) -> Result<(), ProbeFailure> {
        let timeout = Duration::from_secs(self.probe.config().timeouts.remediation_secs);
        match kind {
            CheckKind::GitLongPaths => {
                self.run_fix("git", &["config", "--global", "core.longpaths", "true"], timeout)
            }
            CheckKind::LongPathSupport => {
                let probe_timeout = Duration::from_secs(self.probe.config().timeouts.probe_secs);
                if !self.probe.context().elevated(probe_timeout) {
                    return Err(ProbeFailure::PermissionDenied {
                        action: format!("enabling {}", LONG_PATHS_VALUE),
                    });
                }
                self.run_fix(
                    "reg",
                    &[
                        "add",
                        FILESYSTEM_KEY,
                        "/v",
                        LONG_PATHS_VALUE,
                        "/t",
                        "REG_DWORD",
                        "/d",
                        "1",
                        "/f",
                    ],
                    timeout,
                )
            }
            CheckKind::CompilerToolchain => {
                self.installer
                    .install(self.probe.context().runner(), timeout)?;
                self.probe.refresh_search_path();
                Ok(())
            }
            _ => Ok(()),
        }
    }

    fn run_fix(&self, program: &str, args: &[&str], timeout: Duration) -> Result<(), ProbeFailure> {
        let output = self.probe.context().runner().run(program, args, timeout)?;
        if output.success {
            Ok(())
        } else {
            Err(EnvReadyError::CommandFailed {
                command: command_line(program, args),
                code: output.exit_code,
            }
            .into())
        }
    }
}
