//! Environment probing and remediation.
//!
//! - [`checks`] - The ordered, read-only checks ([`Probe`])
//! - [`context`] - Search path, platform and process seam shared by checks
//! - [`failure`] - [`ProbeFailure`] and its status mapping
//! - [`locate`] - Tool lookup on candidate paths and the search path
//! - [`version`] - Dotted version parsing and comparison
//! - [`remediate`] - Opt-in fixes followed by a re-probe ([`Remediator`])
//! - [`installer`] - Toolchain installation used by remediation
//!
//! # Example
//!
//! ```
//! use envready::config::EnvReadyConfig;
//! use envready::probe::{Probe, ProbeContext};
//! use envready::shell::MockRunner;
//!
//! let config = EnvReadyConfig::default();
//! let runner = MockRunner::new();
//! let probe = Probe::new(&config, ProbeContext::new(&runner, "/nonexistent"));
//!
//! let results = probe.run_checks();
//! assert_eq!(results.len(), probe.plan().len());
//! ```

pub mod checks;
pub mod context;
pub mod failure;
pub mod installer;
pub mod locate;
pub mod remediate;
pub mod version;

pub use checks::{CheckKind, Probe};
pub use context::ProbeContext;
pub use failure::ProbeFailure;
pub use installer::{RustupInstaller, ToolchainInstaller};
pub use remediate::Remediator;
pub use version::compare_versions;
