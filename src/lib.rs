//! envready - Build environment readiness checks.
//!
//! envready probes a machine for the toolchains, SDKs and settings a native
//! build needs, reports each as Pass, Warn, Fail or Info, and can apply safe
//! fixes on request. It also decides whether a CI run is worth doing given
//! which paths changed.
//!
//! # Modules
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`config`] - Configuration loading, layering, and validation
//! - [`error`] - Error types and result aliases
//! - [`probe`] - Environment checks and remediation
//! - [`relevance`] - Changed-path filtering for CI triggers
//! - [`report`] - Result aggregation, verdict, and rendering
//! - [`shell`] - Subprocess execution with timeouts
//! - [`ui`] - Spinners and terminal output
//!
//! # Example
//!
//! ```
//! use envready::config::EnvReadyConfig;
//! use envready::probe::{Probe, ProbeContext};
//! use envready::report::{summarize, EnvironmentReport, Verdict};
//! use envready::shell::MockRunner;
//!
//! // Nothing is installed as far as this runner and empty search path know.
//! let config = EnvReadyConfig::default();
//! let runner = MockRunner::new();
//! let probe = Probe::new(&config, ProbeContext::new(&runner, "/nonexistent"));
//!
//! let report = EnvironmentReport::new(probe.run_checks());
//! assert_eq!(report.verdict(), Verdict::NotReady);
//! assert_eq!(summarize(&report, false).exit_code, 1);
//! ```

pub mod cli;
pub mod config;
pub mod error;
pub mod probe;
pub mod relevance;
pub mod report;
pub mod shell;
pub mod ui;

pub use error::{EnvReadyError, Result};
