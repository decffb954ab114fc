//! Readiness aggregation and reporting.
//!
//! - [`model`] - Check results, counts, verdict, and the aggregate report
//! - [`render`] - Text and JSON rendering plus exit code selection
//!
//! # Example
//!
//! ```
//! use envready::report::{summarize, CheckResult, EnvironmentReport, Verdict};
//!
//! let report = EnvironmentReport::new(vec![
//!     CheckResult::pass("compiler-toolchain", "rustup 1.27.1"),
//!     CheckResult::warn("git-long-paths", "core.longpaths is not enabled"),
//! ]);
//! assert_eq!(report.verdict(), Verdict::ReadyWithWarnings);
//!
//! let summary = summarize(&report, false);
//! assert_eq!(summary.exit_code, 0);
//! assert!(summary.text.contains("[WARN] git-long-paths"));
//! ```

pub mod model;
pub mod render;

pub use model::{CheckResult, CheckStatus, Counts, EnvironmentReport, Verdict};
pub use render::{render_json, render_report, summarize, Summary};
