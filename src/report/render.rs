//! Readiness summary rendering.
//!
//! Output is one line per result followed by a summary line. The layout is
//! deterministic for a given result order so logs diff cleanly and scripts
//! can match on it.

use crate::error::{EnvReadyError, Result};
use crate::ui::Theme;

use super::model::{CheckResult, CheckStatus, EnvironmentReport, Verdict};

/// Exit code plus rendered text for a report.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Summary {
    pub exit_code: i32,
    pub text: String,
}

/// Summarize a report as plain text.
///
/// Details are always shown for Fail results; `verbose` shows them for
/// every status.
pub fn summarize(report: &EnvironmentReport, verbose: bool) -> Summary {
    Summary {
        exit_code: report.verdict().exit_code(),
        text: render_report(report, verbose, &Theme::plain()),
    }
}

/// Render a report with status markers styled by `theme`.
pub fn render_report(report: &EnvironmentReport, verbose: bool, theme: &Theme) -> String {
    let mut lines: Vec<String> = report
        .results()
        .iter()
        .map(|r| render_line(r, verbose, theme))
        .collect();

    let counts = report.counts();
    let verdict = report.verdict();
    let label = match verdict {
        Verdict::Ready => theme.success.apply_to(verdict.label()),
        Verdict::ReadyWithWarnings => theme.warning.apply_to(verdict.label()),
        Verdict::NotReady => theme.error.apply_to(verdict.label()),
    };
    lines.push(format!(
        "{} passed, {} warned, {} failed: {}",
        counts.passed, counts.warned, counts.failed, label
    ));

    lines.join("\n")
}

fn render_line(result: &CheckResult, verbose: bool, theme: &Theme) -> String {
    let status = result.status();
    let style = match status {
        CheckStatus::Pass => &theme.success,
        CheckStatus::Warn => &theme.warning,
        CheckStatus::Fail => &theme.error,
        CheckStatus::Info => &theme.dim,
    };
    let marker = style.apply_to(status.marker());

    let show_detail = verbose || status == CheckStatus::Fail;
    if show_detail && !result.detail().is_empty() {
        format!("{} {}: {}", marker, result.name(), result.detail())
    } else {
        format!("{} {}", marker, result.name())
    }
}

/// Render a report as pretty-printed JSON.
pub fn render_json(report: &EnvironmentReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(|e| EnvReadyError::Other(e.into()))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> EnvironmentReport {
        EnvironmentReport::new(vec![
            CheckResult::pass("compiler-toolchain", "rustup 1.27.1 at /usr/bin/rustup"),
            CheckResult::warn("git-long-paths", "core.longpaths is not enabled"),
            CheckResult::info("long-path-support", "not applicable on linux"),
            CheckResult::fail("build-toolchain", "none of cc, gcc found"),
        ])
    }

    #[test]
    fn summary_hides_non_fail_details() {
        let summary = summarize(&sample(), false);
        insta::assert_snapshot!(summary.text, @r"
        [PASS] compiler-toolchain
        [WARN] git-long-paths
        [INFO] long-path-support
        [FAIL] build-toolchain: none of cc, gcc found
        1 passed, 1 warned, 1 failed: NOT READY
        ");
        assert_eq!(summary.exit_code, 1);
    }

    #[test]
    fn verbose_summary_shows_all_details() {
        let summary = summarize(&sample(), true);
        insta::assert_snapshot!(summary.text, @r"
        [PASS] compiler-toolchain: rustup 1.27.1 at /usr/bin/rustup
        [WARN] git-long-paths: core.longpaths is not enabled
        [INFO] long-path-support: not applicable on linux
        [FAIL] build-toolchain: none of cc, gcc found
        1 passed, 1 warned, 1 failed: NOT READY
        ");
    }

    #[test]
    fn warnings_alone_exit_zero() {
        let report = EnvironmentReport::new(vec![
            CheckResult::pass("a", ""),
            CheckResult::warn("b", "meh"),
        ]);
        let summary = summarize(&report, false);
        assert_eq!(summary.exit_code, 0);
        assert!(summary.text.ends_with("1 passed, 1 warned, 0 failed: READY WITH WARNINGS"));
    }

    #[test]
    fn summary_is_deterministic() {
        let report = sample();
        assert_eq!(summarize(&report, true), summarize(&report, true));
    }

    #[test]
    fn every_result_gets_a_line() {
        let summary = summarize(&sample(), false);
        assert_eq!(summary.text.lines().count(), sample().results().len() + 1);
    }

    #[test]
    fn json_contains_verdict_and_results() {
        let json = render_json(&sample()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["verdict"], "not_ready");
        assert_eq!(value["results"].as_array().unwrap().len(), 4);
        assert!(value["generated_at"].is_string());
    }
}
