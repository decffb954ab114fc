//! Integration tests for the probe, remediation and report public API.

use std::cell::Cell;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use std::time::Duration;

use envready::config::{EnvReadyConfig, SdkConfig, ToolSearch};
use envready::probe::checks::{FILESYSTEM_KEY, LONG_PATHS_VALUE};
use envready::probe::{CheckKind, Probe, ProbeContext, Remediator, ToolchainInstaller};
use envready::report::{summarize, CheckStatus, EnvironmentReport, Verdict};
use envready::shell::{CommandRunner, MockReply, MockRunner, Platform};
use tempfile::TempDir;

const GIT_GET: &str = "git config --get core.longpaths";

struct CountingInstaller {
    calls: Cell<usize>,
}

impl CountingInstaller {
    fn new() -> Self {
        Self {
            calls: Cell::new(0),
        }
    }
}

impl ToolchainInstaller for CountingInstaller {
    fn install(&self, _runner: &dyn CommandRunner, _timeout: Duration) -> envready::Result<()> {
        self.calls.set(self.calls.get() + 1);
        Ok(())
    }
}

/// A workspace where everything but the compiler toolchain is present.
fn provisioned(root: &Path) -> EnvReadyConfig {
    fs::write(root.join("Cargo.toml"), "[workspace]\n").unwrap();
    fs::create_dir_all(root.join("crates")).unwrap();

    let tools = root.join("tools");
    fs::create_dir_all(tools.join("msvc")).unwrap();
    fs::create_dir_all(tools.join("cmake")).unwrap();
    let sdk_root = tools.join("sdk");
    fs::create_dir_all(sdk_root.join("10.0.22621.0")).unwrap();
    fs::create_dir_all(sdk_root.join("10.0.17763.0")).unwrap();

    let mut config = EnvReadyConfig::for_platform(Platform::Linux);
    config.build_toolchain = ToolSearch {
        candidates: vec![tools.join("msvc")],
        binaries: vec!["cc".to_string()],
        hint: None,
    };
    config.build_graph_tool = ToolSearch {
        candidates: vec![tools.join("cmake")],
        binaries: vec!["cmake".to_string()],
        hint: None,
    };
    config.sdk = Some(SdkConfig {
        roots: vec![sdk_root],
        pattern: r"^10\.0\.\d+\.\d+$".to_string(),
        minimum: "10.0.19041.0".to_string(),
        hint: None,
    });
    config.optional_tools.clear();
    config
}

#[test]
fn only_missing_toolchain_is_not_ready() {
    let temp = TempDir::new().unwrap();
    let config = provisioned(temp.path());
    let runner = MockRunner::new().with_reply(GIT_GET, MockReply::stdout("true\n"));
    let ctx = ProbeContext::new(&runner, temp.path()).with_platform(Platform::Linux);
    let probe = Probe::new(&config, ctx);

    let report = EnvironmentReport::new(probe.run_checks());

    let failed: Vec<_> = report.with_status(CheckStatus::Fail).collect();
    assert_eq!(failed.len(), 1, "{:?}", report.results());
    assert_eq!(failed[0].name(), "compiler-toolchain");
    assert!(failed[0].detail().contains("rustup"));
    assert_eq!(report.counts().warned, 0);
    assert_eq!(report.verdict(), Verdict::NotReady);

    let summary = summarize(&report, false);
    assert_ne!(summary.exit_code, 0);
    assert!(summary.text.contains("[FAIL] compiler-toolchain"));

    let sdk = report.results().iter().find(|r| r.name() == "sdk").unwrap();
    assert!(sdk.detail().starts_with("10.0.22621.0"));
}

#[test]
fn every_check_reports_once_when_everything_is_absent() {
    let config = EnvReadyConfig::for_platform(Platform::Windows);
    let runner = MockRunner::new();
    let ctx = ProbeContext::new(&runner, "/nonexistent/workspace").with_platform(Platform::Windows);
    let probe = Probe::new(&config, ctx);
    let plan = probe.plan();

    let results = probe.run_checks();

    assert_eq!(results.len(), plan.len());
    let names: HashSet<_> = results.iter().map(|r| r.name().to_string()).collect();
    assert_eq!(names.len(), results.len());
    for (kind, result) in plan.iter().zip(&results) {
        assert_eq!(kind.name(), result.name());
    }
    assert_eq!(EnvironmentReport::new(results).verdict(), Verdict::NotReady);
}

#[test]
fn timeouts_become_warnings_not_errors() {
    let config = EnvReadyConfig::for_platform(Platform::Linux);
    let runner = MockRunner::new().with_reply(GIT_GET, MockReply::Timeout);
    let probe = Probe::new(&config, ProbeContext::new(&runner, "/nonexistent"));

    let result = probe.run(&CheckKind::GitLongPaths);

    assert_eq!(result.status(), CheckStatus::Warn);
    assert!(result.detail().contains("did not respond"));
}

#[test]
fn long_path_fix_is_idempotent() {
    let query = format!("reg query {} /v {}", FILESYSTEM_KEY, LONG_PATHS_VALUE);
    let add = format!(
        "reg add {} /v {} /t REG_DWORD /d 1 /f",
        FILESYSTEM_KEY, LONG_PATHS_VALUE
    );
    let runner = MockRunner::new()
        .with_reply(&query, MockReply::stdout("    LongPathsEnabled    REG_DWORD    0x0\n"))
        .with_reply(&add, MockReply::stdout("The operation completed successfully.\n"))
        .with_effect(
            &add,
            &query,
            MockReply::stdout("    LongPathsEnabled    REG_DWORD    0x1\n"),
        );
    let config = EnvReadyConfig::for_platform(Platform::Windows);
    let ctx = ProbeContext::new(&runner, "/nonexistent")
        .with_platform(Platform::Windows)
        .with_elevated(true);
    let installer = CountingInstaller::new();
    let mut remediator = Remediator::new(Probe::new(&config, ctx), &installer);

    for _ in 0..2 {
        remediator.fix(&CheckKind::LongPathSupport).unwrap();
        let result = remediator.probe().run(&CheckKind::LongPathSupport);
        assert_eq!(result.status(), CheckStatus::Pass);
    }
    assert_eq!(runner.call_count(&add), 2);
    assert_eq!(installer.calls.get(), 0);
}

#[test]
fn fix_pass_installs_missing_toolchain_once() {
    let temp = TempDir::new().unwrap();
    let config = provisioned(temp.path());
    let runner = MockRunner::new().with_reply(GIT_GET, MockReply::stdout("true\n"));
    let ctx = ProbeContext::new(&runner, temp.path()).with_platform(Platform::Linux);
    let installer = CountingInstaller::new();
    let probe = Probe::new(&config, ctx);
    let results = probe.run_checks();
    let planned = results.len();

    let fixed = Remediator::new(probe, &installer).apply(results);

    assert_eq!(installer.calls.get(), 1);
    assert_eq!(fixed.len(), planned);
    // The installer is a stand-in, so the toolchain is still missing.
    let toolchain = &fixed[0];
    assert_eq!(toolchain.status(), CheckStatus::Fail);
}
