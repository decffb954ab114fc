//! The ordered environment checks.
//!
//! [`Probe::plan`] fixes which checks run and in what order; it depends only
//! on configuration. [`Probe::run`] executes one check and always produces a
//! [`CheckResult`], converting any [`ProbeFailure`] locally.

use regex::Regex;
use std::path::PathBuf;
use std::time::Duration;
use tracing::{debug, warn};

use crate::config::{EnvReadyConfig, SdkConfig, ToolSearch};
use crate::error::EnvReadyError;
use crate::report::CheckResult;
use crate::shell::{command_line, Platform};

use super::context::ProbeContext;
use super::failure::ProbeFailure;
use super::locate::{find_tool, resolve_tool_path};
use super::version::{compare_versions, extract_version, sorted_versions_desc};

/// Registry key holding the Windows long-path switch.
pub const FILESYSTEM_KEY: &str = r"HKLM\SYSTEM\CurrentControlSet\Control\FileSystem";

/// Registry value name for the long-path switch.
pub const LONG_PATHS_VALUE: &str = "LongPathsEnabled";

/// One check in the probe sequence.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CheckKind {
    CompilerToolchain,
    GitLongPaths,
    LongPathSupport,
    BuildToolchain,
    Sdk,
    BuildGraphTool,
    /// Named optional tool from configuration.
    OptionalTool(String),
    Workspace,
}

impl CheckKind {
    /// Name reported in [`CheckResult::name`].
    pub fn name(&self) -> String {
        match self {
            CheckKind::CompilerToolchain => "compiler-toolchain".to_string(),
            CheckKind::GitLongPaths => "git-long-paths".to_string(),
            CheckKind::LongPathSupport => "long-path-support".to_string(),
            CheckKind::BuildToolchain => "build-toolchain".to_string(),
            CheckKind::Sdk => "sdk".to_string(),
            CheckKind::BuildGraphTool => "build-graph-tool".to_string(),
            CheckKind::OptionalTool(tool) => format!("optional:{}", tool),
            CheckKind::Workspace => "workspace".to_string(),
        }
    }
}

/// Read-only environment probe.
pub struct Probe<'a> {
    config: &'a EnvReadyConfig,
    ctx: ProbeContext<'a>,
}

impl<'a> Probe<'a> {
    pub fn new(config: &'a EnvReadyConfig, ctx: ProbeContext<'a>) -> Self {
        Self { config, ctx }
    }

    pub fn config(&self) -> &EnvReadyConfig {
        self.config
    }

    pub fn context(&self) -> &ProbeContext<'a> {
        &self.ctx
    }

    /// Re-scan well-known toolchain locations, e.g. after an install.
    pub fn refresh_search_path(&mut self) {
        self.ctx.refresh_search_path();
    }

    /// Checks in execution order.
    pub fn plan(&self) -> Vec<CheckKind> {
        let mut plan = vec![
            CheckKind::CompilerToolchain,
            CheckKind::GitLongPaths,
            CheckKind::LongPathSupport,
            CheckKind::BuildToolchain,
            CheckKind::Sdk,
            CheckKind::BuildGraphTool,
        ];
        plan.extend(
            self.config
                .optional_tools
                .iter()
                .map(|t| CheckKind::OptionalTool(t.name.clone())),
        );
        plan.push(CheckKind::Workspace);
        plan
    }

    /// Run every planned check. One result per check, in plan order.
    pub fn run_checks(&self) -> Vec<CheckResult> {
        self.plan().iter().map(|kind| self.run(kind)).collect()
    }

    /// Run a single check; failures become results.
    pub fn run(&self, kind: &CheckKind) -> CheckResult {
        let name = kind.name();
        debug!("Running check '{}'", name);
        let result = match self.check(kind, &name) {
            Ok(result) => result,
            Err(failure) => {
                debug!("Check '{}' failed: {}", name, failure);
                failure.into_result(&name)
            }
        };
        debug!("Check '{}' -> {:?}", name, result.status());
        result
    }

    fn check(&self, kind: &CheckKind, name: &str) -> Result<CheckResult, ProbeFailure> {
        match kind {
            CheckKind::CompilerToolchain => self.compiler_toolchain(name),
            CheckKind::GitLongPaths => self.git_long_paths(name),
            CheckKind::LongPathSupport => self.long_path_support(name),
            CheckKind::BuildToolchain => {
                self.tool_search(name, "C/C++ build toolchain", &self.config.build_toolchain)
            }
            CheckKind::Sdk => match &self.config.sdk {
                Some(sdk) => self.sdk(name, sdk),
                None => Ok(CheckResult::info(
                    name,
                    format!("no platform SDK required on {}", self.ctx.platform()),
                )),
            },
            CheckKind::BuildGraphTool => {
                self.tool_search(name, "build-graph tool", &self.config.build_graph_tool)
            }
            CheckKind::OptionalTool(tool) => self.optional_tool(name, tool),
            CheckKind::Workspace => self.workspace(name),
        }
    }

    fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeouts.probe_secs)
    }

    fn compiler_toolchain(&self, name: &str) -> Result<CheckResult, ProbeFailure> {
        let toolchain = &self.config.toolchain;
        let binary = self.ctx.platform().exe_name(&toolchain.command);
        let path = resolve_tool_path(&binary, self.ctx.search_path()).ok_or_else(|| {
            ProbeFailure::MissingDependency {
                what: format!("toolchain manager '{}'", toolchain.command),
                hint: Some(toolchain.install_hint.clone()),
            }
        })?;

        let program = path.to_string_lossy();
        let args: Vec<&str> = toolchain.version_args.iter().map(String::as_str).collect();
        let output = self.ctx.runner().run(&program, &args, self.probe_timeout())?;
        if !output.success {
            return Err(EnvReadyError::CommandFailed {
                command: command_line(&toolchain.command, &args),
                code: output.exit_code,
            }
            .into());
        }

        let version = extract_version(&output.stdout)
            .or_else(|| extract_version(&output.stderr))
            .unwrap_or_else(|| output.first_line().unwrap_or("(unknown version)").to_string());
        Ok(CheckResult::pass(
            name,
            format!("{} {} at {}", toolchain.command, version, path.display()),
        ))
    }

    fn git_long_paths(&self, name: &str) -> Result<CheckResult, ProbeFailure> {
        let args = ["config", "--get", "core.longpaths"];
        match self.ctx.runner().run("git", &args, self.probe_timeout()) {
            Ok(output) if output.success && output.stdout.trim() == "true" => {
                Ok(CheckResult::pass(name, "core.longpaths = true"))
            }
            Ok(_) => Ok(CheckResult::warn(
                name,
                "core.longpaths is not enabled; run: git config --global core.longpaths true",
            )),
            Err(EnvReadyError::CommandFailed { .. }) => Ok(CheckResult::warn(
                name,
                "git not found; cannot read core.longpaths",
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn long_path_support(&self, name: &str) -> Result<CheckResult, ProbeFailure> {
        if self.ctx.platform() != Platform::Windows {
            return Ok(CheckResult::info(
                name,
                format!("not applicable on {}", self.ctx.platform()),
            ));
        }

        let args = ["query", FILESYSTEM_KEY, "/v", LONG_PATHS_VALUE];
        match self.ctx.runner().run("reg", &args, self.probe_timeout()) {
            Ok(output) if output.success && long_paths_enabled(&output.stdout) => {
                Ok(CheckResult::pass(name, format!("{} = 1", LONG_PATHS_VALUE)))
            }
            Ok(_) | Err(EnvReadyError::CommandFailed { .. }) => Ok(CheckResult::warn(
                name,
                format!(
                    "{} is not enabled; paths over 260 characters may fail",
                    LONG_PATHS_VALUE
                ),
            )),
            Err(e) => Err(e.into()),
        }
    }

    fn tool_search(
        &self,
        name: &str,
        what: &str,
        search: &ToolSearch,
    ) -> Result<CheckResult, ProbeFailure> {
        match find_tool(search, self.ctx.search_path(), self.ctx.platform()) {
            Some(found) => Ok(CheckResult::pass(name, found.path().display().to_string())),
            None => Err(ProbeFailure::MissingDependency {
                what: format!("{} ({})", what, search.binaries.join(", ")),
                hint: search.hint.clone(),
            }),
        }
    }

    fn sdk(&self, name: &str, sdk: &SdkConfig) -> Result<CheckResult, ProbeFailure> {
        let pattern = Regex::new(&sdk.pattern)
            .map_err(|e| EnvReadyError::ConfigValidationError {
                message: format!("sdk.pattern: {}", e),
            })?;

        let mut names = Vec::new();
        for root in &sdk.roots {
            match std::fs::read_dir(root) {
                Ok(entries) => names.extend(
                    entries
                        .filter_map(|e| e.ok())
                        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
                        .map(|e| e.file_name().to_string_lossy().to_string()),
                ),
                Err(e) => debug!("Skipping SDK root {}: {}", root.display(), e),
            }
        }

        let versions = sorted_versions_desc(names, &pattern);
        let Some(greatest) = versions.first() else {
            return Err(ProbeFailure::MissingDependency {
                what: "platform SDK".to_string(),
                hint: sdk.hint.clone(),
            });
        };

        if compare_versions(greatest, &sdk.minimum).is_lt() {
            warn!("Platform SDK {} is below {}", greatest, sdk.minimum);
            return Err(ProbeFailure::VersionTooLow {
                what: "platform SDK".to_string(),
                found: greatest.clone(),
                minimum: sdk.minimum.clone(),
                hint: sdk.hint.clone(),
            });
        }

        let location = sdk
            .roots
            .iter()
            .map(|r| r.join(greatest))
            .find(|p| p.is_dir())
            .unwrap_or_else(|| PathBuf::from(greatest));
        Ok(CheckResult::pass(
            name,
            format!("{} at {}", greatest, location.display()),
        ))
    }

    fn optional_tool(&self, name: &str, tool: &str) -> Result<CheckResult, ProbeFailure> {
        let config = self
            .config
            .optional_tools
            .iter()
            .find(|t| t.name == tool)
            .ok_or_else(|| EnvReadyError::Other(anyhow::anyhow!("unknown optional tool '{}'", tool)))?;

        let binary = self.ctx.platform().exe_name(&config.binary);
        match resolve_tool_path(&binary, self.ctx.search_path()) {
            Some(path) => Ok(CheckResult::pass(name, path.display().to_string())),
            None => {
                let detail = match &config.hint {
                    Some(hint) => format!("{} not found (optional). {}", config.binary, hint),
                    None => format!("{} not found (optional)", config.binary),
                };
                Ok(CheckResult::warn(name, detail))
            }
        }
    }

    fn workspace(&self, name: &str) -> Result<CheckResult, ProbeFailure> {
        let root = self.ctx.project_root();
        let workspace = &self.config.workspace;

        if !root.join(&workspace.primary).exists() {
            return Err(ProbeFailure::WorkspaceMismatch {
                marker: workspace.primary.clone(),
                root: root.to_path_buf(),
                primary: true,
            });
        }

        let missing: Vec<&str> = workspace
            .secondary
            .iter()
            .filter(|m| !root.join(m).exists())
            .map(String::as_str)
            .collect();
        if !missing.is_empty() {
            return Err(ProbeFailure::WorkspaceMismatch {
                marker: missing.join(", "),
                root: root.to_path_buf(),
                primary: false,
            });
        }

        Ok(CheckResult::pass(name, root.display().to_string()))
    }
}

/// Whether `reg query` output reports the long-path value as `0x1`.
pub fn long_paths_enabled(reg_output: &str) -> bool {
    reg_output
        .lines()
        .filter(|line| line.contains(LONG_PATHS_VALUE))
        .filter_map(|line| line.split_whitespace().last())
        .any(|value| value.eq_ignore_ascii_case("0x1"))
}
