//! Check command implementation.
//!
//! The `envready check` command probes the environment, optionally applies
//! fixes, and prints the readiness report. It is also what runs when no
//! subcommand is given.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::cli::args::CheckArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::probe::{Probe, ProbeContext, Remediator, RustupInstaller, ToolchainInstaller};
use crate::report::{render_json, render_report, CheckResult, CheckStatus, EnvironmentReport, Verdict};
use crate::shell::SystemRunner;
use crate::ui::{Theme, UserInterface};

use super::dispatcher::{Command, CommandResult};

/// The check command implementation.
pub struct CheckCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: CheckArgs,
}

impl CheckCommand {
    /// Create a new check command.
    pub fn new(project_root: &Path, args: CheckArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: None,
            args,
        }
    }

    /// Load config from this file instead of discovering one.
    pub fn with_config_path(mut self, config_path: Option<&Path>) -> Self {
        self.config_path = config_path.map(Path::to_path_buf);
        self
    }

    /// Get the project root path.
    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    /// Get the command arguments.
    pub fn args(&self) -> &CheckArgs {
        &self.args
    }

    /// Run every planned check, then the fixes when `--fix` is set.
    ///
    /// Always returns one result per planned check.
    pub fn probe_environment<'a>(
        &self,
        ui: &mut dyn UserInterface,
        probe: Probe<'a>,
        installer: &'a dyn ToolchainInstaller,
    ) -> EnvironmentReport {
        let show_progress = !self.args.json;
        let results: Vec<CheckResult> = probe
            .plan()
            .iter()
            .map(|kind| {
                if !show_progress {
                    return probe.run(kind);
                }
                let mut spinner = ui.start_spinner(&format!("Checking {}...", kind.name()));
                let result = probe.run(kind);
                match result.status() {
                    CheckStatus::Pass => spinner.finish_success(result.name()),
                    CheckStatus::Warn => spinner.finish_warning(result.name()),
                    CheckStatus::Fail => spinner.finish_error(result.name()),
                    CheckStatus::Info => spinner.finish_skipped(result.name()),
                }
                result
            })
            .collect();

        let results = if self.args.fix {
            debug!("Applying fixes");
            Remediator::new(probe, installer).apply(results)
        } else {
            results
        };

        EnvironmentReport::new(results)
    }

    /// Print the report and pick the exit code.
    pub fn emit(&self, ui: &mut dyn UserInterface, report: &EnvironmentReport) -> Result<CommandResult> {
        if self.args.json {
            ui.message(&render_json(report)?);
        } else {
            let verbose = ui.output_mode().shows_details();
            ui.message(&render_report(report, verbose, &Theme::detect()));
            if !self.args.fix && report.verdict() != Verdict::Ready {
                ui.show_hint("Run `envready check --fix` to apply automatic fixes");
            }
        }

        Ok(CommandResult::from_exit_code(report.verdict().exit_code()))
    }
}

impl CheckCommand {
    /// Runner whose commands start in the project root.
    fn runner(&self) -> SystemRunner {
        SystemRunner::in_dir(&self.project_root)
    }
}

impl Command for CheckCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let config = match load_config(&self.project_root, self.config_path.as_deref()) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        let runner = self.runner();
        let installer = RustupInstaller::new(config.remediation.rustup_dist_url.clone());
        let probe = Probe::new(&config, ProbeContext::system(&runner, &self.project_root));

        let report = self.probe_environment(ui, probe, &installer);
        self.emit(ui, &report)
    }
}
