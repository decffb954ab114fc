//! Should-run command implementation.
//!
//! The `envready should-run` command prints `true` or `false` depending on
//! whether the changed paths touch anything the relevance patterns cover.
//! Inside GitHub Actions the decision is also written to `GITHUB_OUTPUT`.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::cli::args::ShouldRunArgs;
use crate::config::load_config;
use crate::error::Result;
use crate::relevance::{should_run, ChangeSet, PathFilter, TriggerKind};
use crate::shell::{CommandRunner, SystemRunner};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The should-run command implementation.
pub struct ShouldRunCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    github_output: Option<PathBuf>,
    args: ShouldRunArgs,
}

impl ShouldRunCommand {
    /// Create a new should-run command.
    ///
    /// `GITHUB_OUTPUT` is read from the environment here.
    pub fn new(project_root: &Path, args: ShouldRunArgs) -> Self {
        Self {
            project_root: project_root.to_path_buf(),
            config_path: None,
            github_output: std::env::var_os("GITHUB_OUTPUT").map(PathBuf::from),
            args,
        }
    }

    /// Load config from this file instead of discovering one.
    pub fn with_config_path(mut self, config_path: Option<&Path>) -> Self {
        self.config_path = config_path.map(Path::to_path_buf);
        self
    }

    /// Override the step output file.
    pub fn with_github_output(mut self, path: Option<PathBuf>) -> Self {
        self.github_output = path;
        self
    }

    /// Get the command arguments.
    pub fn args(&self) -> &ShouldRunArgs {
        &self.args
    }

    /// Trigger from the flag, then the CI environment, then `push`.
    pub fn trigger(&self) -> TriggerKind {
        self.args
            .trigger
            .or_else(TriggerKind::from_env)
            .unwrap_or(TriggerKind::Push)
    }

    /// Changed paths from the arguments, else from git when `--base` is set.
    ///
    /// `None` means the changes are unknown.
    pub fn changed_paths(&self, runner: &dyn CommandRunner) -> Option<ChangeSet> {
        if !self.args.paths.is_empty() {
            return Some(self.args.paths.iter().collect());
        }
        let base = self.args.base.as_deref()?;
        ChangeSet::from_git(runner, &self.project_root, base)
    }

    /// Print the decision and record it as a step output.
    pub fn decide(
        &self,
        ui: &mut dyn UserInterface,
        filter: &PathFilter,
        changed: Option<&ChangeSet>,
    ) -> Result<CommandResult> {
        let trigger = self.trigger();
        let decision = should_run(changed, trigger, filter);
        info!("should_run={} (trigger {:?})", decision, trigger);

        ui.message(if decision { "true" } else { "false" });

        if let Some(path) = &self.github_output {
            let mut file = OpenOptions::new().create(true).append(true).open(path)?;
            writeln!(file, "should_run={}", decision)?;
        }

        Ok(CommandResult::success())
    }
}

impl Command for ShouldRunCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        let filter = match load_config(&self.project_root, self.config_path.as_deref())
            .and_then(|config| PathFilter::new(&config.relevance.patterns))
        {
            Ok(f) => f,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        let changed = self.changed_paths(&SystemRunner::in_dir(&self.project_root));
        self.decide(ui, &filter, changed.as_ref())
    }
}
