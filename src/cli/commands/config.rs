//! Config command implementation.
//!
//! The `envready config` command shows the effective configuration, or the
//! JSON Schema of the configuration file with `--schema`.

use std::path::{Path, PathBuf};

use crate::cli::args::ConfigArgs;
use crate::config::{load_config, ConfigPaths, EnvReadyConfig};
use crate::error::{EnvReadyError, Result};
use crate::ui::UserInterface;

use super::dispatcher::{Command, CommandResult};

/// The config command implementation.
pub struct ConfigCommand {
    project_root: PathBuf,
    config_path: Option<PathBuf>,
    args: ConfigArgs,
}

impl ConfigCommand {
    /// Create a new config command.
    pub fn new(project_root: &Path, args: ConfigArgs) -> Self {
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
    pub fn args(&self) -> &ConfigArgs {
        &self.args
    }
}

impl Command for ConfigCommand {
    fn execute(&self, ui: &mut dyn UserInterface) -> Result<CommandResult> {
        if self.args.schema {
            let schema = schemars::schema_for!(EnvReadyConfig);
            let json =
                serde_json::to_string_pretty(&schema).map_err(|e| EnvReadyError::Other(e.into()))?;
            ui.message(&json);
            return Ok(CommandResult::success());
        }

        let config = match load_config(&self.project_root, self.config_path.as_deref()) {
            Ok(c) => c,
            Err(e) => {
                ui.error(&e.to_string());
                return Ok(CommandResult::failure(2));
            }
        };

        if self.args.json {
            let json =
                serde_json::to_string_pretty(&config).map_err(|e| EnvReadyError::Other(e.into()))?;
            ui.message(&json);
        } else {
            // Show config file path(s)
            let sources: Vec<PathBuf> = match &self.config_path {
                Some(path) => vec![path.clone()],
                None => ConfigPaths::discover(&self.project_root)
                    .all_existing()
                    .into_iter()
                    .cloned()
                    .collect(),
            };
            if sources.is_empty() {
                ui.message("# built-in defaults");
            }
            for path in &sources {
                ui.message(&format!("# {}", path.display()));
            }
            let yaml = serde_yaml::to_string(&config).map_err(|e| EnvReadyError::Other(e.into()))?;
            ui.message(&yaml);
        }

        Ok(CommandResult::success())
    }
}
