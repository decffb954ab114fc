//! Configuration file discovery and loading.
//!
//! Configuration is layered: the built-in defaults for the current platform
//! form the base, then the project file, then local overrides. Later layers
//! override earlier ones via [`deep_merge`](super::merger::deep_merge), so a
//! project file only needs to mention what it changes.

use crate::config::merger::merge_configs;
use crate::config::schema::EnvReadyConfig;
use crate::config::validator::validate;
use crate::error::{EnvReadyError, Result};
use std::fs;
use std::path::{Path, PathBuf};

/// Project configuration file name.
pub const CONFIG_FILE: &str = ".envready.yml";

/// Uncommitted local overrides file name.
pub const LOCAL_CONFIG_FILE: &str = ".envready.local.yml";

/// Paths to configuration files in merge order (later overrides earlier).
#[derive(Debug, Clone)]
pub struct ConfigPaths {
    /// Project config: .envready.yml
    pub project: Option<PathBuf>,

    /// Local overrides: .envready.local.yml
    pub project_local: Option<PathBuf>,
}

impl ConfigPaths {
    /// Discover config files for the given project root.
    pub fn discover(project_root: &Path) -> Self {
        Self {
            project: existing(project_root.join(CONFIG_FILE)),
            project_local: existing(project_root.join(LOCAL_CONFIG_FILE)),
        }
    }

    /// Returns all existing config paths in merge order.
    pub fn all_existing(&self) -> Vec<&PathBuf> {
        self.project.iter().chain(self.project_local.iter()).collect()
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    if path.exists() {
        Some(path)
    } else {
        None
    }
}

/// Load a config file as raw YAML Value (for merging).
///
/// # Errors
///
/// Returns `ConfigNotFound` if the file doesn't exist.
/// Returns `ConfigParseError` if the YAML is invalid.
pub fn load_config_value(path: &Path) -> Result<serde_yaml::Value> {
    let content = fs::read_to_string(path).map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            EnvReadyError::ConfigNotFound {
                path: path.to_path_buf(),
            }
        } else {
            EnvReadyError::Io(e)
        }
    })?;

    let value: serde_yaml::Value =
        serde_yaml::from_str(&content).map_err(|e| EnvReadyError::ConfigParseError {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;

    // An empty file parses as null; treat it as "no overrides".
    if value.is_null() {
        Ok(serde_yaml::Value::Mapping(Default::default()))
    } else {
        Ok(value)
    }
}

/// Layer YAML overrides over the built-in defaults and parse the result.
///
/// `source_path` is only used for error reporting.
pub fn parse_layered(
    defaults: &EnvReadyConfig,
    layers: &[serde_yaml::Value],
    source_path: &Path,
) -> Result<EnvReadyConfig> {
    let base = serde_yaml::to_value(defaults).map_err(|e| EnvReadyError::Other(e.into()))?;

    let mut values = Vec::with_capacity(layers.len() + 1);
    values.push(base);
    values.extend(layers.iter().cloned());

    let merged = merge_configs(&values);
    serde_yaml::from_value(merged).map_err(|e| EnvReadyError::ConfigParseError {
        path: source_path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Load the effective configuration for a project.
///
/// If `config_override` is provided, only that file is layered over the
/// defaults and it must exist. Otherwise the project and local files are
/// discovered; when neither exists the built-in defaults are used as is.
///
/// The result is validated before it is returned.
pub fn load_config(project_root: &Path, config_override: Option<&Path>) -> Result<EnvReadyConfig> {
    let defaults = EnvReadyConfig::default();

    let (layers, source) = if let Some(path) = config_override {
        (vec![load_config_value(path)?], path.to_path_buf())
    } else {
        let paths = ConfigPaths::discover(project_root);
        let layers = paths
            .all_existing()
            .into_iter()
            .map(|p| load_config_value(p))
            .collect::<Result<Vec<_>>>()?;
        (layers, project_root.join(CONFIG_FILE))
    };

    if layers.is_empty() {
        tracing::debug!("No config file found, using built-in defaults");
    } else {
        tracing::debug!("Loaded {} config layer(s) from {}", layers.len(), source.display());
    }

    let config = parse_layered(&defaults, &layers, &source)?;
    validate(&config)?;
    Ok(config)
}
