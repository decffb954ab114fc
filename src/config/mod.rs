//! Configuration loading, layering, and validation.
//!
//! - Schema definitions and built-in defaults in [`schema`]
//! - File discovery and loading in [`loader`]
//! - Deep merging in [`merger`]
//! - Validation in [`validator`]
//!
//! # Example
//!
//! ```
//! use envready::config::load_config;
//! use tempfile::TempDir;
//! use std::fs;
//!
//! let temp = TempDir::new().unwrap();
//! fs::write(temp.path().join(".envready.yml"), "timeouts:\n  probe_secs: 3\n").unwrap();
//!
//! let config = load_config(temp.path(), None).unwrap();
//! assert_eq!(config.timeouts.probe_secs, 3);
//! assert_eq!(config.toolchain.command, "rustup");
//! ```
//!
//! # Configuration File Locations
//!
//! Layers are merged in this order:
//! 1. Built-in defaults for the current platform
//! 2. Project config (`.envready.yml`), or the file given with `--config`
//! 3. Local overrides (`.envready.local.yml`, not used with `--config`)

pub mod loader;
pub mod merger;
pub mod schema;
pub mod validator;

pub use loader::{load_config, load_config_value, parse_layered, ConfigPaths, CONFIG_FILE, LOCAL_CONFIG_FILE};
pub use merger::{deep_merge, merge_configs};
pub use schema::{
    EnvReadyConfig, OptionalTool, RelevanceConfig, RemediationConfig, SdkConfig, Timeouts,
    ToolSearch, ToolchainConfig, WorkspaceConfig,
};
pub use validator::{validate, validate_config, ValidationError};
