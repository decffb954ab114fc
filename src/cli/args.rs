//! CLI argument definitions.
//!
//! This module defines all CLI arguments using clap's derive macros.
//! The main entry point is the [`Cli`] struct.

use clap::{Parser, Subcommand};
use clap_complete::Shell;
use std::path::PathBuf;

use crate::relevance::TriggerKind;

/// envready - Build environment readiness checks for CI and workstations.
#[derive(Debug, Parser)]
#[command(name = "envready")]
#[command(author, version, long_about = None)]
#[command(about = "Build environment readiness checks for CI and workstations")]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to config file (overrides default .envready.yml)
    #[arg(short, long, global = true, env = "ENVREADY_CONFIG")]
    pub config: Option<PathBuf>,

    /// Path to project root (overrides current directory)
    #[arg(short, long, global = true)]
    pub project: Option<PathBuf>,

    /// Show details for every check
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Enable debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Probe the environment (default if no command specified)
    Check(CheckArgs),

    /// Decide whether changed paths warrant a build
    ShouldRun(ShouldRunArgs),

    /// Show the effective configuration
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

/// Arguments for the `check` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct CheckArgs {
    /// Apply automatic fixes, then re-probe what was fixed
    #[arg(long)]
    pub fix: bool,

    /// Output the report as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the `should-run` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ShouldRunArgs {
    /// Event that triggered the run (detected from GitHub Actions if omitted)
    #[arg(long, value_enum)]
    pub trigger: Option<TriggerKind>,

    /// Base ref to diff against when no paths are given
    #[arg(long)]
    pub base: Option<String>,

    /// Changed paths, relative to the workspace root
    pub paths: Vec<String>,
}

/// Arguments for the `config` command.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigArgs {
    /// Output as JSON
    #[arg(long)]
    pub json: bool,

    /// Print the JSON Schema of the configuration file
    #[arg(long, conflicts_with = "json")]
    pub schema: bool,
}

/// Arguments for the `completions` command.
#[derive(Debug, Clone, clap::Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn help_names_the_tool() {
        let help = Cli::command().render_help().to_string();
        assert!(help.contains("Build environment readiness checks"));
        assert!(help.contains("should-run"));
    }

    #[test]
    fn no_subcommand_means_check() {
        let cli = Cli::try_parse_from(["envready"]).unwrap();
        assert!(cli.command.is_none());
    }

    #[test]
    fn parses_check_flags() {
        let cli = Cli::try_parse_from(["envready", "check", "--fix", "--json"]).unwrap();
        match cli.command {
            Some(Commands::Check(args)) => {
                assert!(args.fix);
                assert!(args.json);
            }
            other => panic!("expected check, got {:?}", other),
        }
    }

    #[test]
    fn parses_should_run() {
        let cli = Cli::try_parse_from([
            "envready",
            "should-run",
            "--trigger",
            "pull-request",
            "--base",
            "origin/main",
            "src/lib.rs",
            "README.md",
        ])
        .unwrap();
        match cli.command {
            Some(Commands::ShouldRun(args)) => {
                assert_eq!(args.trigger, Some(TriggerKind::PullRequest));
                assert_eq!(args.base.as_deref(), Some("origin/main"));
                assert_eq!(args.paths, vec!["src/lib.rs", "README.md"]);
            }
            other => panic!("expected should-run, got {:?}", other),
        }
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli = Cli::try_parse_from(["envready", "check", "-v", "-p", "/tmp/ws"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.project, Some(PathBuf::from("/tmp/ws")));
    }

    #[test]
    fn schema_conflicts_with_json() {
        assert!(Cli::try_parse_from(["envready", "config", "--json", "--schema"]).is_err());
    }
}
