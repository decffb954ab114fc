//! Configuration schema definitions for envready.
//!
//! This module contains the struct definitions that map to the
//! `.envready.yml` file format. [`EnvReadyConfig::default`] carries the
//! built-in, per-platform values that project files are layered over.

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::shell::Platform;

/// Root configuration structure for `.envready.yml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct EnvReadyConfig {
    /// Compiler toolchain manager to locate and query
    pub toolchain: ToolchainConfig,

    /// C/C++ build toolchain search
    pub build_toolchain: ToolSearch,

    /// Platform SDK requirement (absent when the platform needs none)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sdk: Option<SdkConfig>,

    /// Build-graph tool search (CMake or equivalent)
    pub build_graph_tool: ToolSearch,

    /// Non-blocking conveniences; absence only warns
    #[serde(default)]
    pub optional_tools: Vec<OptionalTool>,

    /// Project root markers
    pub workspace: WorkspaceConfig,

    /// Change relevance filter patterns
    pub relevance: RelevanceConfig,

    /// Subprocess time budgets
    pub timeouts: Timeouts,

    /// Remediation sources
    pub remediation: RemediationConfig,
}

/// Toolchain manager definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolchainConfig {
    /// Binary name to look up on the search path (e.g., "rustup")
    pub command: String,

    /// Arguments that make the tool print its version
    pub version_args: Vec<String>,

    /// Shown when the toolchain is missing
    pub install_hint: String,
}

/// Ordered search for a tool: candidate paths first, then PATH.
///
/// Candidates are ordered newest product first; the first one that exists
/// wins and the search stops there.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct ToolSearch {
    /// Known install locations, highest priority first
    #[serde(default)]
    pub candidates: Vec<PathBuf>,

    /// Binary names to look up on PATH when no candidate exists
    #[serde(default)]
    pub binaries: Vec<String>,

    /// Remediation hint shown when the tool is missing
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Platform SDK requirement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct SdkConfig {
    /// Directories whose children are SDK version directories
    pub roots: Vec<PathBuf>,

    /// Regex a version directory name must match
    pub pattern: String,

    /// Minimum acceptable version, compared segment by segment
    pub minimum: String,

    /// Shown when the SDK is missing or too old
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// An optional tool checked for presence only.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct OptionalTool {
    /// Display name (e.g., "docker")
    pub name: String,

    /// Binary to look up on PATH
    pub binary: String,

    /// Shown when the tool is absent
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
}

/// Files or directories that identify the project root.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct WorkspaceConfig {
    /// Must exist; missing means the run is from the wrong directory
    pub primary: String,

    /// Expected but not required
    #[serde(default)]
    pub secondary: Vec<String>,
}

/// Glob patterns that make a changed path relevant.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RelevanceConfig {
    pub patterns: Vec<String>,
}

/// Subprocess time budgets in seconds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct Timeouts {
    /// Budget for each read-only probe command
    pub probe_secs: u64,

    /// Budget for each remediation command (installers can be slow)
    pub remediation_secs: u64,
}

/// Where remediation fetches installers from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
pub struct RemediationConfig {
    /// Base URL of the rustup-init distribution
    pub rustup_dist_url: String,
}

impl Default for EnvReadyConfig {
    fn default() -> Self {
        Self::for_platform(Platform::current())
    }
}

impl EnvReadyConfig {
    /// Built-in configuration for a platform.
    pub fn for_platform(platform: Platform) -> Self {
        Self {
            toolchain: ToolchainConfig {
                command: "rustup".to_string(),
                version_args: vec!["--version".to_string()],
                install_hint: "Install rustup from https://rustup.rs or re-run with --fix"
                    .to_string(),
            },
            build_toolchain: default_build_toolchain(platform),
            sdk: default_sdk(platform),
            build_graph_tool: default_build_graph_tool(platform),
            optional_tools: default_optional_tools(platform),
            workspace: WorkspaceConfig {
                primary: "Cargo.toml".to_string(),
                secondary: vec!["crates".to_string()],
            },
            relevance: RelevanceConfig {
                patterns: default_relevance_patterns(),
            },
            timeouts: Timeouts {
                probe_secs: 10,
                remediation_secs: 600,
            },
            remediation: RemediationConfig {
                rustup_dist_url: "https://static.rust-lang.org/rustup/dist".to_string(),
            },
        }
    }
}

fn default_build_toolchain(platform: Platform) -> ToolSearch {
    match platform {
        Platform::Windows => {
            let mut candidates = Vec::new();
            for (root, year) in [
                (r"C:\Program Files\Microsoft Visual Studio", "2022"),
                (r"C:\Program Files (x86)\Microsoft Visual Studio", "2019"),
            ] {
                for edition in ["BuildTools", "Enterprise", "Professional", "Community"] {
                    candidates.push(
                        PathBuf::from(root)
                            .join(year)
                            .join(edition)
                            .join(r"VC\Tools\MSVC"),
                    );
                }
            }
            ToolSearch {
                candidates,
                binaries: vec!["cl".to_string()],
                hint: Some(
                    "Install Visual Studio Build Tools with the \"Desktop development with C++\" workload"
                        .to_string(),
                ),
            }
        }
        Platform::MacOS => ToolSearch {
            candidates: vec![PathBuf::from("/Library/Developer/CommandLineTools/usr/bin/clang")],
            binaries: vec!["cc".to_string(), "clang".to_string()],
            hint: Some("Install the Xcode Command Line Tools: xcode-select --install".to_string()),
        },
        Platform::Linux => ToolSearch {
            candidates: Vec::new(),
            binaries: vec!["cc".to_string(), "gcc".to_string(), "clang".to_string()],
            hint: Some("Install a C compiler (e.g., build-essential or gcc)".to_string()),
        },
    }
}

fn default_sdk(platform: Platform) -> Option<SdkConfig> {
    match platform {
        Platform::Windows => Some(SdkConfig {
            roots: vec![
                PathBuf::from(r"C:\Program Files (x86)\Windows Kits\10\Include"),
                PathBuf::from(r"C:\Program Files\Windows Kits\10\Include"),
            ],
            pattern: r"^10\.0\.\d+\.\d+$".to_string(),
            minimum: "10.0.19041.0".to_string(),
            hint: Some("Install the Windows 10/11 SDK from the Visual Studio Installer".to_string()),
        }),
        Platform::MacOS | Platform::Linux => None,
    }
}

fn default_build_graph_tool(platform: Platform) -> ToolSearch {
    let candidates = match platform {
        Platform::Windows => vec![
            PathBuf::from(r"C:\Program Files\CMake\bin\cmake.exe"),
            PathBuf::from(r"C:\Program Files (x86)\CMake\bin\cmake.exe"),
        ],
        Platform::MacOS => vec![
            PathBuf::from("/opt/homebrew/bin/cmake"),
            PathBuf::from("/Applications/CMake.app/Contents/bin/cmake"),
        ],
        Platform::Linux => Vec::new(),
    };
    ToolSearch {
        candidates,
        binaries: vec!["cmake".to_string()],
        hint: Some("Install CMake from https://cmake.org/download/".to_string()),
    }
}

fn default_optional_tools(platform: Platform) -> Vec<OptionalTool> {
    let code = match platform {
        Platform::Windows => "code.cmd",
        Platform::MacOS | Platform::Linux => "code",
    };
    vec![
        OptionalTool {
            name: "docker".to_string(),
            binary: "docker".to_string(),
            hint: Some("Container builds need Docker".to_string()),
        },
        OptionalTool {
            name: "node".to_string(),
            binary: "node".to_string(),
            hint: Some("Frontend tooling needs Node.js".to_string()),
        },
        OptionalTool {
            name: "code".to_string(),
            binary: code.to_string(),
            hint: None,
        },
    ]
}

fn default_relevance_patterns() -> Vec<String> {
    [
        // Sources
        "**/*.rs",
        "**/*.c",
        "**/*.cpp",
        "**/*.h",
        // Configuration
        "**/*.toml",
        "**/*.yml",
        "**/*.yaml",
        "**/*.json",
        "**/*.ps1",
        "Cargo.lock",
        // Top-level directories
        "crates/**",
        "src/**",
        "tests/**",
        "build/**",
        ".github/**",
        ".cargo/**",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}
