//! Tool location on disk and on the search path.
//!
//! The biggest source of false negatives is a toolchain installed in a
//! well-known location that is not yet on `PATH` (a fresh rustup install
//! before the shell has been restarted). [`augmented_search_path`] prepends
//! those locations so later lookups see them.

use std::path::{Path, PathBuf};

use crate::config::ToolSearch;
use crate::shell::Platform;

/// Check whether a file has executable permission bits set.
#[cfg(unix)]
pub fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;
    path.metadata()
        .map(|m| m.permissions().mode() & 0o111 != 0)
        .unwrap_or(false)
}

/// On Windows, executability is determined by file extension, not permission bits.
#[cfg(not(unix))]
pub fn is_executable(path: &Path) -> bool {
    path.is_file()
}

/// Resolve a tool's binary path by iterating over search path entries.
///
/// Returns the first match that exists and is executable. Does not shell out
/// to `which`/`where`, whose behavior varies across systems.
pub fn resolve_tool_path(tool: &str, path_entries: &[PathBuf]) -> Option<PathBuf> {
    for dir in path_entries {
        let candidate = dir.join(tool);
        if candidate.is_file() && is_executable(&candidate) {
            return Some(candidate);
        }
    }
    None
}

/// Parse the system PATH environment variable into a list of directories.
pub fn parse_system_path() -> Vec<PathBuf> {
    std::env::var_os("PATH")
        .map(|path| std::env::split_paths(&path).collect())
        .unwrap_or_default()
}

/// Directory rustup installs proxies into.
///
/// `CARGO_HOME` wins when set; otherwise `~/.cargo`.
pub fn cargo_bin_dir<F>(env_fn: &F) -> Option<PathBuf>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    if let Ok(home) = env_fn("CARGO_HOME") {
        if !home.is_empty() {
            return Some(PathBuf::from(home).join("bin"));
        }
    }
    dirs::home_dir().map(|h| h.join(".cargo").join("bin"))
}

/// System PATH with well-known toolchain locations prepended.
pub fn augmented_search_path() -> Vec<PathBuf> {
    augmented_search_path_with_env(parse_system_path(), |key: &str| std::env::var(key))
}

/// [`augmented_search_path`] over an explicit PATH and env lookup.
///
/// This allows testing without modifying actual environment variables.
pub fn augmented_search_path_with_env<F>(system_path: Vec<PathBuf>, env_fn: F) -> Vec<PathBuf>
where
    F: Fn(&str) -> Result<String, std::env::VarError>,
{
    let mut result: Vec<PathBuf> = cargo_bin_dir(&env_fn)
        .into_iter()
        .filter(|dir| dir.is_dir() && !system_path.contains(dir))
        .collect();
    result.extend(system_path);
    result
}

/// Where a searched tool was found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Located {
    /// A configured install location exists.
    Candidate(PathBuf),
    /// A configured binary was found on the search path.
    OnPath(PathBuf),
}

impl Located {
    pub fn path(&self) -> &Path {
        match self {
            Located::Candidate(p) | Located::OnPath(p) => p,
        }
    }
}

/// Run an ordered tool search.
///
/// Candidates are tried in priority order and the first that exists wins.
/// Only when none exists are the binaries looked up on `search_path`.
pub fn find_tool(search: &ToolSearch, search_path: &[PathBuf], platform: Platform) -> Option<Located> {
    if let Some(candidate) = search.candidates.iter().find(|c| c.exists()) {
        return Some(Located::Candidate(candidate.clone()));
    }

    search
        .binaries
        .iter()
        .find_map(|bin| resolve_tool_path(&platform.exe_name(bin), search_path))
        .map(Located::OnPath)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    /// Create a fake binary at a path (creates parent dirs as needed).
    fn create_fake_binary(path: &Path) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, "#!/bin/sh\n").unwrap();
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            fs::set_permissions(path, fs::Permissions::from_mode(0o755)).unwrap();
        }
    }

    #[test]
    fn resolve_tool_path_finds_first_match() {
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        create_fake_binary(&dir_a.join("cmake"));
        create_fake_binary(&dir_b.join("cmake"));

        let result = resolve_tool_path("cmake", &[dir_a.clone(), dir_b]);
        assert_eq!(result, Some(dir_a.join("cmake")));
    }

    #[test]
    fn resolve_tool_path_returns_none_when_not_found() {
        let temp = TempDir::new().unwrap();
        assert!(resolve_tool_path("cmake", &[temp.path().to_path_buf()]).is_none());
    }

    #[cfg(unix)]
    #[test]
    fn resolve_tool_path_skips_non_executable() {
        use std::os::unix::fs::PermissionsExt;
        let temp = TempDir::new().unwrap();
        let dir_a = temp.path().join("a");
        let dir_b = temp.path().join("b");
        fs::create_dir_all(&dir_a).unwrap();
        fs::write(dir_a.join("cmake"), "not executable").unwrap();
        fs::set_permissions(dir_a.join("cmake"), fs::Permissions::from_mode(0o644)).unwrap();
        create_fake_binary(&dir_b.join("cmake"));

        let result = resolve_tool_path("cmake", &[dir_a, dir_b.clone()]);
        assert_eq!(result, Some(dir_b.join("cmake")));
    }

    #[test]
    fn is_executable_returns_false_for_nonexistent_file() {
        assert!(!is_executable(Path::new("/nonexistent/path/to/file")));
    }

    #[test]
    fn cargo_home_overrides_home_dir() {
        let env = |key: &str| match key {
            "CARGO_HOME" => Ok("/opt/cargo".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        };
        assert_eq!(cargo_bin_dir(&env), Some(PathBuf::from("/opt/cargo/bin")));
    }

    #[test]
    fn augmented_path_prepends_cargo_bin() {
        let temp = TempDir::new().unwrap();
        let cargo_home = temp.path().join("cargo");
        fs::create_dir_all(cargo_home.join("bin")).unwrap();
        let home = cargo_home.to_string_lossy().to_string();
        let env = move |key: &str| match key {
            "CARGO_HOME" => Ok(home.clone()),
            _ => Err(std::env::VarError::NotPresent),
        };

        let system = vec![PathBuf::from("/usr/bin")];
        let path = augmented_search_path_with_env(system, env);
        assert_eq!(path, vec![cargo_home.join("bin"), PathBuf::from("/usr/bin")]);
    }

    #[test]
    fn augmented_path_does_not_duplicate_entries() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        fs::create_dir_all(&bin).unwrap();
        let home = temp.path().to_string_lossy().to_string();
        let env = move |key: &str| match key {
            "CARGO_HOME" => Ok(home.clone()),
            _ => Err(std::env::VarError::NotPresent),
        };

        let path = augmented_search_path_with_env(vec![bin.clone()], env);
        assert_eq!(path, vec![bin]);
    }

    #[test]
    fn missing_cargo_home_dir_is_not_added() {
        let env = |key: &str| match key {
            "CARGO_HOME" => Ok("/nonexistent/cargo".to_string()),
            _ => Err(std::env::VarError::NotPresent),
        };
        let path = augmented_search_path_with_env(vec![], env);
        assert!(path.is_empty());
    }

    #[test]
    fn first_existing_candidate_wins() {
        let temp = TempDir::new().unwrap();
        let newer = temp.path().join("2022/BuildTools");
        let older = temp.path().join("2019/Community");
        fs::create_dir_all(&newer).unwrap();
        fs::create_dir_all(&older).unwrap();

        let search = ToolSearch {
            candidates: vec![temp.path().join("missing"), newer.clone(), older],
            binaries: vec!["cl".into()],
            hint: None,
        };
        assert_eq!(
            find_tool(&search, &[], Platform::Linux),
            Some(Located::Candidate(newer))
        );
    }

    #[test]
    fn falls_back_to_binaries_on_path() {
        let temp = TempDir::new().unwrap();
        let bin = temp.path().join("bin");
        create_fake_binary(&bin.join("gcc"));

        let search = ToolSearch {
            candidates: vec![temp.path().join("missing")],
            binaries: vec!["cc".into(), "gcc".into()],
            hint: None,
        };
        let found = find_tool(&search, &[bin.clone()], Platform::Linux).unwrap();
        assert_eq!(found, Located::OnPath(bin.join("gcc")));
        assert_eq!(found.path(), bin.join("gcc"));
    }

    #[test]
    fn nothing_found_is_none() {
        let search = ToolSearch {
            candidates: vec![PathBuf::from("/nonexistent/cmake")],
            binaries: vec!["cmake".into()],
            hint: None,
        };
        assert!(find_tool(&search, &[], Platform::Linux).is_none());
    }
}
