//! The set of paths changed by a commit range.

use std::collections::BTreeSet;
use std::path::Path;
use std::time::Duration;
use tracing::{debug, warn};

use crate::shell::CommandRunner;

const GIT_DIFF_TIMEOUT: Duration = Duration::from_secs(30);

/// Ordered, de-duplicated set of changed paths, `/`-separated.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    paths: BTreeSet<String>,
}

impl ChangeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.paths.iter().map(String::as_str)
    }

    /// Paths changed between `base` and `HEAD` in `workspace`.
    ///
    /// Returns `None` when git cannot answer (no repository, unknown base,
    /// shallow clone); callers treat that as "unknown", not "empty".
    pub fn from_git(runner: &dyn CommandRunner, workspace: &Path, base: &str) -> Option<Self> {
        let workspace = workspace.to_string_lossy();
        let range = format!("{}...HEAD", base);
        let args = ["-C", &*workspace, "diff", "--name-only", range.as_str()];

        match runner.run("git", &args, GIT_DIFF_TIMEOUT) {
            Ok(output) if output.success => {
                let changes: ChangeSet = output.stdout.lines().collect();
                debug!("{} paths changed since {}", changes.len(), base);
                Some(changes)
            }
            Ok(output) => {
                warn!(
                    "git diff against {} failed: {}",
                    base,
                    output.first_line().unwrap_or("no output")
                );
                None
            }
            Err(e) => {
                warn!("Could not determine changed paths: {}", e);
                None
            }
        }
    }
}

impl<S: AsRef<str>> FromIterator<S> for ChangeSet {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        let paths = iter
            .into_iter()
            .map(|p| p.as_ref().trim().replace('\\', "/"))
            .filter(|p| !p.is_empty())
            .collect();
        Self { paths }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockReply, MockRunner};

    #[test]
    fn normalizes_and_deduplicates() {
        let changes: ChangeSet = ["src\\lib.rs", "src/lib.rs", "", "  README.md  "]
            .into_iter()
            .collect();
        assert_eq!(changes.iter().collect::<Vec<_>>(), vec!["README.md", "src/lib.rs"]);
    }

    #[test]
    fn from_git_collects_diff_output() {
        let runner = MockRunner::new().with_reply(
            "git -C /work diff --name-only origin/main...HEAD",
            MockReply::stdout("crates/foo/src/lib.rs\nREADME.md\n"),
        );
        let changes = ChangeSet::from_git(&runner, Path::new("/work"), "origin/main").unwrap();
        assert_eq!(changes.len(), 2);
    }

    #[test]
    fn from_git_failure_is_none() {
        let runner = MockRunner::new().with_reply(
            "git -C /work diff --name-only missing...HEAD",
            MockReply::exit(128, "fatal: ambiguous argument 'missing...HEAD'"),
        );
        assert!(ChangeSet::from_git(&runner, Path::new("/work"), "missing").is_none());

        let no_git = MockRunner::new();
        assert!(ChangeSet::from_git(&no_git, Path::new("/work"), "main").is_none());
    }
}
