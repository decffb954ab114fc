//! Everything a check needs from the outside world.

use std::path::{Path, PathBuf};
use std::time::Duration;

use tracing::debug;

use crate::shell::{is_elevated, CommandRunner, Platform};

use super::locate::{augmented_search_path, augmented_search_path_with_env};

/// Host facts and the process seam shared by all checks.
pub struct ProbeContext<'a> {
    runner: &'a dyn CommandRunner,
    search_path: Vec<PathBuf>,
    project_root: PathBuf,
    platform: Platform,
    elevated: Option<bool>,
}

impl<'a> ProbeContext<'a> {
    /// Context for the real host: augmented PATH and detected platform.
    ///
    /// Privileges are detected on first use by [`elevated`](Self::elevated).
    pub fn system(runner: &'a dyn CommandRunner, project_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            search_path: augmented_search_path(),
            project_root: project_root.into(),
            platform: Platform::current(),
            elevated: None,
        }
    }

    /// Context with an empty search path, current platform and no elevation.
    pub fn new(runner: &'a dyn CommandRunner, project_root: impl Into<PathBuf>) -> Self {
        Self {
            runner,
            search_path: Vec::new(),
            project_root: project_root.into(),
            platform: Platform::current(),
            elevated: Some(false),
        }
    }

    pub fn with_search_path(mut self, search_path: Vec<PathBuf>) -> Self {
        self.search_path = search_path;
        self
    }

    pub fn with_platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    pub fn with_elevated(mut self, elevated: bool) -> Self {
        self.elevated = Some(elevated);
        self
    }

    pub fn runner(&self) -> &dyn CommandRunner {
        self.runner
    }

    pub fn search_path(&self) -> &[PathBuf] {
        &self.search_path
    }

    pub fn project_root(&self) -> &Path {
        &self.project_root
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Whether the process may change machine-wide settings.
    ///
    /// On Windows this asks `net session`, which only succeeds from an
    /// elevated prompt, through the runner with `timeout`.
    pub fn elevated(&self, timeout: Duration) -> bool {
        if let Some(elevated) = self.elevated {
            return elevated;
        }
        match self.platform {
            Platform::Windows => match self.runner.run("net", &["session"], timeout) {
                Ok(output) => output.success,
                Err(e) => {
                    debug!("Could not determine elevation: {}", e);
                    false
                }
            },
            Platform::MacOS | Platform::Linux => is_elevated(),
        }
    }

    /// Pick up toolchain locations created since the context was built.
    pub fn refresh_search_path(&mut self) {
        let current = std::mem::take(&mut self.search_path);
        self.search_path = augmented_search_path_with_env(current, |key: &str| std::env::var(key));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shell::{MockReply, MockRunner};

    #[test]
    fn builders_override_defaults() {
        let runner = MockRunner::new();
        let ctx = ProbeContext::new(&runner, "/work")
            .with_search_path(vec![PathBuf::from("/bin")])
            .with_platform(Platform::Windows)
            .with_elevated(true);

        assert_eq!(ctx.search_path(), &[PathBuf::from("/bin")]);
        assert_eq!(ctx.platform(), Platform::Windows);
        assert!(ctx.elevated(Duration::from_secs(1)));
        assert_eq!(ctx.project_root(), Path::new("/work"));
    }

    #[test]
    fn windows_elevation_asks_net_session() {
        let t = Duration::from_secs(1);
        let admin = MockRunner::new().with_reply("net session", MockReply::stdout("There are no entries in the list."));
        let ctx = ProbeContext::system(&admin, "/work").with_platform(Platform::Windows);
        assert!(ctx.elevated(t));

        let user = MockRunner::new().with_reply("net session", MockReply::exit(2, "Access is denied."));
        let ctx = ProbeContext::system(&user, "/work").with_platform(Platform::Windows);
        assert!(!ctx.elevated(t));

        let hung = MockRunner::new().with_reply("net session", MockReply::Timeout);
        let ctx = ProbeContext::system(&hung, "/work").with_platform(Platform::Windows);
        assert!(!ctx.elevated(t));
    }

    #[test]
    fn explicit_elevation_skips_detection() {
        let runner = MockRunner::new();
        let ctx = ProbeContext::system(&runner, "/work")
            .with_platform(Platform::Windows)
            .with_elevated(true);
        assert!(ctx.elevated(Duration::from_secs(1)));
        assert!(runner.calls().is_empty());
    }

    #[test]
    fn refresh_keeps_existing_entries() {
        let runner = MockRunner::new();
        let mut ctx =
            ProbeContext::new(&runner, "/work").with_search_path(vec![PathBuf::from("/bin")]);
        ctx.refresh_search_path();
        assert!(ctx.search_path().contains(&PathBuf::from("/bin")));
    }
}
