//! What started the pipeline run.

use clap::ValueEnum;
use serde::Serialize;

/// Kind of event that triggered a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum TriggerKind {
    Push,
    PullRequest,
    /// Operator-initiated; always runs.
    Manual,
    /// Release tag; always runs.
    Tag,
    Schedule,
}

impl TriggerKind {
    /// Whether this trigger runs regardless of which paths changed.
    pub fn bypasses_filter(&self) -> bool {
        matches!(self, TriggerKind::Manual | TriggerKind::Tag)
    }

    /// Detect the trigger from GitHub Actions environment variables.
    pub fn from_env() -> Option<Self> {
        Self::from_env_with(|key: &str| std::env::var(key))
    }

    /// [`from_env`](Self::from_env) with a custom env var lookup.
    ///
    /// A `GITHUB_REF` under `refs/tags/` is a tag regardless of event name.
    pub fn from_env_with<F>(env_fn: F) -> Option<Self>
    where
        F: Fn(&str) -> Result<String, std::env::VarError>,
    {
        if env_fn("GITHUB_REF").is_ok_and(|r| r.starts_with("refs/tags/")) {
            return Some(TriggerKind::Tag);
        }

        match env_fn("GITHUB_EVENT_NAME").ok()?.as_str() {
            "push" => Some(TriggerKind::Push),
            "pull_request" | "pull_request_target" | "merge_group" => {
                Some(TriggerKind::PullRequest)
            }
            "workflow_dispatch" | "repository_dispatch" => Some(TriggerKind::Manual),
            "schedule" => Some(TriggerKind::Schedule),
            _ => None,
        }
    }
}
