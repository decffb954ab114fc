//! Change relevance filtering.
//!
//! Decides whether a pipeline run is worth doing given which paths changed
//! and what triggered it.
//!
//! - [`glob`] - Glob patterns compiled to anchored regexes ([`PathFilter`])
//! - [`changes`] - The changed path set ([`ChangeSet`])
//! - [`trigger`] - Trigger kinds and CI detection ([`TriggerKind`])
//!
//! # Example
//!
//! ```
//! use envready::relevance::{should_run, ChangeSet, PathFilter, TriggerKind};
//!
//! let filter = PathFilter::new(["**/*.rs", "crates/**"]).unwrap();
//! let docs: ChangeSet = ["README.md"].into_iter().collect();
//! let code: ChangeSet = ["crates/foo/src/lib.rs"].into_iter().collect();
//!
//! assert!(!should_run(Some(&docs), TriggerKind::Push, &filter));
//! assert!(should_run(Some(&code), TriggerKind::Push, &filter));
//! assert!(should_run(Some(&ChangeSet::new()), TriggerKind::Manual, &filter));
//! ```

pub mod changes;
pub mod glob;
pub mod trigger;

pub use changes::ChangeSet;
pub use glob::{glob_to_regex, PathFilter};
pub use trigger::TriggerKind;

use tracing::debug;

/// Whether the verification and build jobs should run.
///
/// `changed` is `None` when the changed paths could not be determined.
pub fn should_run(changed: Option<&ChangeSet>, trigger: TriggerKind, filter: &PathFilter) -> bool {
    if trigger.bypasses_filter() {
        debug!("Trigger {:?} always runs", trigger);
        return true;
    }

    // Unknown changes fail open.
    let Some(changed) = changed else {
        debug!("Changed paths unknown; running");
        return true;
    };

    match changed
        .iter()
        .find_map(|path| filter.first_match(path).map(|pattern| (path, pattern)))
    {
        Some((path, pattern)) => {
            debug!("'{}' matches '{}'; running", path, pattern);
            true
        }
        None => {
            debug!("None of {} changed paths are relevant", changed.len());
            false
        }
    }
}
