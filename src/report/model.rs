//! Check results and the aggregate report.
//!
//! A [`CheckResult`] is immutable once built. An [`EnvironmentReport`] owns
//! the ordered results and derives [`Counts`] and [`Verdict`] from them on
//! demand, so the numbers printed can never disagree with the exit code.

use chrono::{DateTime, Utc};
use serde::ser::SerializeStruct;
use serde::{Serialize, Serializer};

/// Outcome of a single check.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum CheckStatus {
    /// Informational; never affects the verdict.
    Info,
    /// Capability present and acceptable.
    Pass,
    /// Build can proceed but something is off.
    Warn,
    /// Build cannot proceed.
    Fail,
}

impl CheckStatus {
    /// Fixed-width marker used in rendered output.
    pub fn marker(&self) -> &'static str {
        match self {
            CheckStatus::Pass => "[PASS]",
            CheckStatus::Warn => "[WARN]",
            CheckStatus::Fail => "[FAIL]",
            CheckStatus::Info => "[INFO]",
        }
    }
}

/// Outcome of one probe invocation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckResult {
    name: String,
    status: CheckStatus,
    detail: String,
}

impl CheckResult {
    /// Create a result.
    pub fn new(name: impl Into<String>, status: CheckStatus, detail: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            status,
            detail: detail.into(),
        }
    }

    pub fn pass(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Pass, detail)
    }

    pub fn warn(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Warn, detail)
    }

    pub fn fail(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Fail, detail)
    }

    pub fn info(name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::new(name, CheckStatus::Info, detail)
    }

    /// Identifier of the capability checked.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn status(&self) -> CheckStatus {
        self.status
    }

    /// Version string, path found, or remediation hint.
    pub fn detail(&self) -> &str {
        &self.detail
    }

    /// Copy of this result with a note appended to the detail.
    pub fn with_note(&self, note: &str) -> Self {
        let detail = if self.detail.is_empty() {
            note.to_string()
        } else {
            format!("{} ({})", self.detail, note)
        };
        Self::new(self.name.clone(), self.status, detail)
    }
}

/// Tally of results by status. Info results are not counted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct Counts {
    pub passed: usize,
    pub warned: usize,
    pub failed: usize,
}

impl Counts {
    /// Fold a sequence of results into counts.
    pub fn from_results<'a>(results: impl IntoIterator<Item = &'a CheckResult>) -> Self {
        results
            .into_iter()
            .fold(Counts::default(), |acc, r| match r.status() {
                CheckStatus::Pass => Counts {
                    passed: acc.passed + 1,
                    ..acc
                },
                CheckStatus::Warn => Counts {
                    warned: acc.warned + 1,
                    ..acc
                },
                CheckStatus::Fail => Counts {
                    failed: acc.failed + 1,
                    ..acc
                },
                CheckStatus::Info => acc,
            })
    }
}

/// Overall readiness.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Ready,
    ReadyWithWarnings,
    NotReady,
}

impl Verdict {
    /// `NotReady` if any Fail; else `ReadyWithWarnings` if any Warn; else `Ready`.
    pub fn from_counts(counts: &Counts) -> Self {
        if counts.failed > 0 {
            Verdict::NotReady
        } else if counts.warned > 0 {
            Verdict::ReadyWithWarnings
        } else {
            Verdict::Ready
        }
    }

    /// Process exit code for this verdict; warnings alone never fail a run.
    pub fn exit_code(&self) -> i32 {
        match self {
            Verdict::Ready | Verdict::ReadyWithWarnings => 0,
            Verdict::NotReady => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Verdict::Ready => "READY",
            Verdict::ReadyWithWarnings => "READY WITH WARNINGS",
            Verdict::NotReady => "NOT READY",
        }
    }
}

/// Aggregate of all check results for one run.
#[derive(Debug, Clone)]
pub struct EnvironmentReport {
    results: Vec<CheckResult>,
    generated_at: DateTime<Utc>,
}

impl EnvironmentReport {
    /// Build a report stamped with the current time.
    pub fn new(results: Vec<CheckResult>) -> Self {
        Self::at(results, Utc::now())
    }

    /// Build a report with an explicit timestamp.
    pub fn at(results: Vec<CheckResult>, generated_at: DateTime<Utc>) -> Self {
        Self {
            results,
            generated_at,
        }
    }

    /// Results in check execution order.
    pub fn results(&self) -> &[CheckResult] {
        &self.results
    }

    pub fn generated_at(&self) -> DateTime<Utc> {
        self.generated_at
    }

    pub fn counts(&self) -> Counts {
        Counts::from_results(&self.results)
    }

    pub fn verdict(&self) -> Verdict {
        Verdict::from_counts(&self.counts())
    }

    /// Results with the given status, in order.
    pub fn with_status(&self, status: CheckStatus) -> impl Iterator<Item = &CheckResult> {
        self.results.iter().filter(move |r| r.status() == status)
    }
}

impl Serialize for EnvironmentReport {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("EnvironmentReport", 4)?;
        s.serialize_field("generated_at", &self.generated_at)?;
        s.serialize_field("verdict", &self.verdict())?;
        s.serialize_field("counts", &self.counts())?;
        s.serialize_field("results", &self.results)?;
        s.end()
    }
}
