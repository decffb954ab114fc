//! Path glob patterns compiled to anchored regexes.
//!
//! Matching is case-sensitive over `/`-separated relative paths:
//!
//! - `*` matches within one segment, `?` matches one non-`/` character
//! - `**/` matches zero or more leading segments, so `**/*.rs` matches `lib.rs`
//! - a trailing `/**` matches everything below a directory
//! - any other `**` matches across segments

use regex::{Regex, RegexSet};

use crate::error::{EnvReadyError, Result};

/// Translate a glob into an anchored regex source string.
pub fn glob_to_regex(pattern: &str) -> String {
    let chars: Vec<char> = pattern.chars().collect();
    let mut out = String::from("^");
    let mut i = 0;

    while i < chars.len() {
        match chars[i] {
            '*' if chars.get(i + 1) == Some(&'*') => {
                let at_segment_start = i == 0 || chars[i - 1] == '/';
                if at_segment_start && chars.get(i + 2) == Some(&'/') {
                    out.push_str("(?:.*/)?");
                    i += 3;
                } else {
                    out.push_str(".*");
                    i += 2;
                }
            }
            '*' => {
                out.push_str("[^/]*");
                i += 1;
            }
            '?' => {
                out.push_str("[^/]");
                i += 1;
            }
            c => {
                out.push_str(&regex::escape(&c.to_string()));
                i += 1;
            }
        }
    }

    out.push('$');
    out
}

/// A compiled set of glob patterns.
#[derive(Debug, Clone)]
pub struct PathFilter {
    patterns: Vec<String>,
    set: RegexSet,
}

impl PathFilter {
    /// Compile `patterns` once.
    pub fn new<I, S>(patterns: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let patterns: Vec<String> = patterns
            .into_iter()
            .map(|p| p.as_ref().to_string())
            .collect();

        for pattern in &patterns {
            Regex::new(&glob_to_regex(pattern)).map_err(|e| {
                EnvReadyError::ConfigValidationError {
                    message: format!("invalid glob '{}': {}", pattern, e),
                }
            })?;
        }

        let set = RegexSet::new(patterns.iter().map(|p| glob_to_regex(p))).map_err(|e| {
            EnvReadyError::ConfigValidationError {
                message: format!("invalid glob set: {}", e),
            }
        })?;

        Ok(Self { patterns, set })
    }

    pub fn patterns(&self) -> &[String] {
        &self.patterns
    }

    /// Whether `path` matches any pattern.
    pub fn matches(&self, path: &str) -> bool {
        self.set.is_match(path)
    }

    /// First pattern matching `path`, for logging decisions.
    pub fn first_match(&self, path: &str) -> Option<&str> {
        self.set
            .matches(path)
            .iter()
            .next()
            .map(|i| self.patterns[i].as_str())
    }
}
