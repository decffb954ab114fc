//! Dotted version parsing and comparison.

use regex::Regex;
use std::cmp::Ordering;
use std::sync::LazyLock;

static VERSION_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+(?:\.\d+)+").unwrap());

/// Parse the numeric segments of a dotted version.
///
/// A leading `v` is ignored, each segment contributes its leading digits,
/// and parsing stops at the first segment with none (`1.2.3-beta` gives
/// `[1, 2, 3]`, `10.0.x` gives `[10, 0]`).
pub fn parse_segments(version: &str) -> Vec<u64> {
    let version = version.trim();
    let version = version.strip_prefix('v').unwrap_or(version);

    let mut segments = Vec::new();
    for part in version.split('.') {
        let digits: String = part.chars().take_while(|c| c.is_ascii_digit()).collect();
        match digits.parse::<u64>() {
            Ok(n) => segments.push(n),
            Err(_) => break,
        }
    }
    segments
}

/// Compare two dotted versions segment by segment.
///
/// Missing segments count as 0, so `10.0` equals `10.0.0`.
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let a = parse_segments(a);
    let b = parse_segments(b);
    let len = a.len().max(b.len());

    (0..len)
        .map(|i| {
            let x = a.get(i).copied().unwrap_or(0);
            let y = b.get(i).copied().unwrap_or(0);
            x.cmp(&y)
        })
        .find(|o| *o != Ordering::Equal)
        .unwrap_or(Ordering::Equal)
}

/// Extract the first dotted version number from tool output.
///
/// `"rustup 1.27.1 (54dd3d00f 2024-04-24)"` gives `"1.27.1"`.
pub fn extract_version(output: &str) -> Option<String> {
    VERSION_PATTERN
        .find(output)
        .map(|m| m.as_str().to_string())
}

/// Keep names matching `pattern`, greatest version first.
pub fn sorted_versions_desc<I, S>(names: I, pattern: &Regex) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let mut versions: Vec<String> = names
        .into_iter()
        .map(Into::into)
        .filter(|name| pattern.is_match(name))
        .collect();
    versions.sort_by(|a, b| compare_versions(b, a));
    versions
}
