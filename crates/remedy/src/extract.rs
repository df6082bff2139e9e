//! Error extraction from raw deployment logs.
//!
//! Best-effort: lines matching any of the known failure patterns are
//! collected, deduplicated, and capped so the remediation prompt stays a
//! readable size. An empty result is valid; the raw log excerpt still
//! reaches the prompt.

use regex::Regex;
use std::collections::HashSet;

/// Patterns that mark a log line as an error candidate
const ERROR_PATTERNS: &[&str] = &[
    r"(?i)\berror\b",
    r"(?i)\bpanic(?:ked)?\b",
    r"(?i)\bexception\b",
    r"(?i)\bfatal\b",
    r"(?i)\btraceback\b",
    r"(?i)\bfailed\b",
    r"npm ERR!",
    r"error\[E\d+\]",
];

/// Cap on extracted lines carried into the prompt
const MAX_ERROR_LINES: usize = 50;

/// Collect distinct error-looking lines from a raw log stream, in order
/// of first appearance.
#[must_use]
pub fn extract_errors(logs: &str) -> Vec<String> {
    let patterns: Vec<Regex> = ERROR_PATTERNS
        .iter()
        .filter_map(|p| Regex::new(p).ok())
        .collect();

    let mut seen = HashSet::new();
    let mut errors = Vec::new();

    for line in logs.lines() {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        if patterns.iter().any(|re| re.is_match(trimmed)) && seen.insert(trimmed.to_string()) {
            errors.push(trimmed.to_string());
            if errors.len() >= MAX_ERROR_LINES {
                break;
            }
        }
    }

    errors
}

/// Last `max_lines` lines of a log stream.
#[must_use]
pub fn tail(logs: &str, max_lines: usize) -> String {
    let lines: Vec<&str> = logs.lines().collect();
    let start = lines.len().saturating_sub(max_lines);
    lines[start..].join("\n")
}
