use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

/// A GitHub URL runs until whitespace or one of `) ] > ,`.
static RE_GITHUB_URL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"https?://github\.com/[^\s)\]>,]+").unwrap());

/// Finds every GitHub URL in `text`, dropping exact duplicates and keeping
/// the order of first appearance.
pub fn scan_github_links(text: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    RE_GITHUB_URL
        .find_iter(text)
        .map(|m| m.as_str())
        .filter(|link| seen.insert(*link))
        .map(str::to_string)
        .collect()
}
