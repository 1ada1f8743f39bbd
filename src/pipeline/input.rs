//! Reading paper URLs from a newline-delimited list.

use std::path::Path;

use crate::error::Result;

/// One URL per line. Surrounding whitespace is trimmed; blank lines and
/// lines starting with `#` are skipped.
pub fn parse_sources(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_string)
        .collect()
}

pub fn read_sources(path: &Path) -> Result<Vec<String>> {
    let text = std::fs::read_to_string(path)?;
    let sources = parse_sources(&text);
    tracing::info!("Read {} paper URLs from {}", sources.len(), path.display());
    Ok(sources)
}
