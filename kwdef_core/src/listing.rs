//! Plain-text listing of a [`KeywordMap`].
//!
//! Each entry is written as `"<keyword>: <definition>\n\n"` with no escaping.
//! Reading is line oriented: every line holding a colon is split on its first
//! colon. Continuation lines of a multi-line definition carry no colon of
//! their own and are therefore dropped on reload.

use std::fmt::Write as _;
use std::path::Path;
use tracing::info;

use crate::{KeywordMap, Result};

/// Render `map` in listing format, in iteration order.
#[must_use]
pub fn format_listing(map: &KeywordMap) -> String {
    let mut out = String::new();
    for entry in map {
        let _ = write!(out, "{}: {}\n\n", entry.keyword, entry.definition);
    }
    out
}

/// Parse listing-formatted text back into a map.
#[must_use]
pub fn parse_listing(content: &str) -> KeywordMap {
    content
        .lines()
        .filter_map(|line| line.split_once(':'))
        .map(|(keyword, definition)| (keyword.trim(), definition.trim()))
        .collect()
}

/// Write `map` to `destination`, replacing any previous content.
pub fn write_listing(map: &KeywordMap, destination: impl AsRef<Path>) -> Result<()> {
    let destination = destination.as_ref();
    std::fs::write(destination, format_listing(map))?;
    info!(
        "Wrote {} entries to listing {}",
        map.len(),
        destination.display()
    );
    Ok(())
}

/// Read a listing file. Fails with `NotFound` if `source` does not exist.
pub fn read_listing(source: impl AsRef<Path>) -> Result<KeywordMap> {
    let source = source.as_ref();
    let content = std::fs::read_to_string(source)?;
    let map = parse_listing(&content);
    info!(
        "Reloaded {} entries from listing {}",
        map.len(),
        source.display()
    );
    Ok(map)
}
