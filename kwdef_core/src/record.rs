//! Per-keyword YAML records.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::{Result, sanitize_filename};

/// Extension of record files.
pub const RECORD_EXTENSION: &str = "yaml";

/// Location of the record for `keyword` inside `directory`.
#[must_use]
pub fn record_path(keyword: &str, directory: &Path) -> PathBuf {
    directory.join(format!("{}.{RECORD_EXTENSION}", sanitize_filename(keyword)))
}

/// Write `{keyword: definition}` as a block-style YAML document, replacing
/// any existing file. Keywords that sanitize to the same name share a file.
///
/// The directory must already exist.
pub fn write_record(keyword: &str, definition: &str, directory: &Path) -> Result<PathBuf> {
    let path = record_path(keyword, directory);
    let record = BTreeMap::from([(keyword, definition)]);
    let yaml = serde_yaml::to_string(&record)?;
    std::fs::write(&path, yaml)?;
    debug!("Wrote record for '{keyword}' to {}", path.display());
    Ok(path)
}
