#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! Word document (`.docx`) loading.
//!
//! A `.docx` file is a zip archive of WordprocessingML parts. Plain text is
//! taken from the header parts, the main document and the footer parts, in
//! that order. Every paragraph is preceded by a blank line, tabs and breaks
//! are kept, and the result is trimmed.

mod docx;

pub use docx::{docx_to_text, xml_to_text};

use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::info;

/// Extension accepted by the loader.
pub const DOCX_EXTENSION: &str = ".docx";

pub type Result<T> = std::result::Result<T, DocumentError>;

#[derive(Debug, Error)]
pub enum DocumentError {
    #[error(transparent)]
    Invalid(#[from] kwdef_core::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    #[error("XML parse error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Document part missing: {0}")]
    MissingPart(String),
}

/// Plain text of a loaded document together with where it came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoadedDocument {
    pub source: PathBuf,
    pub content: String,
}

/// Check the caller-supplied document path before any I/O happens.
pub fn validate_document_path(path: Option<&str>) -> Result<&str> {
    let path = path.ok_or(kwdef_core::Error::MissingPath)?;
    if !path.ends_with(DOCX_EXTENSION) {
        return Err(kwdef_core::Error::InvalidExtension(path.to_string()).into());
    }
    Ok(path)
}

/// Load the plain text of the `.docx` file at `path`.
pub fn load_docx(path: &Path) -> Result<LoadedDocument> {
    let file = File::open(path)?;
    let content = docx_to_text(BufReader::new(file))?;
    info!(
        "Loaded document {} ({} bytes of text)",
        path.display(),
        content.len()
    );
    Ok(LoadedDocument {
        source: path.to_path_buf(),
        content,
    })
}
