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

mod error;
pub mod extract;
pub mod glossary;
pub mod index;
pub mod listing;
pub mod record;
pub mod sanitize;
pub mod splitter;
pub mod util;

pub use error::{Error, Result};
pub use extract::extract_keywords;
pub use glossary::{KeywordEntry, KeywordMap};
pub use index::{
    EmbeddingProvider, KeywordIndexer, Metadata, SearchHit, UPSERT_BATCH_SIZE, VectorIndex,
    VectorMatch, VectorRecord,
};
pub use listing::{format_listing, parse_listing, read_listing, write_listing};
pub use record::{record_path, write_record};
pub use sanitize::{MAX_FILENAME_CHARS, sanitize_filename};
pub use splitter::CharacterTextSplitter;
pub use util::content_hash;
