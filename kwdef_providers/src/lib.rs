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

pub mod openai;
pub mod pinecone;
pub mod retry;

pub use openai::OpenAiEmbeddings;
pub use pinecone::PineconeIndex;
pub use retry::{RetryPolicy, retry_with_backoff};

/// Convert f64 to f32 for embedding values and scores.
/// Precision loss is acceptable for ML embeddings
#[expect(clippy::cast_possible_truncation, reason = "ML embeddings use f32")]
pub(crate) const fn f64_to_f32(x: f64) -> f32 {
    x as f32
}
