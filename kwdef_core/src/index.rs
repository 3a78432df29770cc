//! Embedding and vector index seams, and the indexer that drives them.
//!
//! The indexer treats both collaborators as sinks: it hands over chunk text,
//! receives vectors, and upserts them with the chunk text and its source as
//! metadata.

use anyhow::Context;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::content_hash;

/// Metadata key holding the chunk text.
pub const TEXT_KEY: &str = "text";

/// Metadata key holding the source file of the chunk.
pub const SOURCE_KEY: &str = "source";

/// Maximum number of vectors sent in a single upsert call.
pub const UPSERT_BATCH_SIZE: usize = 100;

pub type Metadata = serde_json::Map<String, Value>;

/// A vector ready to be written to an index.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VectorRecord {
    pub id: String,
    pub values: Vec<f32>,
    pub metadata: Metadata,
}

/// A vector returned by an index query.
#[derive(Debug, Clone, PartialEq)]
pub struct VectorMatch {
    pub id: String,
    pub score: f32,
    pub metadata: Metadata,
}

/// A similarity search result resolved back to text.
#[derive(Debug, Clone, PartialEq)]
pub struct SearchHit {
    pub text: String,
    pub source: Option<String>,
    pub score: f32,
}

#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Embed several texts; the result is in input order.
    async fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>>;

    async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>>;
}

#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Insert or replace records by id. Returns the number written.
    async fn upsert(&self, records: &[VectorRecord]) -> anyhow::Result<usize>;

    async fn query(&self, vector: &[f32], top_k: usize) -> anyhow::Result<Vec<VectorMatch>>;
}

pub struct KeywordIndexer<E, V> {
    embeddings: E,
    index: V,
}

impl<E: EmbeddingProvider, V: VectorIndex> KeywordIndexer<E, V> {
    pub const fn new(embeddings: E, index: V) -> Self {
        Self { embeddings, index }
    }

    /// Embed `chunks` and upsert them, tagged with `source`.
    pub async fn index_chunks(&self, source: &str, chunks: &[String]) -> anyhow::Result<usize> {
        if chunks.is_empty() {
            info!("No chunks to index for {source}");
            return Ok(0);
        }

        info!("Embedding {} chunks from {source}", chunks.len());
        let vectors = self
            .embeddings
            .embed_documents(chunks)
            .await
            .context("Failed to embed chunks")?;

        if vectors.len() != chunks.len() {
            anyhow::bail!(
                "Embedding count mismatch: sent {} chunks, received {} vectors",
                chunks.len(),
                vectors.len()
            );
        }

        let records: Vec<VectorRecord> = chunks
            .iter()
            .zip(vectors)
            .enumerate()
            .map(|(position, (text, values))| VectorRecord {
                id: content_hash(source, position, text),
                values,
                metadata: chunk_metadata(source, text),
            })
            .collect();

        let mut upserted = 0;
        for batch in records.chunks(UPSERT_BATCH_SIZE) {
            debug!("Upserting batch of {} vectors", batch.len());
            upserted += self
                .index
                .upsert(batch)
                .await
                .context("Failed to upsert vectors")?;
        }

        info!("Upserted {upserted} vectors from {source}");
        Ok(upserted)
    }

    /// Return the `top_k` chunks closest to `query`.
    pub async fn similarity_search(
        &self,
        query: &str,
        top_k: usize,
    ) -> anyhow::Result<Vec<SearchHit>> {
        let vector = self
            .embeddings
            .embed_query(query)
            .await
            .context("Failed to embed query")?;

        let matches = self
            .index
            .query(&vector, top_k)
            .await
            .context("Failed to query index")?;

        debug!("Index returned {} matches", matches.len());

        Ok(matches
            .into_iter()
            .map(|m| SearchHit {
                text: metadata_str(&m.metadata, TEXT_KEY).unwrap_or_default(),
                source: metadata_str(&m.metadata, SOURCE_KEY),
                score: m.score,
            })
            .collect())
    }
}

fn chunk_metadata(source: &str, text: &str) -> Metadata {
    let mut metadata = Metadata::new();
    metadata.insert(TEXT_KEY.to_string(), Value::String(text.to_string()));
    metadata.insert(SOURCE_KEY.to_string(), Value::String(source.to_string()));
    metadata
}

fn metadata_str(metadata: &Metadata, key: &str) -> Option<String> {
    metadata.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Embeds a text as `[len, first byte]`.
    struct FakeEmbeddings;

    #[allow(clippy::cast_precision_loss)]
    fn fake_vector(text: &str) -> Vec<f32> {
        vec![text.len() as f32, f32::from(text.bytes().next().unwrap_or(0))]
    }

    #[async_trait]
    impl EmbeddingProvider for FakeEmbeddings {
        async fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            Ok(texts.iter().map(|t| fake_vector(t)).collect())
        }

        async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
            Ok(fake_vector(text))
        }
    }

    #[derive(Default)]
    struct MemoryIndex {
        records: Mutex<Vec<VectorRecord>>,
        batches: Mutex<Vec<usize>>,
    }

    #[async_trait]
    impl VectorIndex for MemoryIndex {
        async fn upsert(&self, records: &[VectorRecord]) -> anyhow::Result<usize> {
            self.batches.lock().unwrap().push(records.len());
            let mut stored = self.records.lock().unwrap();
            for record in records {
                stored.retain(|r| r.id != record.id);
                stored.push(record.clone());
            }
            Ok(records.len())
        }

        async fn query(&self, vector: &[f32], top_k: usize) -> anyhow::Result<Vec<VectorMatch>> {
            let stored = self.records.lock().unwrap();
            let mut matches: Vec<VectorMatch> = stored
                .iter()
                .map(|r| VectorMatch {
                    id: r.id.clone(),
                    score: -(r.values[0] - vector[0]).abs(),
                    metadata: r.metadata.clone(),
                })
                .collect();
            matches.sort_by(|a, b| b.score.total_cmp(&a.score));
            matches.truncate(top_k);
            Ok(matches)
        }
    }

    struct FailingEmbeddings;

    #[async_trait]
    impl EmbeddingProvider for FailingEmbeddings {
        async fn embed_documents(&self, _texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
            anyhow::bail!("network down")
        }

        async fn embed_query(&self, _text: &str) -> anyhow::Result<Vec<f32>> {
            anyhow::bail!("network down")
        }
    }

    #[tokio::test]
    async fn test_index_chunks_attaches_metadata() {
        let indexer = KeywordIndexer::new(FakeEmbeddings, MemoryIndex::default());
        let chunks = vec!["Apple: A fruit.".to_string(), "Banana: B".to_string()];

        let count = indexer.index_chunks("listing.txt", &chunks).await.unwrap();
        assert_eq!(count, 2);

        let stored = indexer.index.records.lock().unwrap();
        assert_eq!(stored[0].metadata[TEXT_KEY], "Apple: A fruit.");
        assert_eq!(stored[0].metadata[SOURCE_KEY], "listing.txt");
        assert_eq!(stored[0].id, content_hash("listing.txt", 0, "Apple: A fruit."));
    }

    #[tokio::test]
    async fn test_reindexing_overwrites_same_ids() {
        let indexer = KeywordIndexer::new(FakeEmbeddings, MemoryIndex::default());
        let chunks = vec!["Apple: A fruit.".to_string()];

        indexer.index_chunks("listing.txt", &chunks).await.unwrap();
        indexer.index_chunks("listing.txt", &chunks).await.unwrap();

        assert_eq!(indexer.index.records.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_upserts_in_batches() {
        let indexer = KeywordIndexer::new(FakeEmbeddings, MemoryIndex::default());
        let chunks: Vec<String> = (0..UPSERT_BATCH_SIZE * 2 + 5)
            .map(|i| format!("Keyword {i}: definition"))
            .collect();

        let count = indexer.index_chunks("listing.txt", &chunks).await.unwrap();
        assert_eq!(count, chunks.len());
        assert_eq!(
            *indexer.index.batches.lock().unwrap(),
            vec![UPSERT_BATCH_SIZE, UPSERT_BATCH_SIZE, 5]
        );
    }

    #[tokio::test]
    async fn test_empty_chunks_skip_collaborators() {
        let indexer = KeywordIndexer::new(FailingEmbeddings, MemoryIndex::default());
        assert_eq!(indexer.index_chunks("listing.txt", &[]).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_embedding_failure_propagates() {
        let indexer = KeywordIndexer::new(FailingEmbeddings, MemoryIndex::default());
        let err = indexer
            .index_chunks("listing.txt", &["x: y".to_string()])
            .await
            .unwrap_err();
        assert!(format!("{err:#}").contains("network down"));
        assert!(indexer.index.records.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_similarity_search_resolves_text() {
        let indexer = KeywordIndexer::new(FakeEmbeddings, MemoryIndex::default());
        let chunks = vec![
            "short".to_string(),
            "a considerably longer chunk of text".to_string(),
        ];
        indexer.index_chunks("listing.txt", &chunks).await.unwrap();

        let hits = indexer.similarity_search("tiny", 1).await.unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].text, "short");
        assert_eq!(hits[0].source.as_deref(), Some("listing.txt"));
    }
}
