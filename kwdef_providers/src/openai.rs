use async_trait::async_trait;
use kwdef_core::EmbeddingProvider;
use reqwest::Client;
use serde_json::{Value, json};
use tracing::info;

use crate::f64_to_f32;
use crate::retry::{RetryPolicy, retry_with_backoff};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";

pub const DEFAULT_EMBEDDING_MODEL: &str = "text-embedding-ada-002";

/// Maximum number of inputs sent in one embeddings request.
pub const EMBEDDING_BATCH_SIZE: usize = 1000;

pub struct OpenAiEmbeddings {
    client: Client,
    api_key: String,
    base_url: String,
    model: String,
    retry: RetryPolicy,
}

impl OpenAiEmbeddings {
    pub fn new(api_key: String) -> Self {
        info!("Creating OpenAiEmbeddings");
        Self {
            client: Client::new(),
            api_key,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_EMBEDDING_MODEL.to_string(),
            retry: RetryPolicy::none(),
        }
    }

    #[must_use]
    pub fn with_base_url(mut self, base_url: String) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: String) -> Self {
        self.model = model;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Helper method to send a single request
    async fn try_embed(&self, request: &Value) -> anyhow::Result<Vec<Vec<f32>>> {
        let response = self
            .client
            .post(format!("{}/embeddings", self.base_url))
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;

        parse_embeddings(&response)
    }
}

/// Request body for one embeddings batch.
#[must_use]
pub fn embedding_request(model: &str, inputs: &[String]) -> Value {
    json!({
        "model": model,
        "input": inputs,
        "encoding_format": "float",
    })
}

/// Pull the vectors out of an embeddings response, ordered by their `index`.
pub fn parse_embeddings(response: &Value) -> anyhow::Result<Vec<Vec<f32>>> {
    let data = response["data"]
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing data"))?;

    let mut indexed = data
        .iter()
        .enumerate()
        .map(|(position, item)| {
            let index = item["index"].as_u64().unwrap_or(position as u64);
            parse_vector(&item["embedding"]).map(|vector| (index, vector))
        })
        .collect::<anyhow::Result<Vec<(u64, Vec<f32>)>>>()?;

    indexed.sort_by_key(|(index, _)| *index);
    Ok(indexed.into_iter().map(|(_, vector)| vector).collect())
}

fn parse_vector(value: &Value) -> anyhow::Result<Vec<f32>> {
    value
        .as_array()
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing embedding"))?
        .iter()
        .map(|v| {
            v.as_f64()
                .map(f64_to_f32)
                .ok_or_else(|| anyhow::anyhow!("Invalid embedding value"))
        })
        .collect()
}

#[async_trait]
impl EmbeddingProvider for OpenAiEmbeddings {
    async fn embed_documents(&self, texts: &[String]) -> anyhow::Result<Vec<Vec<f32>>> {
        let mut vectors = Vec::with_capacity(texts.len());

        for batch in texts.chunks(EMBEDDING_BATCH_SIZE) {
            let request = embedding_request(&self.model, batch);
            info!(
                "Sending {} inputs to embeddings API: model={}",
                batch.len(),
                self.model
            );

            let embedded = retry_with_backoff(|| self.try_embed(&request), &self.retry).await?;
            if embedded.len() != batch.len() {
                anyhow::bail!(
                    "Embeddings API returned {} vectors for {} inputs",
                    embedded.len(),
                    batch.len()
                );
            }
            vectors.extend(embedded);
        }

        Ok(vectors)
    }

    async fn embed_query(&self, text: &str) -> anyhow::Result<Vec<f32>> {
        self.embed_documents(&[text.to_string()])
            .await?
            .pop()
            .ok_or_else(|| anyhow::anyhow!("Embeddings API returned no vector for query"))
    }
}
