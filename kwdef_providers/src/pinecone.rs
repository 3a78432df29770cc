use anyhow::Context;
use async_trait::async_trait;
use kwdef_core::{Metadata, VectorIndex, VectorMatch, VectorRecord};
use reqwest::{Client, RequestBuilder};
use serde_json::{Value, json};
use tracing::{debug, info};

use crate::f64_to_f32;
use crate::retry::{RetryPolicy, retry_with_backoff};

pub const DEFAULT_CONTROLLER_URL: &str = "https://api.pinecone.io";

const API_VERSION: &str = "2024-07";

pub struct PineconeIndex {
    client: Client,
    api_key: String,
    host: String,
    namespace: String,
    retry: RetryPolicy,
}

impl PineconeIndex {
    /// Client for the index served at `host` (with or without scheme).
    pub fn new(api_key: String, host: &str) -> Self {
        info!("Creating PineconeIndex for {host}");
        Self {
            client: Client::new(),
            api_key,
            host: normalize_host(host),
            namespace: String::new(),
            retry: RetryPolicy::none(),
        }
    }

    /// Look up the data-plane host of `index_name` through the controller.
    pub async fn connect(
        api_key: String,
        controller_url: &str,
        index_name: &str,
    ) -> anyhow::Result<Self> {
        let client = Client::new();
        let url = format!(
            "{}/indexes/{index_name}",
            controller_url.trim_end_matches('/')
        );

        info!("Describing index {index_name}");
        let response = authorize(client.get(&url), &api_key)
            .send()
            .await?
            .error_for_status()
            .with_context(|| format!("Failed to describe index {index_name}"))?
            .json::<Value>()
            .await?;

        let host = parse_index_host(&response)?;
        let mut index = Self::new(api_key, &host);
        index.client = client;
        Ok(index)
    }

    #[must_use]
    pub fn with_namespace(mut self, namespace: String) -> Self {
        self.namespace = namespace;
        self
    }

    #[must_use]
    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    #[must_use]
    pub fn host(&self) -> &str {
        &self.host
    }

    /// Helper method to send a single data-plane request
    async fn try_post(&self, path: &str, body: &Value) -> anyhow::Result<Value> {
        let response = authorize(self.client.post(format!("{}{path}", self.host)), &self.api_key)
            .json(body)
            .send()
            .await?
            .error_for_status()?
            .json::<Value>()
            .await?;
        Ok(response)
    }
}

fn authorize(request: RequestBuilder, api_key: &str) -> RequestBuilder {
    request
        .header("Api-Key", api_key)
        .header("X-Pinecone-API-Version", API_VERSION)
}

/// Base URL for a data-plane host; bare host names get `https://`.
#[must_use]
pub fn normalize_host(host: &str) -> String {
    let host = host.trim_end_matches('/');
    if host.starts_with("http://") || host.starts_with("https://") {
        host.to_string()
    } else {
        format!("https://{host}")
    }
}

pub fn parse_index_host(response: &Value) -> anyhow::Result<String> {
    response["host"]
        .as_str()
        .filter(|host| !host.is_empty())
        .map(str::to_string)
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing host"))
}

#[must_use]
pub fn upsert_request(records: &[VectorRecord], namespace: &str) -> Value {
    json!({
        "vectors": records,
        "namespace": namespace,
    })
}

#[must_use]
pub fn query_request(vector: &[f32], top_k: usize, namespace: &str) -> Value {
    json!({
        "vector": vector,
        "topK": top_k,
        "includeMetadata": true,
        "includeValues": false,
        "namespace": namespace,
    })
}

pub fn parse_upserted_count(response: &Value) -> anyhow::Result<usize> {
    response["upsertedCount"]
        .as_u64()
        .and_then(|count| usize::try_from(count).ok())
        .ok_or_else(|| anyhow::anyhow!("Invalid response format: missing upsertedCount"))
}

pub fn parse_matches(response: &Value) -> anyhow::Result<Vec<VectorMatch>> {
    let Some(matches) = response["matches"].as_array() else {
        // An empty namespace answers without a matches array.
        return Ok(Vec::new());
    };

    matches
        .iter()
        .map(|m| {
            let id = m["id"]
                .as_str()
                .ok_or_else(|| anyhow::anyhow!("Invalid response format: match without id"))?
                .to_string();
            let score = m["score"].as_f64().map_or(0.0, f64_to_f32);
            let metadata = m["metadata"].as_object().cloned().unwrap_or_else(Metadata::new);
            Ok(VectorMatch {
                id,
                score,
                metadata,
            })
        })
        .collect()
}

#[async_trait]
impl VectorIndex for PineconeIndex {
    async fn upsert(&self, records: &[VectorRecord]) -> anyhow::Result<usize> {
        let request = upsert_request(records, &self.namespace);
        debug!("Upserting {} vectors to {}", records.len(), self.host);

        let response = retry_with_backoff(
            || self.try_post("/vectors/upsert", &request),
            &self.retry,
        )
        .await?;

        parse_upserted_count(&response)
    }

    async fn query(&self, vector: &[f32], top_k: usize) -> anyhow::Result<Vec<VectorMatch>> {
        let request = query_request(vector, top_k, &self.namespace);
        info!("Querying {} for top {top_k} matches", self.host);

        let response =
            retry_with_backoff(|| self.try_post("/query", &request), &self.retry).await?;

        parse_matches(&response)
    }
}
