use kwdef_core::{Error, Result};
use std::path::PathBuf;

/// Environment variable names.
pub mod keys {
    pub const OPENAI_API_KEY: &str = "OPENAI_API_KEY";
    pub const OPENAI_BASE_URL: &str = "OPENAI_BASE_URL";
    pub const OPENAI_EMBEDDING_MODEL: &str = "OPENAI_EMBEDDING_MODEL";

    pub const PINECONE_API_KEY: &str = "PINECONE_API_KEY";
    pub const PINECONE_INDEX_NAME: &str = "PINECONE_INDEX_NAME";
    pub const PINECONE_INDEX_HOST: &str = "PINECONE_INDEX_HOST";
    pub const PINECONE_CONTROLLER_URL: &str = "PINECONE_CONTROLLER_URL";
    pub const PINECONE_NAMESPACE: &str = "PINECONE_NAMESPACE";

    pub const DOCS_DIR: &str = "KWDEF_DOCS_DIR";
    pub const LISTING_FILE: &str = "KWDEF_LISTING_FILE";
    pub const RESULTS_DIR: &str = "KWDEF_RESULTS_DIR";
    pub const CHUNK_SIZE: &str = "KWDEF_CHUNK_SIZE";
    pub const CHUNK_OVERLAP: &str = "KWDEF_CHUNK_OVERLAP";
    pub const RETRY_DELAYS: &str = "KWDEF_RETRY_DELAYS";
}

/// Everything the indexing and search commands need.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub openai: OpenAiConfig,
    pub pinecone: PineconeConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenAiConfig {
    pub api_key: String,
    pub base_url: String,
    pub model: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PineconeConfig {
    pub api_key: String,
    pub index_name: String,
    /// Data-plane host; looked up through the controller when unset.
    pub index_host: Option<String>,
    pub controller_url: String,
    pub namespace: String,
}

/// File locations and chunking settings. Needs no credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    pub docs_dir: PathBuf,
    pub listing_file: PathBuf,
    pub results_dir: PathBuf,
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub retry_delays: Vec<u64>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            docs_dir: PathBuf::from(Self::DEFAULT_DOCS_DIR),
            listing_file: PathBuf::from(Self::DEFAULT_LISTING_FILE),
            results_dir: PathBuf::from(Self::DEFAULT_RESULTS_DIR),
            chunk_size: Self::DEFAULT_CHUNK_SIZE,
            chunk_overlap: 0,
            retry_delays: Vec::new(),
        }
    }
}

impl PipelineConfig {
    pub const DEFAULT_DOCS_DIR: &str = "./docs";
    pub const DEFAULT_LISTING_FILE: &str = "keywords_definitions.txt";
    pub const DEFAULT_RESULTS_DIR: &str = "results";
    pub const DEFAULT_CHUNK_SIZE: usize = 1000;

    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Ok(Self {
            docs_dir: optional(&lookup, keys::DOCS_DIR).map_or(defaults.docs_dir, PathBuf::from),
            listing_file: optional(&lookup, keys::LISTING_FILE)
                .map_or(defaults.listing_file, PathBuf::from),
            results_dir: optional(&lookup, keys::RESULTS_DIR)
                .map_or(defaults.results_dir, PathBuf::from),
            chunk_size: parse_usize(&lookup, keys::CHUNK_SIZE)?.unwrap_or(defaults.chunk_size),
            chunk_overlap: parse_usize(&lookup, keys::CHUNK_OVERLAP)?
                .unwrap_or(defaults.chunk_overlap),
            retry_delays: parse_delays(&lookup)?,
        })
    }

    /// Resolve a caller-supplied document path against the documents directory.
    #[must_use]
    pub fn document_path(&self, path: &str) -> PathBuf {
        self.docs_dir.join(path)
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        Ok(Self {
            openai: OpenAiConfig {
                api_key: required(&lookup, keys::OPENAI_API_KEY)?,
                base_url: optional(&lookup, keys::OPENAI_BASE_URL)
                    .unwrap_or_else(|| "https://api.openai.com/v1".to_string()),
                model: optional(&lookup, keys::OPENAI_EMBEDDING_MODEL)
                    .unwrap_or_else(|| "text-embedding-ada-002".to_string()),
            },
            pinecone: PineconeConfig {
                api_key: required(&lookup, keys::PINECONE_API_KEY)?,
                index_name: required(&lookup, keys::PINECONE_INDEX_NAME)?,
                index_host: optional(&lookup, keys::PINECONE_INDEX_HOST),
                controller_url: optional(&lookup, keys::PINECONE_CONTROLLER_URL)
                    .unwrap_or_else(|| "https://api.pinecone.io".to_string()),
                namespace: optional(&lookup, keys::PINECONE_NAMESPACE).unwrap_or_default(),
            },
            pipeline: PipelineConfig::from_lookup(&lookup)?,
        })
    }
}

/// Show only the ends of a secret.
#[must_use]
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() > 8 {
        let head: String = chars[..4].iter().collect();
        let tail: String = chars[chars.len() - 4..].iter().collect();
        format!("{head}...{tail}")
    } else {
        "***".to_string()
    }
}

fn optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn required<F>(lookup: &F, key: &str) -> Result<String>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key).ok_or_else(|| Error::Config(format!("{key} is not set")))
}

fn parse_usize<F>(lookup: &F, key: &str) -> Result<Option<usize>>
where
    F: Fn(&str) -> Option<String>,
{
    optional(lookup, key)
        .map(|value| {
            value.parse::<usize>().map_err(|_| {
                Error::Config(format!("{key} must be a non-negative integer, got '{value}'"))
            })
        })
        .transpose()
}

fn parse_delays<F>(lookup: &F) -> Result<Vec<u64>>
where
    F: Fn(&str) -> Option<String>,
{
    let Some(value) = optional(lookup, keys::RETRY_DELAYS) else {
        return Ok(Vec::new());
    };

    value
        .split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u64>().map_err(|_| {
                Error::Config(format!(
                    "{} must be comma-separated seconds, got '{part}'",
                    keys::RETRY_DELAYS
                ))
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    fn credentials() -> Vec<(&'static str, &'static str)> {
        vec![
            (keys::OPENAI_API_KEY, "sk-test-1234567890"),
            (keys::PINECONE_API_KEY, "pc-test-abcdefghij"),
            (keys::PINECONE_INDEX_NAME, "glossary"),
        ]
    }

    #[test]
    fn test_defaults() {
        let config = Config::from_lookup(lookup_from(&credentials())).unwrap();
        assert_eq!(config.openai.model, "text-embedding-ada-002");
        assert_eq!(config.openai.base_url, "https://api.openai.com/v1");
        assert_eq!(config.pinecone.index_name, "glossary");
        assert_eq!(config.pinecone.index_host, None);
        assert_eq!(config.pinecone.namespace, "");
        assert_eq!(config.pipeline, PipelineConfig::default());
        assert_eq!(
            config.pipeline.listing_file,
            PathBuf::from("keywords_definitions.txt")
        );
    }

    #[test]
    fn test_missing_credentials() {
        for missing in [
            keys::OPENAI_API_KEY,
            keys::PINECONE_API_KEY,
            keys::PINECONE_INDEX_NAME,
        ] {
            let pairs: Vec<_> = credentials()
                .into_iter()
                .filter(|(k, _)| *k != missing)
                .collect();
            match Config::from_lookup(lookup_from(&pairs)) {
                Err(Error::Config(msg)) => assert!(msg.contains(missing)),
                other => panic!("Expected config error for {missing}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_blank_value_counts_as_missing() {
        let mut pairs = credentials();
        pairs[0] = (keys::OPENAI_API_KEY, "   ");
        assert!(Config::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_pipeline_overrides() {
        let config = PipelineConfig::from_lookup(lookup_from(&[
            (keys::DOCS_DIR, "/srv/docs"),
            (keys::LISTING_FILE, "out/listing.txt"),
            (keys::RESULTS_DIR, "out/records"),
            (keys::CHUNK_SIZE, "500"),
            (keys::CHUNK_OVERLAP, "50"),
            (keys::RETRY_DELAYS, "2, 4,8"),
        ]))
        .unwrap();

        assert_eq!(config.document_path("terms.docx"), PathBuf::from("/srv/docs/terms.docx"));
        assert_eq!(config.listing_file, PathBuf::from("out/listing.txt"));
        assert_eq!(config.results_dir, PathBuf::from("out/records"));
        assert_eq!(config.chunk_size, 500);
        assert_eq!(config.chunk_overlap, 50);
        assert_eq!(config.retry_delays, vec![2, 4, 8]);
    }

    #[test]
    fn test_invalid_numbers() {
        assert!(PipelineConfig::from_lookup(lookup_from(&[(keys::CHUNK_SIZE, "big")])).is_err());
        assert!(
            PipelineConfig::from_lookup(lookup_from(&[(keys::RETRY_DELAYS, "1,x")])).is_err()
        );
    }

    #[test]
    fn test_pipeline_needs_no_credentials() {
        assert!(PipelineConfig::from_lookup(|_| None).is_ok());
    }

    #[test]
    fn test_mask_secret() {
        assert_eq!(mask_secret("sk-test-1234567890"), "sk-t...7890");
        assert_eq!(mask_secret("short"), "***");
    }
}
