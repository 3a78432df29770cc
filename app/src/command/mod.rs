//! Static strategy pattern for CLI commands.
//!
//! Each command is a separate strategy type with its own input, dispatched
//! statically from `main`. Shared pipeline steps live here.

use kwdef_config::{Config, PipelineConfig};
use kwdef_core::{KeywordIndexer, KeywordMap, extract_keywords, read_listing, record_path};
use kwdef_document::{load_docx, validate_document_path};
use kwdef_providers::{OpenAiEmbeddings, PineconeIndex, RetryPolicy};
use std::collections::HashMap;
use std::path::Path;
use tracing::{info, warn};

mod extract;
mod info;
mod ingest;
mod search;
mod version;

pub use extract::{ExtractInput, ExtractStrategy};
pub use info::InfoStrategy;
pub use ingest::{IngestInput, IngestStrategy};
pub use search::{SearchInput, SearchStrategy};
pub use version::VersionStrategy;

/// Core trait defining the contract for all command strategies.
///
/// Each strategy defines its own input type via the associated type, so
/// parameters are passed without runtime casting or boxing.
pub trait CommandStrategy: Send + Sync + 'static {
    /// The input type this strategy accepts.
    type Input;

    /// Execute the command with the given input.
    ///
    /// # Errors
    /// Returns an error if command execution fails.
    async fn execute(&self, input: Self::Input) -> anyhow::Result<()>;
}

/// Validate the path argument before anything touches the filesystem.
fn checked_path(path: Option<&str>) -> anyhow::Result<String> {
    Ok(validate_document_path(path)?.to_string())
}

/// Load the document, extract its keywords, write the listing and one record
/// per keyword, then reload the listing.
///
/// Returns the reloaded map. `path` must already be validated.
fn extract_to_files(pipeline: &PipelineConfig, path: &str) -> anyhow::Result<KeywordMap> {
    let document = load_docx(&pipeline.document_path(path))?;

    let keywords = extract_keywords(&document.content);
    info!(
        "Extracted {} keywords from {}",
        keywords.len(),
        document.source.display()
    );

    for entry in &keywords {
        println!("{}: {}\n", entry.keyword, entry.definition);
    }

    kwdef_core::write_listing(&keywords, &pipeline.listing_file)?;
    write_records(&keywords, &pipeline.results_dir)?;

    let reloaded = read_listing(&pipeline.listing_file)?;
    Ok(reloaded)
}

/// Write one YAML record per keyword into `directory`, creating it if needed.
fn write_records(keywords: &KeywordMap, directory: &Path) -> anyhow::Result<()> {
    std::fs::create_dir_all(directory)?;

    let mut owners: HashMap<_, &str> = HashMap::new();
    for entry in keywords {
        let path = record_path(&entry.keyword, directory);
        if let Some(previous) = owners.insert(path.clone(), &entry.keyword) {
            warn!(
                "Keywords '{previous}' and '{}' share record file {}; keeping the later one",
                entry.keyword,
                path.display()
            );
        }
        kwdef_core::write_record(&entry.keyword, &entry.definition, directory)?;
    }

    info!(
        "Wrote {} records to {}",
        keywords.len(),
        directory.display()
    );
    Ok(())
}

/// Build the embeddings provider and vector index described by `config`.
async fn build_indexer(
    config: &Config,
) -> anyhow::Result<KeywordIndexer<OpenAiEmbeddings, PineconeIndex>> {
    let retry = RetryPolicy::from_secs(&config.pipeline.retry_delays);

    let embeddings = OpenAiEmbeddings::new(config.openai.api_key.clone())
        .with_base_url(config.openai.base_url.clone())
        .with_model(config.openai.model.clone())
        .with_retry(retry.clone());

    let pinecone = &config.pinecone;
    let index = match &pinecone.index_host {
        Some(host) => PineconeIndex::new(pinecone.api_key.clone(), host),
        None => {
            PineconeIndex::connect(
                pinecone.api_key.clone(),
                &pinecone.controller_url,
                &pinecone.index_name,
            )
            .await?
        }
    }
    .with_namespace(pinecone.namespace.clone())
    .with_retry(retry);

    info!(
        "Using index {} at {}",
        pinecone.index_name,
        index.host()
    );

    Ok(KeywordIndexer::new(embeddings, index))
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_checked_path_rejects_before_io() {
        let err = checked_path(None).unwrap_err();
        assert!(err.to_string().contains("No file path provided"));

        let err = checked_path(Some("terms.pdf")).unwrap_err();
        assert!(err.to_string().contains(".docx"));
    }

    #[test]
    fn test_extract_to_files_writes_listing_and_records() {
        let (root, pipeline) = test_support::workspace(
            "app_extract",
            "terms.docx",
            &["Apple: A fruit.", "Banana: Another fruit."],
        );

        let reloaded = extract_to_files(&pipeline, "terms.docx").unwrap();
        assert_eq!(reloaded.get("Apple"), Some("A fruit."));
        assert_eq!(reloaded.get("Banana"), Some("Another fruit."));

        assert_eq!(
            std::fs::read_to_string(&pipeline.listing_file).unwrap(),
            "Apple: A fruit.\n\nBanana: Another fruit.\n\n"
        );
        assert_eq!(
            std::fs::read_to_string(pipeline.results_dir.join("Apple.yaml")).unwrap(),
            "Apple: A fruit.\n"
        );
        assert!(pipeline.results_dir.join("Banana.yaml").exists());

        let _ = std::fs::remove_dir_all(&root);
    }

    #[test]
    fn test_write_records_collision_keeps_later() {
        let dir = std::env::temp_dir().join(format!("kwdef_app_coll_{}", uuid::Uuid::now_v7()));
        let keywords: KeywordMap = [("a/b", "first"), ("ab", "second")].into_iter().collect();

        write_records(&keywords, &dir).unwrap();
        assert_eq!(
            std::fs::read_to_string(dir.join("ab.yaml")).unwrap(),
            "ab: second\n"
        );

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_missing_document_is_error() {
        let (root, pipeline) =
            test_support::workspace("app_missing", "terms.docx", &["Apple: A fruit."]);
        assert!(extract_to_files(&pipeline, "other.docx").is_err());
        assert!(!pipeline.listing_file.exists());
        let _ = std::fs::remove_dir_all(&root);
    }
}
