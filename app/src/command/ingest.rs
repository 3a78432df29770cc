use kwdef_config::{Config, load_dotenv};
use kwdef_core::CharacterTextSplitter;
use tracing::info;

/// Input for the ingest command.
#[derive(Debug, Clone)]
pub struct IngestInput {
    /// Document path relative to the documents directory.
    pub path: Option<String>,
}

/// Strategy for the full pipeline.
///
/// Runs extraction, then splits the reloaded listing into chunks, embeds
/// them and upserts them into the vector index. Stages run in order; the
/// first failure aborts the run and files already written stay on disk.
#[derive(Debug, Clone, Copy)]
pub struct IngestStrategy;

impl super::CommandStrategy for IngestStrategy {
    type Input = IngestInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let path = super::checked_path(input.path.as_deref())?;

        load_dotenv();
        let config = Config::load()?;
        let pipeline = &config.pipeline;

        let reloaded = super::extract_to_files(pipeline, &path)?;
        info!("Reloaded {} keywords from listing", reloaded.len());

        let listing = std::fs::read_to_string(&pipeline.listing_file)?;
        let splitter = CharacterTextSplitter::new(pipeline.chunk_size, pipeline.chunk_overlap)?;
        let chunks = splitter.split_text(&listing);
        info!(
            "Split listing into {} chunks (size={}, overlap={})",
            chunks.len(),
            splitter.chunk_size(),
            splitter.chunk_overlap()
        );

        let indexer = super::build_indexer(&config).await?;
        let source = pipeline.listing_file.display().to_string();
        let indexed = indexer.index_chunks(&source, &chunks).await?;

        println!(
            "Indexed {indexed} chunks into {}",
            config.pinecone.index_name
        );
        Ok(())
    }
}
