use kwdef_config::{PipelineConfig, load_dotenv};
use tracing::info;

/// Input for the extract command.
#[derive(Debug, Clone)]
pub struct ExtractInput {
    /// Document path relative to the documents directory.
    pub path: Option<String>,
}

/// Strategy for the file-only half of the pipeline.
///
/// Extracts keywords from a Word document, prints them, and writes the
/// listing file and per-keyword YAML records. Needs no credentials.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStrategy;

impl super::CommandStrategy for ExtractStrategy {
    type Input = ExtractInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let path = super::checked_path(input.path.as_deref())?;

        load_dotenv();
        let pipeline = PipelineConfig::load()?;

        let reloaded = super::extract_to_files(&pipeline, &path)?;
        info!(
            "Listing {} holds {} keywords",
            pipeline.listing_file.display(),
            reloaded.len()
        );
        Ok(())
    }
}
