use kwdef_config::{Config, PipelineConfig, keys, load_dotenv, mask_secret};

/// Strategy for displaying the effective configuration.
///
/// Secrets are masked. Missing credentials are reported instead of failing,
/// so the command also works before the environment is complete.
#[derive(Debug, Clone, Copy)]
pub struct InfoStrategy;

impl super::CommandStrategy for InfoStrategy {
    type Input = ();

    async fn execute(&self, _input: Self::Input) -> anyhow::Result<()> {
        load_dotenv();
        let pipeline = PipelineConfig::load()?;

        println!("=== kwdef Configuration ===\n");

        println!("Pipeline:");
        println!("  Documents Dir: {}", pipeline.docs_dir.display());
        println!("  Listing File: {}", pipeline.listing_file.display());
        println!("  Results Dir: {}", pipeline.results_dir.display());
        println!("  Chunk Size: {}", pipeline.chunk_size);
        println!("  Chunk Overlap: {}", pipeline.chunk_overlap);
        println!("  Retry Delays: {}", format_delays(&pipeline.retry_delays));
        println!();

        match Config::load() {
            Ok(config) => {
                println!("OpenAI:");
                println!("  API Key: {}", mask_secret(&config.openai.api_key));
                println!("  Base URL: {}", config.openai.base_url);
                println!("  Model: {}", config.openai.model);
                println!();

                println!("Pinecone:");
                println!("  API Key: {}", mask_secret(&config.pinecone.api_key));
                println!("  Index: {}", config.pinecone.index_name);
                println!(
                    "  Host: {}",
                    config
                        .pinecone
                        .index_host
                        .as_deref()
                        .unwrap_or("(looked up via controller)")
                );
                println!("  Controller: {}", config.pinecone.controller_url);
                if config.pinecone.namespace.is_empty() {
                    println!("  Namespace: (default)");
                } else {
                    println!("  Namespace: {}", config.pinecone.namespace);
                }
            }
            Err(e) => {
                println!("Credentials:");
                println!("  Status: incomplete");
                println!("  Error: {e}");
                println!(
                    "  Required: {}, {}, {}",
                    keys::OPENAI_API_KEY,
                    keys::PINECONE_API_KEY,
                    keys::PINECONE_INDEX_NAME
                );
            }
        }

        Ok(())
    }
}

fn format_delays(delays: &[u64]) -> String {
    if delays.is_empty() {
        return "(none)".to_string();
    }
    delays
        .iter()
        .map(|secs| format!("{secs}s"))
        .collect::<Vec<_>>()
        .join(", ")
}
