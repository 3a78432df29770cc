use kwdef_config::{Config, load_dotenv};

/// Input for the search command.
#[derive(Debug, Clone)]
pub struct SearchInput {
    pub query: String,
    pub top_k: usize,
}

/// Strategy for querying the vector index with free text.
#[derive(Debug, Clone, Copy)]
pub struct SearchStrategy;

impl super::CommandStrategy for SearchStrategy {
    type Input = SearchInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        if input.query.trim().is_empty() {
            anyhow::bail!("Search query must not be empty");
        }

        load_dotenv();
        let config = Config::load()?;
        let indexer = super::build_indexer(&config).await?;

        let hits = indexer.similarity_search(&input.query, input.top_k).await?;
        if hits.is_empty() {
            println!("No matches.");
            return Ok(());
        }

        for (rank, hit) in hits.iter().enumerate() {
            let source = hit.source.as_deref().unwrap_or("unknown");
            println!("{}. [{:.4}] ({source})", rank + 1, hit.score);
            println!("{}\n", hit.text.trim_end());
        }
        Ok(())
    }
}
