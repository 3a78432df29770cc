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

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod command;

use command::{
    CommandStrategy, ExtractInput, ExtractStrategy, IngestInput, IngestStrategy, InfoStrategy,
    SearchInput, SearchStrategy, VersionStrategy,
};

#[derive(Parser)]
#[command(name = "kwdef")]
#[command(
    about = "Extract keyword definitions from Word documents and index them for semantic search",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract keywords, write listing and records, then embed and index the listing
    Ingest {
        /// Word (.docx) document, relative to the documents directory
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Extract keywords and write listing and records without indexing
    Extract {
        /// Word (.docx) document, relative to the documents directory
        #[arg(short, long)]
        path: Option<String>,
    },
    /// Search indexed definitions by similarity to a query
    Search {
        /// Free-text query
        #[arg(short, long)]
        query: String,

        /// Number of matches to return
        #[arg(short = 'k', long, default_value_t = 4)]
        top_k: usize,
    },
    /// Show effective configuration
    Info,
    /// Show version
    Version,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();

    match cli.command {
        Commands::Ingest { path } => IngestStrategy.execute(IngestInput { path }).await?,
        Commands::Extract { path } => ExtractStrategy.execute(ExtractInput { path }).await?,
        Commands::Search { query, top_k } => {
            SearchStrategy
                .execute(SearchInput { query, top_k })
                .await?;
        }
        Commands::Info => InfoStrategy.execute(()).await?,
        Commands::Version => VersionStrategy.execute(()).await?,
    }

    Ok(())
}
