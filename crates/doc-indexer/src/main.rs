//! doc-indexer CLI - builds per-file vector indexes for document QA

use clap::{Parser, Subcommand};
use doc_indexer::config::{EmbeddingArgs, StorageArgs};
use doc_indexer::{
    FileLoader, FileOutcome, IndexingPipeline, SourceState, VectorStore, list_candidates,
    source_state,
};
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "doc-indexer")]
#[command(about = "Index .txt and .pdf files for document question answering")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Index every file in the watched folder that has no index yet
    Index {
        #[command(flatten)]
        storage: StorageArgs,

        #[command(flatten)]
        embedding: EmbeddingArgs,
    },
    /// Show which files are indexed
    Status {
        #[command(flatten)]
        storage: StorageArgs,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Index { storage, embedding } => {
            let config = storage.pipeline_config()?;
            let store = storage.open_store()?;
            info!("Watched folder: {}", config.doc_dir.display());
            log_store(&store);

            let embedder = embedding.build_embedder()?;

            let report = IndexingPipeline::new(&FileLoader, &embedder, &store, &config)
                .run()
                .await;

            for file in &report.files {
                match &file.outcome {
                    FileOutcome::Indexed { chunks } => {
                        info!("Indexed {} ({} chunks)", file.file_name, chunks)
                    }
                    FileOutcome::Skipped => info!("Skipped {} (already indexed)", file.file_name),
                    FileOutcome::Failed { error } => warn!("Failed {}: {}", file.file_name, error),
                }
            }
            info!(
                "Indexing complete: {} indexed, {} skipped, {} failed",
                report.indexed(),
                report.skipped(),
                report.failed()
            );
        }
        Commands::Status { storage } => {
            let store = storage.open_store()?;
            log_store(&store);
            show_status(&storage, &store)?;
        }
    }

    Ok(())
}

fn log_store(store: &VectorStore) {
    info!(
        "Index directory: {} (prefix {})",
        store.root().display(),
        store.naming().prefix()
    );
}

fn show_status(storage: &StorageArgs, store: &VectorStore) -> anyhow::Result<()> {
    let candidates = list_candidates(&storage.doc_dir)?;
    info!("{} candidate files in {}", candidates.len(), storage.doc_dir.display());

    for candidate in &candidates {
        if !store.exists(&candidate.file_name) {
            info!("  {:<40} not indexed", candidate.file_name);
            continue;
        }

        match store.load(&candidate.file_name) {
            Ok(index) => {
                let header = index.header();
                let note = match source_state(&FileLoader, candidate, header) {
                    SourceState::Fresh => String::new(),
                    SourceState::Stale => " (stale: source changed)".to_string(),
                    SourceState::Unreadable(e) => format!(" (source unreadable: {e})"),
                };
                info!(
                    "  {:<40} indexed, {} chunks, model {}{}",
                    candidate.file_name, header.chunk_count, header.embedding_model, note
                );
            }
            Err(e) => warn!("  {:<40} unreadable index: {}", candidate.file_name, e),
        }
    }

    // Indexes whose source file has been removed from the folder
    for name in store.list_indexed()? {
        if !candidates.iter().any(|c| c.file_name == name) {
            info!("  {:<40} indexed, source missing", name);
        }
    }

    Ok(())
}
