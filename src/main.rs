//! doc-qa-chat - ask questions about the documents in a watched folder

mod api;
mod engine;

use clap::Parser;
use doc_indexer::config::{EmbeddingArgs, StorageArgs};
use std::net::SocketAddr;
use std::sync::Arc;
use tracing::{info, warn};

use api::AppState;
use engine::{DEFAULT_CHAT_MODEL, DEFAULT_TOP_K, LlmClient, RetrievalConfig};

#[derive(Parser)]
#[command(name = "doc-qa-chat")]
#[command(about = "Chat with the .txt and .pdf files in a folder")]
struct Cli {
    #[command(flatten)]
    storage: StorageArgs,

    #[command(flatten)]
    embedding: EmbeddingArgs,

    /// Chat model identifier
    #[arg(long, env = "DOCQA_CHAT_MODEL", default_value = DEFAULT_CHAT_MODEL)]
    chat_model: String,

    /// Chunks retrieved per question
    #[arg(
        long,
        env = "DOCQA_TOP_K",
        default_value_t = DEFAULT_TOP_K,
        value_parser = clap::builder::RangedU64ValueParser::<usize>::new().range(1..)
    )]
    top_k: usize,

    /// Address the web server listens on
    #[arg(long, env = "DOCQA_BIND", default_value = "127.0.0.1:3000")]
    bind: SocketAddr,

    /// Skip the indexing pass at startup
    #[arg(long)]
    no_initial_index: bool,
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
    info!("Watched folder: {}", cli.storage.doc_dir.display());
    info!("Index directory: {}", cli.storage.index_dir.display());

    let llm = LlmClient::new(&cli.embedding.api_key, &cli.chat_model);
    info!("Chat model: {}", llm.model());

    let state = Arc::new(AppState::new(
        cli.embedding.build_embedder()?,
        llm,
        cli.storage.open_store()?,
        cli.storage.pipeline_config()?,
        RetrievalConfig { top_k: cli.top_k },
    ));

    if cli.no_initial_index {
        info!("Startup indexing disabled");
    } else {
        let report = state.reindex().await;
        if report.failed() > 0 {
            warn!("{} files failed to index; see log above", report.failed());
        }
    }

    let app = api::router(state);
    let listener = tokio::net::TcpListener::bind(cli.bind).await?;
    info!("Listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["doc-qa-chat", "--api-key", "k"]);
        assert_eq!(cli.chat_model, "gemini-2.0-flash");
        assert_eq!(cli.top_k, 4);
        assert_eq!(cli.bind, "127.0.0.1:3000".parse::<SocketAddr>().unwrap());
        assert!(!cli.no_initial_index);
    }

    #[test]
    fn test_top_k_must_be_positive() {
        let result = Cli::try_parse_from(["doc-qa-chat", "--api-key", "k", "--top-k", "0"]);
        assert!(result.is_err());
    }
}
