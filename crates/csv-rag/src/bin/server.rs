//! CSV RAG server binary
//!
//! Run with: cargo run -p csv-rag --bin csv-rag-server -- --config csv-rag.toml

use clap::Parser;
use std::path::PathBuf;

use csv_rag::{config::RagConfig, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "csv-rag-server", version, about = "Ask questions about uploaded CSV files")]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "CSV_RAG_CONFIG")]
    config: Option<PathBuf>,

    /// Override the bind host
    #[arg(long)]
    host: Option<String>,

    /// Override the bind port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "csv_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => {
            tracing::info!("Loading configuration from {}", path.display());
            RagConfig::from_file(path)?
        }
        None => RagConfig::default(),
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Embedding backend: {:?}", config.embeddings.backend);
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Embedding dimensions: {}", config.embeddings.dimensions);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Default top_k: {}", config.retrieval.default_top_k);

    let server = RagServer::new(config).await?;

    let engine = server.state().engine();
    for (kind, healthy) in [
        ("embedding", engine.embedder().health_check().await?),
        ("generation", engine.llm().health_check().await?),
    ] {
        if healthy {
            tracing::info!("{} backend is available", kind);
        } else {
            tracing::warn!(
                "{} backend is not reachable; requests will fail until it is started",
                kind
            );
        }
    }

    tracing::info!("Endpoints on {}:", server.address());
    tracing::info!("  POST   /api/upload            - Upload a CSV");
    tracing::info!("  POST   /api/query             - Ask a question");
    tracing::info!("  GET    /api/files             - List files");
    tracing::info!("  GET    /api/files/:id/preview - Preview rows");
    tracing::info!("  DELETE /api/files/:id         - Delete a file");

    server.start().await?;

    Ok(())
}
