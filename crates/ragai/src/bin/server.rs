//! RAGAI Server binary
//!
//! Run with: cargo run -p ragai --bin ragai-server -- --config ragai.toml

use clap::Parser;
use ragai::{config::RagConfig, server::RagServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Document chat server: upload files, ask questions about them
#[derive(Debug, Parser)]
#[command(name = "ragai-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long, env = "RAGAI_CONFIG")]
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
    // Secrets usually live in .env during development
    let dotenv = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "ragai=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match dotenv {
        Ok(path) => tracing::debug!("Loaded environment from {}", path.display()),
        Err(e) if e.not_found() => {}
        Err(e) => tracing::warn!("Failed to load .env: {}", e),
    }

    let args = Args::parse();

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    tracing::info!("Configuration loaded");
    tracing::info!("  - Vector store: {:?}", config.vector_db.backend);
    tracing::info!("  - Collection: {}", config.vector_db.collection_name);
    tracing::info!("  - LLM model: {}", config.llm.generate_model);
    tracing::info!("  - Embedding model: {}", config.llm.embed_model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    let server = RagServer::new(config).await?;

    tracing::info!("Endpoints:");
    tracing::info!("  POST /api/upload - Upload a document");
    tracing::info!("  POST /api/chat   - Ask a question");
    tracing::info!("  GET  /api/info   - Service information");

    server.start().await?;

    Ok(())
}
