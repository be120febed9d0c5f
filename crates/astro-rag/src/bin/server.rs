//! AstroAI server binary
//!
//! Run with: cargo run -p astro-rag --bin astro-rag-server -- --config astro-rag.toml

use clap::Parser;
use std::path::PathBuf;

use astro_rag::{config::RagConfig, providers::embedding_from_config, server::RagServer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Space-science question answering server
#[derive(Parser, Debug)]
#[command(name = "astro-rag-server", version, about)]
struct Args {
    /// TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Discard the cached index and rebuild it from the dataset
    #[arg(long)]
    rebuild: bool,

    /// Override the listening port
    #[arg(short, long)]
    port: Option<u16>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env is optional
    let _ = dotenvy::dotenv();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "astro_rag=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let args = Args::parse();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                          AstroAI                          ║
║          Space Science Q&A with Grounded Answers          ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    let mut config = RagConfig::load(args.config.as_deref())?;
    if let Some(port) = args.port {
        config.server.port = port;
    }
    config.validate()?;

    tracing::info!("Configuration loaded");
    tracing::info!("  - Dataset: {}", config.dataset.path.display());
    tracing::info!("  - Embedding model: {}", config.embeddings.model);
    tracing::info!("  - Generation: {:?} ({})", config.llm.backend, config.llm.model);
    tracing::info!(
        "  - Chunking: {} chars, {} overlap",
        config.chunking.chunk_size,
        config.chunking.chunk_overlap
    );

    tracing::info!("Checking Ollama at {}...", config.embeddings.base_url);
    match embedding_from_config(&config)?.health_check().await {
        Ok(true) => tracing::info!("Ollama is running"),
        _ => {
            tracing::warn!("Ollama not available at {}", config.embeddings.base_url);
            tracing::warn!("Please start Ollama:");
            tracing::warn!("  1. Start: ollama serve");
            tracing::warn!("  2. Pull the embedding model: ollama pull {}", config.embeddings.model);
        }
    }

    let server = RagServer::new(config, args.rebuild).await?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /generate    - Ask a question (streamed)");
    println!("  POST /api/answer  - Ask a question (JSON)");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
