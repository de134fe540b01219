//! Document chat server binary
//!
//! Run with: cargo run -p doc-chat --bin doc-chat-server [-- <config.toml>]

use doc_chat::{config::DocChatConfig, server::DocChatServer};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "doc_chat=info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    println!(
        r#"
╔═══════════════════════════════════════════════════════════╗
║                         Doc Chat                          ║
║        Questions about PDF, CSV, DOCX and XLSX files      ║
╚═══════════════════════════════════════════════════════════╝
"#
    );

    // Load configuration
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = DocChatConfig::load(config_path.as_deref())?.apply_env();

    tracing::info!("Configuration loaded");
    tracing::info!("  - Model: {}", config.llm.model);
    tracing::info!("  - Endpoint: {}", config.llm.base_url);
    tracing::info!("  - Max upload: {} bytes", config.server.max_upload_size);
    if config.llm.api_key.is_none() {
        tracing::warn!("No fallback API key configured; every query must carry `api_key`");
    }

    // Create and start server
    let server = DocChatServer::new(config)?;

    println!("\nServer starting...");
    println!("  API: http://{}", server.address());
    println!("  Health: http://{}/health", server.address());
    println!("  API Info: http://{}/api/info", server.address());
    println!("\nEndpoints:");
    println!("  POST /api/sessions                   - Start a session");
    println!("  POST /api/sessions/:id/document      - Upload a document");
    println!("  POST /api/sessions/:id/query         - Ask a question");
    println!("  GET  /api/sessions/:id/export/:fmt   - Download the history");
    println!("\nPress Ctrl+C to stop\n");

    server.start().await?;

    Ok(())
}
