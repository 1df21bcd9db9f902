// This is the entry point of the livecomment service.
//
// **Architecture Overview:**
// - `core/` = Business logic (transport-agnostic)
// - `infra/` = Implementations of core traits (SQLite)
// - `api/` = Request decoding and dispatch (JSON lines)
//
// This file's job is to:
// 1. Load configuration
// 2. Initialize services (dependency injection)
// 3. Serve requests read from stdin, one JSON object per line

// These attrs point each module declaration at a more descriptive root file
// so we don't end up with half a dozen mod.rs files that all look the same.
#[path = "api/api_layer.rs"]
mod api;
mod config;
#[path = "core/core_layer.rs"]
mod core;
#[path = "infra/infra_layer.rs"]
mod infra;

use crate::api::LivecommentApi;
use crate::config::AppConfig;
use crate::infra::livecomments::SqliteLivecommentStore;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging so we can see what's happening
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .init();

    // Load environment variables from .env file (if it exists)
    dotenv::dotenv().ok();

    let config = AppConfig::from_env();

    // Keep runtime databases in a dedicated folder so the repo root stays tidy.
    if let Some(parent) = config.database_dir() {
        std::fs::create_dir_all(parent).expect("Failed to create data directory for SQLite files");
    }

    // ========================================================================
    // DEPENDENCY INJECTION
    // ========================================================================

    let store = SqliteLivecommentStore::connect(&config.database_url, config.max_connections)
        .await
        .expect("Failed to initialize SQLite store");
    let api = LivecommentApi::new(store);

    tracing::info!(database = %config.database_url, "livecomment service ready");

    // ========================================================================
    // REQUEST LOOP
    // ========================================================================

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let response = api.handle_line(&line).await;
        let mut encoded = serde_json::to_vec(&response)?;
        encoded.push(b'\n');
        stdout.write_all(&encoded).await?;
        stdout.flush().await?;
    }

    tracing::info!("stdin closed, shutting down");
    Ok(())
}
