//! # covers-chat HTTP Service
//!
//! File: server/src/commands/serve/mod.rs
//!
//! ## Overview
//!
//! Runs the chat backend: `POST /chat` plus the chat page and static files.
//!
//! ## Architecture
//!
//! - `config.rs`: configuration loading and validation
//! - `server_logic.rs`: router, handlers and server lifecycle
//!
//! ## Examples
//!
//! ```bash
//! # Serve the current directory on port 3000
//! covers-chat serve
//!
//! # Serve ./public on all interfaces with a specific model
//! GEMINI_API_KEY=... covers-chat serve --host 0.0.0.0 --model gemini-2.5-flash ./public
//! ```
//!
use crate::core::error::Result;
use tracing::info;

pub use config::ServeArgs;

/// Handles configuration loading and merging for the chat server.
pub mod config;

/// Contains the Axum-based HTTP server implementation.
pub mod server_logic;

/// # Handle Serve Command (`handle_serve`)
///
/// Loads the effective configuration and runs the server until shutdown.
pub async fn handle_serve(args: ServeArgs) -> Result<()> {
    info!("Handling serve command for directory {}", args.directory.display());

    let config = config::load_and_merge_config(args).await?;
    // Not `{:?}` on the whole config: it holds the API key.
    info!(
        "Effective server config: {}:{} dir={} index={} cors={} model={} provider_enabled={}",
        config.host,
        config.port,
        config.directory.display(),
        config.index_file,
        config.enable_cors,
        config.provider.model,
        config.provider.provider_enabled()
    );

    server_logic::run_server(config).await?;

    Ok(())
}
