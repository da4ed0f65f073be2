//! # covers-chat Ask Command
//!
//! File: server/src/commands/ask.rs
//!
//! ## Overview
//!
//! Resolves a single message from the terminal through the same pipeline the
//! HTTP endpoint uses and prints the response body as JSON. Handy for
//! checking the knowledge base, the corrector or the provider credential
//! without starting the server.
//!
//! ```bash
//! covers-chat ask "كيف حالك؟"
//! ```
//!
//! Invalid input prints the same `{ "reply": ... }` body the server would
//! send with its 400 and exits non-zero.
//!
use crate::chat::{build_provider, ReplyResolver};
use crate::core::config::{ProviderArgs, ProviderSettings};
use crate::core::error::{CoversChatError, Result};
use anyhow::Context;
use clap::Parser;
use serde_json::json;
use tracing::info;

/// # Ask Command Arguments (`AskArgs`)
#[derive(Parser, Debug)]
pub struct AskArgs {
    /// The message to answer.
    pub message: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// # Handle Ask Command (`handle_ask`)
///
/// Builds the pipeline, resolves `args.message` and prints the result.
pub async fn handle_ask(args: AskArgs) -> Result<()> {
    let settings = ProviderSettings::from_args(&args.provider, None);
    info!(
        "Handling ask command (model {}, provider enabled: {})",
        settings.model,
        settings.provider_enabled()
    );

    let provider = build_provider(&settings)?;
    let resolver = ReplyResolver::builtin(provider)?;

    match resolver.resolve(&args.message).await {
        Ok(response) => {
            let out = serde_json::to_string_pretty(&response)
                .context("Failed to serialize chat response")?;
            println!("{}", out);
            Ok(())
        }
        Err(e) => {
            println!("{}", json!({ "reply": e.reply() }));
            Err(CoversChatError::Input(e).into())
        }
    }
}
