//! # covers-chat Main Entry Point
//!
//! File: server/src/main.rs
//!
//! ## Overview
//!
//! Entry point of the chat backend for the "بين الغلافين" book community.
//! It handles:
//! - Loading `.env` files so `GEMINI_API_KEY` can live next to the service
//! - Command-line argument parsing using Clap
//! - Setting up logging based on verbosity flags
//! - Routing execution to the command handlers
//!
//! ## Examples
//!
//! ```bash
//! # Run the chat server on port 3000
//! covers-chat serve
//!
//! # Answer one message with debug logging
//! covers-chat -vv ask "كيف حالك؟"
//! ```
//!
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

mod chat; // Reply pipeline (corrector, knowledge base, provider, resolver)
mod commands; // Command handlers (serve, ask)
mod core; // Core infrastructure (errors, config)

/// Top-level command-line arguments.
#[derive(Parser, Debug)]
#[command(
    name = "covers-chat",
    about = "📚 covers-chat: chat backend for the Between the Covers book community",
    long_about = "Answers chat messages from a small knowledge base, fixes common spelling\n\
                  mistakes, and forwards unmatched questions to Gemini when GEMINI_API_KEY is set.",
    propagate_version = true,
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,
}

/// All available top-level commands.
#[derive(Parser, Debug)]
enum Commands {
    /// Run the HTTP chat backend.
    #[command(alias = "s")]
    Serve(commands::serve::ServeArgs),
    /// Answer one message and print the JSON response.
    #[command(alias = "a")]
    Ask(commands::ask::AskArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Before parsing, so env-backed flags see values from .env files.
    core::config::load_env_files();

    let cli = Cli::parse();

    let log_level = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_level));
    fmt::Subscriber::builder()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .compact()
        .init();

    tracing::debug!("Parsed CLI arguments: {:?}", cli);

    let command_result = match cli.command {
        Commands::Serve(args) => commands::serve::handle_serve(args).await,
        Commands::Ask(args) => commands::ask::handle_ask(args).await,
    };

    if let Err(e) = command_result {
        tracing::error!("Command execution failed: {:?}", e);
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_serve_defaults() {
        let cli = Cli::try_parse_from(["covers-chat", "serve"]).unwrap();
        match cli.command {
            Commands::Serve(args) => {
                assert_eq!(args.port, 3000);
                assert_eq!(args.index, "chatbot.html");
                assert!(!args.no_cors);
            }
            other => panic!("expected serve, got {:?}", other),
        }
    }

    #[test]
    fn test_parse_ask_with_verbosity() {
        let cli = Cli::try_parse_from(["covers-chat", "-vv", "ask", "كيف حالك؟", "--model", "m"])
            .unwrap();
        assert_eq!(cli.verbose, 2);
        match cli.command {
            Commands::Ask(args) => {
                assert_eq!(args.message, "كيف حالك؟");
                assert_eq!(args.provider.model.as_deref(), Some("m"));
            }
            other => panic!("expected ask, got {:?}", other),
        }
    }
}
