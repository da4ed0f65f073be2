//! # covers-chat Shared Configuration
//!
//! File: server/src/core/config.rs
//!
//! ## Overview
//!
//! Settings shared by every command that runs the reply pipeline: which
//! generative model to call and the credential that enables the call.
//! Server-only settings (port, host, static directory) live in
//! `commands::serve::config`.
//!
//! ## Sources
//!
//! 1. `--api-key` / `--model` flags
//! 2. `GEMINI_API_KEY` in the process environment, which may have been
//!    populated from `.env.local` or `.env` by `load_env_files`
//! 3. Built-in defaults
//!
//! The credential is deliberately never read from a TOML file.
//!
use clap::Args;
use std::fmt;

/// Environment variable holding the Gemini credential.
pub const API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Model used when neither the flag nor the config file names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";

/// Files loaded into the environment before argument parsing, in order.
/// Variables already set are not overwritten, so `.env.local` wins over `.env`.
const ENV_FILES: [&str; 2] = [".env.local", ".env"];

/// # Provider Arguments (`ProviderArgs`)
///
/// Flattened into both `serve` and `ask` so the pipeline is configured the
/// same way everywhere.
#[derive(Args, Clone, Default)]
pub struct ProviderArgs {
    /// Gemini API key. Without it the service answers from the knowledge base
    /// and the fallback replies only.
    #[arg(long, env = API_KEY_ENV, hide_env_values = true)]
    pub api_key: Option<String>,

    /// Gemini model used for unmatched questions.
    #[arg(long)]
    pub model: Option<String>,
}

// Hand-written so the key never ends up in debug logs.
impl fmt::Debug for ProviderArgs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderArgs")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .finish()
    }
}

/// Resolved provider settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSettings {
    /// Present only when a non-blank credential was supplied.
    pub api_key: Option<String>,
    pub model: String,
}

impl Default for ProviderSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
        }
    }
}

impl ProviderSettings {
    /// Builds settings from CLI arguments, falling back to `file_model` and
    /// then `DEFAULT_MODEL` for the model name.
    pub fn from_args(args: &ProviderArgs, file_model: Option<&str>) -> Self {
        // A blank key (e.g. `GEMINI_API_KEY=` in .env) means "not configured".
        let api_key = args
            .api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty())
            .map(str::to_string);

        let model = args
            .model
            .as_deref()
            .or(file_model)
            .map(str::trim)
            .filter(|model| !model.is_empty())
            .unwrap_or(DEFAULT_MODEL)
            .to_string();

        Self { api_key, model }
    }

    pub fn provider_enabled(&self) -> bool {
        self.api_key.is_some()
    }
}

/// # Load Environment Files (`load_env_files`)
///
/// Loads `.env.local` and `.env` from the working directory. A missing file is
/// silently skipped; an unreadable or malformed one is reported on stderr
/// because logging is not initialised yet at this point.
pub fn load_env_files() {
    for file in ENV_FILES {
        match dotenvy::from_filename(file) {
            Ok(_) => {}
            Err(dotenvy::Error::Io(err)) if err.kind() == std::io::ErrorKind::NotFound => {}
            Err(err) => eprintln!("Warning: unable to load {}: {}", file, err),
        }
    }
}
