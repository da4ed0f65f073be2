//! # covers-chat Server Configuration
//!
//! File: server/src/commands/serve/config.rs
//!
//! ## Overview
//!
//! This module handles configuration loading, merging, and validation for
//! the chat server. It combines settings from:
//! 1. Command-line arguments (highest priority)
//! 2. Local configuration file `.covers-chat.toml` (if present)
//! 3. Default values (lowest priority)
//!
//! ## Architecture
//!
//! The configuration system follows these steps:
//! 1. Parse command-line arguments
//! 2. Load configuration from file (if present)
//! 3. Merge settings (CLI args override file settings)
//! 4. Validate and resolve the static directory
//! 5. Create a unified ServerConfig structure
//!
//! ## Examples
//!
//! Configuration file format:
//!
//! ```toml
//! port = 3000
//! host = "0.0.0.0"
//! directory = "public"
//! enable_cors = true
//! index_file = "chatbot.html"
//! model = "gemini-2.5-flash"
//! ```
//!
//! The API key is not accepted here; it comes from `--api-key` or
//! `GEMINI_API_KEY` only.
//!
use crate::core::config::{ProviderArgs, ProviderSettings};
use crate::core::error::Result;
use anyhow::Context;
use clap::Parser;
use serde::Deserialize;
use std::net::IpAddr;
use std::{env, fs, path::{Path, PathBuf}};
use tracing::{debug, info, warn};

/// The expected name for the server configuration file.
const CONFIG_FILE_NAME: &str = ".covers-chat.toml";

/// Port used when neither flag nor file sets one.
pub const DEFAULT_PORT: u16 = 3000;

/// Page served at `/` when neither flag nor file sets one.
pub const DEFAULT_INDEX_FILE: &str = "chatbot.html";

/// # Serve Command Arguments (`ServeArgs`)
///
/// Command-line arguments accepted by `covers-chat serve`.
#[derive(Parser, Debug, Clone)]
pub struct ServeArgs {
    /// Directory holding the chat page and other static files.
    /// Defaults to the current working directory.
    #[arg(default_value = ".")]
    pub directory: PathBuf,

    /// Port to listen on.
    #[arg(long, short, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind. Defaults to loopback only; pass `--host 0.0.0.0` to
    /// serve the website backend on all interfaces.
    #[arg(long, default_value = "127.0.0.1")]
    pub host: IpAddr,

    /// Disables the permissive CORS headers.
    #[arg(long)]
    pub no_cors: bool,

    /// File served for `GET /`, relative to the static directory.
    #[arg(long, short, default_value = DEFAULT_INDEX_FILE)]
    pub index: String,

    #[command(flatten)]
    pub provider: ProviderArgs,
}

/// # Effective Server Configuration (`ServerConfig`)
///
/// Final settings after merging CLI arguments and `.covers-chat.toml`.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// The network port the server will listen on.
    pub port: u16,

    /// The network IP address the server will bind to.
    pub host: IpAddr,

    /// The resolved, absolute path to the static directory.
    pub directory: PathBuf,

    /// Whether permissive CORS headers are sent.
    pub enable_cors: bool,

    /// The file served for `GET /`.
    pub index_file: String,

    /// Answer provider settings.
    pub provider: ProviderSettings,
}

/// # Configuration from File (`FileConfig`)
///
/// Mirror of `.covers-chat.toml`. Every field is optional; unknown keys
/// (including any attempt to put the API key here) are rejected.
#[derive(Deserialize, Debug, Default)]
#[serde(deny_unknown_fields)]
struct FileConfig {
    port: Option<u16>,
    host: Option<String>, // Read as string to fall back gracefully on bad input
    directory: Option<String>,
    enable_cors: Option<bool>,
    index_file: Option<String>,
    model: Option<String>,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            host: IpAddr::V4(std::net::Ipv4Addr::LOCALHOST),
            directory: PathBuf::from("."),
            enable_cors: true,
            index_file: DEFAULT_INDEX_FILE.to_string(),
            provider: ProviderSettings::default(),
        }
    }
}

/// # Load and Merge Server Configuration (`load_and_merge_config`)
///
/// Starts from the command-line arguments, overlays `.covers-chat.toml` from
/// the requested directory for every setting the user left at its default,
/// then resolves and validates the static directory.
///
/// ## Errors
///
/// Returns an error if:
/// - The current working directory cannot be determined.
/// - The configuration file exists but cannot be read or parsed.
/// - The final directory does not exist or is not a directory.
pub async fn load_and_merge_config(args: ServeArgs) -> Result<ServerConfig> {
    let mut effective_config = ServerConfig::from_args(&args, None);
    let cli_defaults = ServeArgs::parse_from([""]); // Defaults, for "was this flag set?"

    let config_search_dir = if args.directory.is_absolute() {
        args.directory.clone()
    } else {
        env::current_dir()
            .context("Failed to get current working directory")?
            .join(&args.directory)
    };

    debug!("Looking for config file in: {}", config_search_dir.display());

    if let Some((file_config, config_path)) = load_config_from_dir(&config_search_dir)? {
        info!("Loaded settings from {}", config_path.display());
        let defaults = ServerConfig::default();

        if args.port == cli_defaults.port {
            effective_config.port = file_config.port.unwrap_or(defaults.port);
        }
        if args.host == cli_defaults.host {
            if let Some(host_str) = file_config.host.as_deref() {
                effective_config.host = host_str.parse().unwrap_or_else(|e| {
                    warn!(
                        "Invalid host IP '{}' in config file ({}), using default {}",
                        host_str, e, defaults.host
                    );
                    defaults.host
                });
            }
        }
        if args.index == cli_defaults.index {
            if let Some(index_file) = file_config.index_file {
                effective_config.index_file = index_file;
            }
        }
        if !args.no_cors {
            effective_config.enable_cors = file_config.enable_cors.unwrap_or(defaults.enable_cors);
        }

        // The file's directory is resolved relative to the file itself.
        if let Some(directory) = file_config.directory.as_deref() {
            effective_config.directory = resolve_relative_to(&config_path, directory);
        }

        effective_config.provider = ProviderSettings::from_args(&args.provider, file_config.model.as_deref());
    } else {
        debug!("No config file found or loaded. Using arguments.");
    }

    effective_config.resolve_directory().await?;

    Ok(effective_config)
}

/// # Load Configuration from Directory (`load_config_from_dir`)
///
/// Returns `Ok(None)` if `search_dir` has no `.covers-chat.toml`, the parsed
/// file and its path if it does, and an error if it exists but cannot be read
/// or parsed.
fn load_config_from_dir(search_dir: &Path) -> Result<Option<(FileConfig, PathBuf)>> {
    let config_path = search_dir.join(CONFIG_FILE_NAME);

    if !config_path.is_file() {
        debug!("No config file found at {}", config_path.display());
        return Ok(None);
    }

    info!("Loading configuration from {}", config_path.display());

    let content = fs::read_to_string(&config_path)
        .with_context(|| format!("Failed to read config file: {}", config_path.display()))?;

    let file_config: FileConfig = toml::from_str(&content)
        .with_context(|| format!("Failed to parse config file: {}", config_path.display()))?;

    Ok(Some((file_config, config_path)))
}

/// Joins a relative `directory` onto the folder containing `config_path`.
fn resolve_relative_to(config_path: &Path, directory: &str) -> PathBuf {
    let path = PathBuf::from(directory);
    if path.is_absolute() {
        return path;
    }
    match config_path.parent() {
        Some(parent) => parent.join(path),
        None => {
            warn!(
                "Could not get parent directory of config file {}, keeping relative path '{}'",
                config_path.display(),
                directory
            );
            path
        }
    }
}

impl ServerConfig {
    /// # Create Configuration from Arguments (`from_args`)
    ///
    /// Builds a configuration from CLI arguments alone. `file_model` is the
    /// model named in the config file, if any.
    fn from_args(args: &ServeArgs, file_model: Option<&str>) -> Self {
        Self {
            port: args.port,
            host: args.host,
            directory: args.directory.clone(),
            enable_cors: !args.no_cors,
            index_file: args.index.clone(),
            provider: ProviderSettings::from_args(&args.provider, file_model),
        }
    }

    /// Path of the page served for `GET /`.
    pub fn index_path(&self) -> PathBuf {
        self.directory.join(&self.index_file)
    }

    /// # Resolve and Validate Directory Path (`resolve_directory`)
    ///
    /// Makes `directory` absolute and canonical, and checks that it is a
    /// directory.
    async fn resolve_directory(&mut self) -> Result<()> {
        let absolute_path = if self.directory.is_absolute() {
            self.directory.clone()
        } else {
            env::current_dir()
                .context("Failed to get current working directory")?
                .join(&self.directory)
        };

        let canonical_path = tokio::fs::canonicalize(&absolute_path)
            .await
            .with_context(|| {
                format!(
                    "Directory '{}' could not be found or accessed",
                    absolute_path.display()
                )
            })?;

        let metadata = tokio::fs::metadata(&canonical_path)
            .await
            .with_context(|| format!("Failed to get metadata for path '{}'", canonical_path.display()))?;

        if !metadata.is_dir() {
            anyhow::bail!("Path is not a directory: {}", canonical_path.display());
        }

        self.directory = canonical_path;
        debug!("Resolved static directory to: {}", self.directory.display());

        if !self.index_path().is_file() {
            warn!(
                "Index file {} does not exist; GET / will return 404",
                self.index_path().display()
            );
        }

        Ok(())
    }
}
