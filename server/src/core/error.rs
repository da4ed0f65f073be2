//! # covers-chat Error Types
//!
//! File: server/src/core/error.rs
//!
//! ## Overview
//!
//! This module defines the error types used throughout the chat backend.
//!
//! ## Architecture
//!
//! The error system consists of three components:
//! - `CoversChatError`: the crate-wide error enum, derived with `thiserror`
//! - `InputError`: the two ways a chat message can be rejected before resolution
//! - `Result<T>`: a type alias for `anyhow::Result<T>` for flexible propagation
//!
//! Only `InputError` ever reaches an HTTP client. Provider errors are
//! downgraded to "no answer" inside `chat::provider` and only show up in logs.
//!
//! ## Examples
//!
//! ```rust
//! // Reject a request body without a usable message
//! let message = payload.get("message").and_then(Value::as_str).ok_or(InputError::Missing)?;
//!
//! // Add context to plumbing errors using anyhow
//! let content = fs::read_to_string(&path)
//!     .with_context(|| format!("Failed to read config file: {}", path.display()))?;
//! ```
//!
use thiserror::Error;

/// Fixed reply sent when the request carries no string `message`.
pub const INVALID_MESSAGE_REPLY: &str = "أرسل رسالة صحيحة!";

/// Fixed reply sent when the `message` is blank after trimming.
pub const EMPTY_MESSAGE_REPLY: &str = "الرسالة فارغة!";

/// Validation failures for an incoming chat message.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputError {
    #[error("Message is missing or is not a string")]
    Missing,

    #[error("Message is empty")]
    Empty,
}

impl InputError {
    /// The user-facing text returned in the `reply` field of a 400 response.
    pub fn reply(&self) -> &'static str {
        match self {
            InputError::Missing => INVALID_MESSAGE_REPLY,
            InputError::Empty => EMPTY_MESSAGE_REPLY,
        }
    }
}

/// Custom error type for the covers-chat application.
#[derive(Error, Debug)]
pub enum CoversChatError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Answer provider error: {0}")]
    Provider(String),

    #[error("Answer provider returned HTTP {status}: {detail}")]
    ProviderStatus { status: u16, detail: String },

    #[error("Answer provider returned no text")]
    ProviderEmptyReply,

    #[error("HTTP client error: {source}")]
    Http {
        #[from]
        source: reqwest::Error,
    },

    #[error("Invalid chat input: {0}")]
    Input(#[from] InputError),
}

/// Type alias for Result using anyhow::Error for broad compatibility.
pub type Result<T> = anyhow::Result<T>;
