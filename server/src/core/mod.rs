//! # covers-chat Core Infrastructure
//!
//! File: server/src/core/mod.rs
//!
//! ## Overview
//!
//! Foundational pieces used by both the reply pipeline and the commands:
//! - `config`: provider settings and `.env` loading
//! - `error`: error types and the `Result` alias
//!
//! ```rust
//! use crate::core::config::ProviderSettings;
//! use crate::core::error::{CoversChatError, InputError, Result};
//! ```
//!
pub mod config;
pub mod error;
