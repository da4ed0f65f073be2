//! # covers-chat Command Modules
//!
//! File: server/src/commands/mod.rs
//!
//! ## Overview
//!
//! Top-level commands of the `covers-chat` binary. Each command defines its
//! own argument struct and an async handler called from `main.rs`.
//!
//! ## Commands
//!
//! - `serve`: run the HTTP chat backend
//! - `ask`: answer one message from the terminal
//!

/// Answer a single message through the reply pipeline and print the JSON response.
pub mod ask;
/// The HTTP chat backend. Includes configuration and server logic.
pub mod serve;
