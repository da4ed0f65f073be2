//! # covers-chat Reply Pipeline
//!
//! File: server/src/chat/mod.rs
//!
//! ## Overview
//!
//! Everything needed to turn a user's message into a reply, independent of
//! how the message arrived (HTTP or the `ask` command).
//!
//! ## Architecture
//!
//! Listed in dependency order:
//! - `normalize`: canonical lookup keys
//! - `corrector`: literal spelling-fix rules
//! - `random`: injectable random choice
//! - `knowledge`: canned answers and fallback replies
//! - `provider`: the Gemini call, failures downgraded to "no answer"
//! - `resolver`: the policy that ties the tiers together
//!
pub mod corrector;
pub mod knowledge;
pub mod normalize;
pub mod provider;
pub mod random;
pub mod resolver;

pub use provider::build_provider;
pub use resolver::{extract_message, ReplyResolver};
