//! # Reply Resolver
//!
//! File: server/src/chat/resolver.rs
//!
//! ## Overview
//!
//! Turns one incoming message into one `ChatResponse`. The policy runs in a
//! fixed order and stops at the first tier that produces a reply:
//!
//! 1. Trim the message and run the spelling corrector over it
//! 2. Normalize the corrected text and look it up in the knowledge base
//! 3. On a miss, ask the answer provider (only if it is enabled)
//! 4. If there is still nothing, pick a random fallback reply
//!
//! Validation is the only way `resolve` can fail. Once a message passes it,
//! the fallback pool guarantees a reply.
//!
//! ## Sharing
//!
//! The resolver is built once at startup and shared between requests behind
//! an `Arc`. Nothing in it is mutated after construction.
//!
use super::corrector::Corrector;
use super::knowledge::{FallbackPool, KnowledgeBase};
use super::normalize::normalize;
use super::provider::{build_prompt, AnswerProvider};
use super::random::{RandomSource, ThreadRandom};
use crate::core::error::{InputError, Result};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info};

/// Response body for a successfully resolved message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatResponse {
    /// The chosen answer.
    pub reply: String,
    /// Whether the corrector changed the message.
    pub corrected: bool,
    /// The message as received, trimmed.
    pub original: String,
    /// The message after correction.
    pub fixed: String,
}

/// Which tier produced the reply. Only used for logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplySource {
    KnowledgeBase,
    Provider,
    Fallback,
}

/// Extracts the `message` field from a JSON request body.
///
/// Anything other than an object with a string `message` is `InputError::Missing`.
pub fn extract_message(body: &Value) -> std::result::Result<&str, InputError> {
    body.get("message")
        .and_then(Value::as_str)
        .ok_or(InputError::Missing)
}

pub struct ReplyResolver {
    corrector: Corrector,
    knowledge: KnowledgeBase,
    fallback: FallbackPool,
    provider: Arc<dyn AnswerProvider>,
    random: Arc<dyn RandomSource>,
}

impl ReplyResolver {
    pub fn new(
        corrector: Corrector,
        knowledge: KnowledgeBase,
        fallback: FallbackPool,
        provider: Arc<dyn AnswerProvider>,
    ) -> Self {
        Self {
            corrector,
            knowledge,
            fallback,
            provider,
            random: Arc::new(ThreadRandom),
        }
    }

    /// Resolver with the built-in correction rules, knowledge base and
    /// fallback replies.
    pub fn builtin(provider: Arc<dyn AnswerProvider>) -> Result<Self> {
        let corrector = Corrector::builtin()?;
        for rule in corrector.rules() {
            debug!("Correction rule '{}' -> '{}'", rule.wrong(), rule.right());
        }
        let knowledge = KnowledgeBase::builtin(&corrector)?;
        let fallback = FallbackPool::builtin()?;

        info!(
            "Reply pipeline ready: {} correction rules, {} knowledge entries, {} fallback replies, provider {}",
            corrector.rules().len(),
            knowledge.len(),
            fallback.replies().len(),
            provider.describe()
        );

        Ok(Self::new(corrector, knowledge, fallback, provider))
    }

    /// Replaces the random source with a fixed one.
    #[cfg(test)]
    pub fn with_random_source(mut self, random: Arc<dyn RandomSource>) -> Self {
        self.random = random;
        self
    }

    pub fn provider_enabled(&self) -> bool {
        self.provider.is_enabled()
    }

    pub fn provider_label(&self) -> String {
        self.provider.describe()
    }

    /// # Resolve (`resolve`)
    ///
    /// Runs the reply policy for one raw message.
    ///
    /// ## Errors
    ///
    /// `InputError::Empty` if the message is blank after trimming.
    pub async fn resolve(&self, raw: &str) -> std::result::Result<ChatResponse, InputError> {
        let original = raw.trim();
        if original.is_empty() {
            debug!("Rejecting empty message");
            return Err(InputError::Empty);
        }

        let fixed = self.corrector.correct(original);
        let key = normalize(&fixed);

        let (reply, source) = match self.knowledge.lookup(&key, self.random.as_ref()) {
            Some(answer) => (answer.to_string(), ReplySource::KnowledgeBase),
            None => match self.ask_provider(&fixed).await {
                Some(answer) => (answer, ReplySource::Provider),
                None => (
                    self.fallback.pick(self.random.as_ref()).to_string(),
                    ReplySource::Fallback,
                ),
            },
        };

        debug!("Resolved key '{}' via {:?}", key, source);

        Ok(ChatResponse {
            reply,
            corrected: fixed != original,
            original: original.to_string(),
            fixed,
        })
    }

    async fn ask_provider(&self, fixed: &str) -> Option<String> {
        if !self.provider.is_enabled() {
            return None;
        }
        self.provider.ask(&build_prompt(fixed)).await
    }
}
