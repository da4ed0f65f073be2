//! # External Answer Provider
//!
//! File: server/src/chat/provider.rs
//!
//! ## Overview
//!
//! Wraps the single call to Google's Gemini `generateContent` endpoint used
//! for questions the knowledge base cannot answer.
//!
//! ## Failure Model
//!
//! `AnswerProvider::generate` is fallible and returns rich errors so they can
//! be logged. Callers go through `AnswerProvider::ask`, which turns every
//! failure (disabled provider, transport error, non-2xx status, malformed or
//! empty body) into `None` after logging it. Nothing here retries.
//!
//! ## Examples
//!
//! ```rust
//! let provider = build_provider(&settings)?;
//! if provider.is_enabled() {
//!     if let Some(answer) = provider.ask(&build_prompt(&fixed)).await {
//!         println!("{}", answer);
//!     }
//! }
//! ```
//!
use crate::core::config::ProviderSettings;
use crate::core::error::{CoversChatError, Result};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Base URL of the Gemini REST API.
const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// # Answer Provider (`AnswerProvider`)
///
/// The seam between the resolver and the outside world. Production uses
/// `GeminiProvider` or `DisabledProvider`; tests plug in their own.
#[async_trait]
pub trait AnswerProvider: Send + Sync {
    /// Whether the provider was configured at startup. A disabled provider is
    /// never asked.
    fn is_enabled(&self) -> bool;

    /// Short label for logs and the startup banner.
    fn describe(&self) -> String;

    /// Performs exactly one completion request.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Like `generate`, but trims the answer and downgrades every failure,
    /// including an empty answer, to `None`.
    async fn ask(&self, prompt: &str) -> Option<String> {
        if !self.is_enabled() {
            return None;
        }

        match self.generate(prompt).await {
            Ok(text) => {
                let text = text.trim();
                if text.is_empty() {
                    warn!("{} returned an empty answer", self.describe());
                    None
                } else {
                    Some(text.to_string())
                }
            }
            Err(e) => {
                warn!("{} request failed: {:#}", self.describe(), e);
                None
            }
        }
    }
}

/// Provider used when no credential was configured.
#[derive(Debug, Default, Clone, Copy)]
pub struct DisabledProvider;

#[async_trait]
impl AnswerProvider for DisabledProvider {
    fn is_enabled(&self) -> bool {
        false
    }

    fn describe(&self) -> String {
        "disabled".to_string()
    }

    async fn generate(&self, _prompt: &str) -> Result<String> {
        Err(CoversChatError::Provider("no API key configured".to_string()).into())
    }
}

/// Gemini `generateContent` client.
#[derive(Clone)]
pub struct GeminiProvider {
    http: reqwest::Client,
    endpoint: String,
    model: String,
    api_key: Arc<String>,
}

impl GeminiProvider {
    /// Builds a client with the transport's default settings (no explicit
    /// timeout).
    pub fn new(api_key: &str, model: &str) -> Result<Self> {
        let http = reqwest::Client::builder()
            .build()
            .map_err(CoversChatError::from)?;
        Ok(Self {
            http,
            endpoint: format!("{}/{}:generateContent", GEMINI_API_BASE, model),
            model: model.to_string(),
            api_key: Arc::new(api_key.to_string()),
        })
    }

    /// Points the client at a different endpoint URL.
    #[cfg(test)]
    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }
}

#[async_trait]
impl AnswerProvider for GeminiProvider {
    fn is_enabled(&self) -> bool {
        true
    }

    fn describe(&self) -> String {
        format!("Gemini ({})", self.model)
    }

    async fn generate(&self, prompt: &str) -> Result<String> {
        debug!("Sending {} chars to {}", prompt.chars().count(), self.describe());

        let response = self
            .http
            .post(&self.endpoint)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(CoversChatError::from)?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(CoversChatError::ProviderStatus {
                status: status.as_u16(),
                detail,
            }
            .into());
        }

        let body: GenerateResponse = response.json().await.map_err(CoversChatError::from)?;
        body.into_text()
            .ok_or_else(|| CoversChatError::ProviderEmptyReply.into())
    }
}

/// # Build Provider (`build_provider`)
///
/// Chooses the provider once for the process lifetime: Gemini when a
/// credential is configured, `DisabledProvider` otherwise. The choice is
/// logged either way so operators can see which mode the service runs in.
pub fn build_provider(settings: &ProviderSettings) -> Result<Arc<dyn AnswerProvider>> {
    match settings.api_key.as_deref() {
        Some(key) => {
            let provider = GeminiProvider::new(key, &settings.model)?;
            info!("Gemini provider ready (model {})", provider.model());
            Ok(Arc::new(provider))
        }
        None => {
            warn!("GEMINI_API_KEY not set; answering from the knowledge base and fallback replies only");
            Ok(Arc::new(DisabledProvider))
        }
    }
}

/// # Build Prompt (`build_prompt`)
///
/// The fixed five-point instruction sent with every unmatched question. The
/// corrected question is quoted at the end.
pub fn build_prompt(question: &str) -> String {
    format!(
        "أنت خبير أدبي ومساعد كتب ذكي.\n\
         المهمة:\n\
         1. قم أولاً بتصحيح أي أخطاء إملائية أو نحوية في النص.\n\
         2. أجب على السؤال باللغة العربية بشكل واضح ومباشر.\n\
         3. إذا كان السؤال عن اقتراح كتب، قدم 2-3 اقتراحات مناسبة للمستوى المطلوب.\n\
         4. استخدم أمثلة عملية أو نصائح للقراءة إن أمكن.\n\
         5. اجعل الرد مختصرًا ومفيدًا، دون حشو زائد.\n\
         \n\
         السؤال: \"{}\"",
        question
    )
}

// --- Wire types for generateContent ---

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Content<'a> {
    role: &'static str,
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: [Content {
                role: "user",
                parts: [Part { text: prompt }],
            }],
        }
    }
}

#[derive(Deserialize, Debug)]
struct GenerateResponse {
    candidates: Option<Vec<Candidate>>,
}

#[derive(Deserialize, Debug)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize, Debug)]
struct CandidateContent {
    parts: Option<Vec<CandidatePart>>,
}

#[derive(Deserialize, Debug)]
struct CandidatePart {
    text: Option<String>,
}

impl GenerateResponse {
    /// All text parts of the first candidate joined together, trimmed.
    /// `None` when that candidate has no non-blank text.
    fn into_text(self) -> Option<String> {
        let parts = self
            .candidates
            .unwrap_or_default()
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .and_then(|content| content.parts)
            .unwrap_or_default();

        let text: String = parts.into_iter().filter_map(|part| part.text).collect();
        let text = text.trim();
        if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        }
    }
}
