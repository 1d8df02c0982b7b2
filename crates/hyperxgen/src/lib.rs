//! Prompt compilation and reliable request execution for generative design
//! synthesis.
//!
//! `hyperxgen` drives a remote generative image model (the Gemini
//! `generateContent` API) across three design disciplines (vector art,
//! typography, monograms) plus style extraction. The interesting parts are
//! small and explicit:
//!
//! - the [`prompt`] compiler turns a subject, a [`Mode`], optional style DNA
//!   and optional directives into one deterministic prompt string;
//! - the [`ReliableExecutor`](api::retry::ReliableExecutor) runs each remote
//!   call with quota-aware exponential backoff and a single retry after
//!   interactive credential reselection.
//!
//! [`DesignKernel`](kernel::DesignKernel) ties both to a
//! [`GenerativeBackend`](api::backend::GenerativeBackend), normally the
//! [`GeminiClient`] defined here.
//!
//! ```ignore
//! use hyperxgen::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), KernelError> {
//!     let key = ApiKey::from_env().ok_or(KernelError::Config("no key".into()))?;
//!     let kernel = DesignKernel::new(GeminiClient::new(key)?, KernelConfig::default());
//!
//!     let image = kernel
//!         .synthesize(Mode::Monogram, "HX", None, None, Some("LAYOUT_MODE: stacked"))
//!         .await?;
//!     println!("{} bytes of data URL", image.len());
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`prompt`] | constant prompt tables, [`compile_visual_prompt`](prompt::compile_visual_prompt), rewriters |
//! | [`api`] | [`retry`](api::retry) executor and error classification, [`backend`](api::backend) seam |
//! | [`kernel`] | extraction, synthesis and refinement operations |
//! | [`dna`] | style DNA record and normalization |
//! | [`config`] | [`KernelConfig`](config::KernelConfig) loading and defaults |
//! | [`directives`] | per-mode directive builders and subject fallbacks |
//! | [`presets`] | built-in preset library |
//! | [`media`] | data-URL helpers |

pub mod api;
pub mod config;
pub mod directives;
pub mod dna;
pub mod error;
pub mod kernel;
pub mod media;
pub mod mode;
pub mod prelude;
pub mod presets;
pub mod prompt;

use futures::future::BoxFuture;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, RwLock};
use std::time::{Duration, Instant};
use tracing::{debug, trace};

pub use error::KernelError;
pub use mode::Mode;

// ── Constants ──────────────────────────────────────────────────────

pub const GEMINI_API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Default image-capable model for synthesis calls.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-image";

/// Text model used for extraction and prompt refinement.
pub const DEFAULT_TEXT_MODEL: &str = "gemini-2.5-flash";

/// Environment variables consulted for the API key, in order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["GEMINI_API_KEY", "GOOGLE_API_KEY"];

// ── API key handle ─────────────────────────────────────────────────

/// Shared, replaceable API key.
///
/// The client reads the key on every request, so a
/// [`CredentialReselector`](api::retry::CredentialReselector) can swap it
/// and the next attempt picks it up.
#[derive(Clone, Default)]
pub struct ApiKey(Arc<RwLock<String>>);

impl ApiKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(Arc::new(RwLock::new(key.into())))
    }

    /// First non-empty key from [`API_KEY_ENV_VARS`].
    pub fn from_env() -> Option<Self> {
        API_KEY_ENV_VARS
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|k| !k.trim().is_empty())
            .map(Self::new)
    }

    pub fn get(&self) -> String {
        self.0.read().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn set(&self, key: impl Into<String>) {
        *self.0.write().unwrap_or_else(|e| e.into_inner()) = key.into();
    }

    pub fn is_empty(&self) -> bool {
        self.get().trim().is_empty()
    }
}

impl std::fmt::Debug for ApiKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("ApiKey(<redacted>)")
    }
}

// ── Request types ──────────────────────────────────────────────────

/// `generateContent` request body. Unused optional fields are omitted.
#[derive(Serialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub generation_config: Option<GenerationConfig>,
}

/// A turn of content made of ordered parts.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(default)]
    pub parts: Vec<Part>,
}

impl Content {
    pub fn user(parts: Vec<Part>) -> Self {
        Self {
            role: Some("user".to_string()),
            parts,
        }
    }

    /// System instruction content (no role).
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: None,
            parts: vec![Part::text(text)],
        }
    }
}

/// One part of a content turn: text or inline binary data.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub inline_data: Option<InlineData>,
}

impl Part {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            inline_data: None,
        }
    }

    pub fn inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            text: None,
            inline_data: Some(InlineData {
                mime_type: mime_type.into(),
                data: data.into(),
            }),
        }
    }
}

/// Base64 payload with its MIME type.
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct InlineData {
    pub mime_type: String,
    pub data: String,
}

impl InlineData {
    /// `data:<mime>;base64,<data>` form.
    pub fn to_data_url(&self) -> String {
        format!("data:{};base64,{}", self.mime_type, self.data)
    }
}

/// Sampling and output-format settings.
#[derive(Serialize, Debug, Default, Clone, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_mime_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub response_schema: Option<serde_json::Value>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub thinking_config: Option<ThinkingConfig>,
}

/// Reasoning token budget (thinking models only).
#[derive(Serialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ThinkingConfig {
    pub thinking_budget: u32,
}

// ── Response types ─────────────────────────────────────────────────

/// `generateContent` response envelope.
#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentResponse {
    #[serde(default)]
    pub candidates: Vec<Candidate>,
    #[serde(default)]
    pub usage_metadata: Option<UsageMetadata>,
    #[serde(default)]
    pub prompt_feedback: Option<PromptFeedback>,
}

#[derive(Deserialize, Debug, Default, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Candidate {
    #[serde(default)]
    pub content: Option<Content>,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

/// Token usage statistics.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct UsageMetadata {
    pub prompt_token_count: Option<u32>,
    pub candidates_token_count: Option<u32>,
    pub total_token_count: Option<u32>,
}

/// Present when the prompt itself was blocked.
#[derive(Deserialize, Debug, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct PromptFeedback {
    pub block_reason: Option<String>,
}

impl GenerateContentResponse {
    fn parts(&self) -> impl Iterator<Item = &Part> {
        self.candidates
            .iter()
            .filter_map(|c| c.content.as_ref())
            .flat_map(|c| c.parts.iter())
    }

    /// Concatenated text of every text part across all candidates.
    pub fn text(&self) -> String {
        self.parts().filter_map(|p| p.text.as_deref()).collect()
    }

    /// First inline (image) part in candidate order.
    pub fn first_inline_data(&self) -> Option<&InlineData> {
        self.parts().find_map(|p| p.inline_data.as_ref())
    }

    /// Build a response holding a single text part. Handy for tests and
    /// scripted backends.
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::text(text)])
    }

    /// Build a response holding a single inline image part.
    pub fn from_inline(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self::from_parts(vec![Part::inline(mime_type, data)])
    }

    pub fn from_parts(parts: Vec<Part>) -> Self {
        Self {
            candidates: vec![Candidate {
                content: Some(Content {
                    role: Some("model".to_string()),
                    parts,
                }),
                finish_reason: Some("STOP".to_string()),
            }],
            ..Default::default()
        }
    }
}

#[derive(Deserialize, Debug)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize, Debug)]
struct ErrorBody {
    #[serde(default)]
    code: u16,
    #[serde(default)]
    message: String,
    #[serde(default)]
    status: String,
}

// ── Client ─────────────────────────────────────────────────────────

/// Async HTTP client for the Gemini `generateContent` endpoint.
pub struct GeminiClient {
    pub(crate) client: reqwest::Client,
    pub(crate) api_key: ApiKey,
    pub(crate) base_url: String,
}

impl GeminiClient {
    /// Create a client against the public Gemini endpoint.
    pub fn new(api_key: ApiKey) -> Result<Self, KernelError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("hyperxgen/", env!("CARGO_PKG_VERSION")))
            .timeout(Duration::from_secs(120))
            .build()
            .map_err(|e| KernelError::Config(format!("failed to build HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_key,
            base_url: GEMINI_API_BASE.to_string(),
        })
    }

    /// Point the client at a different API root (proxies, test servers).
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    pub fn api_key(&self) -> &ApiKey {
        &self.api_key
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/models/{model}:generateContent", self.base_url)
    }

    /// Send one `generateContent` request.
    pub async fn generate_content(
        &self,
        model: &str,
        body: &GenerateContentRequest,
    ) -> Result<GenerateContentResponse, KernelError> {
        let part_count: usize = body.contents.iter().map(|c| c.parts.len()).sum();
        debug!(
            "Gemini request: model={}, parts={}, temp={:?}",
            model,
            part_count,
            body.generation_config.as_ref().and_then(|g| g.temperature),
        );
        trace!(
            "Request payload size: {} bytes",
            serde_json::to_string(body).map_or(0, |s| s.len())
        );

        let start = Instant::now();

        let resp = self
            .client
            .post(self.endpoint(model))
            .header("x-goog-api-key", self.api_key.get())
            .json(body)
            .send()
            .await?;

        let status = resp.status();
        let text = resp
            .text()
            .await
            .map_err(|e| KernelError::Request(format!("failed to read response: {e}")))?;

        debug!(
            "Gemini response: HTTP {} in {:.1}s ({} bytes)",
            status,
            start.elapsed().as_secs_f64(),
            text.len()
        );

        if !status.is_success() {
            return Err(KernelError::Http {
                status: status.as_u16(),
                body: text,
            });
        }

        parse_response(&text)
    }
}

/// Parse a 2xx body, surfacing an embedded error envelope as
/// [`KernelError::Api`].
pub(crate) fn parse_response(text: &str) -> Result<GenerateContentResponse, KernelError> {
    if let Ok(envelope) = serde_json::from_str::<ErrorEnvelope>(text) {
        return Err(KernelError::Api {
            code: envelope.error.code,
            status: envelope.error.status,
            message: envelope.error.message,
        });
    }

    let parsed: GenerateContentResponse = serde_json::from_str(text)?;

    if let Some(ref usage) = parsed.usage_metadata {
        debug!(
            "Token usage: prompt={}, candidates={}, total={}",
            usage.prompt_token_count.unwrap_or(0),
            usage.candidates_token_count.unwrap_or(0),
            usage.total_token_count.unwrap_or(0),
        );
    }
    if let Some(reason) = parsed
        .prompt_feedback
        .as_ref()
        .and_then(|f| f.block_reason.as_deref())
    {
        debug!("prompt blocked by remote filter: {reason}");
    }

    Ok(parsed)
}

impl api::backend::GenerativeBackend for GeminiClient {
    fn generate<'a>(
        &'a self,
        model: &'a str,
        request: &'a GenerateContentRequest,
    ) -> BoxFuture<'a, Result<GenerateContentResponse, KernelError>> {
        Box::pin(self.generate_content(model, request))
    }
}
