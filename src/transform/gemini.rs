//! Gemini `generateContent` implementation of the text transform

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::protocol::error::A2AError;

use super::{AdapterError, TextTransform};

/// Default model used for simplification
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default base URL of the Generative Language API
pub const DEFAULT_BASE_URL: &str = "https://generativelanguage.googleapis.com/";

/// Finish reasons that mean the provider refused to answer
const BLOCKING_FINISH_REASONS: &[&str] = &[
    "SAFETY",
    "RECITATION",
    "BLOCKLIST",
    "PROHIBITED_CONTENT",
    "SPII",
];

/// Configuration for the Gemini transform
#[derive(Clone)]
pub struct GeminiConfig {
    /// API key sent in the `x-goog-api-key` header
    pub api_key: String,

    /// Model name, e.g. "gemini-2.0-flash"
    pub model: String,

    /// API base URL (must end with a slash)
    pub base_url: Url,

    /// Per-request HTTP timeout
    pub request_timeout: Duration,
}

impl GeminiConfig {
    /// Create a configuration with the default model and endpoint
    pub fn new(api_key: impl Into<String>) -> Result<Self, A2AError> {
        let base_url = Url::parse(DEFAULT_BASE_URL)
            .map_err(|e| A2AError::Config(format!("invalid Gemini base URL: {}", e)))?;

        Ok(Self {
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            base_url,
            request_timeout: Duration::from_secs(60),
        })
    }

    /// Build the configuration from `GEMINI_API_KEY` and optional `GEMINI_MODEL`
    pub fn from_env() -> Result<Self, A2AError> {
        let api_key = std::env::var("GEMINI_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| A2AError::Config("GEMINI_API_KEY is not set".into()))?;

        let mut config = Self::new(api_key)?;
        if let Ok(model) = std::env::var("GEMINI_MODEL") {
            config = config.with_model(model);
        }
        Ok(config)
    }

    /// Set the model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    /// Set the API base URL
    pub fn with_base_url(mut self, base_url: Url) -> Self {
        self.base_url = base_url;
        self
    }

    /// Set the per-request HTTP timeout
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    /// Full URL of the `generateContent` call for the configured model
    pub fn endpoint(&self) -> Result<Url, A2AError> {
        self.base_url
            .join(&format!("v1beta/models/{}:generateContent", self.model))
            .map_err(|e| A2AError::Config(format!("invalid Gemini endpoint: {}", e)))
    }
}

impl std::fmt::Debug for GeminiConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiConfig")
            .field("api_key", &"<redacted>")
            .field("model", &self.model)
            .field("base_url", &self.base_url.as_str())
            .field("request_timeout", &self.request_timeout)
            .finish()
    }
}

/// Text transform backed by the Gemini REST API
#[derive(Clone, Debug)]
pub struct GeminiTransform {
    client: reqwest::Client,
    endpoint: Url,
    config: GeminiConfig,
}

impl GeminiTransform {
    /// Create a new Gemini transform
    pub fn new(config: GeminiConfig) -> Result<Self, A2AError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| A2AError::Config(format!("failed to build HTTP client: {}", e)))?;

        Self::with_client(config, client)
    }

    /// Create a new Gemini transform with a custom reqwest client
    pub fn with_client(config: GeminiConfig, client: reqwest::Client) -> Result<Self, A2AError> {
        let endpoint = config.endpoint()?;
        Ok(Self {
            client,
            endpoint,
            config,
        })
    }

    /// The URL requests are sent to
    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    fn map_transport_error(&self, err: reqwest::Error) -> AdapterError {
        if err.is_timeout() {
            AdapterError::Timeout(self.config.request_timeout)
        } else if err.is_connect() {
            AdapterError::Unavailable(format!("connection error: {}", err))
        } else {
            AdapterError::Unavailable(err.to_string())
        }
    }
}

#[async_trait]
impl TextTransform for GeminiTransform {
    async fn transform(&self, text: &str, instruction: &str) -> Result<String, AdapterError> {
        let request = GenerateContentRequest::new(text, instruction);

        let response = self
            .client
            .post(self.endpoint.clone())
            .header("x-goog-api-key", &self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| self.map_transport_error(e))?;

        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(|e| self.map_transport_error(e))?;

        tracing::debug!(
            model = %self.config.model,
            status,
            body_len = body.len(),
            "Gemini responded"
        );

        interpret_response(status, &body)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}

/// Map a `generateContent` HTTP response onto the adapter contract
///
/// Provider error text is logged but never put into a `Rejected` reason,
/// which reaches the caller.
pub fn interpret_response(status: u16, body: &[u8]) -> Result<String, AdapterError> {
    if !(200..=299).contains(&status) {
        let detail = provider_message(body).unwrap_or_else(|| "no detail".to_string());
        tracing::warn!(status, "Gemini returned an error: {}", detail);

        return Err(match status {
            408 | 429 | 500..=599 => {
                AdapterError::Unavailable(format!("HTTP {}: {}", status, detail))
            }
            401 | 403 | 404 => AdapterError::Misconfigured(format!("HTTP {}: {}", status, detail)),
            _ => AdapterError::Rejected(format!("HTTP {}", status)),
        });
    }

    let response: GenerateContentResponse = serde_json::from_slice(body)
        .map_err(|e| AdapterError::InvalidResponse(format!("undecodable body: {}", e)))?;

    if let Some(reason) = response
        .prompt_feedback
        .and_then(|feedback| feedback.block_reason)
    {
        return Err(AdapterError::Rejected(reason));
    }

    let candidate = response
        .candidates
        .into_iter()
        .next()
        .ok_or_else(|| AdapterError::Rejected("no candidates returned".into()))?;

    if let Some(reason) = candidate
        .finish_reason
        .as_deref()
        .filter(|reason| BLOCKING_FINISH_REASONS.contains(reason))
    {
        return Err(AdapterError::Rejected(reason.to_string()));
    }

    let text = candidate
        .content
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<String>()
        })
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AdapterError::InvalidResponse("candidate has no text".into()));
    }

    Ok(text.trim().to_string())
}

/// `error.message` from a Google API error body, if present
fn provider_message(body: &[u8]) -> Option<String> {
    serde_json::from_slice::<ErrorResponse>(body)
        .ok()
        .map(|e| e.error.message)
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

impl<'a> GenerateContentRequest<'a> {
    fn new(text: &'a str, instruction: &'a str) -> Self {
        Self {
            system_instruction: Content {
                role: None,
                parts: vec![Part { text: instruction }],
            },
            contents: vec![Content {
                role: Some("user"),
                parts: vec![Part { text }],
            }],
        }
    }
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    #[serde(default)]
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
    #[serde(default)]
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    #[serde(default)]
    block_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorResponse {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}
