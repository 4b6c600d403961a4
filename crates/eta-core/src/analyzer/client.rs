//! HTTP client for the generative-text endpoint

use crate::error::{EtaError, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use url::Url;

pub const DEFAULT_GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com";
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default request timeout for remote analysis
pub const ANALYZER_TIMEOUT: Duration = Duration::from_secs(15);

/// Configuration for the generative model client
#[derive(Debug, Clone)]
pub struct AnalyzerConfig {
    /// Base URL, e.g. "https://generativelanguage.googleapis.com"
    pub endpoint: String,
    /// Model identifier placed in the request path
    pub model_id: String,
    /// API key; checked on first use
    pub api_key: Option<String>,
    /// Request timeout
    pub timeout: Duration,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_GEMINI_ENDPOINT.to_string(),
            model_id: DEFAULT_GEMINI_MODEL.to_string(),
            api_key: None,
            timeout: ANALYZER_TIMEOUT,
        }
    }
}

/// Remote text generation
#[async_trait]
pub trait GenerativeModel: Send + Sync {
    /// Send one prompt and return the first generated text block
    ///
    /// A response without a text block yields an empty string.
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Model identifier, used for logging
    fn model_id(&self) -> &str;
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Default, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    #[serde(default)]
    text: Option<String>,
}

impl GenerateContentResponse {
    /// `candidates[0].content.parts[0].text`, if present
    fn into_first_text(self) -> Option<String> {
        self.candidates
            .into_iter()
            .next()?
            .content?
            .parts
            .into_iter()
            .next()?
            .text
    }
}

/// Client for the Gemini `generateContent` API
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model_id: String,
    api_key: Option<String>,
}

impl GeminiClient {
    /// Create a new client
    pub fn new(config: AnalyzerConfig) -> Result<Self> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Url::parse(&config.endpoint).map_err(|e| {
            EtaError::InvalidConfiguration(format!("generative endpoint '{}': {}", config.endpoint, e))
        })?;

        Ok(Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model_id: config.model_id,
            api_key: config.api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    /// Whether an API key was supplied
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn request_url(&self, api_key: &str) -> Result<Url> {
        let raw = format!(
            "{}/v1beta/models/{}:generateContent",
            self.endpoint, self.model_id
        );
        Url::parse_with_params(&raw, &[("key", api_key)]).map_err(|e| {
            EtaError::InvalidConfiguration(format!("generative request url: {}", e))
        })
    }
}

#[async_trait]
impl GenerativeModel for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(EtaError::ConfigurationMissing("GEMINI_API_KEY"))?;
        let url = self.request_url(api_key)?;

        let body = GenerateContentRequest {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        debug!(model_id = %self.model_id, prompt_len = prompt.len(), "Calling generative model");

        let response = self.client.post(url).json(&body).send().await?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(EtaError::ProviderStatus { status, body });
        }

        let parsed: GenerateContentResponse = response.json().await?;
        Ok(parsed.into_first_text().unwrap_or_default())
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
