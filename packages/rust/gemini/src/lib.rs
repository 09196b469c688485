//! Gemini `generateContent` client.
//!
//! Sends one prompt, returns the raw summary text. The response text is opaque
//! to this crate; translation happens downstream.

mod wire;

use std::time::Duration;

use reqwest::Client;
use tracing::{debug, info, instrument};
use url::Url;

use coursesummary_shared::{CourseSummaryError, GeminiConfig, GenerationConfig, Result};

pub use wire::{SAFETY_CATEGORIES, SAFETY_THRESHOLD};
use wire::{ErrorEnvelope, GenerateRequest, GenerateResponse};

/// User-Agent header sent with every request.
const USER_AGENT: &str = concat!("CourseSummary/", env!("CARGO_PKG_VERSION"));

const INVALID_RESPONSE: &str = "Invalid response format from Gemini API";

/// Client for one model on one endpoint.
#[derive(Debug, Clone)]
pub struct GeminiClient {
    client: Client,
    base: Url,
    model: String,
    api_key: String,
    generation: GenerationConfig,
}

impl GeminiClient {
    /// Build a client from the `[gemini]` config section and a resolved key.
    pub fn from_config(config: &GeminiConfig, api_key: impl Into<String>) -> Result<Self> {
        let base = Url::parse(&config.endpoint).map_err(|e| {
            CourseSummaryError::config(format!(
                "invalid gemini endpoint '{}': {e}",
                config.endpoint
            ))
        })?;

        if config.model.trim().is_empty() {
            return Err(CourseSummaryError::config("gemini model must not be empty"));
        }

        Ok(Self {
            client: build_client(config.timeout_secs)?,
            base,
            model: config.model.clone(),
            api_key: api_key.into(),
            generation: config.generation.clone(),
        })
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    /// `{endpoint}/v1/models/{model}:generateContent`, without the key.
    fn request_url(&self) -> String {
        format!(
            "{}/v1/models/{}:generateContent",
            self.base.as_str().trim_end_matches('/'),
            self.model
        )
    }

    /// Send `prompt` and return the text of the first candidate.
    #[instrument(skip_all, fields(model = %self.model, prompt_len = prompt.len()))]
    pub async fn generate(&self, prompt: &str) -> Result<String> {
        let body = GenerateRequest::new(prompt, &self.generation);

        let response = self
            .client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&body)
            .send()
            .await
            .map_err(|e| CourseSummaryError::Network(e.without_url().to_string()))?;

        let status = response.status();
        let text = response.text().await.map_err(|e| {
            CourseSummaryError::Network(format!("failed to read body: {}", e.without_url()))
        })?;

        if !status.is_success() {
            let message = serde_json::from_str::<ErrorEnvelope>(&text)
                .unwrap_or_default()
                .into_message()
                .unwrap_or_else(|| "Unknown error".to_string());
            debug!(status = status.as_u16(), body = %text, "gemini error response");
            return Err(CourseSummaryError::Summarization(format!(
                "API request failed: {} - {message}",
                status.as_u16()
            )));
        }

        let summary = serde_json::from_str::<GenerateResponse>(&text)
            .map_err(|e| {
                debug!(error = %e, "gemini response is not valid JSON");
                CourseSummaryError::Summarization(INVALID_RESPONSE.to_string())
            })?
            .into_text()
            .ok_or_else(|| CourseSummaryError::Summarization(INVALID_RESPONSE.to_string()))?;

        info!(summary_len = summary.len(), "summary received");
        Ok(summary)
    }
}

fn build_client(timeout_secs: u64) -> Result<Client> {
    Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(timeout_secs))
        .build()
        .map_err(|e| CourseSummaryError::Network(format!("failed to build HTTP client: {e}")))
}
