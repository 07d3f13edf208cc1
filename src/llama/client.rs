/// Llama HTTP client implementation.
///
/// This module provides `LlamaClient` for making synchronous requests to an
/// Ollama-compatible `/api/generate` endpoint, along with its error type and builder.
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

use crate::config::{Config, DEFAULT_LLAMA_API_URL, DEFAULT_LLAMA_MODEL};

/// Default bound on a whole generate request.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(60);

/// Errors that can occur when interacting with the inference server.
#[derive(Debug, Error)]
pub enum LlamaError {
    /// Network-related errors (connection refused, DNS resolution, etc.)
    #[error("Network error: {0}")]
    Network(#[source] reqwest::Error),

    /// Request or response timeout errors
    #[error("Request timed out")]
    Timeout(#[source] reqwest::Error),

    /// HTTP errors with status code
    #[error("HTTP error: status {status}")]
    Http { status: u16 },

    /// Body was not valid JSON
    #[error("Malformed response: {0}")]
    Decode(#[source] serde_json::Error),

    /// JSON body without a `response` field
    #[error("Missing 'response' field in API response")]
    MissingResponse,

    /// Invalid URL configuration error
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),
}

impl LlamaError {
    fn from_transport(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            LlamaError::Timeout(e)
        } else {
            LlamaError::Network(e)
        }
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: Option<String>,
}

/// Builder for constructing `LlamaClient` instances.
///
/// # Examples
///
/// ```
/// use crypto_query::LlamaClientBuilder;
///
/// let client = LlamaClientBuilder::new()
///     .api_url("http://localhost:11434/api/generate")
///     .build()
///     .expect("Failed to create client");
///
/// assert_eq!(client.model(), "llama2");
/// ```
#[derive(Debug, Default)]
pub struct LlamaClientBuilder {
    api_url: Option<String>,
    model: Option<String>,
    timeout: Option<Duration>,
}

impl LlamaClientBuilder {
    /// Creates a new `LlamaClientBuilder` with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the full generate endpoint URL.
    ///
    /// # Arguments
    ///
    /// * `url` - The endpoint (e.g., "http://localhost:11434/api/generate")
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = Some(url.into());
        self
    }

    /// Sets the model name sent with each request.
    ///
    /// # Arguments
    ///
    /// * `model` - The model name (e.g., "llama2" or "mistral")
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Overrides the request timeout (60 seconds by default).
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Copies endpoint and model from the runtime configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new()
            .api_url(config.llama_api_url())
            .model(config.llama_model())
    }

    /// Builds the `LlamaClient` with the configured settings.
    ///
    /// Unset values fall back to `http://localhost:11434/api/generate` and `llama2`.
    /// Returns `Err(LlamaError::InvalidUrl)` if the endpoint does not parse.
    pub fn build(self) -> Result<LlamaClient, LlamaError> {
        let api_url = self
            .api_url
            .unwrap_or_else(|| DEFAULT_LLAMA_API_URL.to_string());
        let model = self
            .model
            .unwrap_or_else(|| DEFAULT_LLAMA_MODEL.to_string());

        reqwest::Url::parse(&api_url)
            .map_err(|e| LlamaError::InvalidUrl(format!("{}: {}", api_url, e)))?;

        let client = reqwest::blocking::Client::builder()
            .timeout(self.timeout.unwrap_or(DEFAULT_TIMEOUT))
            .connect_timeout(Duration::from_secs(5))
            .build()
            .map_err(LlamaError::Network)?;

        Ok(LlamaClient {
            client,
            api_url,
            model,
        })
    }
}

/// Synchronous HTTP client for a local Llama inference server.
///
/// Each call is a single non-streaming request; there are no retries.
pub struct LlamaClient {
    client: reqwest::blocking::Client,
    api_url: String,
    model: String,
}

/// Trait for text generation.
///
/// This trait enables mocking in unit tests and provides a clean interface
/// for interacting with the inference server.
pub trait LlamaClientTrait: Send + Sync {
    /// Generates text for `prompt` using `model`.
    ///
    /// Returns the `response` field of the server's reply.
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlamaError>;
}

impl LlamaClient {
    /// Returns the endpoint configured for this client.
    pub fn api_url(&self) -> &str {
        &self.api_url
    }

    /// Returns the model name configured for this client.
    pub fn model(&self) -> &str {
        &self.model
    }
}

impl LlamaClientTrait for LlamaClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, LlamaError> {
        let request_body = GenerateRequest {
            model,
            prompt,
            stream: false,
        };
        debug!(url = %self.api_url, model, prompt_len = prompt.len(), "sending generate request");

        let response = self
            .client
            .post(&self.api_url)
            .json(&request_body)
            .send()
            .map_err(LlamaError::from_transport)?;

        let status = response.status();
        if !status.is_success() {
            return Err(LlamaError::Http {
                status: status.as_u16(),
            });
        }

        let body = response.text().map_err(LlamaError::from_transport)?;
        let parsed: GenerateResponse = serde_json::from_str(&body).map_err(LlamaError::Decode)?;

        parsed.response.ok_or(LlamaError::MissingResponse)
    }
}
