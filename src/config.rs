//! Process-wide configuration.
//!
//! Everything the pipeline needs to reach the price store and the inference
//! server is collected into a single `Config` value at startup and handed to
//! each component by reference.

use std::fmt;

use thiserror::Error;

/// Environment variable holding the Supabase project URL.
pub const SUPABASE_URL_VAR: &str = "SUPABASE_URL";
/// Environment variable holding the Supabase anon key.
pub const SUPABASE_ANON_KEY_VAR: &str = "SUPABASE_ANON_KEY";
/// Environment variable overriding the inference endpoint.
pub const LLAMA_API_URL_VAR: &str = "LLAMA_API_URL";
/// Environment variable overriding the model name.
pub const LLAMA_MODEL_VAR: &str = "LLAMA_MODEL";

/// Inference endpoint used when `LLAMA_API_URL` is not set.
pub const DEFAULT_LLAMA_API_URL: &str = "http://localhost:11434/api/generate";
/// Model used when `LLAMA_MODEL` is not set.
pub const DEFAULT_LLAMA_MODEL: &str = "llama2";

/// Errors raised while assembling the configuration.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A required value was absent or empty.
    #[error("{0} must be set as an environment variable")]
    Missing(&'static str),
}

/// Resolved runtime configuration.
#[derive(Clone, PartialEq, Eq)]
pub struct Config {
    supabase_url: String,
    supabase_anon_key: String,
    llama_api_url: String,
    llama_model: String,
}

impl Config {
    /// Reads the configuration from the process environment.
    ///
    /// `SUPABASE_URL` and `SUPABASE_ANON_KEY` are required; an empty value
    /// counts as missing. The inference settings fall back to their defaults.
    pub fn from_env() -> Result<Self, ConfigError> {
        ConfigBuilder::new()
            .supabase_url_opt(read_var(SUPABASE_URL_VAR))
            .supabase_anon_key_opt(read_var(SUPABASE_ANON_KEY_VAR))
            .llama_api_url_opt(read_var(LLAMA_API_URL_VAR))
            .llama_model_opt(read_var(LLAMA_MODEL_VAR))
            .build()
    }

    /// Returns a copy with the inference endpoint replaced.
    #[must_use]
    pub fn with_llama_url(mut self, url: impl Into<String>) -> Self {
        self.llama_api_url = url.into();
        self
    }

    /// Returns a copy with the model name replaced.
    #[must_use]
    pub fn with_llama_model(mut self, model: impl Into<String>) -> Self {
        self.llama_model = model.into();
        self
    }

    pub fn supabase_url(&self) -> &str {
        &self.supabase_url
    }

    pub fn supabase_anon_key(&self) -> &str {
        &self.supabase_anon_key
    }

    pub fn llama_api_url(&self) -> &str {
        &self.llama_api_url
    }

    pub fn llama_model(&self) -> &str {
        &self.llama_model
    }
}

impl fmt::Debug for Config {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Config")
            .field("supabase_url", &self.supabase_url)
            .field("supabase_anon_key", &"<redacted>")
            .field("llama_api_url", &self.llama_api_url)
            .field("llama_model", &self.llama_model)
            .finish()
    }
}

/// Builder for constructing `Config` instances.
///
/// # Examples
///
/// ```
/// use crypto_query::ConfigBuilder;
///
/// let config = ConfigBuilder::new()
///     .supabase_url("https://project.supabase.co")
///     .supabase_anon_key("anon-key")
///     .build()
///     .expect("credentials are set");
///
/// assert_eq!(config.llama_model(), "llama2");
/// ```
#[derive(Debug, Default)]
pub struct ConfigBuilder {
    supabase_url: Option<String>,
    supabase_anon_key: Option<String>,
    llama_api_url: Option<String>,
    llama_model: Option<String>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the Supabase project URL.
    pub fn supabase_url(self, url: impl Into<String>) -> Self {
        self.supabase_url_opt(Some(url.into()))
    }

    /// Sets the Supabase anon key.
    pub fn supabase_anon_key(self, key: impl Into<String>) -> Self {
        self.supabase_anon_key_opt(Some(key.into()))
    }

    /// Sets the inference endpoint.
    pub fn llama_api_url(self, url: impl Into<String>) -> Self {
        self.llama_api_url_opt(Some(url.into()))
    }

    /// Sets the model name.
    pub fn llama_model(self, model: impl Into<String>) -> Self {
        self.llama_model_opt(Some(model.into()))
    }

    fn supabase_url_opt(mut self, url: Option<String>) -> Self {
        self.supabase_url = url;
        self
    }

    fn supabase_anon_key_opt(mut self, key: Option<String>) -> Self {
        self.supabase_anon_key = key;
        self
    }

    fn llama_api_url_opt(mut self, url: Option<String>) -> Self {
        self.llama_api_url = url;
        self
    }

    fn llama_model_opt(mut self, model: Option<String>) -> Self {
        self.llama_model = model;
        self
    }

    /// Validates the required values and applies defaults for the rest.
    pub fn build(self) -> Result<Config, ConfigError> {
        let supabase_url =
            non_empty(self.supabase_url).ok_or(ConfigError::Missing(SUPABASE_URL_VAR))?;
        let supabase_anon_key =
            non_empty(self.supabase_anon_key).ok_or(ConfigError::Missing(SUPABASE_ANON_KEY_VAR))?;

        Ok(Config {
            supabase_url,
            supabase_anon_key,
            llama_api_url: non_empty(self.llama_api_url)
                .unwrap_or_else(|| DEFAULT_LLAMA_API_URL.to_string()),
            llama_model: non_empty(self.llama_model)
                .unwrap_or_else(|| DEFAULT_LLAMA_MODEL.to_string()),
        })
    }
}

fn read_var(name: &str) -> Option<String> {
    std::env::var(name).ok()
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}
