//! Question answering over the formatted price context.

use std::sync::Arc;

use tracing::warn;

use crate::llama::{LlamaClientTrait, LlamaError};

use super::types::Answer;

/// Combines context and question into the prompt sent to the model.
///
/// # Examples
///
/// ```
/// use crypto_query::build_prompt;
///
/// let prompt = build_prompt("Which coin is up?", "Aktuelle Kryptokurse:\n");
/// assert!(prompt.ends_with("Frage: Which coin is up?\n\nAntwort:"));
/// ```
pub fn build_prompt(question: &str, context: &str) -> String {
    format!("{context}\n\nFrage: {question}\n\nAntwort:")
}

/// Builder for constructing `CryptoAnswerer` instances.
#[derive(Default)]
pub struct CryptoAnswererBuilder {
    client: Option<Arc<dyn LlamaClientTrait>>,
    model: Option<String>,
}

impl CryptoAnswererBuilder {
    /// Creates a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the inference client to use.
    pub fn client(mut self, client: Arc<dyn LlamaClientTrait>) -> Self {
        self.client = Some(client);
        self
    }

    /// Sets the model name passed to the client.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    /// Builds the `CryptoAnswerer`.
    ///
    /// # Panics
    ///
    /// Panics if `client()` or `model()` was not called.
    #[must_use]
    pub fn build(self) -> CryptoAnswerer {
        CryptoAnswerer {
            client: self.client.expect("client must be set via client() method"),
            model: self.model.expect("model must be set via model() method"),
        }
    }
}

/// Answers questions about crypto prices using an LLM.
pub struct CryptoAnswerer {
    client: Arc<dyn LlamaClientTrait>,
    model: String,
}

impl CryptoAnswerer {
    /// Creates a new `CryptoAnswerer` for `model`.
    #[must_use]
    pub fn new(client: Arc<dyn LlamaClientTrait>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Returns the model name sent with each request.
    pub fn model(&self) -> &str {
        &self.model
    }

    /// Asks the model `question` with `context` prepended.
    ///
    /// Never fails: a missing answer field becomes `Answer::NoAnswer`, and any
    /// other error becomes `Answer::Failed` carrying its description.
    pub fn answer(&self, question: &str, context: &str) -> Answer {
        let prompt = build_prompt(question, context);

        match self.client.generate(&self.model, &prompt) {
            Ok(text) => Answer::Generated(text),
            Err(LlamaError::MissingResponse) => {
                warn!("inference server reply had no 'response' field");
                Answer::NoAnswer
            }
            Err(e) => {
                warn!(error = %e, "inference request failed");
                Answer::Failed(e.to_string())
            }
        }
    }
}
