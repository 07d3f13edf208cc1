//! Outcome of a single inference round trip.

use std::fmt;

/// Shown when the server replied without an answer.
pub const NO_ANSWER_TEXT: &str = "Keine Antwort erhalten.";

/// Prefix of every answer describing a failed request.
pub const ERROR_PREFIX: &str = "Fehler bei der Kommunikation mit dem Llama-Server";

/// What came back from the inference server.
///
/// Every variant has a printable text, so a caller that only wants something
/// to show the user can use `text()` and ignore the distinction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Answer {
    /// The model produced text.
    Generated(String),
    /// The server replied successfully but without a `response` field.
    NoAnswer,
    /// Transport, status or decoding failure, with its description.
    Failed(String),
}

impl Answer {
    /// Returns the human-readable answer text.
    pub fn text(&self) -> String {
        match self {
            Self::Generated(text) => text.clone(),
            Self::NoAnswer => NO_ANSWER_TEXT.to_string(),
            Self::Failed(reason) => format!("{ERROR_PREFIX}: {reason}"),
        }
    }

    /// Returns true if the model actually generated text.
    pub fn is_generated(&self) -> bool {
        matches!(self, Self::Generated(_))
    }
}

impl fmt::Display for Answer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text())
    }
}
