//! Question answering over crypto price context.
//!
//! This module provides the `CryptoAnswerer` struct which turns a question and
//! a formatted context block into a prompt, sends it to the inference server,
//! and always comes back with printable answer text.

mod crypto_answerer;
mod types;

pub use crypto_answerer::{CryptoAnswerer, CryptoAnswererBuilder, build_prompt};
pub use types::{Answer, ERROR_PREFIX, NO_ANSWER_TEXT};
