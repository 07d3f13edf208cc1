/// Llama HTTP client module.
///
/// This module provides a blocking client for an Ollama-compatible generate
/// endpoint, including error handling and timeout configuration.
mod client;

pub use client::{DEFAULT_TIMEOUT, LlamaClient, LlamaClientBuilder, LlamaClientTrait, LlamaError};
