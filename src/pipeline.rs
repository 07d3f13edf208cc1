//! Fetch → format → ask → print.
//!
//! `Pipeline` owns one price store and one answerer and runs a single
//! question through them, writing progress and the answer to `out`.

use std::io::{self, Write};
use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::info;

use crate::answerer::{Answer, CryptoAnswerer};
use crate::config::Config;
use crate::context::format_crypto_context;
use crate::llama::LlamaClientBuilder;
use crate::store::{PriceStore, SupabaseClientBuilder, fetch_crypto_data};

/// How a run ended.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunOutcome {
    /// The store had nothing to offer; the model was not asked.
    NoData,
    /// The model was asked; the answer may itself describe a failure.
    Answered(Answer),
}

impl RunOutcome {
    /// Process exit code for this outcome.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::NoData => 1,
            Self::Answered(_) => 0,
        }
    }
}

/// Sequences the price store and the answerer for one question.
pub struct Pipeline {
    store: Box<dyn PriceStore>,
    answerer: CryptoAnswerer,
}

impl Pipeline {
    /// Creates a pipeline from already-built components.
    pub fn new(store: Box<dyn PriceStore>, answerer: CryptoAnswerer) -> Self {
        Self { store, answerer }
    }

    /// Builds the Supabase and Llama clients described by `config`.
    ///
    /// No request is made here; invalid credentials or URLs fail immediately.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = SupabaseClientBuilder::from_config(config)
            .build()
            .context("Failed to create Supabase client")?;
        let client = LlamaClientBuilder::from_config(config)
            .build()
            .context("Failed to create Llama client")?;
        let answerer = CryptoAnswerer::new(Arc::new(client), config.llama_model());

        Ok(Self::new(Box::new(store), answerer))
    }

    /// Answers `question` against the latest prices.
    ///
    /// Only write failures on `out` are reported as errors. An empty or
    /// unreachable store yields `RunOutcome::NoData` without contacting the model.
    pub fn run(&self, question: &str, out: &mut dyn Write) -> io::Result<RunOutcome> {
        writeln!(out, "Rufe Krypto-Daten von Supabase ab...")?;
        let records = fetch_crypto_data(self.store.as_ref());

        if records.is_empty() {
            writeln!(out, "Keine Daten verfügbar. Beende.")?;
            return Ok(RunOutcome::NoData);
        }

        writeln!(out, "Gefunden: {} Krypto-Datensätze", records.len())?;
        let context = format_crypto_context(&records);

        writeln!(out)?;
        writeln!(out, "Sende Anfrage an Llama-Server...")?;
        writeln!(out, "Frage: {question}")?;
        writeln!(out)?;

        info!(model = self.answerer.model(), records = records.len(), "asking model");
        let answer = self.answerer.answer(question, &context);

        writeln!(out, "Antwort:")?;
        writeln!(out, "{answer}")?;

        Ok(RunOutcome::Answered(answer))
    }
}
