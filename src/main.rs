use anyhow::{Context, Result};
use clap::Parser;
use crypto_query::{Config, ConfigError, LlamaError, Pipeline, RunOutcome, StoreError};
use tracing::Level;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// crypto-query - ask a local Llama model about the latest crypto prices
#[derive(Parser)]
#[command(name = "crypto-query")]
#[command(about = "Answers questions about current crypto prices stored in Supabase using a local Llama server")]
#[command(version)]
struct Cli {
    /// The question to ask about the current prices
    #[arg(short, long, value_name = "TEXT", value_parser = parse_question)]
    question: String,

    /// Generate endpoint of the Llama server (overrides LLAMA_API_URL)
    #[arg(long, value_name = "URL")]
    llama_url: Option<String>,

    /// Model name (overrides LLAMA_MODEL)
    #[arg(short, long, value_name = "NAME")]
    model: Option<String>,

    /// Enable verbose logging (sets log level to DEBUG)
    #[arg(short, long)]
    verbose: bool,
}

fn main() {
    let _ = dotenvy::dotenv();

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            // Help and version go to stdout and are not failures.
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    init_tracing(cli.verbose);

    match run(&cli) {
        Ok(outcome) => std::process::exit(outcome.exit_code()),
        Err(e) => {
            let exit_code = if is_user_error(&e) { 1 } else { 2 };
            eprintln!("Error: {e:#}");
            std::process::exit(exit_code);
        }
    }
}

/// Logs go to stderr so stdout carries only progress and the answer.
///
/// RUST_LOG always takes precedence; --verbose falls back to DEBUG.
fn init_tracing(verbose: bool) {
    let level = if verbose { Level::DEBUG } else { Level::WARN };
    let filter = EnvFilter::from_default_env().add_directive(level.into());
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .try_init();
}

/// Determines if an error is a user error (vs internal error).
///
/// User errors are configuration problems: missing credentials or unusable URLs.
fn is_user_error(error: &anyhow::Error) -> bool {
    error.chain().any(|cause| {
        cause.is::<ConfigError>()
            || matches!(
                cause.downcast_ref::<StoreError>(),
                Some(StoreError::MissingCredentials | StoreError::InvalidUrl(_))
            )
            || matches!(
                cause.downcast_ref::<LlamaError>(),
                Some(LlamaError::InvalidUrl(_))
            )
    })
}

/// Loads configuration, applies CLI overrides and runs the pipeline.
fn run(cli: &Cli) -> Result<RunOutcome> {
    let config = apply_overrides(Config::from_env()?, cli);
    tracing::debug!(?config, "configuration loaded");

    let pipeline = Pipeline::from_config(&config)?;

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    let outcome = pipeline
        .run(&cli.question, &mut out)
        .context("Failed to write output")?;

    Ok(outcome)
}

/// Rejects blank questions at parse time.
fn parse_question(value: &str) -> Result<String, String> {
    if value.trim().is_empty() {
        return Err("Question cannot be empty".to_string());
    }
    Ok(value.to_string())
}

fn apply_overrides(mut config: Config, cli: &Cli) -> Config {
    if let Some(url) = &cli.llama_url {
        config = config.with_llama_url(url);
    }
    if let Some(model) = &cli.model {
        config = config.with_llama_model(model);
    }
    config
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base_config() -> Config {
        crypto_query::ConfigBuilder::new()
            .supabase_url("https://project.supabase.co")
            .supabase_anon_key("key")
            .build()
            .unwrap()
    }

    #[test]
    fn cli_requires_question() {
        assert!(Cli::try_parse_from(["crypto-query"]).is_err());
    }

    #[test]
    fn cli_accepts_short_and_long_question_flags() {
        let cli = Cli::try_parse_from(["crypto-query", "-q", "highest price?"]).unwrap();
        assert_eq!(cli.question, "highest price?");

        let cli = Cli::try_parse_from([
            "crypto-query",
            "--question",
            "highest price?",
            "--llama-url",
            "http://gpu-box:11434/api/generate",
        ])
        .unwrap();
        assert_eq!(
            cli.llama_url.as_deref(),
            Some("http://gpu-box:11434/api/generate")
        );
    }

    #[test]
    fn positional_question_is_rejected() {
        assert!(Cli::try_parse_from(["crypto-query", "highest price?"]).is_err());
    }

    #[test]
    fn overrides_apply_only_when_given() {
        let cli = Cli::try_parse_from(["crypto-query", "-q", "x"]).unwrap();
        let config = apply_overrides(base_config(), &cli);
        assert_eq!(config, base_config());

        let cli = Cli::try_parse_from([
            "crypto-query",
            "-q",
            "x",
            "--llama-url",
            "http://other:1/api/generate",
            "-m",
            "mistral",
        ])
        .unwrap();
        let config = apply_overrides(base_config(), &cli);
        assert_eq!(config.llama_api_url(), "http://other:1/api/generate");
        assert_eq!(config.llama_model(), "mistral");
    }

    #[test]
    fn configuration_errors_are_user_errors() {
        let err = anyhow::Error::new(ConfigError::Missing("SUPABASE_URL"));
        assert!(is_user_error(&err));

        let err = anyhow::Error::new(StoreError::MissingCredentials).context("wrapped");
        assert!(is_user_error(&err));

        let err = anyhow::anyhow!("Failed to write output");
        assert!(!is_user_error(&err));
    }

    #[test]
    fn blank_question_is_rejected() {
        let err = Cli::try_parse_from(["crypto-query", "-q", "   "])
            .err()
            .unwrap();
        assert!(err.to_string().contains("Question cannot be empty"));
    }
}
