//! transeval: translate with an LLM and gate translation quality in CI
//!
//! Exit status of `evaluate`: 0 when the score meets the threshold, 1 when
//! it falls below, 2 when the translator or its configuration is unusable,
//! 3 on any other error.

mod commands;
mod tools;

use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

use transeval_core::{exit_code, validate_threshold, Config, TranslateError};

use crate::commands::EvaluateOptions;

#[derive(Debug, Parser)]
#[command(name = "transeval")]
#[command(about = "LLM translation with an exact-match quality gate", version)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to transeval.toml (searched upward from the current directory by default)
    #[arg(long, global = true, env = "TRANSEVAL_CONFIG")]
    config: Option<PathBuf>,

    /// Override the API base URL
    #[arg(long, global = true, env = "OPENAI_BASE_URL")]
    base_url: Option<String>,

    /// Override the translation model
    #[arg(short, long, global = true)]
    model: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Score translations against expected outputs and gate on the threshold
    Evaluate {
        /// Minimum score in percent, 0 to 100 (overrides config)
        #[arg(short, long, value_parser = parse_threshold)]
        threshold: Option<f64>,

        /// TOML dataset of [[cases]] (overrides config)
        #[arg(short, long)]
        dataset: Option<PathBuf>,

        /// Print per-case results as JSON
        #[arg(long)]
        json: bool,
    },

    /// Translate text into a language
    Translate {
        /// Target language code or name (e.g. "es", "German")
        language: String,

        /// Text to translate
        #[arg(required = true, num_args = 1..)]
        text: Vec<String>,
    },

    /// Run a tool by name
    Tool {
        /// Tool name (see `transeval tools`)
        name: String,

        /// Tool input, e.g. "Russian | Good morning!"
        #[arg(required = true, num_args = 1..)]
        input: Vec<String>,

        /// Output the tool result as JSON
        #[arg(long)]
        json: bool,
    },

    /// List available tools
    Tools,

    /// Check credentials, glossary and endpoint reachability
    Check,

    /// Write a default transeval.toml in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },
}

fn parse_threshold(value: &str) -> Result<f64, String> {
    let threshold: f64 = value
        .parse()
        .map_err(|e| format!("invalid number '{}': {}", value, e))?;
    validate_threshold(threshold)
}

fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = match &cli.config {
        Some(path) => Config::load_from(path)?,
        None => Config::discover()?,
    };

    if let Some(base_url) = &cli.base_url {
        config.provider.base_url = base_url.clone();
    }
    if let Some(model) = &cli.model {
        config.provider.model = model.clone();
    }

    Ok(config)
}

/// True when the error chain holds a translator-unavailable cause
fn is_unavailable(err: &anyhow::Error) -> bool {
    err.chain()
        .filter_map(|cause| cause.downcast_ref::<TranslateError>())
        .any(TranslateError::is_fatal)
}

async fn run(cli: Cli, config: Config) -> Result<u8> {
    match cli.command {
        Commands::Evaluate {
            threshold,
            dataset,
            json,
        } => {
            let opts = EvaluateOptions {
                threshold,
                dataset,
                json,
            };
            let decision = commands::evaluate(&config, opts).await?;
            Ok(decision.exit_code())
        }
        Commands::Translate { language, text } => {
            commands::translate(&config, &language, &text.join(" ")).await?;
            Ok(exit_code::PASSED)
        }
        Commands::Tool { name, input, json } => {
            commands::tool(&config, &name, &input.join(" "), json).await?;
            Ok(exit_code::PASSED)
        }
        Commands::Tools => {
            commands::tools(&config).await?;
            Ok(exit_code::PASSED)
        }
        Commands::Check => {
            commands::check(&config).await?;
            Ok(exit_code::PASSED)
        }
        Commands::Init { force } => {
            let dir = std::env::current_dir()?;
            commands::init(&dir, force).await?;
            Ok(exit_code::PASSED)
        }
    }
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Logs go to stderr so stdout carries only results
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Configuration error: {:#}", e);
            return ExitCode::from(exit_code::UNAVAILABLE);
        }
    };

    match run(cli, config).await {
        Ok(code) => ExitCode::from(code),
        Err(e) if is_unavailable(&e) => {
            tracing::error!("Translator unavailable, nothing was evaluated: {:#}", e);
            ExitCode::from(exit_code::UNAVAILABLE)
        }
        Err(e) => {
            tracing::error!("Evaluation failed: {:?}", e);
            ExitCode::from(exit_code::UNEXPECTED)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_evaluate() {
        let cli = Cli::try_parse_from(["transeval", "evaluate", "--threshold", "75", "--json"]).unwrap();
        match cli.command {
            Commands::Evaluate {
                threshold,
                dataset,
                json,
            } => {
                assert_eq!(threshold, Some(75.0));
                assert!(dataset.is_none());
                assert!(json);
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_translate_joins_words() {
        let cli = Cli::try_parse_from(["transeval", "translate", "Russian", "Good", "morning!"]).unwrap();
        match cli.command {
            Commands::Translate { language, text } => {
                assert_eq!(language, "Russian");
                assert_eq!(text.join(" "), "Good morning!");
            }
            other => panic!("unexpected command: {:?}", other),
        }
    }

    #[test]
    fn test_parse_global_overrides() {
        let cli = Cli::try_parse_from(["transeval", "tools", "--model", "gpt-4o", "-v"]).unwrap();
        assert!(cli.verbose);
        assert_eq!(cli.model.as_deref(), Some("gpt-4o"));
    }

    #[test]
    fn test_translate_requires_text() {
        assert!(Cli::try_parse_from(["transeval", "translate", "es"]).is_err());
    }

    #[test]
    fn test_threshold_must_be_a_percentage() {
        for bad in ["NaN", "-5", "100.1", "high"] {
            assert!(
                Cli::try_parse_from(["transeval", "evaluate", "--threshold", bad]).is_err(),
                "accepted --threshold {}",
                bad
            );
        }
        assert!(Cli::try_parse_from(["transeval", "evaluate", "--threshold", "0"]).is_ok());
        assert!(Cli::try_parse_from(["transeval", "evaluate", "--threshold", "100"]).is_ok());
    }

    #[test]
    fn test_is_unavailable() {
        let fatal = anyhow::Error::from(TranslateError::Unavailable("no key".into())).context("evaluating");
        let recoverable = anyhow::Error::from(TranslateError::Failed("500".into()));

        assert!(is_unavailable(&fatal));
        assert!(!is_unavailable(&recoverable));
        assert!(!is_unavailable(&anyhow::anyhow!("dataset missing")));
    }
}
