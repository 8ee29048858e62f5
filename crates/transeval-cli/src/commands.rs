//! CLI commands implementation

use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use transeval_core::config::{CONFIG_FILE_NAME, DEFAULT_CONFIG_TEMPLATE};
use transeval_core::{
    default_cases, load_cases, Config, Gate, Glossary, LlmTranslator, Scorer, TestCase,
    ThresholdDecision, Translator, UnconfiguredTranslator,
};

use crate::tools::builtin::create_default_registry;
use crate::tools::registry::ToolRegistry;

// ANSI color codes
const GREEN: &str = "\x1b[92m";
const RED: &str = "\x1b[91m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn print_status(ok: bool, msg: &str) {
    let icon = if ok {
        format!("{}✓{}", GREEN, RESET)
    } else {
        format!("{}✗{}", RED, RESET)
    };
    println!("  {} {}", icon, msg);
}

/// Options for the evaluate command
#[derive(Debug, Clone, Default)]
pub struct EvaluateOptions {
    pub threshold: Option<f64>,
    pub dataset: Option<PathBuf>,
    pub json: bool,
}

fn build_translator(config: &Config) -> Result<LlmTranslator> {
    let glossary = Glossary::load(config.glossary_path())?;
    Ok(LlmTranslator::from_config(config, glossary)?)
}

/// Cases from `--dataset`, the configured dataset, or the built-in set
fn resolve_cases(config: &Config, dataset: Option<&Path>) -> Result<Vec<TestCase>> {
    match dataset.map(Path::to_path_buf).or_else(|| config.dataset_path()) {
        Some(path) => load_cases(&path),
        None => Ok(default_cases()),
    }
}

/// Run the evaluation and gate on the score.
///
/// Returns the gate's decision; translator or configuration failures are
/// returned as errors so the caller can report them separately.
pub async fn evaluate(config: &Config, opts: EvaluateOptions) -> Result<ThresholdDecision> {
    tracing::info!("Starting translation evaluation");

    let cases = resolve_cases(config, opts.dataset.as_deref())?;
    let translator = build_translator(config)?;
    tracing::info!("Translator created successfully");

    let scorer = Scorer::new(cases);
    let report = scorer.run_logged(&translator).await?;

    if opts.json {
        println!("Evaluation Results:");
        println!(
            "{}",
            serde_json::to_string_pretty(&report).context("Failed to serialize report")?
        );
    }

    let gate = Gate::new(opts.threshold.unwrap_or(config.evaluation.threshold));
    let decision = gate.decide(&report);

    if decision.passed {
        tracing::info!("{}", decision);
    } else {
        tracing::error!("{}", decision);
    }
    println!("{}", decision);

    Ok(decision)
}

/// One-shot translation
pub async fn translate(config: &Config, language: &str, text: &str) -> Result<()> {
    let translator = build_translator(config)?;
    let translated = translator.translate(text, language).await?;
    println!("{}", translated);
    Ok(())
}

/// Registry with the configured translator, or a stand-in when none is available
fn registry(config: &Config) -> ToolRegistry {
    let translator: Arc<dyn Translator> = match build_translator(config) {
        Ok(t) => Arc::new(t),
        Err(e) => {
            tracing::debug!("Translator not configured: {:#}", e);
            Arc::new(UnconfiguredTranslator::new(format!("{:#}", e)))
        }
    };
    create_default_registry(translator)
}

/// Run a named tool with a free-form input
pub async fn tool(config: &Config, name: &str, input: &str, json: bool) -> Result<()> {
    let registry = registry(config);
    let tool = registry
        .get(name)
        .with_context(|| format!("Unknown tool '{}'. Available: {}", name, registry.list_names().join(", ")))?;

    let result = tool.execute(input).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else if result.success {
        println!("{}", result.output);
    } else {
        println!("{}Error:{} {}", RED, RESET, result.error.as_deref().unwrap_or("unknown error"));
    }

    if !result.success {
        anyhow::bail!("Tool '{}' failed", name);
    }
    Ok(())
}

/// List available tools
pub async fn tools(config: &Config) -> Result<()> {
    let registry = registry(config);

    println!("{}Tools ({}){}", BOLD, registry.len(), RESET);
    for tool in registry.all_tools() {
        println!("  - {}: {}", tool.name(), tool.description());
    }
    Ok(())
}

/// Verify credentials and endpoint reachability
pub async fn check(config: &Config) -> Result<()> {
    println!("{}Translator{}", BOLD, RESET);
    println!("  Endpoint: {}", config.provider.base_url);
    println!("  Model: {}", config.provider.model);

    match config.api_key() {
        Some(key) => print_status(true, &format!("{} found (length: {})", config.provider.api_key_env, key.len())),
        None => {
            print_status(false, &format!("{} not found in environment variables", config.provider.api_key_env));
            println!("  Set it as a CI secret or export it in your shell");
        }
    }

    let glossary_path = config.glossary_path();
    match Glossary::load(&glossary_path) {
        Ok(g) => print_status(
            glossary_path.exists(),
            &format!("Glossary: {} ({} terms)", glossary_path.display(), g.len()),
        ),
        Err(e) => print_status(false, &format!("Glossary: {:#}", e)),
    }

    let translator = build_translator(config)?;
    translator.client().health_check().await?;
    print_status(true, "Endpoint reachable and key accepted");

    Ok(())
}

/// Write a default transeval.toml
pub async fn init(dir: &Path, force: bool) -> Result<()> {
    let path = dir.join(CONFIG_FILE_NAME);

    if path.exists() && !force {
        anyhow::bail!("Config file already exists: {}", path.display());
    }

    std::fs::write(&path, DEFAULT_CONFIG_TEMPLATE)
        .with_context(|| format!("Failed to write {}", path.display()))?;

    println!("{}✓{} Created {}", GREEN, RESET, path.display());
    Ok(())
}
