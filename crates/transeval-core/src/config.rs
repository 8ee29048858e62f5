//! Configuration management for transeval.toml

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::gate::{validate_threshold, DEFAULT_THRESHOLD};

/// File name searched for in the current directory and its parents
pub const CONFIG_FILE_NAME: &str = "transeval.toml";

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub provider: ProviderConfig,
    #[serde(default)]
    pub evaluation: EvaluationConfig,
    #[serde(default)]
    pub glossary: GlossaryConfig,

    /// Directory of the loaded config file; relative paths resolve against it
    #[serde(skip)]
    root: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProviderConfig {
    /// Base URL of an OpenAI-compatible API
    #[serde(default = "default_base_url")]
    pub base_url: String,
    /// Model used for translations
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    /// Per-request timeout
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Environment variable holding the API key
    #[serde(default = "default_api_key_env")]
    pub api_key_env: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EvaluationConfig {
    /// Minimum score (percent) for the gate to pass
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Optional dataset file; the built-in cases are used when unset
    #[serde(default)]
    pub dataset: Option<PathBuf>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct GlossaryConfig {
    #[serde(default = "default_glossary_path")]
    pub path: PathBuf,
}

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_temperature() -> f32 {
    0.3
}

fn default_timeout_secs() -> u64 {
    60
}

fn default_api_key_env() -> String {
    "OPENAI_API_KEY".to_string()
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_glossary_path() -> PathBuf {
    PathBuf::from("glossary.json")
}

impl Default for ProviderConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            timeout_secs: default_timeout_secs(),
            api_key_env: default_api_key_env(),
        }
    }
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            threshold: default_threshold(),
            dataset: None,
        }
    }
}

impl Default for GlossaryConfig {
    fn default() -> Self {
        Self {
            path: default_glossary_path(),
        }
    }
}

impl Config {
    /// Load the nearest transeval.toml, or defaults when there is none.
    ///
    /// A file that exists but cannot be read or parsed is an error, never
    /// silently replaced by defaults.
    pub fn discover() -> Result<Self> {
        Self::discover_from(&std::env::current_dir()?)
    }

    /// Like [`Config::discover`], searching upward from `start`
    pub fn discover_from(start: &Path) -> Result<Self> {
        match Self::find_config_path_from(start) {
            Some(path) => Self::load_from(path),
            None => {
                tracing::debug!("No {} found, using defaults", CONFIG_FILE_NAME);
                Ok(Self::default_minimal())
            }
        }
    }

    /// Defaults used when no transeval.toml exists
    pub fn default_minimal() -> Self {
        Self {
            provider: ProviderConfig::default(),
            evaluation: EvaluationConfig::default(),
            glossary: GlossaryConfig::default(),
            root: None,
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let mut config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        if let Err(e) = validate_threshold(config.evaluation.threshold) {
            anyhow::bail!("Invalid {}: {}", path.display(), e);
        }
        config.root = path.parent().map(Path::to_path_buf);

        tracing::debug!(path = %path.display(), "Loaded configuration");
        Ok(config)
    }

    /// Find transeval.toml by searching `start` and its parents
    pub fn find_config_path_from(start: &Path) -> Option<PathBuf> {
        let mut current = start.to_path_buf();

        for _ in 0..10 {
            let candidate = current.join(CONFIG_FILE_NAME);
            if candidate.exists() {
                return Some(candidate);
            }
            if !current.pop() {
                break;
            }
        }

        None
    }

    /// Resolve a configured path against the config file's directory
    pub fn resolve_path(&self, path: &Path) -> PathBuf {
        match &self.root {
            Some(root) if path.is_relative() => root.join(path),
            _ => path.to_path_buf(),
        }
    }

    /// Glossary file location
    pub fn glossary_path(&self) -> PathBuf {
        self.resolve_path(&self.glossary.path)
    }

    /// Dataset file location, if one is configured
    pub fn dataset_path(&self) -> Option<PathBuf> {
        self.evaluation
            .dataset
            .as_deref()
            .map(|p| self.resolve_path(p))
    }

    /// Read the API key from the configured environment variable
    pub fn api_key(&self) -> Option<String> {
        std::env::var(&self.provider.api_key_env)
            .ok()
            .filter(|key| !key.trim().is_empty())
    }
}

/// Commented template written by `transeval init`
pub const DEFAULT_CONFIG_TEMPLATE: &str = r#"# transeval configuration

[provider]
# Any OpenAI-compatible endpoint works (OpenAI, Azure, vLLM, Ollama)
base_url = "https://api.openai.com/v1"
model = "gpt-4o-mini"
temperature = 0.3
timeout_secs = 60

# Environment variable holding the API key
api_key_env = "OPENAI_API_KEY"

[evaluation]
# Minimum exact-match score (percent) required to pass
threshold = 50.0

# Optional dataset of [[cases]] tables; built-in cases are used when unset
# dataset = "translations.toml"

[glossary]
# JSON map of source term -> { language code -> target term }
path = "glossary.json"
"#;
