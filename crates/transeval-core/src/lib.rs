//! transeval-core: translation scoring and quality gating
//!
//! Provides:
//! - Configuration loading (transeval.toml)
//! - OpenAI-compatible chat client
//! - Glossary-aware LLM translator behind the `Translator` trait
//! - Exact-match scorer and threshold gate

pub mod config;
pub mod dataset;
pub mod error;
pub mod gate;
pub mod glossary;
pub mod language;
pub mod openai;
pub mod scorer;
pub mod translator;

pub use config::Config;
pub use dataset::{default_cases, load_cases, TestCase};
pub use error::TranslateError;
pub use gate::{exit_code, validate_threshold, Gate, ThresholdDecision, DEFAULT_THRESHOLD};
pub use glossary::Glossary;
pub use language::Language;
pub use openai::{ChatClient, ChatMessage, ChatOptions, Role};
pub use scorer::{is_match, normalize, CaseResult, EvaluationReport, Scorer};
pub use translator::{LlmTranslator, Translator, UnconfiguredTranslator};
