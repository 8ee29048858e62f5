//! Terminology glossary applied to translation prompts
//!
//! The glossary file is a JSON object mapping each source term to its
//! translations keyed by language code:
//!
//! ```json
//! { "payroll": { "es": "nómina", "de": "Lohnabrechnung" } }
//! ```

use anyhow::{Context, Result};
use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use crate::language::Language;

#[derive(Debug, Clone, Default)]
pub struct Glossary {
    terms: BTreeMap<String, HashMap<String, String>>,
}

impl Glossary {
    /// Load a glossary file; a missing file yields an empty glossary
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            tracing::warn!("Glossary {} not found, translating without one", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        let glossary = Self::from_json(&content)
            .with_context(|| format!("Failed to parse {}", path.display()))?;

        tracing::debug!(terms = glossary.len(), "Loaded glossary from {}", path.display());
        Ok(glossary)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        let raw: BTreeMap<String, HashMap<String, String>> = serde_json::from_str(content)?;

        // Language keys are matched by lowercase code
        let terms = raw
            .into_iter()
            .map(|(source, targets)| {
                let targets = targets
                    .into_iter()
                    .map(|(lang, target)| (lang.to_lowercase(), target))
                    .collect();
                (source, targets)
            })
            .collect();

        Ok(Self { terms })
    }

    /// Source/target pairs defined for a language, sorted by source term
    pub fn terms_for(&self, language: &Language) -> Vec<(&str, &str)> {
        self.terms
            .iter()
            .filter_map(|(source, targets)| {
                targets
                    .get(&language.code)
                    .filter(|t| !t.is_empty())
                    .map(|t| (source.as_str(), t.as_str()))
            })
            .collect()
    }

    /// Prompt suffix instructing the model to use the glossary terms
    pub fn prompt_context(&self, language: &Language) -> String {
        let terms = self.terms_for(language);
        if terms.is_empty() {
            return String::new();
        }

        let pairs = terms
            .iter()
            .map(|(source, target)| format!("{} -> {}", source, target))
            .collect::<Vec<_>>()
            .join(", ");

        format!("\nUse these glossary terms exactly: {}", pairs)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}
