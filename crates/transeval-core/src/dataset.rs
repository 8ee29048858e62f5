//! Evaluation test cases

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A fixed (source, target language, expected translation) triple
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TestCase {
    #[serde(rename = "source")]
    pub source_text: String,
    #[serde(rename = "language")]
    pub target_language: String,
    #[serde(rename = "expected")]
    pub expected_translation: String,
}

impl TestCase {
    pub fn new(
        source_text: impl Into<String>,
        target_language: impl Into<String>,
        expected_translation: impl Into<String>,
    ) -> Self {
        Self {
            source_text: source_text.into(),
            target_language: target_language.into(),
            expected_translation: expected_translation.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct DatasetFile {
    #[serde(default)]
    cases: Vec<TestCase>,
}

/// The built-in evaluation set
pub fn default_cases() -> Vec<TestCase> {
    vec![
        TestCase::new("cloud payroll", "es", "nube nómina"),
        TestCase::new("Workday payroll", "de", "Workday Lohnabrechnung"),
    ]
}

/// Load cases from a TOML file of `[[cases]]` tables
pub fn load_cases(path: impl AsRef<Path>) -> Result<Vec<TestCase>> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read dataset {}", path.display()))?;

    parse_cases(&content).with_context(|| format!("Failed to parse dataset {}", path.display()))
}

pub fn parse_cases(content: &str) -> Result<Vec<TestCase>> {
    let file: DatasetFile = toml::from_str(content)?;
    Ok(file.cases)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_cases() {
        let cases = default_cases();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0].source_text, "cloud payroll");
        assert_eq!(cases[0].target_language, "es");
        assert_eq!(cases[0].expected_translation, "nube nómina");
        assert_eq!(cases[1].expected_translation, "Workday Lohnabrechnung");
    }

    #[test]
    fn test_parse_cases() {
        let toml = r#"
[[cases]]
source = "Good morning!"
language = "Russian"
expected = "Доброе утро!"

[[cases]]
source = "payroll"
language = "fr"
expected = "paie"
"#;

        let cases = parse_cases(toml).unwrap();
        assert_eq!(cases.len(), 2);
        assert_eq!(cases[0], TestCase::new("Good morning!", "Russian", "Доброе утро!"));
        assert_eq!(cases[1].target_language, "fr");
    }

    #[test]
    fn test_parse_empty_dataset() {
        assert!(parse_cases("").unwrap().is_empty());
    }

    #[test]
    fn test_missing_field_is_error() {
        let toml = "[[cases]]\nsource = \"x\"\nlanguage = \"es\"\n";
        assert!(parse_cases(toml).is_err());
    }

    #[test]
    fn test_load_cases_from_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("cases.toml");
        std::fs::write(&path, "[[cases]]\nsource = \"a\"\nlanguage = \"es\"\nexpected = \"b\"\n").unwrap();

        assert_eq!(load_cases(&path).unwrap(), vec![TestCase::new("a", "es", "b")]);
        assert!(load_cases(dir.path().join("missing.toml")).is_err());
    }
}
