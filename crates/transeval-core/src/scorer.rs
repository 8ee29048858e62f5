//! Exact-match translation scoring
//!
//! The "BLEU score" reported here is an approximation: the percentage of
//! cases whose translation equals the expected text after case folding and
//! whitespace normalization. No n-gram overlap is computed, and existing
//! thresholds are calibrated to this exact-match behavior.

use serde::Serialize;

use crate::dataset::TestCase;
use crate::error::TranslateError;
use crate::translator::Translator;

/// Lowercase and collapse whitespace runs to single spaces
pub fn normalize(text: &str) -> String {
    text.split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}

/// Case-insensitive, whitespace-normalized equality
pub fn is_match(actual: &str, expected: &str) -> bool {
    normalize(actual) == normalize(expected)
}

/// Outcome of a single test case
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CaseResult {
    #[serde(flatten)]
    pub case: TestCase,
    pub actual_translation: String,
    pub is_match: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl CaseResult {
    pub fn translated(case: TestCase, actual_translation: String) -> Self {
        let is_match = is_match(&actual_translation, &case.expected_translation);
        Self {
            case,
            actual_translation,
            is_match,
            error: None,
        }
    }

    /// A case whose translation call failed; never a match
    pub fn failed(case: TestCase, error: impl Into<String>) -> Self {
        Self {
            case,
            actual_translation: String::new(),
            is_match: false,
            error: Some(error.into()),
        }
    }
}

/// Aggregate result of one evaluation run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationReport {
    pub results: Vec<CaseResult>,
    /// Percentage of matched cases, 0.0 when there are no cases
    pub score: f64,
    pub total: usize,
    pub matched: usize,
}

impl EvaluationReport {
    pub fn from_results(results: Vec<CaseResult>) -> Self {
        let total = results.len();
        let matched = results.iter().filter(|r| r.is_match).count();
        let score = if total == 0 {
            0.0
        } else {
            100.0 * matched as f64 / total as f64
        };

        Self {
            results,
            score,
            total,
            matched,
        }
    }

    /// Cases whose translation call failed
    pub fn errors(&self) -> impl Iterator<Item = &CaseResult> {
        self.results.iter().filter(|r| r.error.is_some())
    }
}

/// Runs a fixed set of cases against a translator
#[derive(Debug, Clone)]
pub struct Scorer {
    cases: Vec<TestCase>,
}

impl Scorer {
    pub fn new(cases: Vec<TestCase>) -> Self {
        Self { cases }
    }

    /// Translate every case in order and build the report.
    ///
    /// A failed call is recorded as a miss and the remaining cases still
    /// run. Only an `Unavailable` error aborts, and then no report exists.
    pub async fn run(&self, translator: &dyn Translator) -> Result<EvaluationReport, TranslateError> {
        let mut results = Vec::with_capacity(self.cases.len());

        for case in &self.cases {
            let result = match translator
                .translate(&case.source_text, &case.target_language)
                .await
            {
                Ok(actual) => CaseResult::translated(case.clone(), actual),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => CaseResult::failed(case.clone(), e.to_string()),
            };
            results.push(result);
        }

        Ok(EvaluationReport::from_results(results))
    }

    /// `run` followed by per-case and summary log lines
    pub async fn run_logged(&self, translator: &dyn Translator) -> Result<EvaluationReport, TranslateError> {
        tracing::info!("Running evaluation on {} test cases", self.cases.len());
        let report = self.run(translator).await?;
        log_report(&report);
        Ok(report)
    }
}

pub fn log_report(report: &EvaluationReport) {
    for (i, result) in report.results.iter().enumerate() {
        match &result.error {
            Some(error) => tracing::warn!(
                case = i + 1,
                source = %result.case.source_text,
                expected = %result.case.expected_translation,
                actual = %result.actual_translation,
                matched = result.is_match,
                error = %error,
                "Translation failed"
            ),
            None => tracing::info!(
                case = i + 1,
                source = %result.case.source_text,
                expected = %result.case.expected_translation,
                actual = %result.actual_translation,
                matched = result.is_match,
                "Test case evaluated"
            ),
        }
    }

    if report.total == 0 {
        tracing::warn!("No evaluation results found");
    }

    tracing::info!(
        "Calculated BLEU score: {:.1}% ({}/{} exact matches)",
        report.score,
        report.matched,
        report.total
    );
}
