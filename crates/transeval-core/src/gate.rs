//! Threshold gate turning a score into a CI pass/fail signal

use serde::Serialize;
use std::fmt;

use crate::scorer::EvaluationReport;

/// Minimum score (percent) required to pass
pub const DEFAULT_THRESHOLD: f64 = 50.0;

/// Accept a threshold only when it is a percentage in `0..=100`.
///
/// NaN is rejected as well; it would fail every comparison.
pub fn validate_threshold(threshold: f64) -> Result<f64, String> {
    if (0.0..=100.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(format!("threshold must be between 0 and 100, got {threshold}"))
    }
}

/// Process exit codes reported to CI
pub mod exit_code {
    pub const PASSED: u8 = 0;
    /// Score below threshold
    pub const BELOW_THRESHOLD: u8 = 1;
    /// Translator could not be used at all (credentials, endpoint)
    pub const UNAVAILABLE: u8 = 2;
    pub const UNEXPECTED: u8 = 3;
}

/// The gate's verdict on one report
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ThresholdDecision {
    pub score: f64,
    pub threshold: f64,
    pub passed: bool,
}

impl ThresholdDecision {
    pub fn exit_code(&self) -> u8 {
        if self.passed {
            exit_code::PASSED
        } else {
            exit_code::BELOW_THRESHOLD
        }
    }

    /// Summary line; CI tooling greps for "meets threshold" / "below threshold"
    pub fn message(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ThresholdDecision {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let verdict = if self.passed { "meets" } else { "below" };
        write!(
            f,
            "BLEU score {:.1}% {} threshold of {:.1}%",
            self.score, verdict, self.threshold
        )
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gate {
    threshold: f64,
}

impl Default for Gate {
    fn default() -> Self {
        Self::new(DEFAULT_THRESHOLD)
    }
}

impl Gate {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    /// Inclusive: a score equal to the threshold passes
    pub fn decide(&self, report: &EvaluationReport) -> ThresholdDecision {
        self.decide_score(report.score)
    }

    pub fn decide_score(&self, score: f64) -> ThresholdDecision {
        ThresholdDecision {
            score,
            threshold: self.threshold,
            passed: score >= self.threshold,
        }
    }
}
