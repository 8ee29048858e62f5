//! Translation error classes

use thiserror::Error;

/// Why a translation attempt failed.
///
/// `Unavailable` means no translation can succeed in this run (missing
/// credentials, rejected key, unreachable endpoint); callers abort on it.
/// `Failed` affects a single request and is recoverable.
#[derive(Error, Debug)]
pub enum TranslateError {
    #[error("translator unavailable: {0}")]
    Unavailable(String),
    #[error("translation failed: {0}")]
    Failed(String),
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl TranslateError {
    /// True when the whole run should stop rather than record a miss
    pub fn is_fatal(&self) -> bool {
        matches!(self, TranslateError::Unavailable(_))
    }
}
