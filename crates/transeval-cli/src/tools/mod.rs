//! Named tools exposed to the command line
//!
//! Tools take a single free-form input string, matching the
//! `"<language> | <text>"` convention used by the translate tool.

pub mod builtin;
pub mod registry;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;

/// Result of tool execution
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,
    /// Output from the tool
    pub output: String,
    /// Error message if failed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// Create a successful result
    pub fn success(output: impl Into<String>) -> Self {
        Self {
            success: true,
            output: output.into(),
            error: None,
        }
    }

    /// Create a failed result
    pub fn error(error: impl Into<String>) -> Self {
        Self {
            success: false,
            output: String::new(),
            error: Some(error.into()),
        }
    }
}

/// The Tool trait that all tools must implement
#[async_trait]
pub trait Tool: Send + Sync {
    /// Get the tool name
    fn name(&self) -> &str;

    /// Get a description of what the tool does
    fn description(&self) -> &str;

    /// Execute the tool.
    ///
    /// Recoverable problems (bad input, a failed request) come back as a
    /// failed `ToolResult`; `Err` is reserved for conditions the caller must
    /// stop on.
    async fn execute(&self, input: &str) -> Result<ToolResult>;
}
