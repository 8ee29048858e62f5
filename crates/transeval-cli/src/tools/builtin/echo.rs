//! Echo tool, useful for checking tool dispatch without a translator

use anyhow::Result;
use async_trait::async_trait;

use crate::tools::{Tool, ToolResult};

pub struct EchoTool;

#[async_trait]
impl Tool for EchoTool {
    fn name(&self) -> &str {
        "echo"
    }

    fn description(&self) -> &str {
        "Echoes input text back to the user."
    }

    async fn execute(&self, input: &str) -> Result<ToolResult> {
        tracing::debug!("Echo tool called with: {}", input);
        Ok(ToolResult::success(format!("Echo: {}", input)))
    }
}
