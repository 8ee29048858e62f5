//! Translation tool

use anyhow::Result;
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{debug, instrument, warn};

use transeval_core::Translator;

use crate::tools::{Tool, ToolResult};

/// Split `"<language> | <text>"` on the first `|`
pub fn parse_input(input: &str) -> Option<(&str, &str)> {
    let (language, text) = input.split_once('|')?;
    let (language, text) = (language.trim(), text.trim());

    if language.is_empty() || text.is_empty() {
        return None;
    }
    Some((language, text))
}

/// Tool that translates text with the configured translator
pub struct TranslateTool {
    translator: Arc<dyn Translator>,
}

impl TranslateTool {
    pub fn new(translator: Arc<dyn Translator>) -> Self {
        Self { translator }
    }
}

#[async_trait]
impl Tool for TranslateTool {
    fn name(&self) -> &str {
        "translate"
    }

    fn description(&self) -> &str {
        "Translates text. Input format: '<language> | <text>' e.g. 'Russian | Hello'."
    }

    #[instrument(skip(self, input))]
    async fn execute(&self, input: &str) -> Result<ToolResult> {
        let Some((language, text)) = parse_input(input) else {
            return Ok(ToolResult::error(format!(
                "Invalid format. Use '<language> | <text>'. Got: {}",
                input
            )));
        };

        debug!(language, "Translate tool called");

        match self.translator.translate(text, language).await {
            Ok(translated) => Ok(ToolResult::success(translated)),
            Err(e) if e.is_fatal() => Err(e.into()),
            Err(e) => {
                warn!("Translation error: {}", e);
                Ok(ToolResult::error(format!("Translation failed: {}", e)))
            }
        }
    }
}
