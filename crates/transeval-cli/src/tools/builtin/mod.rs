//! Built-in tools

mod echo;
mod translate;

pub use echo::EchoTool;
pub use translate::TranslateTool;

use std::sync::Arc;

use transeval_core::Translator;

use super::registry::ToolRegistry;

/// Create a registry with all default tools
pub fn create_default_registry(translator: Arc<dyn Translator>) -> ToolRegistry {
    let mut registry = ToolRegistry::new();

    registry.register(EchoTool);
    registry.register(TranslateTool::new(translator));

    registry
}
