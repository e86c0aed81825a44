//! Built-in tools bundled with Mnemos.

mod memory;
mod utils;

use crate::ToolRegistry;
use log::info;
use std::sync::Arc;

pub use memory::{
    DEFAULT_RELATION, MemoryConnectTool, MemoryGraphTool, MemoryListTool, MemoryRecallTool,
    MemoryStoreTool,
};

/// Register all built-in tools with the provided registry.
pub fn register_builtin_tools(registry: &ToolRegistry) {
    registry.register(Arc::new(MemoryStoreTool));
    registry.register(Arc::new(MemoryRecallTool));
    registry.register(Arc::new(MemoryConnectTool));
    registry.register(Arc::new(MemoryGraphTool));
    registry.register(Arc::new(MemoryListTool));
    info!("registered built-in tools");
}

/// Build a registry pre-populated with built-in tools.
pub fn builtin_tool_registry() -> ToolRegistry {
    let registry = ToolRegistry::new();
    register_builtin_tools(&registry);
    registry
}
