//! Tool interfaces and built-in memory tools for Mnemos.

pub mod builtins;
pub mod context;
pub mod error;
pub mod registry;
pub mod tool;

/// Built-in tool registry and registration helper.
pub use builtins::{builtin_tool_registry, register_builtin_tools};
/// Tool context and defaults.
pub use context::{ToolContext, ToolDefaults};
/// Tool error type.
pub use error::ToolError;
/// Tool registry type.
pub use registry::ToolRegistry;
/// Tool trait and spec type.
pub use tool::{Tool, ToolSpec};
