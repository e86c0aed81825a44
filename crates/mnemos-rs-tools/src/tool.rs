//! The `Tool` trait and its discovery spec.

use crate::context::ToolContext;
use crate::error::ToolError;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::fmt::Debug;

/// Name, description and argument schema of a tool, as shown to callers.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ToolSpec {
    pub name: String,
    pub description: String,
    /// JSON schema for the call arguments.
    pub args_schema: Value,
    /// Whether calling the tool changes the memory graph.
    pub mutates: bool,
}

/// A named operation over the memory graph taking and returning JSON.
#[async_trait]
pub trait Tool: Send + Sync + Debug {
    fn name(&self) -> &str;
    fn description(&self) -> &str;
    fn args_schema(&self) -> Value;

    /// Whether the tool writes to the memory graph.
    fn mutates(&self) -> bool {
        false
    }

    /// Run the tool against the context's memory and embedder.
    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            args_schema: self.args_schema(),
            mutates: self.mutates(),
        }
    }
}
