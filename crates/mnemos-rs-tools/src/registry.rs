//! Registry for tool implementations.

use crate::context::ToolContext;
use crate::error::ToolError;
use crate::tool::{Tool, ToolSpec};
use log::{debug, info};
use parking_lot::RwLock;
use serde_json::Value;
use std::collections::BTreeMap;
use std::sync::Arc;

/// In-memory registry for tool implementations.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    /// Map of tool name to implementation.
    tools: Arc<RwLock<BTreeMap<String, Arc<dyn Tool>>>>,
}

impl ToolRegistry {
    /// Create an empty tool registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool by name.
    pub fn register(&self, tool: Arc<dyn Tool>) {
        debug!("registering tool (name={})", tool.name());
        self.tools.write().insert(tool.name().to_string(), tool);
    }

    /// Fetch a tool by name.
    pub fn get(&self, name: &str) -> Option<Arc<dyn Tool>> {
        self.tools.read().get(name).cloned()
    }

    /// List all registered tool names, sorted.
    pub fn list(&self) -> Vec<String> {
        self.tools.read().keys().cloned().collect()
    }

    /// Return tool specs for all registered tools.
    pub fn specs(&self) -> Vec<ToolSpec> {
        self.tools.read().values().map(|tool| tool.spec()).collect()
    }

    /// Look up a tool by name and invoke it.
    pub async fn call(
        &self,
        name: &str,
        ctx: &ToolContext,
        args: Value,
    ) -> Result<Value, ToolError> {
        let tool = self
            .get(name)
            .ok_or_else(|| ToolError::ToolNotFound(name.to_string()))?;
        if tool.mutates() {
            info!("dispatching mutating tool (name={name})");
        } else {
            debug!("dispatching tool (name={name})");
        }
        tool.call(ctx, args).await
    }
}

#[cfg(test)]
mod tests {
    use super::ToolRegistry;
    use crate::{Tool, ToolContext, ToolError};
    use async_trait::async_trait;
    use mnemos_rs_test_utils::{LookupEmbedder, open_memory};
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fmt;
    use std::sync::Arc;
    use tempfile::tempdir;

    #[derive(Clone)]
    struct DummyTool {
        name: &'static str,
    }

    impl fmt::Debug for DummyTool {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "DummyTool({})", self.name)
        }
    }

    #[async_trait]
    impl Tool for DummyTool {
        fn name(&self) -> &str {
            self.name
        }

        fn description(&self) -> &str {
            "dummy"
        }

        fn args_schema(&self) -> serde_json::Value {
            json!({})
        }

        async fn call(
            &self,
            _ctx: &ToolContext,
            args: serde_json::Value,
        ) -> Result<serde_json::Value, ToolError> {
            Ok(json!({ "echo": args }))
        }
    }

    #[test]
    fn registry_tracks_tools_and_specs() {
        let registry = ToolRegistry::new();
        registry.register(Arc::new(DummyTool { name: "write" }));
        registry.register(Arc::new(DummyTool { name: "read" }));

        assert_eq!(registry.list(), vec!["read", "write"]);
        let spec_names = registry
            .specs()
            .into_iter()
            .map(|spec| spec.name)
            .collect::<Vec<_>>();
        assert_eq!(spec_names, vec!["read", "write"]);
    }

    #[tokio::test]
    async fn call_dispatches_by_name() {
        let temp = tempdir().expect("tempdir");
        let ctx = ToolContext::new(
            open_memory(temp.path(), 4),
            Arc::new(LookupEmbedder::new(4)),
        );
        let registry = ToolRegistry::new();
        registry.register(Arc::new(DummyTool { name: "echo" }));

        let result = registry
            .call("echo", &ctx, json!({ "a": 1 }))
            .await
            .expect("call");
        assert_eq!(result, json!({ "echo": { "a": 1 } }));

        let err = registry
            .call("missing", &ctx, json!({}))
            .await
            .expect_err("missing tool");
        assert!(matches!(err, ToolError::ToolNotFound(name) if name == "missing"));
    }
}
