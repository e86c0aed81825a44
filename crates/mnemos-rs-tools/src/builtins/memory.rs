//! Built-in memory graph tools (store/recall/connect/graph/list).

use crate::builtins::utils::{parse_args, parse_id, to_json};
use crate::{Tool, ToolContext, ToolError};
use async_trait::async_trait;
use log::{debug, info};
use mnemos_rs_memory::Metadata;
use mnemos_rs_memory::model::{TAGS_KEY, TEXT_KEY};
use serde::Deserialize;
use serde_json::{Value, json};

/// Relation label used when a connection names none.
pub const DEFAULT_RELATION: &str = "related";

#[derive(Debug, Deserialize)]
struct StoreArgs {
    text: String,
    #[serde(default)]
    metadata: Option<Value>,
    #[serde(default)]
    tags: Option<Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct RecallArgs {
    query: String,
    #[serde(default)]
    top_k: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ConnectArgs {
    from_id: String,
    to_id: String,
    #[serde(default)]
    relation_type: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GraphArgs {
    root_id: String,
    #[serde(default)]
    max_depth: Option<usize>,
}

#[derive(Debug, Deserialize)]
struct ListArgs {
    #[serde(default)]
    limit: Option<usize>,
    #[serde(default)]
    offset: usize,
}

/// Tool for embedding and storing a piece of text.
#[derive(Debug, Default)]
pub struct MemoryStoreTool;

#[async_trait]
impl Tool for MemoryStoreTool {
    fn name(&self) -> &str {
        "memory_store"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Store text in the memory graph and return its id"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "text": { "type": "string", "description": "Text to remember" },
                "metadata": {
                    "type": "object",
                    "description": "Extra metadata; string, number or string-list values"
                },
                "tags": {
                    "type": "array",
                    "items": { "type": "string" },
                    "description": "Categorization tags"
                }
            },
            "required": ["text"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: StoreArgs = parse_args(args)?;
        if input.text.trim().is_empty() {
            return Err(ToolError::InvalidArguments(
                "text must not be empty".to_string(),
            ));
        }

        let mut metadata = Metadata::new()
            .with(TEXT_KEY, input.text.as_str())
            .with(TAGS_KEY, input.tags.unwrap_or_default());
        if let Some(extra) = input.metadata.as_ref() {
            metadata.extend(Metadata::from_json(extra)?);
        }

        let vector = ctx.embedder.embed(&input.text).await?;
        let id = ctx.memory.add_item(vector, metadata).await?;
        info!("stored memory (id={id})");
        Ok(json!({ "id": id }))
    }
}

/// Tool for semantic recall over stored memories.
#[derive(Debug, Default)]
pub struct MemoryRecallTool;

#[async_trait]
impl Tool for MemoryRecallTool {
    fn name(&self) -> &str {
        "memory_recall"
    }

    fn description(&self) -> &str {
        "Find the stored memories most similar to a query"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "query": { "type": "string", "description": "Text to search for" },
                "top_k": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of results"
                }
            },
            "required": ["query"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: RecallArgs = parse_args(args)?;
        let top_k = input.top_k.unwrap_or(ctx.defaults.recall_k);
        let vector = ctx.embedder.embed(&input.query).await?;
        let hits = ctx.memory.search(&vector, top_k).await?;
        debug!("recalled memories (top_k={top_k}, hits={})", hits.len());
        Ok(json!({ "results": to_json(&hits)? }))
    }
}

/// Tool for linking two memories with a relation label.
#[derive(Debug, Default)]
pub struct MemoryConnectTool;

#[async_trait]
impl Tool for MemoryConnectTool {
    fn name(&self) -> &str {
        "memory_connect"
    }

    fn mutates(&self) -> bool {
        true
    }

    fn description(&self) -> &str {
        "Create a directed, labeled connection between two memories"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "from_id": { "type": "string", "description": "Source memory id" },
                "to_id": { "type": "string", "description": "Target memory id" },
                "relation_type": {
                    "type": "string",
                    "description": "Relation label",
                    "default": DEFAULT_RELATION
                }
            },
            "required": ["from_id", "to_id"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: ConnectArgs = parse_args(args)?;
        let from = parse_id("from_id", &input.from_id)?;
        let to = parse_id("to_id", &input.to_id)?;
        let relation = input
            .relation_type
            .filter(|relation| !relation.is_empty())
            .unwrap_or_else(|| DEFAULT_RELATION.to_string());

        ctx.memory.add_connection(from, to, &relation).await?;
        info!("connected memories (from={from}, to={to}, relation={relation})");
        Ok(json!({
            "from_id": from,
            "to_id": to,
            "relation": relation,
        }))
    }
}

/// Tool for extracting the neighbourhood of a memory.
#[derive(Debug, Default)]
pub struct MemoryGraphTool;

#[async_trait]
impl Tool for MemoryGraphTool {
    fn name(&self) -> &str {
        "memory_graph"
    }

    fn description(&self) -> &str {
        "Return the memories reachable from a root within a depth bound"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "root_id": { "type": "string", "description": "Memory to start from" },
                "max_depth": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Maximum number of hops"
                }
            },
            "required": ["root_id"]
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: GraphArgs = parse_args(args)?;
        let root = parse_id("root_id", &input.root_id)?;
        let max_depth = input.max_depth.unwrap_or(ctx.defaults.graph_depth);
        let subgraph = ctx.memory.get_subgraph(root, max_depth).await?;
        debug!(
            "extracted subgraph (root={root}, nodes={}, edges={})",
            subgraph.nodes.len(),
            subgraph.edges.len()
        );
        to_json(&subgraph)
    }
}

/// Tool for browsing memories newest first.
#[derive(Debug, Default)]
pub struct MemoryListTool;

#[async_trait]
impl Tool for MemoryListTool {
    fn name(&self) -> &str {
        "memory_list"
    }

    fn description(&self) -> &str {
        "List stored memories, newest first"
    }

    fn args_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "limit": { "type": "integer", "minimum": 0, "description": "Page size" },
                "offset": {
                    "type": "integer",
                    "minimum": 0,
                    "description": "Number of memories to skip",
                    "default": 0
                }
            }
        })
    }

    async fn call(&self, ctx: &ToolContext, args: Value) -> Result<Value, ToolError> {
        let input: ListArgs = parse_args(args)?;
        let limit = input.limit.unwrap_or(ctx.defaults.list_limit);
        let memories = ctx.memory.get_all_memories(limit, input.offset).await?;
        Ok(json!({ "memories": to_json(&memories)? }))
    }
}
