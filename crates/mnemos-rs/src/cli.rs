//! Command-line surface for the `mnemos` binary.

use clap::{Parser, Subcommand};
use serde_json::{Map, Value, json};
use std::path::PathBuf;

/// Command-line options for the memory graph client.
#[derive(Debug, Parser)]
#[command(name = "mnemos", version, about = "Persistent vector memory graph")]
pub struct Cli {
    /// Optional path to a mnemos.json5 config file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
    /// Override the storage directory
    #[arg(long, global = true)]
    pub memory_path: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Store a piece of text
    Store {
        text: String,
        /// Categorization tag (repeatable)
        #[arg(long = "tag")]
        tags: Vec<String>,
        /// Extra metadata as a JSON object
        #[arg(long, value_parser = parse_json_object)]
        metadata: Option<Value>,
    },
    /// Find memories similar to a query
    Recall {
        query: String,
        #[arg(long)]
        top_k: Option<usize>,
    },
    /// Connect two memories
    Connect {
        from_id: String,
        to_id: String,
        #[arg(long = "relation")]
        relation_type: Option<String>,
    },
    /// Show the subgraph reachable from a memory
    Graph {
        root_id: String,
        #[arg(long)]
        max_depth: Option<usize>,
    },
    /// List memories, newest first
    List {
        #[arg(long)]
        limit: Option<usize>,
        #[arg(long, default_value_t = 0)]
        offset: usize,
    },
    /// Print the available tool specs
    Tools,
}

impl Command {
    /// Translate the subcommand into a tool name and its JSON arguments.
    ///
    /// Returns `None` for commands that do not dispatch a tool.
    pub fn tool_call(self) -> Option<(&'static str, Value)> {
        let call = match self {
            Self::Store {
                text,
                tags,
                metadata,
            } => {
                let mut args = Map::new();
                args.insert("text".to_string(), json!(text));
                if !tags.is_empty() {
                    args.insert("tags".to_string(), json!(tags));
                }
                if let Some(metadata) = metadata {
                    args.insert("metadata".to_string(), metadata);
                }
                ("memory_store", Value::Object(args))
            }
            Self::Recall { query, top_k } => (
                "memory_recall",
                with_optional(json!({ "query": query }), "top_k", top_k),
            ),
            Self::Connect {
                from_id,
                to_id,
                relation_type,
            } => (
                "memory_connect",
                with_optional(
                    json!({ "from_id": from_id, "to_id": to_id }),
                    "relation_type",
                    relation_type,
                ),
            ),
            Self::Graph { root_id, max_depth } => (
                "memory_graph",
                with_optional(json!({ "root_id": root_id }), "max_depth", max_depth),
            ),
            Self::List { limit, offset } => (
                "memory_list",
                with_optional(json!({ "offset": offset }), "limit", limit),
            ),
            Self::Tools => return None,
        };
        Some(call)
    }
}

fn with_optional<T: Into<Value>>(mut args: Value, key: &str, value: Option<T>) -> Value {
    if let (Some(value), Some(map)) = (value, args.as_object_mut()) {
        map.insert(key.to_string(), value.into());
    }
    args
}

fn parse_json_object(raw: &str) -> Result<Value, String> {
    let value: Value = serde_json::from_str(raw).map_err(|err| err.to_string())?;
    if value.is_object() {
        Ok(value)
    } else {
        Err("expected a JSON object".to_string())
    }
}
