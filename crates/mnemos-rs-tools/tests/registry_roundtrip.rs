//! Built-in tools driven through the registry against a file-backed store.

use mnemos_rs_memory::{FileMemoryProvider, HashEmbedder};
use mnemos_rs_tools::{ToolContext, ToolError, builtin_tool_registry};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::tempdir;

fn context(memory: Arc<FileMemoryProvider>) -> ToolContext {
    ToolContext::new(memory, Arc::new(HashEmbedder::new(64).expect("embedder")))
}

/// Every built-in tool is registered under its public name.
#[test]
fn builtin_registry_lists_memory_tools() {
    let registry = builtin_tool_registry();
    assert_eq!(
        registry.list(),
        vec![
            "memory_connect",
            "memory_graph",
            "memory_list",
            "memory_recall",
            "memory_store",
        ]
    );
    let specs = registry.specs();
    assert!(
        specs
            .iter()
            .all(|spec| spec.args_schema["type"] == json!("object"))
    );
    let mutating = specs
        .iter()
        .filter(|spec| spec.mutates)
        .map(|spec| spec.name.as_str())
        .collect::<Vec<_>>();
    assert_eq!(mutating, vec!["memory_connect", "memory_store"]);
}

/// Memories stored through tools survive reopening the store.
#[tokio::test]
async fn stored_graph_survives_reopen() {
    let temp = tempdir().expect("tempdir");
    let registry = builtin_tool_registry();

    let memory = Arc::new(FileMemoryProvider::new(temp.path()).expect("memory"));
    let ctx = context(memory);
    let first = registry
        .call(
            "memory_store",
            &ctx,
            json!({ "text": "the borrow checker enforces aliasing rules", "tags": ["rust"] }),
        )
        .await
        .expect("store");
    let second = registry
        .call(
            "memory_store",
            &ctx,
            json!({ "text": "lifetimes describe how long references live" }),
        )
        .await
        .expect("store");
    registry
        .call(
            "memory_connect",
            &ctx,
            json!({
                "from_id": first["id"],
                "to_id": second["id"],
                "relation_type": "explains"
            }),
        )
        .await
        .expect("connect");
    drop(ctx);

    let reopened = context(Arc::new(
        FileMemoryProvider::new(temp.path()).expect("reopen"),
    ));
    let recalled = registry
        .call(
            "memory_recall",
            &reopened,
            json!({ "query": "borrow checker aliasing", "top_k": 1 }),
        )
        .await
        .expect("recall");
    assert_eq!(recalled["results"][0]["id"], first["id"]);
    assert_eq!(recalled["results"][0]["metadata"]["tags"], json!(["rust"]));

    let graph = registry
        .call(
            "memory_graph",
            &reopened,
            json!({ "root_id": first["id"], "max_depth": 3 }),
        )
        .await
        .expect("graph");
    assert_eq!(
        graph["edges"],
        json!([{ "from": first["id"], "to": second["id"], "relation": "explains" }])
    );
}

/// Unknown tools and malformed arguments are reported distinctly.
#[tokio::test]
async fn dispatch_errors_are_typed() {
    let temp = tempdir().expect("tempdir");
    let registry = builtin_tool_registry();
    let ctx = context(Arc::new(
        FileMemoryProvider::new(temp.path()).expect("memory"),
    ));

    let err = registry
        .call("memory_forget", &ctx, json!({}))
        .await
        .expect_err("unknown tool");
    assert!(matches!(err, ToolError::ToolNotFound(_)));

    let err = registry
        .call("memory_graph", &ctx, json!({ "root_id": 7 }))
        .await
        .expect_err("bad root id");
    assert!(matches!(err, ToolError::InvalidArguments(_)));

    let err = registry
        .call(
            "memory_graph",
            &ctx,
            json!({ "root_id": "5b0f6b7e-2f0c-4a51-9d55-2f2f4c1f6f10" }),
        )
        .await
        .expect_err("missing root");
    assert!(matches!(err, ToolError::ExecutionFailed(_)));
}
