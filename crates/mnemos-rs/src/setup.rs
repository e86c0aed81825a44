//! Config loading and store wiring shared by the binary and embedders.

use anyhow::{Context, anyhow};
use log::{debug, info, warn};
use mnemos_rs_config::{EmbeddingProviderKind, MnemosConfig};
use mnemos_rs_memory::{FileMemoryProvider, HashEmbedder, MemoryStoreOptions};
use mnemos_rs_tools::{ToolContext, ToolDefaults};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Load config from an explicit file, or from the layered search rooted at `cwd`.
pub fn load_config(path: Option<&Path>, cwd: &Path) -> anyhow::Result<MnemosConfig> {
    if let Some(path) = path {
        info!("loading config from path: {}", path.display());
        return MnemosConfig::load_from_path(path).context("failed to load config");
    }
    info!("loading layered config from cwd: {}", cwd.display());
    let layered = MnemosConfig::load_layered(cwd).context("failed to load layered config")?;
    debug!("layered config loaded (layers={})", layered.layers.len());
    Ok(layered.config)
}

/// An opened store together with the tool context that reads and writes it.
pub struct MemoryHandle {
    provider: Arc<FileMemoryProvider>,
    context: ToolContext,
}

impl MemoryHandle {
    pub fn context(&self) -> &ToolContext {
        &self.context
    }

    pub fn provider(&self) -> &FileMemoryProvider {
        &self.provider
    }

    /// Drop the tool context and write the final snapshot.
    pub async fn close(self) -> anyhow::Result<()> {
        let Self { provider, context } = self;
        drop(context);
        match Arc::try_unwrap(provider) {
            Ok(provider) => provider.close().await.context("failed to close memory store"),
            Err(shared) => {
                warn!("memory store still shared at shutdown; flushing instead");
                shared.flush().await.context("failed to flush memory store")
            }
        }
    }
}

/// Open the configured store and build the embedder and tool context.
///
/// `storage_override` replaces `memory.path` when set.
pub fn open_memory(
    config: &MnemosConfig,
    storage_override: Option<PathBuf>,
) -> anyhow::Result<MemoryHandle> {
    let root = storage_override
        .or_else(|| config.memory.storage_root())
        .ok_or_else(|| anyhow!("no storage directory configured and no home directory found"))?;
    let dimension = config.embedding.dimension;
    let options = MemoryStoreOptions {
        snapshot_file: config.memory.snapshot_file.clone(),
        dimension: config.memory.pin_dimension.then_some(dimension),
    };
    info!(
        "opening memory store (root={}, snapshot_file={}, pinned={})",
        root.display(),
        options.snapshot_file,
        options.dimension.is_some()
    );
    let provider = Arc::new(
        FileMemoryProvider::with_options(&root, options)
            .context("failed to open memory store")?,
    );

    let embedder = match config.embedding.provider {
        EmbeddingProviderKind::Hash => {
            HashEmbedder::new(dimension).context("failed to build embedder")?
        }
    };
    let context = ToolContext::new(provider.clone(), Arc::new(embedder)).with_defaults(
        ToolDefaults {
            recall_k: config.memory.recall_k,
            list_limit: config.memory.list_limit,
            graph_depth: config.memory.graph_depth,
        },
    );
    Ok(MemoryHandle { provider, context })
}

#[cfg(test)]
mod tests {
    use super::{load_config, open_memory};
    use mnemos_rs_config::MnemosConfig;
    use mnemos_rs_tools::builtin_tool_registry;
    use pretty_assertions::assert_eq;
    use serde_json::json;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn explicit_config_path_is_used() {
        let temp = tempdir().expect("tempdir");
        let path = temp.path().join("custom.json5");
        fs::write(&path, "{ memory: { recall_k: 9 } }").expect("write");
        let config = load_config(Some(&path), temp.path()).expect("config");
        assert_eq!(config.memory.recall_k, 9);
    }

    #[tokio::test]
    async fn opened_store_applies_config_and_persists_on_close() {
        let temp = tempdir().expect("tempdir");
        let mut config = MnemosConfig::builder()
            .memory_path(temp.path().to_string_lossy())
            .build();
        config.memory.snapshot_file = "graph.json".to_string();
        config.memory.pin_dimension = true;
        config.memory.list_limit = 1;
        config.embedding.dimension = 32;

        let handle = open_memory(&config, None).expect("open");
        assert_eq!(handle.context().defaults.list_limit, 1);
        assert_eq!(handle.provider().dimension().await, Some(32));

        let registry = builtin_tool_registry();
        for text in ["first note", "second note"] {
            registry
                .call("memory_store", handle.context(), json!({ "text": text }))
                .await
                .expect("store");
        }
        let listed = registry
            .call("memory_list", handle.context(), json!({}))
            .await
            .expect("list");
        assert_eq!(listed["memories"].as_array().map(Vec::len), Some(1));
        handle.close().await.expect("close");

        assert!(temp.path().join("graph.json").exists());
        let reopened = open_memory(&config, None).expect("reopen");
        assert_eq!(reopened.provider().len().await, 2);
    }

    #[test]
    fn storage_override_wins() {
        let temp = tempdir().expect("tempdir");
        let config = MnemosConfig::builder().memory_path("/nonexistent/ignored").build();
        let handle = open_memory(&config, Some(temp.path().join("override"))).expect("open");
        assert!(handle.provider().snapshot_path().starts_with(temp.path()));
    }
}
