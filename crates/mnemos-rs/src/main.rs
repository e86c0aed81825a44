//! Command-line client for the Mnemos memory graph.

use anyhow::Context;
use clap::Parser;
use log::info;
use mnemos_rs::{Cli, load_config, open_memory};
use mnemos_rs_tools::builtin_tool_registry;

/// Entry point for the `mnemos` binary.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = env_logger::builder()
        .format_timestamp_millis()
        .parse_default_env()
        .try_init();

    let cli = Cli::parse();
    info!(
        "starting mnemos (config_set={}, memory_path_set={})",
        cli.config.is_some(),
        cli.memory_path.is_some()
    );
    let registry = builtin_tool_registry();

    let Some((tool, args)) = cli.command.tool_call() else {
        println!("{}", serde_json::to_string_pretty(&registry.specs())?);
        return Ok(());
    };

    let cwd = std::env::current_dir().context("failed to resolve current working directory")?;
    let config = load_config(cli.config.as_deref(), &cwd)?;
    let handle = open_memory(&config, cli.memory_path)?;

    let result = registry.call(tool, handle.context(), args).await;
    handle.close().await?;
    let output = result.with_context(|| format!("{tool} failed"))?;
    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
