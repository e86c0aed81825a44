//! Public SDK surface for Mnemos.
//!
//! This crate re-exports the building blocks and wires a configured memory
//! store, embedder and tool registry together for the `mnemos` binary.

pub mod cli;
pub mod setup;

/// Re-export for convenience.
pub use mnemos_rs_config as config;
/// Re-export for convenience.
pub use mnemos_rs_memory as memory;
/// Re-export for convenience.
pub use mnemos_rs_tools as tools;

pub use cli::{Cli, Command};
pub use setup::{MemoryHandle, load_config, open_memory};
