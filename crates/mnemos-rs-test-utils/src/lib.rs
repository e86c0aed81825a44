//! Test helpers shared across Mnemos crates.

pub mod embedding;
pub mod memory;

pub use embedding::{FailingEmbedder, LookupEmbedder};
pub use memory::{StubMemory, open_memory};
