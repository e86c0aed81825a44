//! Error types for tool dispatch.

use mnemos_rs_memory::MemoryError;

/// Errors returned by tools and the registry.
#[derive(Debug, thiserror::Error)]
pub enum ToolError {
    /// Tool name was not found in registry.
    #[error("tool not found: {0}")]
    ToolNotFound(String),
    /// Tool received invalid arguments.
    #[error("invalid arguments: {0}")]
    InvalidArguments(String),
    /// Tool execution failed.
    #[error("execution failed: {0}")]
    ExecutionFailed(String),
}

impl From<MemoryError> for ToolError {
    fn from(err: MemoryError) -> Self {
        match err {
            MemoryError::DimensionMismatch { .. }
            | MemoryError::InvalidVector(_)
            | MemoryError::InvalidMetadata(_) => {
                Self::InvalidArguments(err.to_string())
            }
            MemoryError::Unsaved {
                applied: Some(id), ..
            } => Self::ExecutionFailed(format!("{err} (memory {id} is held in memory only)")),
            _ => Self::ExecutionFailed(err.to_string()),
        }
    }
}
