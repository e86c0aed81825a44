//! Utility helpers shared by built-in tools.

use crate::ToolError;
use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

/// Parse JSON args into a typed struct for tool calls.
pub(super) fn parse_args<T: DeserializeOwned>(args: Value) -> Result<T, ToolError> {
    serde_json::from_value(args).map_err(|err| ToolError::InvalidArguments(err.to_string()))
}

/// Serialize a tool result payload.
pub(super) fn to_json<T: Serialize>(value: &T) -> Result<Value, ToolError> {
    serde_json::to_value(value).map_err(|err| ToolError::ExecutionFailed(err.to_string()))
}

/// Parse a memory id argument.
pub(super) fn parse_id(field: &str, value: &str) -> Result<Uuid, ToolError> {
    Uuid::parse_str(value.trim())
        .map_err(|err| ToolError::InvalidArguments(format!("{field} is not a valid id: {err}")))
}

#[cfg(test)]
mod tests {
    use super::parse_id;
    use crate::ToolError;
    use pretty_assertions::assert_eq;
    use uuid::Uuid;

    #[test]
    fn parse_id_accepts_padded_uuid() {
        let id = Uuid::new_v4();
        assert_eq!(parse_id("root_id", &format!(" {id} ")).expect("id"), id);
    }

    #[test]
    fn parse_id_names_field_on_error() {
        let err = parse_id("from_id", "abc").expect_err("invalid");
        let ToolError::InvalidArguments(message) = err else {
            panic!("expected invalid arguments");
        };
        assert!(message.starts_with("from_id"));
    }
}
