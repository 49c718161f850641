//! Tool calling and function definition types

use serde::{Deserialize, Serialize};

/// A tool call emitted by the model.
///
/// `input` is the stringified JSON arguments exactly as the provider sent them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: String,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input: input.into(),
        }
    }

    /// Parse the arguments as JSON.
    pub fn input_json(&self) -> Result<serde_json::Value, crate::error::LlmError> {
        Ok(serde_json::from_str(&self.input)?)
    }
}

/// Tool definition for function calling
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ToolDefinition {
    /// Function name
    pub name: String,
    /// Function description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// JSON schema for function parameters
    pub parameters: serde_json::Value,
}

impl ToolDefinition {
    /// Create a new function tool
    pub fn function(
        name: impl Into<String>,
        description: impl Into<String>,
        parameters: serde_json::Value,
    ) -> Self {
        Self {
            name: name.into(),
            description: Some(description.into()),
            parameters,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tool_call_input_parses_as_json() {
        let call = ToolCall::new("call_1", "weather", r#"{"city":"Paris"}"#);
        let v = call.input_json().unwrap();
        assert_eq!(v["city"], "Paris");
    }

    #[test]
    fn tool_call_invalid_input_is_json_error() {
        let call = ToolCall::new("call_1", "weather", "{not json");
        assert!(matches!(
            call.input_json(),
            Err(crate::error::LlmError::JsonError(_))
        ));
    }
}
