//! Tool system for agent composition
//!
//! Every draft agent, formatting agent and the delivery action is exposed as a
//! Tool: a name, a description, a JSON input schema and an async `invoke`.
//! Managers dispatch tools by name through a ToolRegistry.

mod registry;

pub use registry::ToolRegistry;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{OutreachError, Result};

/// A tool that a manager agent can call
#[async_trait]
pub trait Tool: Send + Sync {
    /// Tool name (what managers dispatch on)
    fn name(&self) -> &str;

    /// Human-readable description
    fn description(&self) -> &str;

    /// JSON Schema for input parameters
    fn input_schema(&self) -> Value;

    /// Execute the tool
    async fn invoke(&self, input: Value) -> Result<Value>;
}

/// Tool definition as shown to a model or a human
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolDefinition {
    pub name: String,
    pub description: String,
    pub input_schema: Value,
}

/// A request to run one tool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    pub id: String,
    pub name: String,
    pub input: Value,
}

impl ToolCall {
    pub fn new(id: impl Into<String>, name: impl Into<String>, input: Value) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            input,
        }
    }
}

/// Schema for tools that take a single text field
pub fn text_input_schema(field: &str, description: &str) -> Value {
    serde_json::json!({
        "type": "object",
        "properties": {
            field: {
                "type": "string",
                "description": description
            }
        },
        "required": [field]
    })
}

/// Pull a required string field out of a tool input
pub fn required_str<'a>(input: &'a Value, field: &str, tool: &str) -> Result<&'a str> {
    input
        .get(field)
        .and_then(Value::as_str)
        .ok_or_else(|| {
            OutreachError::Tool(format!("Tool '{}' missing required field: {}", tool, field))
        })
}
