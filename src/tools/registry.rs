//! Tool registry - holds tools in registration order and dispatches calls

use std::sync::Arc;

use serde_json::{Value, json};

use super::{Tool, ToolCall, ToolDefinition};
use crate::domain::{TraceKind, TraceStep};
use crate::error::{OutreachError, Result};

/// Ordered set of tools available to one manager agent
#[derive(Clone, Default)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self { tools: Vec::new() }
    }

    /// Add a tool; a tool with the same name is replaced in place
    pub fn add_tool(&mut self, tool: Arc<dyn Tool>) {
        match self.tools.iter().position(|t| t.name() == tool.name()) {
            Some(i) => self.tools[i] = tool,
            None => self.tools.push(tool),
        }
    }

    /// Builder-style add
    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.add_tool(tool);
        self
    }

    /// Get tool definitions in registration order
    pub fn definitions(&self) -> Vec<ToolDefinition> {
        self.tools
            .iter()
            .map(|t| ToolDefinition {
                name: t.name().to_string(),
                description: t.description().to_string(),
                input_schema: t.input_schema(),
            })
            .collect()
    }

    /// Get the list of tool names in registration order
    pub fn tool_names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Execute a tool call
    pub async fn invoke(&self, call: &ToolCall) -> Result<Value> {
        let tool = self
            .tools
            .iter()
            .find(|t| t.name() == call.name)
            .ok_or_else(|| OutreachError::Tool(format!("Unknown tool: {}", call.name)))?;

        log::debug!("Invoking tool {} ({})", call.name, call.id);
        tool.invoke(call.input.clone()).await
    }

    /// Execute a tool call and produce the trace step describing it
    pub async fn invoke_traced(&self, call: &ToolCall) -> (TraceStep, Result<Value>) {
        let step = TraceStep::begin(TraceKind::Tool, &call.name, call.input.clone());
        let result = self.invoke(call).await;
        let step = match &result {
            Ok(output) => step.finish(true, output.clone()),
            Err(e) => step.finish(false, json!({ "error": e.to_string() })),
        };
        (step, result)
    }
}

impl std::fmt::Debug for ToolRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ToolRegistry")
            .field("tools", &self.tool_names())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tools::{required_str, text_input_schema};
    use async_trait::async_trait;

    struct UppercaseTool;

    #[async_trait]
    impl Tool for UppercaseTool {
        fn name(&self) -> &str {
            "uppercase"
        }

        fn description(&self) -> &str {
            "Uppercases text"
        }

        fn input_schema(&self) -> Value {
            text_input_schema("text", "Text to uppercase")
        }

        async fn invoke(&self, input: Value) -> Result<Value> {
            let text = required_str(&input, "text", self.name())?;
            Ok(json!(text.to_uppercase()))
        }
    }

    struct NamedTool(&'static str, &'static str);

    #[async_trait]
    impl Tool for NamedTool {
        fn name(&self) -> &str {
            self.0
        }

        fn description(&self) -> &str {
            self.1
        }

        fn input_schema(&self) -> Value {
            json!({"type": "object"})
        }

        async fn invoke(&self, _input: Value) -> Result<Value> {
            Ok(json!(self.1))
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ToolRegistry::new();
        assert!(registry.tool_names().is_empty());
        assert!(registry.definitions().is_empty());
    }

    #[test]
    fn test_registration_order_is_kept() {
        let registry = ToolRegistry::new()
            .with_tool(Arc::new(NamedTool("subject_writer", "a")))
            .with_tool(Arc::new(NamedTool("html_converter", "b")))
            .with_tool(Arc::new(NamedTool("send_html_email", "c")));

        assert_eq!(
            registry.tool_names(),
            vec!["subject_writer", "html_converter", "send_html_email"]
        );
    }

    #[test]
    fn test_add_tool_replaces_same_name() {
        let mut registry = ToolRegistry::new();
        registry.add_tool(Arc::new(NamedTool("dup", "first")));
        registry.add_tool(Arc::new(NamedTool("dup", "second")));

        let defs = registry.definitions();
        assert_eq!(defs.len(), 1);
        assert_eq!(defs[0].description, "second");
    }

    #[tokio::test]
    async fn test_invoke_known_tool() {
        let registry = ToolRegistry::new().with_tool(Arc::new(UppercaseTool));
        let call = ToolCall::new("call-1", "uppercase", json!({"text": "soc 2"}));

        let output = registry.invoke(&call).await.unwrap();
        assert_eq!(output, json!("SOC 2"));
    }

    #[tokio::test]
    async fn test_invoke_unknown_tool() {
        let registry = ToolRegistry::new().with_tool(Arc::new(UppercaseTool));
        let call = ToolCall::new("call-1", "nonexistent_tool", json!({}));

        let err = registry.invoke(&call).await.unwrap_err();
        assert!(err.to_string().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_invoke_traced_records_error() {
        let registry = ToolRegistry::new().with_tool(Arc::new(UppercaseTool));
        let call = ToolCall::new("call-1", "uppercase", json!({}));

        let (step, result) = registry.invoke_traced(&call).await;
        assert!(result.is_err());
        assert!(!step.ok);
        assert_eq!(step.name, "uppercase");
        assert!(step.output["error"].as_str().unwrap().contains("missing required field"));
    }
}
