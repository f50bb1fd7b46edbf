//! Email Manager - formats the selected draft and sends it
//!
//! Strict order: subject_writer, then html_converter, then send_html_email.
//! The send step only starts once both formatting outputs exist, so a
//! formatting failure means nothing is sent.

use std::sync::Arc;

use serde_json::{Value, json};

use super::{HtmlConverter, SubjectWriter};
use crate::delivery::DeliveryAction;
use crate::domain::{CallTrace, DeliveryResult, Dispatch, FormattedEmail, SelectedEmail};
use crate::error::{OutreachError, Result};
use crate::id::generate_call_id;
use crate::tools::{ToolCall, ToolRegistry};

/// Orchestrates formatting and delivery of one selected email
#[derive(Debug, Clone)]
pub struct EmailManager {
    tools: ToolRegistry,
}

impl EmailManager {
    pub const NAME: &'static str = "Email Manager";

    pub fn new(
        subject_writer: SubjectWriter,
        html_converter: HtmlConverter,
        delivery: DeliveryAction,
    ) -> Self {
        let tools = ToolRegistry::new()
            .with_tool(Arc::new(subject_writer))
            .with_tool(Arc::new(html_converter))
            .with_tool(Arc::new(delivery));
        Self { tools }
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }

    /// Format and send the selected email, recording each tool call in `trace`
    pub async fn run(
        &self,
        selected: SelectedEmail,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> Result<Dispatch> {
        let (email, rationale) = selected.into_parts();

        let output = self
            .call(SubjectWriter::TOOL_NAME, json!({ "input": email.body }), run_id, trace)
            .await?;
        let subject = output_str(&output, "subject", SubjectWriter::TOOL_NAME)?;

        let output = self
            .call(HtmlConverter::TOOL_NAME, json!({ "input": email.body }), run_id, trace)
            .await?;
        let html_body = output_str(&output, "html_body", HtmlConverter::TOOL_NAME)?;

        let formatted = FormattedEmail { subject, html_body };
        let delivery = self.send(&formatted, run_id, trace).await;

        Ok(Dispatch {
            email,
            rationale,
            formatted,
            delivery,
        })
    }

    async fn call(
        &self,
        tool: &str,
        input: Value,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> Result<Value> {
        let call = ToolCall::new(generate_call_id(run_id, trace.len()), tool, input);
        let (step, result) = self.tools.invoke_traced(&call).await;
        trace.record(step);
        result.map_err(|e| match e {
            OutreachError::Formatting { .. } => e,
            other => OutreachError::formatting(tool, other),
        })
    }

    async fn send(
        &self,
        formatted: &FormattedEmail,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> DeliveryResult {
        let input = json!({ "subject": formatted.subject, "html_body": formatted.html_body });
        let id = generate_call_id(run_id, trace.len());
        let call = ToolCall::new(id, DeliveryAction::TOOL_NAME, input);
        let (step, result) = self.tools.invoke_traced(&call).await;
        trace.record(step);

        match result.and_then(|v| serde_json::from_value(v).map_err(OutreachError::from)) {
            Ok(delivery) => delivery,
            Err(e) => DeliveryResult::failure(format!("Failed to send email: {}", e)),
        }
    }
}

fn output_str(output: &Value, field: &str, tool: &str) -> Result<String> {
    output
        .get(field)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| OutreachError::formatting(tool, format!("output missing '{}'", field)))
}
