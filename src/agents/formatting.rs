//! Formatting agents - subject line and HTML body for the selected draft

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use super::{Agent, html};
use crate::error::{OutreachError, Result};
use crate::tools::{Tool, required_str, text_input_schema};

/// Writes a subject line likely to get a response
#[derive(Debug, Clone)]
pub struct SubjectWriter {
    agent: Agent,
}

impl SubjectWriter {
    pub const TOOL_NAME: &'static str = "subject_writer";

    pub fn new(agent: Agent) -> Self {
        Self { agent }
    }

    /// Produce a single-line subject for the body; an empty subject passes through
    pub async fn run(&self, body: &str) -> Result<String> {
        let raw = self
            .agent
            .run(body)
            .await
            .map_err(|e| OutreachError::formatting(Self::TOOL_NAME, e))?;
        Ok(clean_subject(&raw))
    }
}

/// First non-empty line, without a "Subject:" label or surrounding quotes
fn clean_subject(raw: &str) -> String {
    let line = raw
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .unwrap_or_default();
    let line = line
        .strip_prefix("Subject:")
        .or_else(|| line.strip_prefix("subject:"))
        .or_else(|| line.strip_prefix("SUBJECT:"))
        .unwrap_or(line)
        .trim();
    line.trim_matches(|c: char| c == '"' || c == '\'' || c == '*')
        .trim()
        .to_string()
}

#[async_trait]
impl Tool for SubjectWriter {
    fn name(&self) -> &str {
        Self::TOOL_NAME
    }

    fn description(&self) -> &str {
        "Write a subject for a cold sales email"
    }

    fn input_schema(&self) -> Value {
        text_input_schema("input", "Plain-text email body")
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        let body = required_str(&input, "input", Self::TOOL_NAME)?;
        let subject = self.run(body).await?;
        Ok(json!({ "subject": subject }))
    }
}

/// How the HTML body is produced
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum HtmlMode {
    /// Ask the model, fall back to local rendering if it returns no markup
    #[default]
    Llm,
    /// Render locally without an LLM call
    Local,
}

/// Converts a text body (possibly with Markdown) into an HTML body
#[derive(Debug, Clone)]
pub struct HtmlConverter {
    agent: Option<Agent>,
}

impl HtmlConverter {
    pub const TOOL_NAME: &'static str = "html_converter";

    /// Model-backed converter
    pub fn llm(agent: Agent) -> Self {
        Self { agent: Some(agent) }
    }

    /// Deterministic local converter
    pub fn local() -> Self {
        Self { agent: None }
    }

    pub fn mode(&self) -> HtmlMode {
        match self.agent {
            Some(_) => HtmlMode::Llm,
            None => HtmlMode::Local,
        }
    }

    pub async fn run(&self, body: &str) -> Result<String> {
        let Some(agent) = &self.agent else {
            return Ok(html::render_markdown(body));
        };

        let raw = agent
            .run(body)
            .await
            .map_err(|e| OutreachError::formatting(Self::TOOL_NAME, e))?;
        let answer = html::strip_code_fence(&raw);

        if html::looks_like_html(answer) {
            Ok(answer.to_string())
        } else {
            log::warn!("{} returned no HTML markup, rendering locally", agent.name());
            Ok(html::render_markdown(body))
        }
    }
}

#[async_trait]
impl Tool for HtmlConverter {
    fn name(&self) -> &str {
        Self::TOOL_NAME
    }

    fn description(&self) -> &str {
        "Convert a text email body to an HTML email body"
    }

    fn input_schema(&self) -> Value {
        text_input_schema("input", "Plain-text email body, may contain Markdown")
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        let body = required_str(&input, "input", Self::TOOL_NAME)?;
        let html_body = self.run(body).await?;
        Ok(json!({ "html_body": html_body }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmError, MockLlmClient};
    use std::sync::Arc;

    fn agent(reply: &str) -> (Agent, Arc<MockLlmClient>) {
        let llm = Arc::new(MockLlmClient::fixed(reply));
        (Agent::new("Email subject writer", "write a subject", llm.clone()), llm)
    }

    #[test]
    fn test_clean_subject() {
        assert_eq!(clean_subject("Subject: \"SOC 2 in 30 days\""), "SOC 2 in 30 days");
        assert_eq!(clean_subject("\n\n  Quick question  \nsecond line"), "Quick question");
        assert_eq!(clean_subject("**Compliance, minus the pain**"), "Compliance, minus the pain");
        assert_eq!(clean_subject(""), "");
    }

    #[tokio::test]
    async fn test_subject_writer_sends_body() {
        let (agent, llm) = agent("Subject: Your SOC 2 audit, sorted");
        let writer = SubjectWriter::new(agent);

        let subject = writer.run("Dear CEO, ...").await.unwrap();
        assert_eq!(subject, "Your SOC 2 audit, sorted");
        assert_eq!(llm.requests()[0].last_user_message(), Some("Dear CEO, ..."));
    }

    #[tokio::test]
    async fn test_subject_writer_empty_passes_through() {
        let (agent, _) = agent("   ");
        let output = SubjectWriter::new(agent).invoke(json!({"input": "body"})).await.unwrap();
        assert_eq!(output, json!({"subject": ""}));
    }

    #[tokio::test]
    async fn test_subject_writer_error_is_formatting() {
        let llm = Arc::new(MockLlmClient::new(|_| {
            Err(LlmError::InvalidResponse("timeout".to_string()))
        }));
        let writer = SubjectWriter::new(Agent::new("w", "i", llm));

        let err = writer.run("body").await.unwrap_err();
        assert!(matches!(
            err,
            OutreachError::Formatting { ref step, .. } if step == "subject_writer"
        ));
    }

    #[tokio::test]
    async fn test_html_converter_keeps_model_html() {
        let (agent, _) = agent("```html\n<p>Dear CEO</p>\n```");
        let converter = HtmlConverter::llm(agent);
        assert_eq!(converter.mode(), HtmlMode::Llm);

        let html = converter.run("Dear CEO").await.unwrap();
        assert_eq!(html, "<p>Dear CEO</p>");
    }

    #[tokio::test]
    async fn test_html_converter_drops_preamble_around_fence() {
        let (agent, _) = agent("Here is the HTML:\n```html\n<p>Dear CEO,</p>\n```\nEnjoy!");
        let converter = HtmlConverter::llm(agent);

        let html = converter.run("Dear CEO,").await.unwrap();
        assert_eq!(html, "<p>Dear CEO,</p>");
    }

    #[tokio::test]
    async fn test_html_converter_falls_back_without_markup() {
        let (agent, llm) = agent("Sorry, I can only reply in plain text.");
        let converter = HtmlConverter::llm(agent);

        let html = converter.run("Hi **there**").await.unwrap();
        assert_eq!(html, "<p>Hi <strong>there</strong></p>");
        assert_eq!(llm.call_count(), 1);
    }

    #[tokio::test]
    async fn test_html_converter_local_mode_is_idempotent() {
        let converter = HtmlConverter::local();
        assert_eq!(converter.mode(), HtmlMode::Local);

        let first = converter.invoke(json!({"input": "- a\n- b"})).await.unwrap();
        let second = converter.invoke(json!({"input": "- a\n- b"})).await.unwrap();
        assert_eq!(first, second);
        assert_eq!(first["html_body"], "<ul><li>a</li><li>b</li></ul>");
    }

    #[test]
    fn test_html_mode_serde() {
        let mode: HtmlMode = serde_yaml::from_str("local").unwrap();
        assert_eq!(mode, HtmlMode::Local);
        assert_eq!(HtmlMode::default(), HtmlMode::Llm);
    }
}
