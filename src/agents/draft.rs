//! Draft agents - one cold email per writing style

use std::sync::Arc;

use async_trait::async_trait;
use serde_json::Value;

use super::Agent;
use crate::domain::{DraftStyle, EmailDraft, RecipientBrief};
use crate::error::{OutreachError, Result};
use crate::llm::LlmClient;
use crate::prompt::{PromptContext, PromptRenderer, templates};
use crate::tools::{Tool, required_str, text_input_schema};

/// Writes a complete cold sales email body in one fixed style
#[derive(Debug, Clone)]
pub struct DraftAgent {
    style: DraftStyle,
    agent: Agent,
}

impl DraftAgent {
    /// Create a draft agent with explicit instructions
    pub fn new(
        style: DraftStyle,
        instructions: impl Into<String>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            style,
            agent: Agent::new(style.agent_name(), instructions, llm),
        }
    }

    /// Create a draft agent whose instructions are rendered from the company profile
    pub fn for_company(
        style: DraftStyle,
        renderer: &PromptRenderer,
        company: &str,
        pitch: &str,
        llm: Arc<dyn LlmClient>,
    ) -> Result<Self> {
        let instructions = renderer.render_named(
            templates::DRAFT_AGENT,
            &PromptContext {
                company,
                pitch,
                directive: Some(style.directive()),
            },
        )?;
        Ok(Self::new(style, instructions, llm))
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.agent = self.agent.with_max_tokens(max_tokens);
        self
    }

    pub fn style(&self) -> DraftStyle {
        self.style
    }

    pub fn agent(&self) -> &Agent {
        &self.agent
    }

    /// Write one draft for the brief
    pub async fn generate(&self, brief: &RecipientBrief) -> Result<EmailDraft> {
        let body = self
            .agent
            .run(brief.as_str())
            .await
            .map_err(|e| OutreachError::generation(self.agent.name(), e))?;

        if body.is_empty() {
            return Err(OutreachError::generation(self.agent.name(), "empty completion"));
        }

        log::info!("{} wrote a {} char draft", self.agent.name(), body.len());
        Ok(EmailDraft::new(self.style, body))
    }
}

#[async_trait]
impl Tool for DraftAgent {
    fn name(&self) -> &str {
        self.style.tool_name()
    }

    fn description(&self) -> &str {
        self.style.tool_description()
    }

    fn input_schema(&self) -> Value {
        text_input_schema("input", "Description of the recipient to write the cold email for")
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        let brief = RecipientBrief::new(required_str(&input, "input", self.name())?)?;
        let draft = self.generate(&brief).await?;
        Ok(serde_json::to_value(draft)?)
    }
}
