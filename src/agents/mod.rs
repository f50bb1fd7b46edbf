//! Agents - LLM personas composed into the outreach pipeline
//!
//! An `Agent` is a name, rendered instructions and an LLM client. The draft,
//! formatting and selection components wrap one each and expose themselves
//! as tools; the two managers orchestrate them:
//!
//! ```text
//! SalesManager --(join_all)--> sales_agent1..3
//!      | SelectionPolicy
//!      v  handoff (exactly once)
//! EmailManager --> subject_writer --> html_converter --> send_html_email
//! ```

mod draft;
mod email_manager;
mod formatting;
pub mod html;
mod sales_manager;
mod selection;

pub use draft::DraftAgent;
pub use email_manager::EmailManager;
pub use formatting::{HtmlConverter, HtmlMode, SubjectWriter};
pub use sales_manager::{SalesManager, SalesOutcome};
pub use selection::{JudgeSelector, PreferenceSelector, Selection, SelectionPolicy};

use std::sync::Arc;

use crate::llm::{CompletionRequest, LlmClient, LlmError};

/// Default completion budget for agent calls
pub const DEFAULT_MAX_TOKENS: u32 = 1024;

/// One LLM persona: instructions plus the client that runs them
#[derive(Clone)]
pub struct Agent {
    name: String,
    instructions: String,
    llm: Arc<dyn LlmClient>,
    max_tokens: u32,
    model: Option<String>,
}

impl Agent {
    pub fn new(
        name: impl Into<String>,
        instructions: impl Into<String>,
        llm: Arc<dyn LlmClient>,
    ) -> Self {
        Self {
            name: name.into(),
            instructions: instructions.into(),
            llm,
            max_tokens: DEFAULT_MAX_TOKENS,
            model: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = max_tokens;
        self
    }

    /// Override the client's default model for this agent
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    /// Run the agent once on `input` and return the trimmed completion text
    pub async fn run(&self, input: &str) -> Result<String, LlmError> {
        let mut request = CompletionRequest::new(self.instructions.clone())
            .with_user_message(input)
            .with_max_tokens(self.max_tokens);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        log::debug!("{}: requesting completion ({} input chars)", self.name, input.len());
        let response = self.llm.complete(request).await.inspect_err(|e| {
            if e.is_rate_limit() {
                log::warn!("{}: rate limited by the provider: {}", self.name, e);
            }
        })?;
        log::debug!(
            "{}: {} input / {} output tokens",
            self.name,
            response.usage.input_tokens,
            response.usage.output_tokens
        );
        if response.stop_reason.is_truncated() {
            log::warn!("{}: completion hit the token limit ({})", self.name, self.max_tokens);
        }

        Ok(response.content.trim().to_string())
    }
}

impl std::fmt::Debug for Agent {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Agent")
            .field("name", &self.name)
            .field("model", &self.model.as_deref().unwrap_or(self.llm.model()))
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}
