//! Pipeline entry point
//!
//! A `Pipeline` is built once from configuration and can run any number of
//! briefs; runs share only read-only state. Each run gets a fresh run id and
//! call trace and executes inside the "Automated Sales Outreach" span.

use std::sync::Arc;
use std::time::Duration;

use tracing::Instrument;

use crate::agents::{
    Agent, DraftAgent, EmailManager, HtmlConverter, HtmlMode, JudgeSelector, PreferenceSelector,
    SalesManager, SelectionPolicy, SubjectWriter,
};
use crate::config::{Config, LlmConfig, LlmProvider, SelectionPolicyKind};
use crate::delivery::{
    DeliveryAction, DryRunTransport, EmailTransport, SendGridConfig, SendGridTransport,
};
use crate::domain::{CallTrace, DraftStyle, PipelineResult, RecipientBrief, RunFailure};
use crate::error::{OutreachError, Result};
use crate::id::generate_run_id;
use crate::llm::{
    AnthropicClient, AnthropicConfig, LlmClient, OpenAiClient, OpenAiConfig, Usage,
};
use crate::prompt::{PromptContext, PromptRenderer, templates};
use crate::tools::ToolRegistry;

/// The assembled outreach pipeline
pub struct Pipeline {
    sales_manager: SalesManager,
    llm: Arc<dyn LlmClient>,
}

impl Pipeline {
    /// `llm` is the client shared by every agent in `sales_manager`
    pub fn new(sales_manager: SalesManager, llm: Arc<dyn LlmClient>) -> Self {
        Self { sales_manager, llm }
    }

    /// Build from configuration with real provider clients.
    ///
    /// With `dry_run` the email is logged instead of sent.
    pub fn from_config(config: &Config, dry_run: bool) -> Result<Self> {
        let llm = build_llm_client(&config.llm)?;
        let transport: Arc<dyn EmailTransport> = if dry_run {
            Arc::new(DryRunTransport)
        } else {
            Arc::new(build_sendgrid_transport(config)?)
        };
        Self::from_parts(config, llm, transport)
    }

    /// Build from configuration with the given LLM client and transport
    pub fn from_parts(
        config: &Config,
        llm: Arc<dyn LlmClient>,
        transport: Arc<dyn EmailTransport>,
    ) -> Result<Self> {
        let renderer = PromptRenderer::with_builtin_templates()?;
        let company = &config.company;
        let max_tokens = config.llm.max_tokens;
        let instructions = |template: &str| {
            renderer.render_named(
                template,
                &PromptContext {
                    company: &company.name,
                    pitch: &company.pitch,
                    directive: None,
                },
            )
        };

        let mut drafters = ToolRegistry::new();
        for style in DraftStyle::ALL {
            let agent = DraftAgent::for_company(
                style,
                &renderer,
                &company.name,
                &company.pitch,
                llm.clone(),
            )?
            .with_max_tokens(max_tokens);
            drafters.add_tool(Arc::new(agent));
        }

        let subject_instructions = instructions(templates::SUBJECT_WRITER)?;
        let subject_writer = SubjectWriter::new(
            Agent::new("Email subject writer", subject_instructions, llm.clone())
                .with_max_tokens(max_tokens),
        );
        let html_converter = match config.formatting.html_mode {
            HtmlMode::Llm => {
                let html_instructions = instructions(templates::HTML_CONVERTER)?;
                HtmlConverter::llm(
                    Agent::new("HTML email body converter", html_instructions, llm.clone())
                        .with_max_tokens(max_tokens),
                )
            }
            HtmlMode::Local => HtmlConverter::local(),
        };
        let delivery = DeliveryAction::new(&config.email.from, &config.email.to, transport);

        let policy: Arc<dyn SelectionPolicy> = match config.selection.policy {
            SelectionPolicyKind::Judge => Arc::new(JudgeSelector::new(
                Agent::new(SalesManager::NAME, instructions(templates::SALES_MANAGER)?, llm.clone())
                    .with_max_tokens(max_tokens),
            )),
            SelectionPolicyKind::Preference => {
                Arc::new(PreferenceSelector::new(config.selection.preference.clone()))
            }
        };

        let email_manager = EmailManager::new(subject_writer, html_converter, delivery);
        Ok(Self::new(SalesManager::new(drafters, policy, email_manager), llm))
    }

    pub fn sales_manager(&self) -> &SalesManager {
        &self.sales_manager
    }

    /// Tokens used by every run of this pipeline so far
    pub fn total_usage(&self) -> Usage {
        self.llm.total_usage()
    }

    /// Run the pipeline once for `brief`
    pub async fn run(&self, brief: &str) -> std::result::Result<PipelineResult, RunFailure> {
        let run_id = generate_run_id(brief);
        let brief = RecipientBrief::new(brief)
            .map_err(|e| RunFailure::new(&run_id, e, CallTrace::new()))?;

        let span = tracing::info_span!("Automated Sales Outreach", run_id = %run_id);
        self.execute(brief, run_id).instrument(span).await
    }

    async fn execute(
        &self,
        brief: RecipientBrief,
        run_id: String,
    ) -> std::result::Result<PipelineResult, RunFailure> {
        log::info!("Run {} started", run_id);
        let mut trace = CallTrace::new();

        match self.sales_manager.run(&brief, &run_id, &mut trace).await {
            Ok(outcome) => {
                let dispatch = outcome.dispatch;
                log::info!(
                    "Run {} finished: {:?} ({} trace events)",
                    run_id,
                    dispatch.delivery.status,
                    trace.len()
                );
                let usage = self.total_usage();
                log::debug!(
                    "Cumulative usage: {} input / {} output tokens",
                    usage.input_tokens,
                    usage.output_tokens
                );
                Ok(PipelineResult {
                    run_id,
                    brief,
                    drafts: outcome.drafts,
                    selected: dispatch.email,
                    rationale: dispatch.rationale,
                    formatted: dispatch.formatted,
                    delivery: dispatch.delivery,
                    trace,
                })
            }
            Err(e) => {
                log::error!("Run {} failed at {}: {}", run_id, e.stage(), e);
                Err(RunFailure::new(run_id, e, trace))
            }
        }
    }

    /// Synchronous wrapper around `run`; must not be called from inside a Tokio runtime
    pub fn run_blocking(&self, brief: &str) -> std::result::Result<PipelineResult, RunFailure> {
        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .build()
            .map_err(|e| {
                RunFailure::new(generate_run_id(brief), OutreachError::Io(e), CallTrace::new())
            })?;
        runtime.block_on(self.run(brief))
    }
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pipeline")
            .field("sales_manager", &self.sales_manager)
            .field("model", &self.llm.model())
            .finish()
    }
}

/// Build the configured provider client (reads the provider's API key from the environment)
pub fn build_llm_client(config: &LlmConfig) -> Result<Arc<dyn LlmClient>> {
    let timeout = Duration::from_millis(config.timeout_ms);
    let model = config.effective_model().to_string();

    let client: Arc<dyn LlmClient> = match config.provider {
        LlmProvider::OpenAi => Arc::new(
            OpenAiClient::new(OpenAiConfig {
                model,
                max_tokens: config.max_tokens,
                timeout,
                ..Default::default()
            })
            .map_err(|e| OutreachError::Llm(e.to_string()))?,
        ),
        LlmProvider::Anthropic => Arc::new(
            AnthropicClient::new(AnthropicConfig {
                model,
                max_tokens: config.max_tokens,
                timeout,
                ..Default::default()
            })
            .map_err(|e| OutreachError::Llm(e.to_string()))?,
        ),
    };
    Ok(client)
}

/// Build the SendGrid transport; a missing key only fails at send time
pub fn build_sendgrid_transport(config: &Config) -> Result<SendGridTransport> {
    SendGridTransport::from_env(SendGridConfig {
        api_key_env: config.email.api_key_env.clone(),
        base_url: config.email.endpoint.clone(),
        timeout: Duration::from_millis(config.email.timeout_ms),
    })
    .map_err(|e| OutreachError::Config(e.to_string()))
}
