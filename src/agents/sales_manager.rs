//! Sales Manager - drafts concurrently, selects one, hands off once

use std::sync::Arc;

use futures::future::join_all;
use serde_json::json;

use super::{EmailManager, SelectionPolicy};
use crate::domain::{
    CallTrace, Dispatch, EmailDraft, RecipientBrief, SelectedEmail, TraceKind, TraceStep,
};
use crate::error::{OutreachError, Result};
use crate::id::generate_call_id;
use crate::tools::{ToolCall, ToolRegistry};

/// What the sales manager produced for one brief
#[derive(Debug, Clone)]
pub struct SalesOutcome {
    /// Successful drafts in drafter order
    pub drafts: Vec<EmailDraft>,
    pub dispatch: Dispatch,
}

/// Top-level orchestrator of one outreach run
pub struct SalesManager {
    drafters: ToolRegistry,
    policy: Arc<dyn SelectionPolicy>,
    email_manager: EmailManager,
}

impl SalesManager {
    pub const NAME: &'static str = "Sales Manager";

    /// `drafters` must hold the draft agent tools in drafter order
    pub fn new(
        drafters: ToolRegistry,
        policy: Arc<dyn SelectionPolicy>,
        email_manager: EmailManager,
    ) -> Self {
        Self {
            drafters,
            policy,
            email_manager,
        }
    }

    pub fn drafters(&self) -> &ToolRegistry {
        &self.drafters
    }

    pub fn email_manager(&self) -> &EmailManager {
        &self.email_manager
    }

    pub fn policy_name(&self) -> &str {
        self.policy.name()
    }

    /// Run all drafters, pick one draft and hand it to the email manager
    pub async fn run(
        &self,
        brief: &RecipientBrief,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> Result<SalesOutcome> {
        let drafts = self.collect_drafts(brief, run_id, trace).await;
        if drafts.is_empty() {
            return Err(OutreachError::Selection(format!(
                "no drafts available: all {} draft agents failed",
                self.drafters.tool_names().len()
            )));
        }

        let selected = self.select(brief, &drafts, trace).await?;
        let dispatch = self.handoff(selected, run_id, trace).await?;

        Ok(SalesOutcome { drafts, dispatch })
    }

    async fn collect_drafts(
        &self,
        brief: &RecipientBrief,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> Vec<EmailDraft> {
        let calls: Vec<ToolCall> = self
            .drafters
            .tool_names()
            .into_iter()
            .enumerate()
            .map(|(i, name)| {
                let id = generate_call_id(run_id, trace.len() + i);
                ToolCall::new(id, name, json!({ "input": brief }))
            })
            .collect();

        log::info!("Requesting {} drafts concurrently", calls.len());
        let results = join_all(calls.iter().map(|call| self.drafters.invoke_traced(call))).await;

        let mut drafts = Vec::with_capacity(results.len());
        for (call, (step, result)) in calls.iter().zip(results) {
            trace.record(step);
            let draft = result
                .and_then(|v| serde_json::from_value::<EmailDraft>(v).map_err(OutreachError::from));
            match draft {
                Ok(draft) => drafts.push(draft),
                Err(e) => log::warn!("Draft tool {} failed, skipping: {}", call.name, e),
            }
        }
        drafts
    }

    async fn select(
        &self,
        brief: &RecipientBrief,
        drafts: &[EmailDraft],
        trace: &mut CallTrace,
    ) -> Result<SelectedEmail> {
        let styles: Vec<_> = drafts.iter().map(|d| d.author_style).collect();
        let input = json!({ "candidates": styles });
        let step = TraceStep::begin(TraceKind::Selection, self.policy.name(), input);

        let selection = match self.policy.select(brief, drafts, trace).await {
            Ok(s) if s.index < drafts.len() => s,
            Ok(s) => {
                let err = OutreachError::Selection(format!(
                    "policy {} chose index {} of {} drafts",
                    self.policy.name(),
                    s.index,
                    drafts.len()
                ));
                trace.record(step.finish(false, json!({ "error": err.to_string() })));
                return Err(err);
            }
            Err(e) => {
                trace.record(step.finish(false, json!({ "error": e.to_string() })));
                return Err(e);
            }
        };

        let draft = drafts[selection.index].clone();
        trace.record(step.finish(
            true,
            json!({
                "index": selection.index,
                "style": draft.author_style,
                "rationale": selection.rationale,
            }),
        ));

        Ok(SelectedEmail::new(draft, selection.rationale))
    }

    /// Transfer control to the email manager; consumes the selection
    async fn handoff(
        &self,
        selected: SelectedEmail,
        run_id: &str,
        trace: &mut CallTrace,
    ) -> Result<Dispatch> {
        let style = selected.draft().author_style;
        log::info!(
            "Handing off {} draft to {}: {}",
            style,
            EmailManager::NAME,
            selected.rationale()
        );
        let step = TraceStep::begin(
            TraceKind::Handoff,
            EmailManager::NAME,
            json!({ "style": style, "body": selected.body() }),
        );
        trace.record(step.finish(true, json!({ "from": Self::NAME })));

        self.email_manager.run(selected, run_id, trace).await
    }
}

impl std::fmt::Debug for SalesManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SalesManager")
            .field("drafters", &self.drafters.tool_names())
            .field("policy", &self.policy.name())
            .field("email_manager", &self.email_manager)
            .finish()
    }
}
