//! Result types of a full pipeline run

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::email::{DeliveryResult, EmailDraft, FormattedEmail, RecipientBrief};
use super::trace::CallTrace;
use crate::error::OutreachError;

/// What the email manager produced from the selected draft
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dispatch {
    pub email: EmailDraft,
    pub rationale: String,
    pub formatted: FormattedEmail,
    pub delivery: DeliveryResult,
}

/// Everything a completed run returns to the caller (read-only)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PipelineResult {
    pub run_id: String,
    pub brief: RecipientBrief,
    /// Drafts that were successfully generated, in drafter order
    pub drafts: Vec<EmailDraft>,
    pub selected: EmailDraft,
    pub rationale: String,
    pub formatted: FormattedEmail,
    pub delivery: DeliveryResult,
    pub trace: CallTrace,
}

impl PipelineResult {
    /// True when the email actually went out
    pub fn is_delivered(&self) -> bool {
        self.delivery.is_success()
    }
}

/// A run that stopped before delivery, with the trace recorded so far
#[derive(Debug, Error)]
#[error("{error}")]
pub struct RunFailure {
    pub run_id: String,
    #[source]
    pub error: OutreachError,
    pub trace: CallTrace,
}

impl RunFailure {
    pub fn new(run_id: impl Into<String>, error: OutreachError, trace: CallTrace) -> Self {
        Self {
            run_id: run_id.into(),
            error,
            trace,
        }
    }

    /// Short stage label of the underlying error
    pub fn stage(&self) -> &'static str {
        self.error.stage()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::DraftStyle;

    #[test]
    fn test_run_failure_display_and_stage() {
        let failure = RunFailure::new(
            "1-abcd",
            OutreachError::Selection("no drafts available".to_string()),
            CallTrace::new(),
        );
        assert_eq!(failure.to_string(), "Selection failed: no drafts available");
        assert_eq!(failure.stage(), "selection");
        assert!(std::error::Error::source(&failure).is_some());
    }

    #[test]
    fn test_pipeline_result_is_delivered() {
        let draft = EmailDraft::new(DraftStyle::Concise, "Short and sweet");
        let mut result = PipelineResult {
            run_id: "1-abcd".to_string(),
            brief: RecipientBrief::new("Dear CEO").unwrap(),
            drafts: vec![draft.clone()],
            selected: draft,
            rationale: "only one".to_string(),
            formatted: FormattedEmail::default(),
            delivery: DeliveryResult::success("Status code: 202"),
            trace: CallTrace::new(),
        };
        assert!(result.is_delivered());

        result.delivery = DeliveryResult::failure("Failed to send email: nope");
        assert!(!result.is_delivered());

        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["brief"], "Dear CEO");
        assert_eq!(json["selected"]["author_style"], "concise");
    }
}
