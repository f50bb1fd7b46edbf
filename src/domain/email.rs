//! Email value types
//!
//! Everything here lives for one pipeline run: a brief comes in, three drafts
//! are written, one is selected, formatted and delivered.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::{OutreachError, Result};

/// Free-text description of the target recipient (role, company, need)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecipientBrief(String);

impl RecipientBrief {
    /// Create a brief, rejecting empty or whitespace-only text
    pub fn new(text: impl AsRef<str>) -> Result<Self> {
        let trimmed = text.as_ref().trim();
        if trimmed.is_empty() {
            return Err(OutreachError::EmptyBrief);
        }
        Ok(Self(trimmed.to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for RecipientBrief {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Writing style of a draft agent
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DraftStyle {
    /// Professional, serious cold emails
    Professional,
    /// Humorous, engaging cold emails
    Witty,
    /// Concise, to the point cold emails
    Concise,
}

impl DraftStyle {
    /// All styles in drafter order
    pub const ALL: [DraftStyle; 3] = [
        DraftStyle::Professional,
        DraftStyle::Witty,
        DraftStyle::Concise,
    ];

    /// Agent display name
    pub fn agent_name(&self) -> &'static str {
        match self {
            DraftStyle::Professional => "Professional Sales Agent",
            DraftStyle::Witty => "Engaging Sales Agent",
            DraftStyle::Concise => "Busy Sales Agent",
        }
    }

    /// Tool name the sales manager dispatches on
    pub fn tool_name(&self) -> &'static str {
        match self {
            DraftStyle::Professional => "sales_agent1",
            DraftStyle::Witty => "sales_agent2",
            DraftStyle::Concise => "sales_agent3",
        }
    }

    /// Tool description
    pub fn tool_description(&self) -> &'static str {
        match self {
            DraftStyle::Professional => {
                "A sales agent that writes professional, serious cold emails"
            }
            DraftStyle::Witty => "A sales agent that writes witty, engaging cold emails",
            DraftStyle::Concise => "A sales agent that writes concise, to the point cold emails",
        }
    }

    /// Persona line appended to the company preamble
    pub fn directive(&self) -> &'static str {
        match self {
            DraftStyle::Professional => {
                "You write professional, serious cold emails to potential customers."
            }
            DraftStyle::Witty => {
                "You are humorous and engaging. \
                 You write witty, engaging cold emails that are likely to get responses."
            }
            DraftStyle::Concise => "You are busy. You write concise, to the point cold emails.",
        }
    }
}

impl fmt::Display for DraftStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DraftStyle::Professional => "professional",
            DraftStyle::Witty => "witty",
            DraftStyle::Concise => "concise",
        };
        f.write_str(s)
    }
}

/// Candidate email body written by one draft agent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub author_style: DraftStyle,
    pub body: String,
}

impl EmailDraft {
    pub fn new(author_style: DraftStyle, body: impl Into<String>) -> Self {
        Self {
            author_style,
            body: body.into(),
        }
    }
}

/// The single draft chosen for delivery.
///
/// Not `Clone`: the hand-off takes it by value, so a run hands off at most
/// once.
#[derive(Debug, PartialEq, Eq)]
pub struct SelectedEmail {
    draft: EmailDraft,
    rationale: String,
}

impl SelectedEmail {
    pub fn new(draft: EmailDraft, rationale: impl Into<String>) -> Self {
        Self {
            draft,
            rationale: rationale.into(),
        }
    }

    pub fn draft(&self) -> &EmailDraft {
        &self.draft
    }

    pub fn body(&self) -> &str {
        &self.draft.body
    }

    pub fn rationale(&self) -> &str {
        &self.rationale
    }

    /// Give up the selection, returning its parts
    pub fn into_parts(self) -> (EmailDraft, String) {
        (self.draft, self.rationale)
    }
}

/// Subject line and HTML body derived from the selected draft
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormattedEmail {
    pub subject: String,
    pub html_body: String,
}

/// Outcome of the delivery action
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeliveryStatus {
    Success,
    Failure,
}

/// Terminal result of one send attempt; never retried automatically
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeliveryResult {
    pub status: DeliveryStatus,
    pub detail: String,
}

impl DeliveryResult {
    pub fn success(detail: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Success,
            detail: detail.into(),
        }
    }

    pub fn failure(detail: impl Into<String>) -> Self {
        Self {
            status: DeliveryStatus::Failure,
            detail: detail.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.status == DeliveryStatus::Success
    }
}
