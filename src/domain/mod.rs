//! Domain types for Outreach
//!
//! - email: brief, drafts, selection, formatted email, delivery result
//! - trace: ordered call trace of a run
//! - run: pipeline result and run failure

pub mod email;
pub mod run;
pub mod trace;

pub use email::{
    DeliveryResult, DeliveryStatus, DraftStyle, EmailDraft, FormattedEmail, RecipientBrief,
    SelectedEmail,
};
pub use run::{Dispatch, PipelineResult, RunFailure};
pub use trace::{CallTrace, TraceEvent, TraceKind, TraceStep};
