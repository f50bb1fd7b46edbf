//! Outreach - multi-agent cold sales email pipeline
//!
//! Three draft agents write competing cold emails for a recipient brief, a
//! sales manager picks one, and an email manager writes a subject, converts
//! the body to HTML and sends it through SendGrid.

pub mod agents;
pub mod config;
pub mod delivery;
pub mod domain;
pub mod error;
pub mod id;
pub mod llm;
pub mod pipeline;
pub mod prompt;
pub mod tools;

pub use error::{OutreachError, Result};
pub use pipeline::Pipeline;
