//! Email delivery
//!
//! The DeliveryAction is the only side-effecting step of a run. It sends one
//! HTML email from a fixed sender to a fixed recipient through an
//! EmailTransport and turns every transport error into a failed
//! DeliveryResult; nothing raised below this boundary reaches the pipeline.

mod dry_run;
mod sendgrid;

pub use dry_run::DryRunTransport;
pub use sendgrid::{SENDGRID_API_URL, SendGridConfig, SendGridTransport};

use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;

use crate::domain::DeliveryResult;
use crate::error::Result;
use crate::tools::{Tool, required_str};

/// Errors raised by an email transport
#[derive(Debug, Error)]
pub enum TransportError {
    #[error("Missing API key: environment variable {env_var} not set")]
    MissingApiKey { env_var: String },

    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("API error {status}: {message}")]
    Rejected { status: u16, message: String },
}

/// One fully-formed outbound email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutboundEmail {
    pub from: String,
    pub to: String,
    pub subject: String,
    pub html_body: String,
}

/// What the transport reports back on acceptance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransportReceipt {
    pub status_code: u16,
    pub message_id: Option<String>,
}

/// Something that can hand an email to a delivery service
#[async_trait]
pub trait EmailTransport: Send + Sync {
    /// Short name for logs ("sendgrid", "dry-run")
    fn name(&self) -> &str;

    /// Whether the transport has the credentials it needs
    fn is_configured(&self) -> bool;

    /// Transmit exactly one email; no retries
    async fn send(
        &self,
        email: &OutboundEmail,
    ) -> std::result::Result<TransportReceipt, TransportError>;
}

/// Sends the formatted email to the configured prospect
pub struct DeliveryAction {
    from: String,
    to: String,
    transport: Arc<dyn EmailTransport>,
}

impl DeliveryAction {
    pub const TOOL_NAME: &'static str = "send_html_email";

    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        transport: Arc<dyn EmailTransport>,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            transport,
        }
    }

    pub fn from_address(&self) -> &str {
        &self.from
    }

    pub fn to_address(&self) -> &str {
        &self.to
    }

    /// Send one HTML email; never returns an error
    pub async fn send(&self, subject: &str, html_body: &str) -> DeliveryResult {
        let email = OutboundEmail {
            from: self.from.clone(),
            to: self.to.clone(),
            subject: subject.to_string(),
            html_body: html_body.to_string(),
        };

        log::info!("Sending email via {} to {}", self.transport.name(), self.to);
        match self.transport.send(&email).await {
            Ok(receipt) => {
                let mut detail =
                    format!("Email sent successfully. Status code: {}", receipt.status_code);
                if let Some(id) = &receipt.message_id {
                    detail.push_str(&format!(" (message id: {})", id));
                }
                log::info!("{}", detail);
                DeliveryResult::success(detail)
            }
            Err(e) => {
                log::error!("Delivery via {} failed: {}", self.transport.name(), e);
                DeliveryResult::failure(format!("Failed to send email: {}", e))
            }
        }
    }
}

#[async_trait]
impl Tool for DeliveryAction {
    fn name(&self) -> &str {
        Self::TOOL_NAME
    }

    fn description(&self) -> &str {
        "Send out an HTML email with the given subject and body to all sales prospects"
    }

    fn input_schema(&self) -> Value {
        json!({
            "type": "object",
            "properties": {
                "subject": { "type": "string", "description": "Email subject line" },
                "html_body": { "type": "string", "description": "HTML email body" }
            },
            "required": ["subject", "html_body"]
        })
    }

    async fn invoke(&self, input: Value) -> Result<Value> {
        let subject = required_str(&input, "subject", Self::TOOL_NAME)?;
        let html_body = required_str(&input, "html_body", Self::TOOL_NAME)?;
        let result = self.send(subject, html_body).await;
        Ok(serde_json::to_value(result)?)
    }
}

impl std::fmt::Debug for DeliveryAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeliveryAction")
            .field("from", &self.from)
            .field("to", &self.to)
            .field("transport", &self.transport.name())
            .finish()
    }
}
