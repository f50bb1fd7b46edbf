//! Transport that logs instead of sending

use async_trait::async_trait;

use super::{EmailTransport, OutboundEmail, TransportError, TransportReceipt};

/// Accepts every email without network I/O; used by `send --dry-run`
#[derive(Debug, Default)]
pub struct DryRunTransport;

#[async_trait]
impl EmailTransport for DryRunTransport {
    fn name(&self) -> &str {
        "dry-run"
    }

    fn is_configured(&self) -> bool {
        true
    }

    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError> {
        log::info!(
            "[dry-run] would send '{}' from {} to {} ({} bytes)",
            email.subject,
            email.from,
            email.to,
            email.html_body.len()
        );
        Ok(TransportReceipt {
            status_code: 202,
            message_id: None,
        })
    }
}
