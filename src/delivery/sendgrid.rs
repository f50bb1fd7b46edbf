//! SendGrid v3 mail send transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::{EmailTransport, OutboundEmail, TransportError, TransportReceipt};

/// SendGrid API base URL
pub const SENDGRID_API_URL: &str = "https://api.sendgrid.com";

/// Configuration for the SendGrid transport
#[derive(Debug, Clone)]
pub struct SendGridConfig {
    /// Name of the environment variable the key was read from (for errors)
    pub api_key_env: String,
    pub base_url: String,
    pub timeout: Duration,
}

impl Default for SendGridConfig {
    fn default() -> Self {
        Self {
            api_key_env: "SENDGRID_API_KEY".to_string(),
            base_url: SENDGRID_API_URL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }
}

#[derive(Serialize)]
struct MailSendRequest<'a> {
    personalizations: [Personalization<'a>; 1],
    from: Address<'a>,
    subject: &'a str,
    content: [Content<'a>; 1],
}

#[derive(Serialize)]
struct Personalization<'a> {
    to: [Address<'a>; 1],
}

#[derive(Serialize)]
struct Address<'a> {
    email: &'a str,
}

#[derive(Serialize)]
struct Content<'a> {
    #[serde(rename = "type")]
    content_type: &'a str,
    value: &'a str,
}

impl<'a> MailSendRequest<'a> {
    fn from_email(email: &'a OutboundEmail) -> Self {
        Self {
            personalizations: [Personalization {
                to: [Address { email: &email.to }],
            }],
            from: Address { email: &email.from },
            subject: &email.subject,
            content: [Content {
                content_type: "text/html",
                value: &email.html_body,
            }],
        }
    }
}

/// Sends mail through the SendGrid HTTP API
pub struct SendGridTransport {
    client: Client,
    api_key: Option<String>,
    config: SendGridConfig,
}

impl SendGridTransport {
    /// Create a transport reading the key from `config.api_key_env`.
    ///
    /// A missing key is not an error here: it surfaces as a failed delivery
    /// when `send` is called.
    pub fn from_env(config: SendGridConfig) -> Result<Self, TransportError> {
        let api_key = std::env::var(&config.api_key_env).ok().filter(|k| !k.trim().is_empty());
        Self::with_api_key(api_key, config)
    }

    /// Create a transport with an explicit (possibly absent) key
    pub fn with_api_key(
        api_key: Option<String>,
        config: SendGridConfig,
    ) -> Result<Self, TransportError> {
        let client = Client::builder().timeout(config.timeout).build()?;
        Ok(Self {
            client,
            api_key,
            config,
        })
    }
}

#[async_trait]
impl EmailTransport for SendGridTransport {
    fn name(&self) -> &str {
        "sendgrid"
    }

    fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    async fn send(&self, email: &OutboundEmail) -> Result<TransportReceipt, TransportError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| TransportError::MissingApiKey {
            env_var: self.config.api_key_env.clone(),
        })?;

        let url = format!("{}/v3/mail/send", self.config.base_url.trim_end_matches('/'));
        log::debug!("POST {} ({} bytes of html)", url, email.html_body.len());

        let response = self
            .client
            .post(url)
            .bearer_auth(api_key)
            .json(&MailSendRequest::from_email(email))
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(TransportError::Rejected {
                status: status.as_u16(),
                message,
            });
        }

        let message_id = response
            .headers()
            .get("x-message-id")
            .and_then(|h| h.to_str().ok())
            .map(str::to_string);

        Ok(TransportReceipt {
            status_code: status.as_u16(),
            message_id,
        })
    }
}

impl std::fmt::Debug for SendGridTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SendGridTransport")
            .field("base_url", &self.config.base_url)
            .field("configured", &self.api_key.is_some())
            .finish()
    }
}
