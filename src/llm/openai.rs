//! OpenAI Chat Completions client implementation

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde_json::{Value, json};

use crate::llm::client::{LlmClient, LlmError, retry_after};
use crate::llm::types::{CompletionRequest, CompletionResponse, Role, StopReason, Usage};

/// OpenAI API base URL
pub const OPENAI_API_URL: &str = "https://api.openai.com";

/// Default model to use
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Default max tokens
const DEFAULT_MAX_TOKENS: u32 = 2048;

/// Environment variable holding the API key
pub const API_KEY_ENV: &str = "OPENAI_API_KEY";

/// Configuration for the OpenAI client
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub max_tokens: u32,
    pub timeout: Duration,
    pub base_url: String,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            max_tokens: DEFAULT_MAX_TOKENS,
            timeout: Duration::from_secs(120),
            base_url: OPENAI_API_URL.to_string(),
        }
    }
}

/// OpenAI API client
pub struct OpenAiClient {
    client: Client,
    api_key: String,
    config: OpenAiConfig,
    usage: Arc<Mutex<Usage>>,
}

impl OpenAiClient {
    /// Create a new OpenAI client
    ///
    /// Reads OPENAI_API_KEY from environment
    pub fn new(config: OpenAiConfig) -> Result<Self, LlmError> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| LlmError::MissingApiKey {
            env_var: API_KEY_ENV.to_string(),
        })?;

        Self::with_api_key(api_key, config)
    }

    /// Create a client with an explicit API key
    pub fn with_api_key(api_key: String, config: OpenAiConfig) -> Result<Self, LlmError> {
        let client = Client::builder().timeout(config.timeout).build()?;

        Ok(Self {
            client,
            api_key,
            config,
            usage: Arc::new(Mutex::new(Usage::default())),
        })
    }

    /// Build the request body; the system prompt becomes the first message
    fn build_request(&self, request: &CompletionRequest) -> Value {
        let model = request
            .model
            .as_ref()
            .unwrap_or(&self.config.model)
            .clone();
        let max_tokens = request.max_tokens.unwrap_or(self.config.max_tokens);

        let mut messages = Vec::with_capacity(request.messages.len() + 1);
        if !request.system.is_empty() {
            messages.push(json!({ "role": "system", "content": request.system }));
        }
        messages.extend(request.messages.iter().map(|m| {
            json!({
                "role": match m.role {
                    Role::User => "user",
                    Role::Assistant => "assistant",
                },
                "content": m.content
            })
        }));

        json!({
            "model": model,
            "max_tokens": max_tokens,
            "messages": messages
        })
    }

    fn parse_response(&self, body: Value) -> Result<CompletionResponse, LlmError> {
        let choice = body["choices"]
            .get(0)
            .ok_or_else(|| LlmError::InvalidResponse("no choices in response".to_string()))?;

        let content = choice["message"]["content"].as_str().unwrap_or_default().to_string();
        let stop_reason = choice["finish_reason"]
            .as_str()
            .map(StopReason::parse)
            .unwrap_or_default();

        let usage = Usage::new(
            body["usage"]["prompt_tokens"].as_u64().unwrap_or(0),
            body["usage"]["completion_tokens"].as_u64().unwrap_or(0),
        );

        self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(&usage);

        Ok(CompletionResponse {
            content,
            stop_reason,
            usage,
        })
    }

    async fn send_request(&self, body: Value) -> Result<Value, LlmError> {
        let url = format!("{}/v1/chat/completions", self.config.base_url.trim_end_matches('/'));
        let response = self
            .client
            .post(url)
            .bearer_auth(&self.api_key)
            .json(&body)
            .send()
            .await?;

        let status = response.status();

        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited {
                retry_after: retry_after(response.headers()),
            });
        }

        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(LlmError::ApiError {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl LlmClient for OpenAiClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let body = self.build_request(&request);
        let response = self.send_request(body).await?;
        self.parse_response(response)
    }

    fn model(&self) -> &str {
        &self.config.model
    }

    fn is_ready(&self) -> bool {
        !self.api_key.is_empty()
    }

    fn total_usage(&self) -> Usage {
        self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for OpenAiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OpenAiClient")
            .field("model", &self.config.model)
            .field("max_tokens", &self.config.max_tokens)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{bearer_token, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn client_for(base_url: &str) -> OpenAiClient {
        let config = OpenAiConfig {
            base_url: base_url.to_string(),
            ..Default::default()
        };
        OpenAiClient::with_api_key("sk-test".to_string(), config).unwrap()
    }

    #[test]
    fn test_build_request_puts_system_first() {
        let client = client_for(OPENAI_API_URL);
        let request =
            CompletionRequest::new("You are a busy sales agent").with_user_message("Dear CEO");

        let body = client.build_request(&request);

        assert_eq!(body["model"], DEFAULT_MODEL);
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "You are a busy sales agent");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["messages"][1]["content"], "Dear CEO");
    }

    #[test]
    fn test_parse_response() {
        let client = client_for(OPENAI_API_URL);
        let response = client
            .parse_response(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Hi there" },
                    "finish_reason": "length"
                }],
                "usage": { "prompt_tokens": 12, "completion_tokens": 3 }
            }))
            .unwrap();

        assert_eq!(response.content, "Hi there");
        assert_eq!(response.stop_reason, StopReason::MaxTokens);
        assert_eq!(response.usage.total(), 15);
        assert_eq!(client.total_usage().total(), 15);
    }

    #[test]
    fn test_parse_response_without_choices() {
        let client = client_for(OPENAI_API_URL);
        let result = client.parse_response(json!({ "choices": [] }));
        assert!(matches!(result, Err(LlmError::InvalidResponse(_))));
    }

    #[tokio::test]
    async fn test_complete_against_mock_server() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .and(bearer_token("sk-test"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({
                "choices": [{
                    "message": { "role": "assistant", "content": "Subject: SOC 2 made simple" },
                    "finish_reason": "stop"
                }],
                "usage": { "prompt_tokens": 5, "completion_tokens": 6 }
            })))
            .expect(1)
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let response = client
            .complete(CompletionRequest::new("sys").with_user_message("body"))
            .await
            .unwrap();

        assert_eq!(response.content, "Subject: SOC 2 made simple");
    }

    #[tokio::test]
    async fn test_complete_rate_limited() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(429).insert_header("retry-after", "7"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = client
            .complete(CompletionRequest::new("sys").with_user_message("body"))
            .await
            .unwrap_err();

        match err {
            LlmError::RateLimited { retry_after } => {
                assert_eq!(retry_after, Duration::from_secs(7))
            }
            other => panic!("Expected rate limit, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_complete_api_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/v1/chat/completions"))
            .respond_with(ResponseTemplate::new(401).set_body_string("invalid key"))
            .mount(&server)
            .await;

        let client = client_for(&server.uri());
        let err = client
            .complete(CompletionRequest::new("sys").with_user_message("body"))
            .await
            .unwrap_err();

        assert!(matches!(err, LlmError::ApiError { status: 401, .. }));
        assert!(err.to_string().contains("invalid key"));
    }
}
