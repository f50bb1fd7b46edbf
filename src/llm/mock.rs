//! Scripted LLM client for tests and offline runs

use std::sync::{Mutex, PoisonError};

use async_trait::async_trait;

use super::client::{LlmClient, LlmError};
use super::types::{CompletionRequest, CompletionResponse, Usage};

type Responder = dyn Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync;

/// LLM client that answers with a caller-supplied function and records every request
pub struct MockLlmClient {
    responder: Box<Responder>,
    requests: Mutex<Vec<CompletionRequest>>,
    per_call: Usage,
    usage: Mutex<Usage>,
}

impl MockLlmClient {
    /// Create a client that answers each request with `responder`
    pub fn new<F>(responder: F) -> Self
    where
        F: Fn(&CompletionRequest) -> Result<String, LlmError> + Send + Sync + 'static,
    {
        Self {
            responder: Box::new(responder),
            requests: Mutex::new(Vec::new()),
            per_call: Usage::default(),
            usage: Mutex::new(Usage::default()),
        }
    }

    /// Client that always returns the same text
    pub fn fixed(text: impl Into<String>) -> Self {
        let text = text.into();
        Self::new(move |_| Ok(text.clone()))
    }

    /// Report `usage` on every successful completion
    pub fn with_usage(mut self, usage: Usage) -> Self {
        self.per_call = usage;
        self
    }

    /// All requests received so far, in order
    pub fn requests(&self) -> Vec<CompletionRequest> {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Number of requests received so far
    pub fn call_count(&self) -> usize {
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn complete(&self, request: CompletionRequest) -> Result<CompletionResponse, LlmError> {
        let result = (self.responder)(&request);
        self.requests
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(request);

        let mut response = CompletionResponse::text(result?);
        response.usage = self.per_call.clone();
        self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .add(&response.usage);
        Ok(response)
    }

    fn model(&self) -> &str {
        "mock-model"
    }

    fn is_ready(&self) -> bool {
        true
    }

    fn total_usage(&self) -> Usage {
        self.usage
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl std::fmt::Debug for MockLlmClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MockLlmClient")
            .field("calls", &self.call_count())
            .finish()
    }
}
