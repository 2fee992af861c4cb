//! Groq generation gateway
//!
//! Adapter for the [`GenerationGateway`] port over Groq's
//! OpenAI-compatible chat-completions API. One request per call; any
//! non-2xx status is a hard failure mapped onto [`GatewayError`], never
//! a partial success.

use agora_application::ports::generation::{GatewayError, GenerationGateway, GenerationRequest};
use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

pub const DEFAULT_BASE_URL: &str = "https://api.groq.com/openai/v1";
pub const DEFAULT_MODEL: &str = "llama3-70b-8192";

/// Configuration for the Groq provider
#[derive(Debug, Clone)]
pub struct GroqConfig {
    api_key: String,
    pub base_url: String,
    pub model: String,
    pub timeout: Duration,
}

impl GroqConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            timeout: Duration::from_secs(30),
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Generation gateway backed by Groq's chat-completions endpoint
pub struct GroqGateway {
    config: GroqConfig,
    client: Client,
}

impl GroqGateway {
    pub fn new(config: GroqConfig) -> Result<Self, GatewayError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| GatewayError::ConnectionError(e.to_string()))?;
        Ok(Self { config, client })
    }

    fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.config.base_url)
    }

    fn to_chat_request(&self, request: &GenerationRequest) -> ChatRequest {
        ChatRequest {
            model: self.config.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: request.system.clone(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: request.prompt.clone(),
                },
            ],
            temperature: request.params.temperature,
            max_tokens: request.params.max_tokens,
        }
    }
}

#[async_trait]
impl GenerationGateway for GroqGateway {
    async fn generate(&self, request: &GenerationRequest) -> Result<String, GatewayError> {
        let body = self.to_chat_request(request);
        debug!(model = %self.config.model, "Sending chat completion request");

        let response = self
            .client
            .post(self.completions_url())
            .bearer_auth(&self.config.api_key)
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    GatewayError::Timeout
                } else if e.is_connect() {
                    GatewayError::ConnectionError(e.to_string())
                } else {
                    GatewayError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        let text = response
            .text()
            .await
            .map_err(|e| GatewayError::RequestFailed(e.to_string()))?;

        if !status.is_success() {
            return Err(error_for_status(status, text));
        }

        parse_completion(&text)
    }
}

/// Extract the completion text from a chat-completions response body.
fn parse_completion(body: &str) -> Result<String, GatewayError> {
    let response: ChatResponse = serde_json::from_str(body)
        .map_err(|e| GatewayError::MalformedResponse(e.to_string()))?;
    response
        .choices
        .into_iter()
        .next()
        .map(|c| c.message.content)
        .ok_or_else(|| GatewayError::MalformedResponse("response has no choices".to_string()))
}

fn error_for_status(status: StatusCode, body: String) -> GatewayError {
    match status.as_u16() {
        401 | 403 => GatewayError::AuthenticationFailed,
        429 => GatewayError::RateLimited,
        500..=599 => GatewayError::Provider {
            status: status.as_u16(),
            message: body,
        },
        _ => GatewayError::RequestFailed(format!("status {status}: {body}")),
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
    max_tokens: u32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}
