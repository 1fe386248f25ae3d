use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest, ChatResponse};

/// Client for the OpenAI chat completions API and compatible endpoints.
///
/// Any service exposing the `/chat/completions` shape works through this
/// client by pointing `endpoint` at its base URL.
#[derive(Debug)]
pub struct OpenAiCompatible {
    /// HTTP client for API requests
    client: Client,
    /// Base URL of the API (e.g. "https://api.openai.com/v1")
    endpoint: String,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// Chat completion request body
#[derive(Debug, Serialize)]
struct CompletionRequest {
    model: String,
    messages: Vec<Message>,
    temperature: f32,
    max_tokens: u32,
}

/// Chat message format
#[derive(Debug, Serialize, Deserialize)]
struct Message {
    role: String,
    content: String,
}

/// Chat completion response body
#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
    #[serde(default)]
    usage: Option<Usage>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Message,
}

/// Token usage information
#[derive(Debug, Deserialize, Default)]
struct Usage {
    #[serde(default)]
    prompt_tokens: u64,
    #[serde(default)]
    completion_tokens: u64,
}

impl OpenAiCompatible {
    /// Create a new client
    pub fn new(
        endpoint: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
        timeout_secs: u64,
    ) -> Self {
        Self {
            client: Client::builder()
                .timeout(Duration::from_secs(timeout_secs))
                .build()
                .unwrap_or_default(),
            endpoint: endpoint.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }

    fn api_url(&self) -> String {
        format!("{}/chat/completions", self.endpoint.trim_end_matches('/'))
    }
}

#[async_trait]
impl ChatProvider for OpenAiCompatible {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = CompletionRequest {
            model: self.model.clone(),
            messages: vec![
                Message {
                    role: "system".to_string(),
                    content: request.system_prompt,
                },
                Message {
                    role: "user".to_string(),
                    content: request.user_prompt,
                },
            ],
            temperature: request.temperature,
            max_tokens: request.max_output_tokens,
        };

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .header("Authorization", format!("Bearer {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_connect() {
                    ProviderError::ConnectionError(e.to_string())
                } else {
                    ProviderError::RequestFailed(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .text()
                .await
                .unwrap_or_else(|_| "Failed to get error response text".to_string());
            error!("Chat completions API error ({}): {}", status, message);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(message),
                429 => ProviderError::RateLimitExceeded(message),
                code => ProviderError::ApiError {
                    status_code: code,
                    message,
                },
            });
        }

        let parsed: CompletionResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text = parsed
            .choices
            .first()
            .map(|c| c.message.content.clone())
            .ok_or_else(|| ProviderError::ParseError("Response contained no choices".to_string()))?;

        let usage = parsed.usage.unwrap_or_default();
        Ok(ChatResponse {
            text,
            prompt_tokens: usage.prompt_tokens,
            completion_tokens: usage.completion_tokens,
        })
    }

    fn name(&self) -> &str {
        "openai"
    }
}
