use std::time::Duration;

use async_trait::async_trait;
use log::error;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest, ChatResponse};

/// Anthropic client for interacting with the Anthropic messages API
#[derive(Debug)]
pub struct Anthropic {
    /// HTTP client for API requests
    client: Client,
    /// API endpoint URL (optional, defaults to public API)
    endpoint: String,
    /// API key for authentication
    api_key: String,
    /// Model name
    model: String,
}

/// Anthropic message request
#[derive(Debug, Serialize)]
struct AnthropicRequest {
    /// The model to use
    model: String,

    /// The messages for the conversation
    messages: Vec<AnthropicMessage>,

    /// System prompt to guide the AI
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,

    /// Temperature for generation
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,

    /// Maximum number of tokens to generate
    max_tokens: u32,
}

/// Anthropic message format
#[derive(Debug, Serialize, Deserialize)]
struct AnthropicMessage {
    /// Role of the message sender (user, assistant)
    role: String,

    /// Content of the message
    content: String,
}

/// Token usage information
#[derive(Debug, Deserialize)]
struct TokenUsage {
    /// Number of input tokens
    input_tokens: u64,
    /// Number of output tokens
    output_tokens: u64,
}

/// Anthropic response
#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    /// The content of the response
    content: Vec<AnthropicContent>,
    /// Token usage information
    usage: TokenUsage,
}

/// Individual content block in an Anthropic response
#[derive(Debug, Deserialize)]
struct AnthropicContent {
    /// The type of content
    #[serde(rename = "type")]
    content_type: String,

    /// The actual text content
    text: String,
}

impl Anthropic {
    /// Create a new Anthropic client
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
        if self.endpoint.is_empty() {
            "https://api.anthropic.com/v1/messages".to_string()
        } else {
            format!("{}/v1/messages", self.endpoint.trim_end_matches('/'))
        }
    }
}

#[async_trait]
impl ChatProvider for Anthropic {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let body = AnthropicRequest {
            model: self.model.clone(),
            messages: vec![AnthropicMessage {
                role: "user".to_string(),
                content: request.user_prompt,
            }],
            system: Some(request.system_prompt),
            temperature: Some(request.temperature),
            max_tokens: request.max_output_tokens,
        };

        let response = self
            .client
            .post(self.api_url())
            .header("Content-Type", "application/json")
            .header("x-api-key", &self.api_key)
            .header("anthropic-version", "2023-06-01")
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
            error!("Anthropic API error ({}): {}", status, message);
            return Err(match status.as_u16() {
                401 | 403 => ProviderError::AuthenticationError(message),
                429 => ProviderError::RateLimitExceeded(message),
                code => ProviderError::ApiError {
                    status_code: code,
                    message,
                },
            });
        }

        let parsed: AnthropicResponse = response
            .json()
            .await
            .map_err(|e| ProviderError::ParseError(e.to_string()))?;

        let text: String = parsed
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.clone())
            .collect();

        Ok(ChatResponse {
            text,
            prompt_tokens: parsed.usage.input_tokens,
            completion_tokens: parsed.usage.output_tokens,
        })
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}
