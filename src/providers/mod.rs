/*!
 * Provider implementations for different chat completion services.
 *
 * This module contains client implementations for the LLM providers used
 * to translate batches:
 * - OpenAI-compatible: OpenAI API and any compatible endpoint
 * - Anthropic: Anthropic API integration
 * - Mock: scripted provider for tests
 */

use std::fmt::Debug;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use async_trait::async_trait;

use crate::app_config::{Config, TranslationProvider};
use crate::errors::ProviderError;

/// A single chat completion request.
#[derive(Debug, Clone)]
pub struct ChatRequest {
    /// System prompt guiding the model
    pub system_prompt: String,
    /// User message carrying the batch text
    pub user_prompt: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum number of tokens to generate
    pub max_output_tokens: u32,
}

/// A chat completion response.
#[derive(Debug, Clone)]
pub struct ChatResponse {
    /// Generated text
    pub text: String,
    /// Tokens consumed by the prompt, if reported
    pub prompt_tokens: u64,
    /// Tokens generated, if reported
    pub completion_tokens: u64,
}

/// Common trait for all chat completion providers.
///
/// The trait is object-safe so the translation driver can hold any
/// provider behind `Arc<dyn ChatProvider>`.
#[async_trait]
pub trait ChatProvider: Send + Sync + Debug {
    /// Complete a chat request
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError>;

    /// Short provider name for logging
    fn name(&self) -> &str;
}

/// Build the provider selected by the configuration.
pub fn create_provider(config: &Config) -> Result<Arc<dyn ChatProvider>> {
    let translation = &config.translation;
    let endpoint = translation.get_endpoint();
    let api_key = translation.get_api_key();
    let model = translation.get_model();
    let timeout_secs = translation.get_timeout_secs();

    match translation.provider {
        TranslationProvider::OpenAI => Ok(Arc::new(openai::OpenAiCompatible::new(
            endpoint,
            api_key,
            model,
            timeout_secs,
        ))),
        TranslationProvider::Anthropic => {
            if api_key.is_empty() {
                return Err(anyhow!("Anthropic provider requires an API key"));
            }
            Ok(Arc::new(anthropic::Anthropic::new(
                endpoint,
                api_key,
                model,
                timeout_secs,
            )))
        }
    }
}

pub mod openai;
pub mod anthropic;
pub mod mock;
