/*!
 * Translation driver.
 *
 * Owns the provider handle and turns a raw batch into a parsed translation,
 * retrying transport and format failures with exponential backoff. Retry
 * exhaustion is reported to the caller; it never aborts the run.
 */

use std::sync::Arc;
use std::time::Duration;

use log::{debug, warn};

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest};
use crate::titles::TitleHint;
use crate::translation::prompt;
use crate::translation::style::StyleContext;
use crate::translation::usage::TokenUsageStats;

/// Driver tuning, taken from the application configuration.
#[derive(Debug, Clone)]
pub struct DriverSettings {
    /// Source language name, free-form
    pub source_language: String,
    /// Target language name, free-form
    pub target_language: String,
    /// Sampling temperature
    pub temperature: f32,
    /// Maximum tokens the model may generate per batch
    pub max_output_tokens: u32,
    /// Maximum provider attempts per batch
    pub retry_count: u32,
    /// Base backoff in milliseconds, doubled on each retry
    pub retry_backoff_ms: u64,
}

/// A successfully parsed batch translation.
#[derive(Debug, Clone)]
pub struct BatchTranslation {
    /// Clean translated text
    pub text: String,
    /// Output paragraph count
    pub paragraph_count: usize,
    /// New glossary terms declared by the model
    pub new_terms: Vec<(String, String)>,
    /// Tag ids the model marked untranslatable
    pub missing: Vec<u32>,
    /// Attempt number that produced this result (1-based)
    pub attempt: u32,
}

/// Drives provider calls for batch translation and style probes.
pub struct TranslationDriver {
    provider: Arc<dyn ChatProvider>,
    settings: DriverSettings,
}

impl TranslationDriver {
    pub fn new(provider: Arc<dyn ChatProvider>, settings: DriverSettings) -> Self {
        Self { provider, settings }
    }

    /// Translate one batch.
    ///
    /// The batch text is tagged per paragraph before sending. An empty or
    /// tagless-and-empty response counts as a format failure and is
    /// retried like a transport error.
    pub async fn translate(
        &self,
        raw_text: &str,
        glossary_terms: &[(String, String)],
        title_hints: &[TitleHint],
        style: &StyleContext,
        usage: &TokenUsageStats,
    ) -> Result<BatchTranslation, ProviderError> {
        let (tagged, source_tags) = prompt::wrap_paragraphs(raw_text);
        let system_prompt = prompt::build_system_prompt(
            &self.settings.source_language,
            &self.settings.target_language,
            glossary_terms,
            title_hints,
            style.prompt_fragment().as_deref(),
        );
        let request = ChatRequest {
            system_prompt,
            user_prompt: tagged,
            temperature: self.settings.temperature,
            max_output_tokens: self.settings.max_output_tokens,
        };
        debug!(
            "Sending batch of {} paragraph(s) to provider '{}'",
            source_tags,
            self.provider.name()
        );

        let mut attempt = 0;
        loop {
            attempt += 1;
            match self.provider.complete(request.clone()).await {
                Ok(response) => {
                    usage.record(response.prompt_tokens, response.completion_tokens);
                    let parsed = prompt::parse_response(&response.text);
                    if parsed.text.trim().is_empty() {
                        let err = ProviderError::ParseError(
                            "Provider returned an empty translation".to_string(),
                        );
                        if attempt >= self.settings.retry_count.max(1) {
                            return Err(err);
                        }
                        warn!("Attempt {} produced an empty translation, retrying", attempt);
                    } else {
                        return Ok(BatchTranslation {
                            text: parsed.text,
                            paragraph_count: parsed.paragraph_count,
                            new_terms: parsed.new_terms,
                            missing: parsed.missing,
                            attempt,
                        });
                    }
                }
                Err(e) => {
                    if attempt >= self.settings.retry_count.max(1) {
                        return Err(e);
                    }
                    warn!("Attempt {} failed ({}), retrying", attempt, e);
                }
            }
            let backoff = self.settings.retry_backoff_ms * (1u64 << (attempt - 1).min(16));
            tokio::time::sleep(Duration::from_millis(backoff)).await;
        }
    }

    /// Ask the provider to summarize the source style over a text sample.
    pub async fn summarize_style(
        &self,
        sample: &str,
        usage: &TokenUsageStats,
    ) -> Result<String, ProviderError> {
        let request = ChatRequest {
            system_prompt: prompt::build_style_prompt(
                &self.settings.source_language,
                &self.settings.target_language,
            ),
            user_prompt: sample.to_string(),
            temperature: self.settings.temperature,
            max_output_tokens: 512,
        };
        let response = self.provider.complete(request).await?;
        usage.record(response.prompt_tokens, response.completion_tokens);
        Ok(response.text.trim().to_string())
    }
}
