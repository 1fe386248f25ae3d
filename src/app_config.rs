use std::collections::BTreeMap;

use anyhow::{anyhow, Result};
use serde::{Deserialize, Serialize};

use crate::quality::DivergencePolicy;
use crate::segmenter::SegmenterConfig;
use crate::translation::DriverSettings;

/// Application configuration module
/// This module handles the application configuration including loading,
/// validating and saving configuration settings.
/// Represents the application configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Config {
    /// Source language name (free-form, e.g. "English")
    pub source_language: String,

    /// Target language name (free-form, e.g. "Simplified Chinese")
    pub target_language: String,

    /// Translation config
    pub translation: TranslationConfig,

    /// Segmentation and quality config
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Seed glossary entries; these win over entries loaded from disk
    #[serde(default)]
    pub glossary_seed: BTreeMap<String, String>,

    /// File name of the assembled document inside the output directory
    #[serde(default = "default_document_name")]
    pub document_name: String,

    /// Log level
    #[serde(default)]
    pub log_level: LogLevel,
}

/// Translation provider type
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationProvider {
    // @provider: OpenAI API or any compatible endpoint
    #[default]
    OpenAI,
    // @provider: Anthropic
    Anthropic,
}

impl TranslationProvider {
    // @returns: Capitalized provider name
    pub fn display_name(&self) -> &str {
        match self {
            Self::OpenAI => "OpenAI",
            Self::Anthropic => "Anthropic",
        }
    }

    // @returns: Lowercase provider identifier
    pub fn to_lowercase_string(&self) -> String {
        match self {
            Self::OpenAI => "openai".to_string(),
            Self::Anthropic => "anthropic".to_string(),
        }
    }
}

// Implement Display trait for TranslationProvider
impl std::fmt::Display for TranslationProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_lowercase_string())
    }
}

// Implement FromStr trait for TranslationProvider
impl std::str::FromStr for TranslationProvider {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "openai" => Ok(Self::OpenAI),
            "anthropic" => Ok(Self::Anthropic),
            _ => Err(anyhow!("Invalid provider type: {}", s)),
        }
    }
}

/// Provider configuration wrapper
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ProviderConfig {
    // @field: Provider type identifier
    #[serde(rename = "type")]
    pub provider_type: String,

    // @field: Model name
    #[serde(default = "String::new")]
    pub model: String,

    // @field: API key
    #[serde(default = "String::new")]
    pub api_key: String,

    // @field: Service URL
    #[serde(default = "String::new")]
    pub endpoint: String,

    // @field: Timeout seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    // @field: Max tokens the model may generate per batch
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
}

impl ProviderConfig {
    // @param provider_type: Provider enum
    // @returns: Provider config with defaults
    pub fn new(provider_type: TranslationProvider) -> Self {
        match provider_type {
            TranslationProvider::OpenAI => Self {
                provider_type: "openai".to_string(),
                model: default_openai_model(),
                api_key: String::new(),
                endpoint: default_openai_endpoint(),
                timeout_secs: default_timeout_secs(),
                max_output_tokens: default_max_output_tokens(),
            },
            TranslationProvider::Anthropic => Self {
                provider_type: "anthropic".to_string(),
                model: default_anthropic_model(),
                api_key: String::new(),
                endpoint: default_anthropic_endpoint(),
                timeout_secs: default_timeout_secs(),
                max_output_tokens: default_max_output_tokens(),
            },
        }
    }
}

/// Translation service configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationConfig {
    /// Translation provider to use
    #[serde(default)]
    pub provider: TranslationProvider,

    /// Available translation providers
    #[serde(default)]
    pub available_providers: Vec<ProviderConfig>,

    /// Common translation settings
    #[serde(default)]
    pub common: TranslationCommonConfig,
}

/// Common translation settings applicable to all providers
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct TranslationCommonConfig {
    /// Rate limit delay in milliseconds between consecutive batch requests
    #[serde(default = "default_rate_limit_delay_ms")]
    pub rate_limit_delay_ms: u64,

    /// Retry count for failed requests
    #[serde(default = "default_retry_count")]
    pub retry_count: u32,

    /// Backoff multiplier for retries (in milliseconds)
    #[serde(default = "default_retry_backoff_ms")]
    pub retry_backoff_ms: u64,

    /// Temperature parameter for text generation (0.0 to 1.0)
    /// Lower values make output more deterministic, higher values more creative
    #[serde(default = "default_temperature")]
    pub temperature: f32,
}

impl Default for TranslationCommonConfig {
    fn default() -> Self {
        Self {
            rate_limit_delay_ms: default_rate_limit_delay_ms(),
            retry_count: default_retry_count(),
            retry_backoff_ms: default_retry_backoff_ms(),
            temperature: default_temperature(),
        }
    }
}

/// Segmentation and quality-check settings
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct PipelineConfig {
    /// Pages grouped into one batch
    #[serde(default = "default_pages_per_batch")]
    pub pages_per_batch: usize,

    /// Character bound on sentence-completing look-ahead
    #[serde(default = "default_max_lookahead_chars")]
    pub max_lookahead_chars: usize,

    /// Maximum tolerated paragraph-count drift as a ratio of the source
    #[serde(default = "default_divergence_max_ratio")]
    pub divergence_max_ratio: f64,

    /// Maximum tolerated absolute paragraph-count delta
    #[serde(default = "default_divergence_max_abs")]
    pub divergence_max_abs: usize,

    /// Lines longer than this are never treated as titles
    #[serde(default = "default_title_max_len")]
    pub title_max_len: usize,

    /// Whether to run the one-off style probe at the start of a run
    #[serde(default = "default_true")]
    pub style_context: bool,

    /// Characters of the latest accepted translation carried into the
    /// next prompt
    #[serde(default = "default_style_excerpt_chars")]
    pub style_excerpt_chars: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            pages_per_batch: default_pages_per_batch(),
            max_lookahead_chars: default_max_lookahead_chars(),
            divergence_max_ratio: default_divergence_max_ratio(),
            divergence_max_abs: default_divergence_max_abs(),
            title_max_len: default_title_max_len(),
            style_context: true,
            style_excerpt_chars: default_style_excerpt_chars(),
        }
    }
}

/// Log verbosity level
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

fn default_timeout_secs() -> u64 {
    120
}

fn default_max_output_tokens() -> u32 {
    8192
}

fn default_rate_limit_delay_ms() -> u64 {
    1000 // 1s default delay between batch requests
}

fn default_retry_count() -> u32 {
    3 // Default to 3 attempts
}

fn default_retry_backoff_ms() -> u64 {
    1000 // 1 second base backoff time, doubled on each retry
}

fn default_temperature() -> f32 {
    0.3
}

fn default_pages_per_batch() -> usize {
    8
}

fn default_max_lookahead_chars() -> usize {
    1000
}

fn default_divergence_max_ratio() -> f64 {
    0.20
}

fn default_divergence_max_abs() -> usize {
    10
}

fn default_title_max_len() -> usize {
    60
}

fn default_style_excerpt_chars() -> usize {
    600
}

fn default_true() -> bool {
    true
}

fn default_document_name() -> String {
    "translated_document.md".to_string()
}

fn default_openai_endpoint() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_anthropic_endpoint() -> String {
    "https://api.anthropic.com".to_string()
}

fn default_openai_model() -> String {
    "gpt-4o-mini".to_string()
}

fn default_anthropic_model() -> String {
    "claude-3-haiku".to_string()
}

impl Config {
    /// Validate the configuration for consistency and required values
    pub fn validate(&self) -> Result<()> {
        if self.source_language.trim().is_empty() {
            return Err(anyhow!("Source language must not be empty"));
        }
        if self.target_language.trim().is_empty() {
            return Err(anyhow!("Target language must not be empty"));
        }
        if self.translation.get_api_key().is_empty() {
            return Err(anyhow!(
                "Translation API key is required for {} provider",
                self.translation.provider.display_name()
            ));
        }
        if self.pipeline.pages_per_batch == 0 {
            return Err(anyhow!("pages_per_batch must be at least 1"));
        }
        if !(0.0..=1.0).contains(&self.pipeline.divergence_max_ratio) {
            return Err(anyhow!("divergence_max_ratio must be between 0 and 1"));
        }
        Ok(())
    }

    /// Segmenter settings derived from the pipeline config
    pub fn segmenter_config(&self) -> SegmenterConfig {
        SegmenterConfig {
            pages_per_batch: self.pipeline.pages_per_batch,
            max_lookahead_chars: self.pipeline.max_lookahead_chars,
            ..SegmenterConfig::default()
        }
    }

    /// Divergence thresholds derived from the pipeline config
    pub fn divergence_policy(&self) -> DivergencePolicy {
        DivergencePolicy {
            max_ratio: self.pipeline.divergence_max_ratio,
            max_abs_delta: self.pipeline.divergence_max_abs,
        }
    }

    /// Driver settings derived from the translation config
    pub fn driver_settings(&self) -> DriverSettings {
        DriverSettings {
            source_language: self.source_language.clone(),
            target_language: self.target_language.clone(),
            temperature: self.translation.common.temperature,
            max_output_tokens: self.translation.get_max_output_tokens(),
            retry_count: self.translation.common.retry_count,
            retry_backoff_ms: self.translation.common.retry_backoff_ms,
        }
    }
}

/// Default implementation for Config
impl Default for Config {
    fn default() -> Self {
        Config {
            source_language: "English".to_string(),
            target_language: "Simplified Chinese".to_string(),
            translation: TranslationConfig::default(),
            pipeline: PipelineConfig::default(),
            glossary_seed: BTreeMap::new(),
            document_name: default_document_name(),
            log_level: LogLevel::default(),
        }
    }
}

impl TranslationConfig {
    /// Get the active provider configuration from the available_providers array
    pub fn get_active_provider_config(&self) -> Option<&ProviderConfig> {
        let provider_str = self.provider.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get a specific provider configuration by type
    pub fn get_provider_config(&self, provider_type: &TranslationProvider) -> Option<&ProviderConfig> {
        let provider_str = provider_type.to_lowercase_string();
        self.available_providers.iter()
            .find(|p| p.provider_type == provider_str)
    }

    /// Get the model for the active provider
    pub fn get_model(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.model.is_empty() {
                return provider_config.model.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::OpenAI => default_openai_model(),
            TranslationProvider::Anthropic => default_anthropic_model(),
        }
    }

    /// Get the API key for the active provider
    pub fn get_api_key(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.api_key.is_empty() {
                return provider_config.api_key.clone();
            }
        }
        String::new()
    }

    /// Get the endpoint for the active provider
    pub fn get_endpoint(&self) -> String {
        if let Some(provider_config) = self.get_active_provider_config() {
            if !provider_config.endpoint.is_empty() {
                return provider_config.endpoint.clone();
            }
        }

        // Default fallback based on provider type
        match self.provider {
            TranslationProvider::OpenAI => default_openai_endpoint(),
            TranslationProvider::Anthropic => default_anthropic_endpoint(),
        }
    }

    /// Get the request timeout for the active provider
    pub fn get_timeout_secs(&self) -> u64 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.timeout_secs > 0 {
                return provider_config.timeout_secs;
            }
        }
        default_timeout_secs()
    }

    /// Get the output token cap for the active provider
    pub fn get_max_output_tokens(&self) -> u32 {
        if let Some(provider_config) = self.get_active_provider_config() {
            if provider_config.max_output_tokens > 0 {
                return provider_config.max_output_tokens;
            }
        }
        default_max_output_tokens()
    }
}

impl Default for TranslationConfig {
    fn default() -> Self {
        let mut config = Self {
            provider: TranslationProvider::default(),
            available_providers: Vec::new(),
            common: TranslationCommonConfig::default(),
        };

        // Add default providers
        config.available_providers.push(ProviderConfig::new(TranslationProvider::OpenAI));
        config.available_providers.push(ProviderConfig::new(TranslationProvider::Anthropic));

        config
    }
}
