/*!
 * Mock provider implementations for testing.
 *
 * This module provides mock providers that simulate different behaviors:
 * - `MockProvider::working()` - Echoes every tagged paragraph back translated
 * - `MockProvider::dropping(n)` - Drops paragraphs on the nth tagged request
 * - `MockProvider::intermittent(n)` - Fails every nth request
 * - `MockProvider::failing()` - Always fails with an error
 */

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::ProviderError;
use crate::providers::{ChatProvider, ChatRequest, ChatResponse};

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<c(\d+)>(.*?)</c\d+>").unwrap());

/// Behavior mode for the mock provider
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MockBehavior {
    /// Echo every tagged paragraph back with a translation marker
    Working,
    /// Drop all but the first paragraph on the nth tagged request (1-based)
    Dropping { request: usize },
    /// Fail every nth request
    Intermittent { fail_every: usize },
    /// Fail the first n requests, then succeed
    FailFirst { times: usize },
    /// Always fail with an error
    Failing,
}

/// Mock provider for testing translation behavior
#[derive(Debug)]
pub struct MockProvider {
    /// Behavior mode
    behavior: MockBehavior,
    /// Total request counter
    request_count: Arc<AtomicUsize>,
    /// Counter of requests that carried tagged batch text
    tagged_count: Arc<AtomicUsize>,
    /// Glossary lines to append as a fenced block on tagged responses
    glossary_lines: Vec<(String, String)>,
}

impl MockProvider {
    /// Create a new mock provider with the specified behavior
    pub fn new(behavior: MockBehavior) -> Self {
        Self {
            behavior,
            request_count: Arc::new(AtomicUsize::new(0)),
            tagged_count: Arc::new(AtomicUsize::new(0)),
            glossary_lines: Vec::new(),
        }
    }

    /// Create a working mock provider that always succeeds
    pub fn working() -> Self {
        Self::new(MockBehavior::Working)
    }

    /// Create a mock that drops paragraphs on the given tagged request
    pub fn dropping(request: usize) -> Self {
        Self::new(MockBehavior::Dropping { request })
    }

    /// Create an intermittently failing mock provider
    pub fn intermittent(fail_every: usize) -> Self {
        Self::new(MockBehavior::Intermittent { fail_every })
    }

    /// Create a mock that fails the first `times` requests, then recovers
    pub fn flaky(times: usize) -> Self {
        Self::new(MockBehavior::FailFirst { times })
    }

    /// Create a failing mock provider that always errors
    pub fn failing() -> Self {
        Self::new(MockBehavior::Failing)
    }

    /// Append a glossary block declaring these terms on every tagged response
    pub fn with_glossary(mut self, lines: Vec<(String, String)>) -> Self {
        self.glossary_lines = lines;
        self
    }

    /// Total number of requests seen so far
    pub fn requests_seen(&self) -> usize {
        self.request_count.load(Ordering::SeqCst)
    }

    fn render_tagged(&self, user_prompt: &str, drop_paragraphs: bool) -> String {
        let mut out = String::new();
        for (i, cap) in TAG_RE.captures_iter(user_prompt).enumerate() {
            if drop_paragraphs && i > 0 {
                continue;
            }
            let id = &cap[1];
            let content = cap[2].trim();
            out.push_str(&format!("<c{}>[xlated] {}</c{}>\n\n", id, content, id));
        }
        if !self.glossary_lines.is_empty() {
            out.push_str("```glossary\n");
            for (term, rendering) in &self.glossary_lines {
                out.push_str(&format!("{}⇢{}\n", term, rendering));
            }
            out.push_str("```\n");
        }
        out
    }
}

impl Clone for MockProvider {
    fn clone(&self) -> Self {
        Self {
            behavior: self.behavior,
            request_count: Arc::clone(&self.request_count),
            tagged_count: Arc::clone(&self.tagged_count),
            glossary_lines: self.glossary_lines.clone(),
        }
    }
}

#[async_trait]
impl ChatProvider for MockProvider {
    async fn complete(&self, request: ChatRequest) -> Result<ChatResponse, ProviderError> {
        let count = self.request_count.fetch_add(1, Ordering::SeqCst);

        if let MockBehavior::Failing = self.behavior {
            return Err(ProviderError::ApiError {
                status_code: 500,
                message: "Simulated provider failure".to_string(),
            });
        }
        if let MockBehavior::Intermittent { fail_every } = self.behavior {
            if count % fail_every == fail_every - 1 {
                return Err(ProviderError::ApiError {
                    status_code: 503,
                    message: format!("Simulated intermittent failure (request #{})", count + 1),
                });
            }
        }
        if let MockBehavior::FailFirst { times } = self.behavior {
            if count < times {
                return Err(ProviderError::ConnectionError(format!(
                    "Simulated transient failure (request #{})",
                    count + 1
                )));
            }
        }

        let tagged = TAG_RE.is_match(&request.user_prompt);
        let text = if tagged {
            let nth = self.tagged_count.fetch_add(1, Ordering::SeqCst) + 1;
            let drop = matches!(self.behavior, MockBehavior::Dropping { request } if request == nth);
            self.render_tagged(&request.user_prompt, drop)
        } else {
            // Untagged requests are style probes
            "Neutral register, plain narrative prose.".to_string()
        };

        Ok(ChatResponse {
            prompt_tokens: request.user_prompt.len() as u64,
            completion_tokens: (text.len() / 2) as u64,
            text,
        })
    }

    fn name(&self) -> &str {
        "mock"
    }
}
