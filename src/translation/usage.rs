/*!
 * Token usage side-counter.
 */

use std::sync::atomic::{AtomicU64, Ordering};

/// Accumulated token usage across all provider calls of a run.
///
/// Counters are atomic so the stats can be shared behind a plain
/// reference without locking.
#[derive(Debug, Default)]
pub struct TokenUsageStats {
    prompt_tokens: AtomicU64,
    completion_tokens: AtomicU64,
    requests: AtomicU64,
}

impl TokenUsageStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record one provider response
    pub fn record(&self, prompt_tokens: u64, completion_tokens: u64) {
        self.prompt_tokens.fetch_add(prompt_tokens, Ordering::Relaxed);
        self.completion_tokens.fetch_add(completion_tokens, Ordering::Relaxed);
        self.requests.fetch_add(1, Ordering::Relaxed);
    }

    pub fn prompt_tokens(&self) -> u64 {
        self.prompt_tokens.load(Ordering::Relaxed)
    }

    pub fn completion_tokens(&self) -> u64 {
        self.completion_tokens.load(Ordering::Relaxed)
    }

    pub fn requests(&self) -> u64 {
        self.requests.load(Ordering::Relaxed)
    }

    /// One-line summary for the end-of-run log
    pub fn summary(&self) -> String {
        format!(
            "{} request(s), {} prompt token(s), {} completion token(s)",
            self.requests(),
            self.prompt_tokens(),
            self.completion_tokens()
        )
    }
}
