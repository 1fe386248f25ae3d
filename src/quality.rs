/*!
 * Paragraph-count quality checks.
 *
 * A translation is judged only by comparing its paragraph count against
 * the source batch. The check is cheap, language-agnostic and catches the
 * common failure mode of a model silently dropping or merging paragraphs.
 */

use serde::{Deserialize, Serialize};

/// Lifecycle state of a batch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BatchStatus {
    /// Not yet translated
    Pending,
    /// Translated, not yet classified
    Translated,
    /// Translated and within divergence bounds
    Ok,
    /// Translated but the paragraph counts diverge
    Diverged,
    /// All provider attempts failed
    Failed,
    /// Selected for re-translation
    RetryPending,
}

impl BatchStatus {
    /// Whether this batch still needs another translation attempt
    pub fn needs_retry(&self) -> bool {
        matches!(self, Self::Diverged | Self::Failed | Self::RetryPending)
    }
}

impl std::fmt::Display for BatchStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            Self::Pending => "pending",
            Self::Translated => "translated",
            Self::Ok => "ok",
            Self::Diverged => "diverged",
            Self::Failed => "failed",
            Self::RetryPending => "retry_pending",
        };
        write!(f, "{}", label)
    }
}

/// Divergence thresholds for paragraph-count classification.
///
/// A result is diverged when the relative drift exceeds `max_ratio` or
/// the absolute delta exceeds `max_abs_delta`. Both comparisons are
/// strict, so a drift of exactly 20% with a small delta is still Ok.
#[derive(Debug, Clone, Copy)]
pub struct DivergencePolicy {
    /// Maximum tolerated |source - translated| / max(source, 1)
    pub max_ratio: f64,
    /// Maximum tolerated |source - translated|
    pub max_abs_delta: usize,
}

impl Default for DivergencePolicy {
    fn default() -> Self {
        Self {
            max_ratio: 0.20,
            max_abs_delta: 10,
        }
    }
}

impl DivergencePolicy {
    /// Classify a translated batch by paragraph counts.
    pub fn classify(&self, source_count: usize, translated_count: usize) -> BatchStatus {
        let delta = source_count.abs_diff(translated_count);
        let ratio = delta as f64 / source_count.max(1) as f64;
        if ratio > self.max_ratio || delta > self.max_abs_delta {
            BatchStatus::Diverged
        } else {
            BatchStatus::Ok
        }
    }
}

/// Count paragraphs: maximal runs of non-blank lines.
pub fn count_paragraphs(text: &str) -> usize {
    let mut count = 0;
    let mut in_block = false;
    for line in text.lines() {
        if line.trim().is_empty() {
            in_block = false;
        } else if !in_block {
            count += 1;
            in_block = true;
        }
    }
    count
}
