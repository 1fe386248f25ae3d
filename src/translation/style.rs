/*!
 * Rolling style context.
 *
 * A one-off style summary is captured at the start of a run, and the tail
 * of the most recent accepted translation is carried along so each batch
 * sees how the previous one ended.
 */

/// Style information injected into prompts.
#[derive(Debug, Clone)]
pub struct StyleContext {
    /// Persistent style summary from the style probe
    base: Option<String>,
    /// Tail excerpt of the latest accepted translation
    recent: Option<String>,
    /// Maximum characters kept from a translation tail
    excerpt_chars: usize,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            base: None,
            recent: None,
            excerpt_chars: 600,
        }
    }
}

impl StyleContext {
    pub fn new(excerpt_chars: usize) -> Self {
        Self {
            base: None,
            recent: None,
            excerpt_chars,
        }
    }

    /// Set the persistent style summary
    pub fn set_base(&mut self, summary: impl Into<String>) {
        let summary = summary.into();
        if !summary.trim().is_empty() {
            self.base = Some(summary.trim().to_string());
        }
    }

    pub fn base(&self) -> Option<&str> {
        self.base.as_deref()
    }

    /// Remember the tail of an accepted translation
    pub fn update_recent(&mut self, translated_text: &str) {
        let trimmed = translated_text.trim();
        if trimmed.is_empty() {
            return;
        }
        let total = trimmed.chars().count();
        let tail: String = trimmed
            .chars()
            .skip(total.saturating_sub(self.excerpt_chars))
            .collect();
        self.recent = Some(tail);
    }

    /// Combined fragment for the system prompt, if any context exists
    pub fn prompt_fragment(&self) -> Option<String> {
        match (&self.base, &self.recent) {
            (None, None) => None,
            (Some(base), None) => Some(base.clone()),
            (None, Some(recent)) => Some(format!("The previous batch ended:\n{}", recent)),
            (Some(base), Some(recent)) => Some(format!(
                "{}\n\nThe previous batch ended:\n{}",
                base, recent
            )),
        }
    }
}
