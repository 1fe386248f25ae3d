/*!
 * Heuristic detection of chapter and section titles.
 *
 * Hints are advisory: they are folded into the translation prompt so the
 * model renders headings as headings, but a missed or spurious hint never
 * fails a batch.
 */

use once_cell::sync::Lazy;
use regex::Regex;

/// A line that looks like a title, with its 0-based line number inside
/// the batch text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TitleHint {
    /// 0-based line index within the scanned text
    pub line: usize,
    /// The title text, trimmed
    pub text: String,
}

static HEADING_KEYWORD: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^(chapter|part|section|book|prologue|epilogue|appendix)\b[\s.:]*([0-9IVXLC]+|[A-Z][a-z]+)?")
        .unwrap()
});

/// Title detection over batch text.
#[derive(Debug, Clone)]
pub struct TitleClassifier {
    /// Lines longer than this are never titles
    pub max_title_len: usize,
}

impl Default for TitleClassifier {
    fn default() -> Self {
        Self { max_title_len: 60 }
    }
}

impl TitleClassifier {
    pub fn new(max_title_len: usize) -> Self {
        Self { max_title_len }
    }

    /// Scan `text` and return hints for every line that looks like a title.
    pub fn scan(&self, text: &str) -> Vec<TitleHint> {
        let lines: Vec<&str> = text.lines().collect();
        let mut hints = Vec::new();

        for (i, raw) in lines.iter().enumerate() {
            let line = raw.trim();
            if line.is_empty() || line.chars().count() > self.max_title_len {
                continue;
            }
            if self.looks_like_title(line, i, &lines) {
                hints.push(TitleHint {
                    line: i,
                    text: line.to_string(),
                });
            }
        }
        hints
    }

    fn looks_like_title(&self, line: &str, index: usize, lines: &[&str]) -> bool {
        if HEADING_KEYWORD.is_match(line) {
            return true;
        }

        let letters: Vec<char> = line.chars().filter(|c| c.is_alphabetic()).collect();
        let all_caps = !letters.is_empty() && letters.iter().all(|c| c.is_uppercase());
        if all_caps {
            return true;
        }

        // Short line without sentence punctuation, isolated by blank lines
        let ends_like_sentence = line
            .chars()
            .last()
            .is_some_and(|c| matches!(c, '.' | '!' | '?' | ',' | ';' | ':' | '。' | '！' | '？'));
        if ends_like_sentence {
            return false;
        }
        let blank_before = index == 0 || lines[index - 1].trim().is_empty();
        let blank_after = index + 1 >= lines.len() || lines[index + 1].trim().is_empty();
        blank_before && blank_after && line.split_whitespace().count() <= 8
    }
}
