/*!
 * Batch segmentation of a page store.
 *
 * Pages are grouped into fixed-size batches, then each batch boundary is
 * pushed forward to the nearest safe sentence end so that no batch is cut
 * mid-sentence. The extension only moves text; page ownership stays with
 * the donor batch unless an entire page is consumed.
 */

use crate::extraction::PageStore;
use crate::quality::count_paragraphs;

/// Tuning parameters for the segmenter.
#[derive(Debug, Clone)]
pub struct SegmenterConfig {
    /// Number of pages grouped into one batch
    pub pages_per_batch: usize,
    /// Upper bound, in characters, on how far a boundary extension may
    /// reach into the next batch
    pub max_lookahead_chars: usize,
    /// Characters that end a sentence
    pub terminators: Vec<char>,
    /// Closing quotes and brackets that may trail a terminator and still
    /// belong to the sentence
    pub closers: Vec<char>,
}

impl Default for SegmenterConfig {
    fn default() -> Self {
        Self {
            pages_per_batch: 8,
            max_lookahead_chars: 1000,
            terminators: vec!['.', '!', '?', '。', '！', '？'],
            closers: vec!['"', '\'', ')', ']', '}', '”', '’', '」', '』'],
        }
    }
}

/// One unit of translation work.
///
/// `start_page` and `end_page` are 1-based page ordinals and record page
/// ownership: across all batches the ranges partition the document with no
/// gaps and no overlaps.
#[derive(Debug, Clone)]
pub struct Batch {
    /// 1-based, contiguous batch id
    pub id: u32,
    /// First owned page ordinal
    pub start_page: usize,
    /// Last owned page ordinal
    pub end_page: usize,
    /// Source text of the batch, including any sentence-completing
    /// fragment pulled from the following batch
    pub raw_text: String,
    /// Paragraph count of `raw_text`, the reference for divergence checks
    pub source_paragraph_count: usize,
}

/// Splits a page store into sentence-safe batches.
pub struct BatchSegmenter {
    config: SegmenterConfig,
}

impl BatchSegmenter {
    pub fn new(config: SegmenterConfig) -> Self {
        Self { config }
    }

    /// Segment the store into batches.
    ///
    /// An empty store yields no batches. The final batch never extends
    /// beyond the end of the document.
    pub fn segment(&self, store: &PageStore) -> Vec<Batch> {
        if store.is_empty() {
            return Vec::new();
        }
        let pages_per_batch = self.config.pages_per_batch.max(1);

        let chunks: Vec<_> = store.pages().chunks(pages_per_batch).collect();
        let mut texts: Vec<String> = chunks
            .iter()
            .map(|chunk| {
                chunk
                    .iter()
                    .map(|p| p.text.trim_end())
                    .collect::<Vec<_>>()
                    .join("\n\n")
            })
            .collect();
        let mut ranges: Vec<(usize, usize)> = chunks
            .iter()
            .map(|chunk| (chunk[0].ordinal, chunk[chunk.len() - 1].ordinal))
            .collect();
        // Donation from a chunk is capped by its first page; each chunk
        // donates at most once and always from its untouched front.
        let first_page_chars: Vec<usize> = chunks
            .iter()
            .map(|chunk| chunk[0].text.trim_end().chars().count())
            .collect();

        for i in 0..texts.len().saturating_sub(1) {
            if is_sentence_complete(&texts[i], &self.config) {
                continue;
            }
            let cap_chars = self.config.max_lookahead_chars.min(first_page_chars[i + 1]);
            let Some(cut) = find_safe_cut(&texts[i + 1], cap_chars, &self.config) else {
                // No safe end within the bound: accept the naive cut
                continue;
            };
            let fragment = texts[i + 1][..cut].trim().to_string();
            if fragment.is_empty() {
                continue;
            }

            let consumed_chars = texts[i + 1][..cut].chars().count();
            let whole_first_page = consumed_chars >= first_page_chars[i + 1];

            if !texts[i].ends_with(char::is_whitespace) {
                texts[i].push(' ');
            }
            texts[i].push_str(&fragment);
            texts[i + 1] = texts[i + 1][cut..].trim_start().to_string();

            // Ownership moves only when the donor's entire first page was
            // consumed and the donor still keeps at least one page.
            if whole_first_page && ranges[i + 1].0 < ranges[i + 1].1 {
                ranges[i].1 = ranges[i + 1].0;
                ranges[i + 1].0 += 1;
            }
        }

        // A single-page chunk fully absorbed by the extension has no text
        // left; its page ownership folds into the recipient.
        let mut parts: Vec<(String, (usize, usize))> = Vec::new();
        for (text, range) in texts.into_iter().zip(ranges) {
            if text.trim().is_empty() {
                if let Some(last) = parts.last_mut() {
                    last.1.1 = range.1;
                    continue;
                }
            }
            parts.push((text, range));
        }

        parts
            .into_iter()
            .enumerate()
            .map(|(idx, (raw_text, (start_page, end_page)))| {
                let source_paragraph_count = count_paragraphs(&raw_text);
                Batch {
                    id: (idx + 1) as u32,
                    start_page,
                    end_page,
                    raw_text,
                    source_paragraph_count,
                }
            })
            .collect()
    }
}

/// Whether `text` ends on a complete sentence.
///
/// Trailing closing quotes and brackets are skipped; the first character
/// before them must be a terminator. Empty text counts as complete.
pub fn is_sentence_complete(text: &str, config: &SegmenterConfig) -> bool {
    let trimmed = text.trim_end();
    if trimmed.is_empty() {
        return true;
    }
    for ch in trimmed.chars().rev() {
        if config.closers.contains(&ch) {
            continue;
        }
        return config.terminators.contains(&ch);
    }
    // All characters were closers
    false
}

/// Find the earliest safe cut point in `text`, scanning at most
/// `cap_chars` characters. Returns a byte offset just past the sentence
/// end, or at a paragraph break if one comes first.
fn find_safe_cut(text: &str, cap_chars: usize, config: &SegmenterConfig) -> Option<usize> {
    let byte_cap = text
        .char_indices()
        .nth(cap_chars)
        .map_or(text.len(), |(idx, _)| idx);
    let window = &text[..byte_cap];

    // A blank line in extracted text is always a safe boundary as well.
    let break_pos = window.find("\n\n");

    let mut terminator_cut: Option<usize> = None;
    let mut chars = window.char_indices().peekable();
    while let Some((idx, ch)) = chars.next() {
        if !config.terminators.contains(&ch) {
            continue;
        }
        let mut end = idx + ch.len_utf8();
        while let Some(&(next_idx, next_ch)) = chars.peek() {
            if config.closers.contains(&next_ch) {
                end = next_idx + next_ch.len_utf8();
                chars.next();
            } else {
                break;
            }
        }
        terminator_cut = Some(end);
        break;
    }

    match (break_pos, terminator_cut) {
        (Some(b), Some(t)) if b < t => (b > 0).then_some(b),
        (Some(b), None) => (b > 0).then_some(b),
        (_, Some(t)) => Some(t),
        (None, None) => None,
    }
}
