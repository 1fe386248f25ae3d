/*!
 * Prompt construction and response parsing.
 *
 * Paragraphs are wrapped in `<cN>` tags before being sent, so the model
 * can be held to one output paragraph per input paragraph. Responses may
 * carry a fenced ```glossary block declaring new term renderings, and a
 * `{{MISSING}}` marker for paragraphs the model could not translate.
 */

use once_cell::sync::Lazy;
use regex::Regex;

use crate::quality::count_paragraphs;
use crate::titles::TitleHint;

/// Marker the model emits for untranslatable paragraphs
pub const MISSING_MARKER: &str = "{{MISSING}}";

static TAG_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)<c(\d+)>(.*?)</c\d+>").unwrap());
static GLOSSARY_BLOCK_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```glossary\s*(.*?)```").unwrap());

/// Wrap each paragraph of `text` in numbered tags.
///
/// Returns the tagged text and the number of paragraphs wrapped.
pub fn wrap_paragraphs(text: &str) -> (String, usize) {
    let mut tagged = String::new();
    let mut n = 0;
    for paragraph in split_paragraphs(text) {
        n += 1;
        tagged.push_str(&format!("<c{}>{}</c{}>\n\n", n, paragraph, n));
    }
    (tagged.trim_end().to_string(), n)
}

/// Split text into paragraphs: maximal runs of non-blank lines.
fn split_paragraphs(text: &str) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in text.lines() {
        if line.trim().is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

/// Parsed model response for one batch.
#[derive(Debug, Clone)]
pub struct ParsedResponse {
    /// Clean translated text, tags stripped, paragraphs joined by blank lines
    pub text: String,
    /// Number of output paragraphs (tag count when tags are present)
    pub paragraph_count: usize,
    /// Term renderings declared in the glossary block
    pub new_terms: Vec<(String, String)>,
    /// Tag ids the model marked as untranslatable
    pub missing: Vec<u32>,
}

/// Parse a raw model response.
///
/// Glossary blocks are stripped first. When the response carries tags, the
/// clean text is rebuilt from tag contents in response order; otherwise the
/// raw text is taken as-is and paragraphs counted by blank lines.
pub fn parse_response(raw: &str) -> ParsedResponse {
    let mut new_terms = Vec::new();
    for block in GLOSSARY_BLOCK_RE.captures_iter(raw) {
        for line in block[1].lines() {
            let line = line.trim();
            if line.is_empty() {
                continue;
            }
            let parts = line
                .split_once('⇢')
                .or_else(|| line.split_once('\t'));
            if let Some((term, rendering)) = parts {
                let term = term.trim();
                let rendering = rendering.trim();
                if !term.is_empty() && !rendering.is_empty() {
                    new_terms.push((term.to_string(), rendering.to_string()));
                }
            }
        }
    }
    let stripped = GLOSSARY_BLOCK_RE.replace_all(raw, "");

    let mut paragraphs = Vec::new();
    let mut missing = Vec::new();
    let mut tag_count = 0;
    for cap in TAG_RE.captures_iter(&stripped) {
        tag_count += 1;
        let id: u32 = cap[1].parse().unwrap_or(tag_count);
        let content = cap[2].trim();
        if content == MISSING_MARKER {
            missing.push(id);
        } else if !content.is_empty() {
            paragraphs.push(content.to_string());
        }
    }

    if tag_count > 0 {
        ParsedResponse {
            text: paragraphs.join("\n\n"),
            paragraph_count: tag_count as usize,
            new_terms,
            missing,
        }
    } else {
        let text = stripped.trim().to_string();
        let paragraph_count = count_paragraphs(&text);
        ParsedResponse {
            text,
            paragraph_count,
            new_terms,
            missing,
        }
    }
}

/// Build the system prompt for a batch.
pub fn build_system_prompt(
    source_language: &str,
    target_language: &str,
    glossary_terms: &[(String, String)],
    title_hints: &[TitleHint],
    style: Option<&str>,
) -> String {
    let mut prompt = format!(
        "You are a professional literary translator. Translate the following text from {source} to {target}.\n\
         The text is divided into paragraphs wrapped in numbered tags like <c1>...</c1>.\n\
         Rules:\n\
         - Translate every paragraph and keep its tag: output <cN>translation</cN> for each input <cN>.\n\
         - Never merge, split, drop or reorder paragraphs.\n\
         - If a paragraph cannot be translated, output <cN>{missing}</cN>.\n\
         - When you settle the rendering of a new proper noun, declare it at the end in a fenced block:\n\
           ```glossary\n\
           term⇢rendering\n\
           ```\n",
        source = source_language,
        target = target_language,
        missing = MISSING_MARKER,
    );

    if !glossary_terms.is_empty() {
        prompt.push_str("\nUse these established renderings verbatim:\n```glossary\n");
        for (term, rendering) in glossary_terms {
            prompt.push_str(&format!("{}⇢{}\n", term, rendering));
        }
        prompt.push_str("```\n");
    }

    if !title_hints.is_empty() {
        prompt.push_str("\nThese lines are chapter or section titles; render them as headings:\n");
        for hint in title_hints {
            prompt.push_str(&format!("- {}\n", hint.text));
        }
    }

    if let Some(style) = style {
        prompt.push_str("\nMatch this established style and register:\n");
        prompt.push_str(style);
        prompt.push('\n');
    }

    prompt
}

/// Build the system prompt for the one-off style probe.
pub fn build_style_prompt(source_language: &str, target_language: &str) -> String {
    format!(
        "You are a professional literary translator working from {} to {}. \
         Read the sample below and describe, in a short paragraph, the register, \
         tone and stylistic conventions a translation should keep. \
         Answer with the description only.",
        source_language, target_language
    )
}
