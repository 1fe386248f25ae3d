/*!
 * Page extraction from source documents.
 *
 * A source document is turned into an ordered, immutable sequence of pages.
 * PDF files are extracted by shelling out to `pdftotext`; plain-text dumps
 * use form-feed characters as page separators.
 */

use std::path::Path;
use std::process::Command;

use log::debug;

use crate::errors::ExtractionError;

/// A single page of extracted text.
///
/// Pages are immutable once extracted. `index` is the 0-based position in
/// the store; `ordinal` is the 1-based page number used everywhere a page
/// is shown to the user or recorded in batch bookkeeping.
#[derive(Debug, Clone)]
pub struct Page {
    /// 0-based position in the page store
    pub index: usize,
    /// 1-based page number
    pub ordinal: usize,
    /// Extracted text of the page
    pub text: String,
}

/// Ordered collection of extracted pages.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: Vec<Page>,
}

impl PageStore {
    /// Build a store from raw page texts, assigning indices and ordinals.
    pub fn from_texts(texts: Vec<String>) -> Self {
        let pages = texts
            .into_iter()
            .enumerate()
            .map(|(index, text)| Page {
                index,
                ordinal: index + 1,
                text,
            })
            .collect();
        Self { pages }
    }

    /// Number of pages in the store
    pub fn len(&self) -> usize {
        self.pages.len()
    }

    /// Whether the store holds no pages at all
    pub fn is_empty(&self) -> bool {
        self.pages.is_empty()
    }

    /// All pages in document order
    pub fn pages(&self) -> &[Page] {
        &self.pages
    }

    /// Look up a page by 0-based index
    pub fn get(&self, index: usize) -> Option<&Page> {
        self.pages.get(index)
    }
}

/// Source of ordered pages for the pipeline.
///
/// Implementations turn a document path into a `PageStore`. Extraction
/// failures are fatal for the whole run.
pub trait PageExtractor: Send + Sync {
    /// Extract all pages from the document at `path`
    fn extract(&self, path: &Path) -> Result<PageStore, ExtractionError>;
}

/// Extractor that shells out to `pdftotext` and splits its output on
/// form-feed characters.
pub struct PdftotextExtractor {
    /// Pass `-layout` to preserve the original physical layout
    pub layout: bool,
}

impl Default for PdftotextExtractor {
    fn default() -> Self {
        Self { layout: true }
    }
}

impl PageExtractor for PdftotextExtractor {
    fn extract(&self, path: &Path) -> Result<PageStore, ExtractionError> {
        let mut command = Command::new("pdftotext");
        if self.layout {
            command.arg("-layout");
        }
        // "-" sends the text to stdout, one form feed per page break
        let output = command.arg(path).arg("-").output()?;

        if !output.status.success() {
            return Err(ExtractionError::ToolFailed {
                code: output.status.code(),
                stderr: String::from_utf8_lossy(&output.stderr).to_string(),
            });
        }

        let text =
            String::from_utf8(output.stdout).map_err(|_| ExtractionError::InvalidOutput)?;

        let store = split_pages(&text);
        debug!("Extracted {} page(s) from {:?}", store.len(), path);
        Ok(store)
    }
}

/// Extractor for plain-text dumps where pages are separated by form feeds.
///
/// A file without any form feed is treated as a single page.
pub struct PlainTextExtractor;

impl PageExtractor for PlainTextExtractor {
    fn extract(&self, path: &Path) -> Result<PageStore, ExtractionError> {
        let text = std::fs::read_to_string(path)?;
        let store = split_pages(&text);
        debug!("Loaded {} page(s) from {:?}", store.len(), path);
        Ok(store)
    }
}

/// Split extracted text on form feeds into page texts.
///
/// A trailing form feed (pdftotext emits one after the last page) does not
/// produce an extra empty page, and a completely blank document yields an
/// empty store.
fn split_pages(text: &str) -> PageStore {
    let mut texts: Vec<String> = text.split('\u{0C}').map(|p| p.trim_end().to_string()).collect();

    while texts.last().is_some_and(|p| p.trim().is_empty()) {
        texts.pop();
    }
    if texts.len() == 1 && texts[0].trim().is_empty() {
        texts.clear();
    }

    PageStore::from_texts(texts)
}
