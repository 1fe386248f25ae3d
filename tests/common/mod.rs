/*!
 * Common test utilities shared across the bookwai test suite
 */

use std::path::{Path, PathBuf};

use bookwai::app_config::Config;
use bookwai::extraction::PageStore;

/// Build a form-feed separated document of `n_pages` pages, each holding
/// `paras_per_page` complete-sentence paragraphs.
pub fn sample_document(n_pages: usize, paras_per_page: usize) -> String {
    let mut pages = Vec::new();
    for p in 1..=n_pages {
        let mut paragraphs = Vec::new();
        for q in 1..=paras_per_page {
            paragraphs.push(format!("Page {} paragraph {} says something complete.", p, q));
        }
        pages.push(paragraphs.join("\n\n"));
    }
    pages.join("\u{0C}")
}

/// Page store equivalent of `sample_document`, for segmenter-level tests.
pub fn sample_store(n_pages: usize, paras_per_page: usize) -> PageStore {
    let mut texts = Vec::new();
    for p in 1..=n_pages {
        let mut paragraphs = Vec::new();
        for q in 1..=paras_per_page {
            paragraphs.push(format!("Page {} paragraph {} says something complete.", p, q));
        }
        texts.push(paragraphs.join("\n\n"));
    }
    PageStore::from_texts(texts)
}

/// Write a source document into a directory and return its path.
pub fn write_source(dir: &Path, name: &str, content: &str) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, content).expect("failed to write test source");
    path
}

/// A configuration tuned for tests: no pacing delays, no style probe,
/// tiny backoff.
pub fn test_config(pages_per_batch: usize) -> Config {
    let mut config = Config::default();
    config.pipeline.pages_per_batch = pages_per_batch;
    config.pipeline.style_context = false;
    config.translation.common.rate_limit_delay_ms = 0;
    config.translation.common.retry_backoff_ms = 1;
    config.translation.common.retry_count = 2;
    config
}
