/*!
 * On-disk layout of a translation run.
 *
 * Everything a run produces lives under one output directory:
 *
 * ```text
 * out/
 *   raw_content/batch_001.txt   raw source per batch (ground truth)
 *   chap_md/batch_001.md        current translation per batch
 *   chap_md/batch_001.md.bak    previous translation, kept until replaced
 *   glossary.tsv                terminology store
 *   style_cache.txt             persisted style summary
 *   translation_report.txt      end-of-run report
 *   translated_document.md      assembled document
 * ```
 */

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use once_cell::sync::Lazy;
use regex::Regex;

use crate::file_utils::FileManager;

static BATCH_FILE_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^batch_(\d+)\.(txt|md)$").unwrap());

/// Handle on the output directory of one document.
#[derive(Debug, Clone)]
pub struct Workspace {
    root: PathBuf,
}

impl Workspace {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn raw_dir(&self) -> PathBuf {
        self.root.join("raw_content")
    }

    fn translated_dir(&self) -> PathBuf {
        self.root.join("chap_md")
    }

    /// Path of the raw source artifact for a batch
    pub fn raw_path(&self, id: u32) -> PathBuf {
        self.raw_dir().join(format!("batch_{:03}.txt", id))
    }

    /// Path of the current translation for a batch
    pub fn translated_path(&self, id: u32) -> PathBuf {
        self.translated_dir().join(format!("batch_{:03}.md", id))
    }

    /// Path of the backup kept when a translation is replaced
    pub fn backup_path(&self, id: u32) -> PathBuf {
        self.translated_dir().join(format!("batch_{:03}.md.bak", id))
    }

    pub fn glossary_path(&self) -> PathBuf {
        self.root.join("glossary.tsv")
    }

    pub fn style_cache_path(&self) -> PathBuf {
        self.root.join("style_cache.txt")
    }

    pub fn report_path(&self) -> PathBuf {
        self.root.join("translation_report.txt")
    }

    pub fn document_path(&self, name: &str) -> PathBuf {
        self.root.join(name)
    }

    /// Persist the raw source of a batch
    pub fn save_raw(&self, id: u32, text: &str) -> Result<()> {
        FileManager::write_to_file(self.raw_path(id), text)
    }

    /// Load the raw source of a batch
    pub fn load_raw(&self, id: u32) -> Result<String> {
        FileManager::read_to_string(self.raw_path(id))
            .with_context(|| format!("No raw source artifact for batch {}", id))
    }

    pub fn has_raw(&self, id: u32) -> bool {
        FileManager::file_exists(self.raw_path(id))
    }

    pub fn has_translated(&self, id: u32) -> bool {
        FileManager::file_exists(self.translated_path(id))
    }

    /// Persist a batch translation, backing up any existing one first.
    pub fn save_translated(&self, id: u32, text: &str) -> Result<()> {
        let path = self.translated_path(id);
        if FileManager::file_exists(&path) {
            FileManager::copy_file(&path, self.backup_path(id))
                .with_context(|| format!("Failed to back up translation of batch {}", id))?;
        }
        FileManager::write_to_file(path, text)
    }

    pub fn load_translated(&self, id: u32) -> Result<String> {
        FileManager::read_to_string(self.translated_path(id))
            .with_context(|| format!("No translation artifact for batch {}", id))
    }

    /// Batch ids that have a persisted raw source, ascending
    pub fn raw_ids(&self) -> Result<Vec<u32>> {
        self.scan_ids(&self.raw_dir(), "txt")
    }

    /// Batch ids that have a persisted translation, ascending
    pub fn translated_ids(&self) -> Result<Vec<u32>> {
        self.scan_ids(&self.translated_dir(), "md")
    }

    fn scan_ids(&self, dir: &Path, extension: &str) -> Result<Vec<u32>> {
        if !FileManager::dir_exists(dir) {
            return Ok(Vec::new());
        }
        let mut ids = Vec::new();
        for path in FileManager::find_files(dir, extension)? {
            let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
                continue;
            };
            if let Some(cap) = BATCH_FILE_RE.captures(name) {
                if let Ok(id) = cap[1].parse::<u32>() {
                    ids.push(id);
                }
            }
        }
        ids.sort_unstable();
        ids.dedup();
        Ok(ids)
    }

    pub fn load_style_cache(&self) -> Option<String> {
        FileManager::read_to_string(self.style_cache_path())
            .ok()
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
    }

    pub fn save_style_cache(&self, summary: &str) -> Result<()> {
        FileManager::write_to_file(self.style_cache_path(), summary)
    }

    pub fn save_report(&self, content: &str) -> Result<()> {
        FileManager::write_to_file(self.report_path(), content)
    }

    pub fn save_document(&self, name: &str, content: &str) -> Result<()> {
        FileManager::write_to_file(self.document_path(name), content)
    }
}
