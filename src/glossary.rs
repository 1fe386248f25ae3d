/*!
 * Terminology glossary shared across batches.
 *
 * The glossary grows as the model declares new proper-noun renderings and
 * is re-injected into later prompts so names stay consistent over a long
 * document. It persists as a two-column TSV file, sorted by source term.
 */

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::{Context, Result};

use crate::file_utils::FileManager;

/// In-memory glossary of `source term -> target rendering`.
#[derive(Debug, Clone, Default)]
pub struct GlossaryStore {
    entries: BTreeMap<String, String>,
}

impl GlossaryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a glossary from a TSV file. A missing file yields an empty
    /// store; malformed lines are skipped.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        if !FileManager::file_exists(path) {
            return Ok(Self::new());
        }
        let content = FileManager::read_to_string(path)?;
        let mut store = Self::new();
        for line in content.lines() {
            if let Some((term, rendering)) = line.split_once('\t') {
                let term = term.trim();
                let rendering = rendering.trim();
                if !term.is_empty() && !rendering.is_empty() {
                    store.entries.insert(term.to_string(), rendering.to_string());
                }
            }
        }
        Ok(store)
    }

    /// Write the glossary as sorted TSV.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let mut out = String::new();
        for (term, rendering) in &self.entries {
            out.push_str(term);
            out.push('\t');
            out.push_str(rendering);
            out.push('\n');
        }
        FileManager::write_to_file(path.as_ref(), &out)
            .with_context(|| format!("Failed to save glossary to {:?}", path.as_ref()))
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Current rendering for a term, if any
    pub fn get(&self, term: &str) -> Option<&str> {
        self.entries.get(term).map(String::as_str)
    }

    /// Insert or overwrite a single entry. The newest rendering always
    /// wins; there is never more than one entry per term.
    pub fn insert(&mut self, term: impl Into<String>, rendering: impl Into<String>) {
        self.entries.insert(term.into(), rendering.into());
    }

    /// Merge a set of entries, newest-wins. Returns how many entries were
    /// added or changed.
    pub fn merge<I>(&mut self, new_entries: I) -> usize
    where
        I: IntoIterator<Item = (String, String)>,
    {
        let mut changed = 0;
        for (term, rendering) in new_entries {
            let term = term.trim().to_string();
            let rendering = rendering.trim().to_string();
            if term.is_empty() || rendering.is_empty() {
                continue;
            }
            if self.entries.get(&term).map(String::as_str) != Some(rendering.as_str()) {
                changed += 1;
            }
            self.entries.insert(term, rendering);
        }
        changed
    }

    /// Point-in-time copy of all entries, sorted by term.
    pub fn snapshot(&self) -> Vec<(String, String)> {
        self.entries
            .iter()
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }

    /// Entries whose source term occurs in `text`. Keeps prompts small on
    /// large glossaries.
    pub fn relevant_terms(&self, text: &str) -> Vec<(String, String)> {
        self.entries
            .iter()
            .filter(|(term, _)| text.contains(term.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect()
    }
}
