/*!
 * Retry selection and artifact reconciliation.
 *
 * Batch state is recomputed from the persisted artifacts, never from
 * in-memory leftovers, so a retry can run in a fresh process long after
 * the original translation pass.
 */

use anyhow::Result;

use crate::errors::PipelineError;
use crate::quality::{BatchStatus, DivergencePolicy, count_paragraphs};
use crate::workspace::Workspace;

/// Which batches a retry should cover.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetrySelection {
    /// An explicit list of batch ids
    Ids(Vec<u32>),
    /// Every batch currently diverged, failed or untranslated
    AllDiverged,
}

/// Per-batch state recomputed from the workspace artifacts.
#[derive(Debug, Clone)]
pub struct BatchRecord {
    pub id: u32,
    /// Paragraph count of the persisted raw source
    pub source_paragraphs: usize,
    /// Paragraph count of the persisted translation, if one exists
    pub translated_paragraphs: Option<usize>,
    pub status: BatchStatus,
}

/// Recomputes batch state and resolves retry selections.
pub struct RetryController {
    workspace: Workspace,
    policy: DivergencePolicy,
}

impl RetryController {
    pub fn new(workspace: Workspace, policy: DivergencePolicy) -> Self {
        Self { workspace, policy }
    }

    /// Rebuild the state of every batch from the artifacts on disk.
    pub fn scan(&self) -> Result<Vec<BatchRecord>> {
        let mut records = Vec::new();
        for id in self.workspace.raw_ids()? {
            let source = self.workspace.load_raw(id)?;
            let source_paragraphs = count_paragraphs(&source);
            let record = if self.workspace.has_translated(id) {
                let translated = self.workspace.load_translated(id)?;
                let translated_paragraphs = count_paragraphs(&translated);
                BatchRecord {
                    id,
                    source_paragraphs,
                    translated_paragraphs: Some(translated_paragraphs),
                    status: self.policy.classify(source_paragraphs, translated_paragraphs),
                }
            } else {
                BatchRecord {
                    id,
                    source_paragraphs,
                    translated_paragraphs: None,
                    status: BatchStatus::Pending,
                }
            };
            records.push(record);
        }
        Ok(records)
    }

    /// Resolve a selection to concrete batch ids, ascending.
    ///
    /// Explicit ids must have a persisted raw source; unknown ids are an
    /// error so a typo cannot silently do nothing.
    pub fn resolve(&self, selection: &RetrySelection) -> Result<Vec<u32>> {
        match selection {
            RetrySelection::Ids(ids) => {
                let mut resolved = ids.clone();
                resolved.sort_unstable();
                resolved.dedup();
                for &id in &resolved {
                    if !self.workspace.has_raw(id) {
                        return Err(PipelineError::UnknownBatch(id).into());
                    }
                }
                Ok(resolved)
            }
            RetrySelection::AllDiverged => Ok(self
                .scan()?
                .into_iter()
                .filter(|r| r.status.needs_retry() || r.status == BatchStatus::Pending)
                .map(|r| r.id)
                .collect()),
        }
    }
}
