/*!
 * Application controller.
 *
 * Orchestrates a full translation run: extraction, segmentation, the
 * sequential batch loop with resume and divergence checks, glossary
 * persistence, document assembly and report generation. Also drives
 * targeted re-translation of selected batches.
 */

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use chrono::Local;
use indicatif::{ProgressBar, ProgressStyle};
use log::{debug, error, info, warn};
use rand::Rng;

use crate::app_config::Config;
use crate::assembler::Assembler;
use crate::extraction::{PageExtractor, PageStore, PdftotextExtractor, PlainTextExtractor};
use crate::glossary::GlossaryStore;
use crate::providers::{create_provider, ChatProvider};
use crate::quality::{count_paragraphs, BatchStatus, DivergencePolicy};
use crate::reconcile::{RetryController, RetrySelection};
use crate::segmenter::BatchSegmenter;
use crate::titles::TitleClassifier;
use crate::translation::{StyleContext, TokenUsageStats, TranslationDriver};
use crate::workspace::Workspace;

/// Outcome of a translate or retry run.
#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    /// Batches within divergence bounds
    pub ok: Vec<u32>,
    /// Batches translated but diverged
    pub diverged: Vec<u32>,
    /// Batches with no usable translation after all attempts
    pub failed: Vec<u32>,
}

impl RunSummary {
    pub fn total(&self) -> usize {
        self.ok.len() + self.diverged.len() + self.failed.len()
    }

    pub fn is_clean(&self) -> bool {
        self.diverged.is_empty() && self.failed.is_empty()
    }

    /// Batch ids that still need attention, ascending
    pub fn outstanding(&self) -> Vec<u32> {
        let mut ids: Vec<u32> = self
            .diverged
            .iter()
            .chain(self.failed.iter())
            .copied()
            .collect();
        ids.sort_unstable();
        ids.dedup();
        ids
    }
}

/// Main controller for the document translation pipeline.
pub struct Controller {
    config: Config,
    driver: TranslationDriver,
    workspace: Workspace,
    policy: DivergencePolicy,
    titles: TitleClassifier,
    usage: TokenUsageStats,
}

impl Controller {
    /// Create a controller with the provider selected by the configuration.
    pub fn with_config(config: Config, output_dir: impl Into<PathBuf>) -> Result<Self> {
        let provider = create_provider(&config)?;
        Ok(Self::with_provider(config, provider, output_dir))
    }

    /// Create a controller around an explicit provider handle.
    pub fn with_provider(
        config: Config,
        provider: Arc<dyn ChatProvider>,
        output_dir: impl Into<PathBuf>,
    ) -> Self {
        let driver = TranslationDriver::new(provider, config.driver_settings());
        let policy = config.divergence_policy();
        let titles = TitleClassifier::new(config.pipeline.title_max_len);
        Self {
            config,
            driver,
            workspace: Workspace::new(output_dir),
            policy,
            titles,
            usage: TokenUsageStats::new(),
        }
    }

    pub fn workspace(&self) -> &Workspace {
        &self.workspace
    }

    /// Translate a whole document.
    ///
    /// Batches that already have a persisted translation are resumed, not
    /// re-sent, unless `force` is set. Per-batch failures never halt the
    /// run; a best-effort document is always assembled at the end.
    pub async fn run_translate(&self, input: &Path, force: bool) -> Result<RunSummary> {
        let store = self.extract(input)?;
        if store.is_empty() {
            info!("Nothing to translate: {:?} produced no pages", input);
            return Ok(RunSummary::default());
        }

        let segmenter = BatchSegmenter::new(self.config.segmenter_config());
        let batches = segmenter.segment(&store);
        info!(
            "Segmented {} page(s) into {} batch(es)",
            store.len(),
            batches.len()
        );
        for batch in &batches {
            self.workspace.save_raw(batch.id, &batch.raw_text)?;
        }

        let mut glossary = self.load_glossary()?;
        let mut style = StyleContext::new(self.config.pipeline.style_excerpt_chars);
        let mut called_provider = false;
        if self.config.pipeline.style_context {
            self.bootstrap_style(&mut style, &batches, &mut called_provider)
                .await;
        }

        let progress = batch_progress(batches.len() as u64);
        let mut failed_now: Vec<u32> = Vec::new();
        let mut missing_ledger: BTreeMap<u32, Vec<u32>> = BTreeMap::new();

        for batch in &batches {
            progress.set_message(format!("batch {:03}", batch.id));

            if !force && self.workspace.has_translated(batch.id) {
                debug!("Batch {:03} already translated, resuming from cache", batch.id);
                let text = self.workspace.load_translated(batch.id)?;
                let status = self
                    .policy
                    .classify(batch.source_paragraph_count, count_paragraphs(&text));
                if status == BatchStatus::Ok {
                    style.update_recent(&text);
                }
                progress.inc(1);
                continue;
            }

            self.pace(&mut called_provider).await;
            let hints = self.titles.scan(&batch.raw_text);
            let terms = glossary.relevant_terms(&batch.raw_text);
            match self
                .driver
                .translate(&batch.raw_text, &terms, &hints, &style, &self.usage)
                .await
            {
                Ok(translation) => {
                    let status = self
                        .policy
                        .classify(batch.source_paragraph_count, translation.paragraph_count);
                    if status == BatchStatus::Diverged {
                        warn!(
                            "Batch {:03} diverged: {} source vs {} translated paragraph(s)",
                            batch.id, batch.source_paragraph_count, translation.paragraph_count
                        );
                    }
                    if !translation.missing.is_empty() {
                        warn!(
                            "Batch {:03} has untranslatable segment(s): {:?}",
                            batch.id, translation.missing
                        );
                        missing_ledger.insert(batch.id, translation.missing.clone());
                    }
                    if glossary.merge(translation.new_terms.clone()) > 0 {
                        if let Err(e) = glossary.save(self.workspace.glossary_path()) {
                            warn!("Failed to persist glossary: {}", e);
                        }
                    }
                    self.workspace.save_translated(batch.id, &translation.text)?;
                    if status == BatchStatus::Ok {
                        style.update_recent(&translation.text);
                    }
                }
                Err(e) => {
                    error!("Batch {:03} failed after all attempts: {}", batch.id, e);
                    failed_now.push(batch.id);
                }
            }
            progress.inc(1);
        }
        progress.finish_and_clear();

        // Persist the glossary once more so a run with no new terms still
        // leaves the seeded state on disk.
        glossary
            .save(self.workspace.glossary_path())
            .context("Failed to persist glossary")?;

        self.finish_run(&failed_now, &missing_ledger)
    }

    /// Re-translate a selection of batches from their persisted raw
    /// sources, then reassemble the whole document.
    pub async fn run_retry(&self, selection: RetrySelection) -> Result<RunSummary> {
        let retry = RetryController::new(self.workspace.clone(), self.policy);
        let ids = retry.resolve(&selection)?;
        if ids.is_empty() {
            info!("No batches selected for retry");
            return self.finish_run(&[], &BTreeMap::new());
        }
        info!("Retrying {} batch(es): {:?}", ids.len(), ids);

        let mut glossary = self.load_glossary()?;
        let mut style = StyleContext::new(self.config.pipeline.style_excerpt_chars);
        if let Some(cached) = self.workspace.load_style_cache() {
            style.set_base(cached);
        }

        let mut failed_now: Vec<u32> = Vec::new();
        let mut missing_ledger: BTreeMap<u32, Vec<u32>> = BTreeMap::new();
        let mut called_provider = false;
        for &id in &ids {
            // Always from the raw source, never from a prior translation
            let raw_text = self.workspace.load_raw(id)?;
            let source_count = count_paragraphs(&raw_text);
            self.pace(&mut called_provider).await;
            let hints = self.titles.scan(&raw_text);
            let terms = glossary.relevant_terms(&raw_text);
            match self
                .driver
                .translate(&raw_text, &terms, &hints, &style, &self.usage)
                .await
            {
                Ok(translation) => {
                    let status = self.policy.classify(source_count, translation.paragraph_count);
                    if status == BatchStatus::Diverged {
                        warn!(
                            "Batch {:03} still diverged after retry: {} vs {}",
                            id, source_count, translation.paragraph_count
                        );
                    }
                    if !translation.missing.is_empty() {
                        missing_ledger.insert(id, translation.missing.clone());
                    }
                    if glossary.merge(translation.new_terms.clone()) > 0 {
                        if let Err(e) = glossary.save(self.workspace.glossary_path()) {
                            warn!("Failed to persist glossary: {}", e);
                        }
                    }
                    // save_translated keeps the previous output as .bak
                    self.workspace.save_translated(id, &translation.text)?;
                }
                Err(e) => {
                    error!("Retry of batch {:03} failed, keeping previous output: {}", id, e);
                    failed_now.push(id);
                }
            }
        }

        self.finish_run(&failed_now, &missing_ledger)
    }

    fn extract(&self, input: &Path) -> Result<PageStore> {
        let is_pdf = input
            .extension()
            .is_some_and(|ext| ext.to_string_lossy().eq_ignore_ascii_case("pdf"));
        let store = if is_pdf {
            PdftotextExtractor::default().extract(input)?
        } else {
            PlainTextExtractor.extract(input)?
        };
        Ok(store)
    }

    fn load_glossary(&self) -> Result<GlossaryStore> {
        let mut glossary = GlossaryStore::load(self.workspace.glossary_path())?;
        // Seed entries from the configuration win over persisted ones
        glossary.merge(self.config.glossary_seed.clone());
        Ok(glossary)
    }

    /// Capture or restore the style summary before the batch loop.
    async fn bootstrap_style(
        &self,
        style: &mut StyleContext,
        batches: &[crate::segmenter::Batch],
        called_provider: &mut bool,
    ) {
        if let Some(cached) = self.workspace.load_style_cache() {
            style.set_base(cached);
            return;
        }
        // Probe over a sample from the middle of the document
        let sample_batch = if batches.len() >= 4 {
            let mut rng = rand::rng();
            rng.random_range(batches.len() / 4..3 * batches.len() / 4)
        } else {
            0
        };
        let sample: String = batches[sample_batch].raw_text.chars().take(2000).collect();
        *called_provider = true;
        match self.driver.summarize_style(&sample, &self.usage).await {
            Ok(summary) if !summary.is_empty() => {
                if let Err(e) = self.workspace.save_style_cache(&summary) {
                    warn!("Failed to persist style cache: {}", e);
                }
                style.set_base(summary);
            }
            Ok(_) => warn!("Style probe returned an empty summary"),
            Err(e) => warn!("Style probe failed, continuing without it: {}", e),
        }
    }

    /// Sleep the configured delay between consecutive provider calls.
    async fn pace(&self, called_provider: &mut bool) {
        let delay = self.config.translation.common.rate_limit_delay_ms;
        if *called_provider && delay > 0 {
            tokio::time::sleep(Duration::from_millis(delay)).await;
        }
        *called_provider = true;
    }

    /// Assemble the document, write the report and build the run summary.
    ///
    /// Everything is derived from the artifacts on disk so the result is
    /// the same whether this follows a full run or a targeted retry.
    fn finish_run(
        &self,
        failed_now: &[u32],
        missing_ledger: &BTreeMap<u32, Vec<u32>>,
    ) -> Result<RunSummary> {
        let retry = RetryController::new(self.workspace.clone(), self.policy);
        let records = retry.scan()?;

        let mut summary = RunSummary::default();
        for record in &records {
            match record.status {
                BatchStatus::Ok => summary.ok.push(record.id),
                BatchStatus::Diverged => summary.diverged.push(record.id),
                _ => summary.failed.push(record.id),
            }
        }
        for &id in failed_now {
            if !summary.failed.contains(&id) {
                summary.failed.push(id);
                summary.ok.retain(|&x| x != id);
                summary.diverged.retain(|&x| x != id);
            }
        }
        summary.failed.sort_unstable();

        // Best-effort document from every current translation
        let mut parts = Vec::new();
        for id in self.workspace.translated_ids()? {
            parts.push((id, self.workspace.load_translated(id)?));
        }
        let document = Assembler::assemble(parts);
        self.workspace
            .save_document(&self.config.document_name, &document)?;

        let report = self.render_report(&records, &summary, missing_ledger);
        self.workspace.save_report(&report)?;

        if summary.is_clean() {
            info!("All {} batch(es) translated cleanly", summary.total());
        } else {
            warn!(
                "Run finished with outstanding batch(es): {:?}",
                summary.outstanding()
            );
        }
        info!("Token usage: {}", self.usage.summary());
        Ok(summary)
    }

    fn render_report(
        &self,
        records: &[crate::reconcile::BatchRecord],
        summary: &RunSummary,
        missing_ledger: &BTreeMap<u32, Vec<u32>>,
    ) -> String {
        let mut report = format!(
            "Translation report - {}\n\nbatch  source_paragraphs  translated_paragraphs  status\n",
            Local::now().format("%Y-%m-%d %H:%M:%S")
        );
        for record in records {
            let translated = record
                .translated_paragraphs
                .map_or("-".to_string(), |n| n.to_string());
            let status = if summary.failed.contains(&record.id) {
                BatchStatus::Failed.to_string()
            } else {
                record.status.to_string()
            };
            report.push_str(&format!(
                "{:05}  {:17}  {:21}  {}\n",
                record.id, record.source_paragraphs, translated, status
            ));
        }
        let outstanding = summary.outstanding();
        if outstanding.is_empty() {
            report.push_str("\nAll batches within divergence bounds.\n");
        } else {
            report.push_str(&format!("\nOutstanding batches: {:?}\n", outstanding));
        }
        if !missing_ledger.is_empty() {
            report.push_str("\nUntranslatable segments:\n");
            for (id, tags) in missing_ledger {
                report.push_str(&format!("  batch {:03}: paragraphs {:?}\n", id, tags));
            }
        }
        report.push_str(&format!("\nToken usage: {}\n", self.usage.summary()));
        report
    }
}

fn batch_progress(len: u64) -> ProgressBar {
    let progress = ProgressBar::new(len);
    progress.set_style(
        ProgressStyle::with_template("[{bar:40.cyan/blue}] {pos}/{len} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("=>-"),
    );
    progress
}
