/*!
 * Targeted re-translation tests
 */

use std::sync::Arc;

use bookwai::app_controller::Controller;
use bookwai::providers::mock::MockProvider;
use bookwai::reconcile::RetrySelection;
use tempfile::tempdir;

use crate::common::{sample_document, test_config, write_source};

/// First pass with a provider that drops paragraphs on the second batch,
/// leaving it diverged on the absolute-delta rule (15 source vs 1).
async fn diverged_run(dir: &std::path::Path) -> std::path::PathBuf {
    let source = write_source(dir, "book.txt", &sample_document(12, 3));
    let out = dir.join("out");
    let controller = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::dropping(2)),
        &out,
    );
    let summary = controller.run_translate(&source, false).await.unwrap();
    assert_eq!(summary.diverged, vec![2]);
    assert_eq!(summary.ok, vec![1, 3]);
    out
}

#[tokio::test]
async fn test_runRetry_allDiverged_shouldReplaceOnlyTheDivergedBatch() {
    let dir = tempdir().unwrap();
    let out = diverged_run(dir.path()).await;

    let retry = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::working()),
        &out,
    );
    let ws = retry.workspace();
    let batch_1_before = std::fs::read(ws.translated_path(1)).unwrap();
    let batch_2_before = std::fs::read_to_string(ws.translated_path(2)).unwrap();
    let batch_3_before = std::fs::read(ws.translated_path(3)).unwrap();

    let summary = retry.run_retry(RetrySelection::AllDiverged).await.unwrap();
    assert!(summary.is_clean());
    assert_eq!(summary.total(), 3);

    // Untouched batches are byte-identical, the diverged one is rebuilt
    assert_eq!(std::fs::read(ws.translated_path(1)).unwrap(), batch_1_before);
    assert_eq!(std::fs::read(ws.translated_path(3)).unwrap(), batch_3_before);
    let batch_2_after = std::fs::read_to_string(ws.translated_path(2)).unwrap();
    assert_ne!(batch_2_after, batch_2_before);
    assert!(batch_2_after.contains("[xlated] Page 10 paragraph 3"));

    // The replaced translation is kept as a backup
    let backup = std::fs::read_to_string(ws.backup_path(2)).unwrap();
    assert_eq!(backup, batch_2_before);

    // The whole document is reassembled with the repaired batch in place
    let document =
        std::fs::read_to_string(ws.document_path("translated_document.md")).unwrap();
    assert!(document.contains("[xlated] Page 7 paragraph 1"));
}

#[tokio::test]
async fn test_runRetry_allDiverged_afterCleanRun_shouldSelectNothing() {
    let dir = tempdir().unwrap();
    let out = diverged_run(dir.path()).await;

    let retry = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::working()),
        &out,
    );
    assert!(retry.run_retry(RetrySelection::AllDiverged).await.unwrap().is_clean());
    let document_before =
        std::fs::read(retry.workspace().document_path("translated_document.md")).unwrap();

    // A second sweep finds nothing outstanding and leaves the document alone
    let mock = MockProvider::working();
    let probe = mock.clone();
    let again = Controller::with_provider(test_config(5), Arc::new(mock), &out);
    let summary = again.run_retry(RetrySelection::AllDiverged).await.unwrap();

    assert!(summary.is_clean());
    assert_eq!(probe.requests_seen(), 0);
    let document_after =
        std::fs::read(again.workspace().document_path("translated_document.md")).unwrap();
    assert_eq!(document_before, document_after);
}

#[tokio::test]
async fn test_runRetry_withExplicitOkBatchId_shouldBeANoOpBesidesBackup() {
    let dir = tempdir().unwrap();
    let source = write_source(dir.path(), "book.txt", &sample_document(12, 2));
    let out = dir.path().join("out");

    let first = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::working()),
        &out,
    );
    assert!(first.run_translate(&source, false).await.unwrap().is_clean());

    let mock = MockProvider::working();
    let probe = mock.clone();
    let retry = Controller::with_provider(test_config(5), Arc::new(mock), &out);
    let ws = retry.workspace();
    let batch_1_before = std::fs::read(ws.translated_path(1)).unwrap();
    let batch_2_before = std::fs::read(ws.translated_path(2)).unwrap();
    let batch_3_before = std::fs::read(ws.translated_path(3)).unwrap();
    let document_before =
        std::fs::read(ws.document_path("translated_document.md")).unwrap();

    // Retrying a healthy batch is legal; it re-translates but changes
    // neither the classification nor the document order
    let summary = retry.run_retry(RetrySelection::Ids(vec![1])).await.unwrap();

    assert!(summary.is_clean());
    assert_eq!(summary.total(), 3);
    assert_eq!(probe.requests_seen(), 1);

    // The replaced output is backed up; the other batches are untouched
    assert_eq!(std::fs::read(ws.backup_path(1)).unwrap(), batch_1_before);
    assert_eq!(std::fs::read(ws.translated_path(1)).unwrap(), batch_1_before);
    assert_eq!(std::fs::read(ws.translated_path(2)).unwrap(), batch_2_before);
    assert_eq!(std::fs::read(ws.translated_path(3)).unwrap(), batch_3_before);
    let document_after =
        std::fs::read(ws.document_path("translated_document.md")).unwrap();
    assert_eq!(document_before, document_after);
}

#[tokio::test]
async fn test_runRetry_withFailingProvider_shouldKeepPreviousOutput() {
    let dir = tempdir().unwrap();
    let out = diverged_run(dir.path()).await;

    let retry = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::failing()),
        &out,
    );
    let ws = retry.workspace();
    let batch_2_before = std::fs::read(ws.translated_path(2)).unwrap();

    let summary = retry
        .run_retry(RetrySelection::Ids(vec![2]))
        .await
        .unwrap();

    assert_eq!(summary.failed, vec![2]);
    assert_eq!(std::fs::read(ws.translated_path(2)).unwrap(), batch_2_before);
}

#[tokio::test]
async fn test_runRetry_withUnknownBatchId_shouldFail() {
    let dir = tempdir().unwrap();
    let out = diverged_run(dir.path()).await;

    let retry = Controller::with_provider(
        test_config(5),
        Arc::new(MockProvider::working()),
        &out,
    );
    let result = retry.run_retry(RetrySelection::Ids(vec![2, 99])).await;
    assert!(result.is_err());
    assert!(result.unwrap_err().to_string().contains("99"));
}
