/*!
 * Tests for paragraph-count divergence classification
 */

use bookwai::quality::{count_paragraphs, BatchStatus, DivergencePolicy};

#[test]
fn test_classify_withTwentyPercentDrop_shouldDivergeOnAbsoluteRule() {
    let policy = DivergencePolicy::default();
    // ratio is exactly 0.20 (not strictly above) but the delta of 20
    // exceeds the absolute cap of 10
    assert_eq!(policy.classify(100, 80), BatchStatus::Diverged);
}

#[test]
fn test_classify_withTwentyOnePercentDrop_shouldDiverge() {
    let policy = DivergencePolicy::default();
    assert_eq!(policy.classify(100, 79), BatchStatus::Diverged);
}

#[test]
fn test_classify_withInflatedCount_shouldDiverge() {
    let policy = DivergencePolicy::default();
    // drift counts in both directions
    assert_eq!(policy.classify(5, 20), BatchStatus::Diverged);
}

#[test]
fn test_classify_withSmallDrift_shouldBeOk() {
    let policy = DivergencePolicy::default();
    assert_eq!(policy.classify(50, 48), BatchStatus::Ok);
    assert_eq!(policy.classify(50, 50), BatchStatus::Ok);
}

#[test]
fn test_classify_withBothThresholdsAtBoundary_shouldBeOk() {
    let policy = DivergencePolicy::default();
    // delta 10 of 50: ratio exactly 0.20 and delta exactly 10, both
    // comparisons are strict
    assert_eq!(policy.classify(50, 40), BatchStatus::Ok);
}

#[test]
fn test_classify_withZeroSource_shouldNotPanic() {
    let policy = DivergencePolicy::default();
    assert_eq!(policy.classify(0, 0), BatchStatus::Ok);
    assert_eq!(policy.classify(0, 11), BatchStatus::Diverged);
}

#[test]
fn test_classify_withCustomThresholds_shouldUseThem() {
    let policy = DivergencePolicy {
        max_ratio: 0.5,
        max_abs_delta: 100,
    };
    assert_eq!(policy.classify(100, 60), BatchStatus::Ok);
    assert_eq!(policy.classify(100, 40), BatchStatus::Diverged);
}

#[test]
fn test_countParagraphs_withMixedSpacing_shouldCountBlocks() {
    assert_eq!(count_paragraphs("a\n\nb\n\n\n\nc"), 3);
    assert_eq!(count_paragraphs("multi\nline\nblock"), 1);
    assert_eq!(count_paragraphs("  \n\t\n"), 0);
}

#[test]
fn test_needsRetry_shouldCoverDivergedAndFailed() {
    assert!(BatchStatus::Diverged.needs_retry());
    assert!(BatchStatus::Failed.needs_retry());
    assert!(BatchStatus::RetryPending.needs_retry());
    assert!(!BatchStatus::Ok.needs_retry());
    assert!(!BatchStatus::Pending.needs_retry());
}
