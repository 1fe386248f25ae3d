/*!
 * Tests for batch segmentation
 */

use bookwai::extraction::PageStore;
use bookwai::segmenter::{BatchSegmenter, SegmenterConfig};

use crate::common::sample_store;

fn segmenter(pages_per_batch: usize) -> BatchSegmenter {
    BatchSegmenter::new(SegmenterConfig {
        pages_per_batch,
        ..SegmenterConfig::default()
    })
}

/// Page ownership must partition the document for any batch size.
#[test]
fn test_segment_withVariousBatchSizes_shouldPartitionPages() {
    for n_pages in [1usize, 2, 7, 12, 23] {
        for pages_per_batch in [1usize, 3, 5, 8] {
            let store = sample_store(n_pages, 2);
            let batches = segmenter(pages_per_batch).segment(&store);

            assert!(!batches.is_empty());
            assert_eq!(batches[0].start_page, 1);
            assert_eq!(batches[batches.len() - 1].end_page, n_pages);
            for window in batches.windows(2) {
                assert_eq!(
                    window[1].start_page,
                    window[0].end_page + 1,
                    "gap or overlap between batches for {} pages / {} per batch",
                    n_pages,
                    pages_per_batch
                );
            }
            for (i, batch) in batches.iter().enumerate() {
                assert_eq!(batch.id, (i + 1) as u32);
                assert!(batch.start_page <= batch.end_page);
            }
        }
    }
}

#[test]
fn test_segment_withTwelvePagesAndFive_shouldYieldThreeBatches() {
    let store = sample_store(12, 2);
    let batches = segmenter(5).segment(&store);
    assert_eq!(batches.len(), 3);
    assert_eq!((batches[0].start_page, batches[0].end_page), (1, 5));
    assert_eq!((batches[1].start_page, batches[1].end_page), (6, 10));
    assert_eq!((batches[2].start_page, batches[2].end_page), (11, 12));
}

#[test]
fn test_segment_withEmptyStore_shouldYieldNoBatches() {
    let store = PageStore::from_texts(Vec::new());
    assert!(segmenter(8).segment(&store).is_empty());
}

/// A boundary cut mid-sentence pulls the completion from the next batch,
/// and the moved text disappears from the donor.
#[test]
fn test_segment_withMidSentenceBoundary_shouldExtendIntoNextBatch() {
    let store = PageStore::from_texts(vec![
        "The first page ends mid sentence and the thought".to_string(),
        "continues here before it finally stops. The rest stays put.".to_string(),
    ]);
    let batches = segmenter(1).segment(&store);
    assert_eq!(batches.len(), 2);

    assert!(batches[0].raw_text.ends_with("finally stops."));
    assert!(!batches[1].raw_text.contains("finally stops"));
    assert!(batches[1].raw_text.starts_with("The rest stays put."));

    // Text moved, page ownership did not
    assert_eq!((batches[0].start_page, batches[0].end_page), (1, 1));
    assert_eq!((batches[1].start_page, batches[1].end_page), (2, 2));
}

/// The extension stops at the earlier of a sentence end or a paragraph
/// break, and never reaches past the configured character bound.
#[test]
fn test_segment_withLookaheadBound_shouldNotOverreach() {
    let long_run = "word ".repeat(400); // no terminator anywhere
    let store = PageStore::from_texts(vec![
        "An unfinished clause without an end".to_string(),
        format!("{}and only here a period. Tail text.", long_run),
    ]);
    let config = SegmenterConfig {
        pages_per_batch: 1,
        max_lookahead_chars: 100,
        ..SegmenterConfig::default()
    };
    let batches = BatchSegmenter::new(config).segment(&store);

    // No safe end within 100 chars, so the naive cut stands
    assert_eq!(batches[0].raw_text, "An unfinished clause without an end");
    assert!(batches[1].raw_text.contains("and only here a period."));
}

/// When the fragment consumes the donor's entire first page, the page
/// moves with the text.
#[test]
fn test_segment_withWholeFirstPageConsumed_shouldMoveOwnership() {
    let store = PageStore::from_texts(vec![
        "Page one prose sits here, sentence done.".to_string(),
        "This sentence hangs without".to_string(),
        "an ending until right here.".to_string(),
        "A separate final page stands alone with more words.".to_string(),
    ]);
    let config = SegmenterConfig {
        pages_per_batch: 2,
        ..SegmenterConfig::default()
    };
    let batches = BatchSegmenter::new(config).segment(&store);
    assert_eq!(batches.len(), 2);

    assert!(batches[0].raw_text.ends_with("right here."));
    assert_eq!((batches[0].start_page, batches[0].end_page), (1, 3));
    assert_eq!((batches[1].start_page, batches[1].end_page), (4, 4));
    assert!(batches[1].raw_text.starts_with("A separate final page"));
}

/// A single-page batch that is consumed whole folds into its recipient.
#[test]
fn test_segment_withSinglePageDonorConsumed_shouldFoldBatch() {
    let store = PageStore::from_texts(vec![
        "This sentence hangs without".to_string(),
        "an ending until right here.".to_string(),
        "A separate final page stands alone.".to_string(),
    ]);
    let config = SegmenterConfig {
        pages_per_batch: 1,
        ..SegmenterConfig::default()
    };
    let batches = BatchSegmenter::new(config).segment(&store);
    assert_eq!(batches.len(), 2);

    assert!(batches[0].raw_text.ends_with("right here."));
    assert_eq!((batches[0].start_page, batches[0].end_page), (1, 2));
    assert_eq!(batches[1].id, 2);
    assert_eq!((batches[1].start_page, batches[1].end_page), (3, 3));
}

/// A boundary that already ends a sentence is left untouched.
#[test]
fn test_segment_withCompleteBoundary_shouldNotExtend() {
    let store = sample_store(4, 2);
    let batches = segmenter(2).segment(&store);
    assert_eq!(batches.len(), 2);
    assert!(batches[0].raw_text.ends_with("says something complete."));
    assert!(batches[1].raw_text.starts_with("Page 3 paragraph 1"));
}

#[test]
fn test_segment_shouldCountSourceParagraphs() {
    let store = sample_store(4, 3);
    let batches = segmenter(2).segment(&store);
    assert_eq!(batches[0].source_paragraph_count, 6);
    assert_eq!(batches[1].source_paragraph_count, 6);
}
