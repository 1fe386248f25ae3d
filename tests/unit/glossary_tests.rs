/*!
 * Tests for the glossary store
 */

use bookwai::glossary::GlossaryStore;
use tempfile::tempdir;

#[test]
fn test_merge_withConflictingRenderings_shouldKeepNewest() {
    let mut store = GlossaryStore::new();
    store.merge(vec![("foo".to_string(), "bar".to_string())]);
    store.merge(vec![("foo".to_string(), "baz".to_string())]);

    assert_eq!(store.len(), 1);
    assert_eq!(store.get("foo"), Some("baz"));
}

#[test]
fn test_saveAndLoad_shouldRoundTripSortedTsv() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossary.tsv");

    let mut store = GlossaryStore::new();
    store.insert("Zephyr", "zéphyr");
    store.insert("Aria", "阿莉亚");
    store.save(&path).unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    // Sorted by term, tab separated
    assert_eq!(content, "Aria\t阿莉亚\nZephyr\tzéphyr\n");

    let reloaded = GlossaryStore::load(&path).unwrap();
    assert_eq!(reloaded.get("Aria"), Some("阿莉亚"));
    assert_eq!(reloaded.get("Zephyr"), Some("zéphyr"));
}

#[test]
fn test_load_withMissingFile_shouldBeEmpty() {
    let dir = tempdir().unwrap();
    let store = GlossaryStore::load(dir.path().join("nope.tsv")).unwrap();
    assert!(store.is_empty());
}

#[test]
fn test_load_withMalformedLines_shouldSkipThem() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("glossary.tsv");
    std::fs::write(&path, "good\tentry\nno separator here\n\t\n").unwrap();

    let store = GlossaryStore::load(&path).unwrap();
    assert_eq!(store.len(), 1);
    assert_eq!(store.get("good"), Some("entry"));
}

#[test]
fn test_relevantTerms_shouldOnlyReturnOccurringTerms() {
    let mut store = GlossaryStore::new();
    store.insert("Rivertown", "flussstadt");
    store.insert("Kestrel", "turmfalke");
    store.insert("Moor", "moor");

    let relevant = store.relevant_terms("Kestrel flew over the Moor at dusk.");
    assert_eq!(relevant.len(), 2);
    assert!(relevant.iter().any(|(t, _)| t == "Kestrel"));
    assert!(relevant.iter().any(|(t, _)| t == "Moor"));
}

#[test]
fn test_merge_shouldReportChangedCount() {
    let mut store = GlossaryStore::new();
    store.insert("a", "1");
    let changed = store.merge(vec![
        ("a".to_string(), "1".to_string()), // unchanged
        ("a".to_string(), "2".to_string()), // overwrite
        ("b".to_string(), "3".to_string()), // new
    ]);
    assert_eq!(changed, 2);
}
