/*!
 * Tests for title heuristics
 */

use bookwai::titles::TitleClassifier;

#[test]
fn test_scan_withChapterKeyword_shouldHint() {
    let classifier = TitleClassifier::default();
    let hints = classifier.scan("Chapter 7\n\nThe rain had not stopped for days.");
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].text, "Chapter 7");
    assert_eq!(hints[0].line, 0);
}

#[test]
fn test_scan_withSectionAndPartKeywords_shouldHint() {
    let classifier = TitleClassifier::default();
    let text = "Part II\n\nsome prose sentence here.\n\nSection 4: The Crossing\n\nmore prose.";
    let hints = classifier.scan(text);
    assert_eq!(hints.len(), 2);
}

#[test]
fn test_scan_withAllCapsHeading_shouldHint() {
    let classifier = TitleClassifier::default();
    let hints = classifier.scan("prose ends here.\n\nINTERLUDE\n\nprose resumes.");
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].text, "INTERLUDE");
}

#[test]
fn test_scan_withPlainProse_shouldStayQuiet() {
    let classifier = TitleClassifier::default();
    let text = "It was late when they arrived.\nNobody spoke for a long time.\n\nThe fire had burned down to embers, and still they waited.";
    assert!(classifier.scan(text).is_empty());
}

#[test]
fn test_scan_withShortIsolatedLine_shouldHint() {
    let classifier = TitleClassifier::default();
    let hints = classifier.scan("the night passed.\n\nThe Long Road Home\n\nMorning came slowly.");
    assert_eq!(hints.len(), 1);
    assert_eq!(hints[0].text, "The Long Road Home");
}

#[test]
fn test_scan_withSentencePunctuatedShortLine_shouldStayQuiet() {
    let classifier = TitleClassifier::default();
    // Short and isolated, but it reads as a sentence
    assert!(classifier.scan("prose before.\n\nHe left.\n\nprose after.").is_empty());
}
