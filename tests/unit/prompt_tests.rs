/*!
 * Tests for prompt construction and response parsing
 */

use bookwai::titles::TitleHint;
use bookwai::translation::prompt::{
    build_system_prompt, parse_response, wrap_paragraphs, MISSING_MARKER,
};

#[test]
fn test_wrapParagraphs_shouldNumberSequentially() {
    let text = "alpha\n\nbeta\n\ngamma";
    let (tagged, count) = wrap_paragraphs(text);
    assert_eq!(count, 3);
    assert!(tagged.contains("<c1>alpha</c1>"));
    assert!(tagged.contains("<c2>beta</c2>"));
    assert!(tagged.contains("<c3>gamma</c3>"));
}

#[test]
fn test_wrapParagraphs_withMultilineParagraph_shouldKeepItWhole() {
    let (tagged, count) = wrap_paragraphs("line one\nline two\n\nnext");
    assert_eq!(count, 2);
    assert!(tagged.contains("<c1>line one\nline two</c1>"));
}

#[test]
fn test_parseResponse_shouldRoundTripTaggedParagraphs() {
    let (tagged, count) = wrap_paragraphs("one\n\ntwo\n\nthree");
    let parsed = parse_response(&tagged);
    assert_eq!(parsed.paragraph_count, count);
    assert_eq!(parsed.text, "one\n\ntwo\n\nthree");
}

#[test]
fn test_parseResponse_withMissingMarker_shouldExcludeFromText() {
    let raw = format!("<c1>done</c1>\n<c2>{}</c2>", MISSING_MARKER);
    let parsed = parse_response(&raw);
    assert_eq!(parsed.text, "done");
    assert_eq!(parsed.missing, vec![2]);
    // The missing paragraph still counts toward the output total
    assert_eq!(parsed.paragraph_count, 2);
}

#[test]
fn test_parseResponse_withGlossaryArrowAndTab_shouldParseBoth() {
    let raw = "<c1>texte</c1>\n```glossary\nFirst⇢Premier\nSecond\tDeuxième\nmalformed line\n```";
    let parsed = parse_response(raw);
    assert_eq!(parsed.new_terms.len(), 2);
    assert_eq!(parsed.new_terms[0].0, "First");
    assert_eq!(parsed.new_terms[1].1, "Deuxième");
}

#[test]
fn test_parseResponse_withUntaggedResponse_shouldCountBlankLineBlocks() {
    let parsed = parse_response("free one\n\nfree two");
    assert_eq!(parsed.paragraph_count, 2);
    assert!(parsed.missing.is_empty());
}

#[test]
fn test_buildSystemPrompt_shouldCarryLanguagesTermsHintsAndStyle() {
    let terms = vec![("Hollowmere".to_string(), "Creuxmère".to_string())];
    let hints = vec![TitleHint { line: 0, text: "Chapter 3".to_string() }];
    let prompt = build_system_prompt("English", "French", &terms, &hints, Some("Sparse, cold register."));

    assert!(prompt.contains("English"));
    assert!(prompt.contains("French"));
    assert!(prompt.contains("Hollowmere⇢Creuxmère"));
    assert!(prompt.contains("Chapter 3"));
    assert!(prompt.contains("Sparse, cold register."));
    assert!(prompt.contains(MISSING_MARKER));
}

#[test]
fn test_buildSystemPrompt_withNoExtras_shouldOmitSections() {
    let prompt = build_system_prompt("English", "German", &[], &[], None);
    assert!(!prompt.contains("established renderings"));
    assert!(!prompt.contains("section titles"));
}
