//! End-to-end extraction scenarios over realistic block sequences and HTML.

use hnrec::extract::{
    BlockTag, ExtractorConfig, TextTree, extract_paragraphs, parse_site,
};
use url::Url;

/// 33 words: comfortably past a threshold of 30.
const LONG_A: &str = "The first of the two real paragraphs carries enough words to pass the \
length heuristic on its own, which makes it a seed that anchors the neighbor \
expansion walk across its siblings.";

/// 34 words.
const LONG_B: &str = "The second real paragraph is also long enough to qualify by itself, and \
because it sits within the rolling window of the first one, the short text \
between them survives extraction as well.";

fn chain(blocks: &[(&str, BlockTag)]) -> (TextTree, Vec<hnrec::extract::BlockId>) {
    let mut tree = TextTree::new();
    let mut prev = None;
    let mut candidates = Vec::new();
    for &(text, tag) in blocks {
        let id = tree.push(text, tag);
        if tag == BlockTag::Paragraph {
            candidates.push(id);
        }
        if let Some(prev_id) = prev {
            tree.link(prev_id, id);
        }
        prev = Some(id);
    }
    (tree, candidates)
}

#[test]
fn two_seeds_with_a_short_bridge_emit_everything() {
    let (tree, candidates) = chain(&[
        ("short", BlockTag::Paragraph),
        (LONG_A, BlockTag::Paragraph),
        ("ok", BlockTag::Paragraph),
        (LONG_B, BlockTag::Paragraph),
    ]);
    let config = ExtractorConfig {
        length_threshold: 30,
        window: 2,
        lists_as_paragraphs: false,
    };

    let out = extract_paragraphs(&tree, &candidates, &config);
    assert_eq!(out, vec![LONG_A.to_string(), "ok".to_string(), LONG_B.to_string()]);
}

#[test]
fn a_document_of_boilerplate_extracts_nothing() {
    let (tree, candidates) = chain(&[
        ("Subscribe to our newsletter", BlockTag::Paragraph),
        ("Cookie settings", BlockTag::Paragraph),
        ("© 2022 Example Media", BlockTag::Paragraph),
    ]);
    let config = ExtractorConfig {
        length_threshold: 30,
        window: 5,
        lists_as_paragraphs: false,
    };
    assert!(extract_paragraphs(&tree, &candidates, &config).is_empty());
}

#[test]
fn html_extraction_keeps_prose_and_drops_chrome() {
    let html = format!(
        r#"<html><head><title>An Article</title></head><body>
          <header><p>Home</p><p>About</p></header>
          <main>
            <p>{LONG_A}</p>
            <p>Figure 1: a diagram.</p>
            <p>{LONG_B}</p>
          </main>
          <footer><p>Privacy policy</p></footer>
        </body></html>"#
    );
    let url = Url::parse("https://example.com/article").unwrap();
    let config = ExtractorConfig {
        length_threshold: 30,
        window: 2,
        lists_as_paragraphs: false,
    };

    let doc = parse_site(&html, &url, &config, &[]).unwrap();
    assert_eq!(doc.paragraphs.len(), 3);
    assert_eq!(doc.paragraphs[0], LONG_A);
    assert_eq!(doc.paragraphs[1], "Figure 1: a diagram.");
    assert_eq!(doc.paragraphs[2], LONG_B);
    assert!(!doc.paragraphs.iter().any(|p| p.contains("Privacy")));
    assert!(!doc.paragraphs.iter().any(|p| p == "Home"));
}

#[test]
fn github_style_lists_extract_only_when_enabled() {
    let html = format!(
        r#"<html><head><title>example/repo</title></head><body>
          <p>{LONG_A}</p>
          <ul><li>feature one</li><li>feature two</li></ul>
          <li>stray item</li>
        </body></html>"#
    );
    let url = Url::parse("https://github.com/example/repo").unwrap();
    let config = ExtractorConfig {
        length_threshold: 30,
        window: 1,
        lists_as_paragraphs: false,
    };

    let plain = parse_site(&html, &url, &config, &[]).unwrap();
    let listy = parse_site(&html, &url, &config, &["github.com".to_string()]).unwrap();
    assert!(listy.paragraphs.len() >= plain.paragraphs.len());
    assert!(listy.paragraphs.iter().any(|p| p.contains("feature")));
}
