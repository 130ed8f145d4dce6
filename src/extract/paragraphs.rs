//! The paragraph-extraction heuristic.
//!
//! A `<p>` block whose word count clears the length threshold anchors a walk
//! over its document-order siblings, pulling in surrounding text. Short text
//! between two real paragraphs survives because each paragraph-length sibling
//! resets the walk's give-up counter; isolated boilerplate does not.

use super::blocks::{BlockId, BlockTag, TextTree};

/// Knobs for [`extract_paragraphs`].
#[derive(Clone, Debug)]
pub struct ExtractorConfig {
    /// A block is paragraph-length when its whitespace-separated word count
    /// strictly exceeds this.
    pub length_threshold: usize,
    /// How many consecutive non-paragraph siblings a walk tolerates before
    /// giving up.
    pub window: usize,
    /// Treat list and list-item siblings as paragraphs (list-heavy sites
    /// such as GitHub READMEs).
    pub lists_as_paragraphs: bool,
}

impl Default for ExtractorConfig {
    fn default() -> Self {
        Self {
            length_threshold: 30,
            window: 5,
            lists_as_paragraphs: false,
        }
    }
}

/// True when `text` has strictly more whitespace-separated words than
/// `threshold`.
pub fn is_paragraph_length(text: &str, threshold: usize) -> bool {
    text.split_whitespace().count() > threshold
}

/// Extracts real paragraph content from `candidates` (the `<p>` blocks of
/// `tree`, in document order).
///
/// Scans for seed paragraphs (candidates exceeding the length threshold)
/// and expands each seed along its sibling chain. Candidates consumed by a
/// walk are not re-scanned. A document with no seed yields an empty vector:
/// no extractable content, not an error.
pub fn extract_paragraphs(
    tree: &TextTree,
    candidates: &[BlockId],
    config: &ExtractorConfig,
) -> Vec<String> {
    let mut extracted = Vec::new();
    let mut i = 0;
    while i < candidates.len() {
        let id = candidates[i];
        if is_paragraph_length(tree.text(id), config.length_threshold) {
            extracted.push(tree.text(id).to_string());
            let walk = walk_neighbors(tree, candidates, i, config);
            extracted.extend(walk.texts);
            i = walk.end_index;
        } else {
            i += 1;
        }
    }
    extracted
}

struct NeighborWalk {
    texts: Vec<String>,
    /// First candidate index the outer scan has not yet consumed.
    end_index: usize,
}

/// Walks the sibling chain following `candidates[seed]`, collecting every
/// visited sibling's text.
///
/// The consecutive-non-paragraph counter starts at one and resets to zero
/// whenever a visited sibling is itself paragraph-length (or a list node,
/// when configured). Visited siblings that are `<p>` candidates advance
/// `end_index` so the outer scan skips them.
fn walk_neighbors(
    tree: &TextTree,
    candidates: &[BlockId],
    seed: usize,
    config: &ExtractorConfig,
) -> NeighborWalk {
    let mut texts = Vec::new();
    let mut end_index = seed + 1;
    let mut run = 1usize;
    let mut sibling = tree.next_sibling(candidates[seed]);

    while let Some(id) = sibling {
        if run > config.window {
            break;
        }
        let text = tree.text(id);
        texts.push(text.to_string());

        if is_paragraph_length(text, config.length_threshold) {
            run = 0;
        } else if config.lists_as_paragraphs
            && matches!(tree.tag(id), BlockTag::List | BlockTag::ListItem)
        {
            run = 0;
        }

        if tree.tag(id) == BlockTag::Paragraph && candidates.get(end_index) == Some(&id) {
            end_index += 1;
        }

        run += 1;
        sibling = tree.next_sibling(id);
    }

    NeighborWalk { texts, end_index }
}
