//! Text blocks: a flat arena over the parsed document's text-bearing nodes.
//!
//! The extractor does not walk the HTML parser's tree directly. Instead one
//! pre-order pass materializes every text-bearing node (elements and bare
//! text nodes) into a [`TextTree`] arena, preserving the document-order
//! sibling chain within each parent. The extractor then only needs read-only
//! lookups by [`BlockId`].

use scraper::node::Node;
use scraper::{ElementRef, Html};

/// Index of a block inside a [`TextTree`]. Valid only for the tree that
/// produced it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct BlockId(usize);

/// Classification of a block, derived from its element name.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BlockTag {
    /// A `<p>` element, a paragraph candidate.
    Paragraph,
    /// A `<ul>` or `<ol>` element.
    List,
    /// A `<li>` element.
    ListItem,
    /// A bare text node.
    Text,
    /// Any other element.
    Other,
}

impl BlockTag {
    fn from_element_name(name: &str) -> Self {
        match name {
            "p" => BlockTag::Paragraph,
            "ul" | "ol" => BlockTag::List,
            "li" => BlockTag::ListItem,
            _ => BlockTag::Other,
        }
    }
}

#[derive(Clone, Debug)]
struct TextBlock {
    text: String,
    tag: BlockTag,
    next_sibling: Option<BlockId>,
}

/// Arena of classified text blocks with document-order sibling links.
///
/// Built from parsed HTML via [`TextTree::from_html`], or block by block in
/// tests via [`push`](TextTree::push) and [`link`](TextTree::link). Lives for
/// the duration of one extraction call.
#[derive(Clone, Debug, Default)]
pub struct TextTree {
    blocks: Vec<TextBlock>,
}

impl TextTree {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the arena from a parsed document and returns it together with
    /// the `<p>` blocks in document order (the extractor's candidate list).
    ///
    /// Element text is the concatenation of all descendant text, matching how
    /// the crawled prose reads. Whitespace-only text nodes are not
    /// materialized: they carry no content and would only eat into the
    /// extractor's neighbor window.
    pub fn from_html(html: &Html) -> (Self, Vec<BlockId>) {
        let mut tree = TextTree::new();
        let mut candidates = Vec::new();
        for child in html.tree.root().children() {
            if let Some(element) = ElementRef::wrap(child) {
                tree.collect_children(element, &mut candidates);
            }
        }
        (tree, candidates)
    }

    fn collect_children(&mut self, parent: ElementRef<'_>, candidates: &mut Vec<BlockId>) {
        let mut prev: Option<BlockId> = None;
        for child in parent.children() {
            let block = match child.value() {
                Node::Element(element) => {
                    let tag = BlockTag::from_element_name(element.name());
                    let text = ElementRef::wrap(child)
                        .map(|el| el.text().collect::<String>())
                        .unwrap_or_default();
                    Some((text, tag))
                }
                Node::Text(text) => {
                    let content: &str = &text.text;
                    if content.trim().is_empty() {
                        None
                    } else {
                        Some((content.to_string(), BlockTag::Text))
                    }
                }
                _ => None,
            };

            if let Some((text, tag)) = block {
                let id = self.push(text, tag);
                if tag == BlockTag::Paragraph {
                    candidates.push(id);
                }
                if let Some(prev_id) = prev {
                    self.link(prev_id, id);
                }
                prev = Some(id);
            }

            if let Some(element) = ElementRef::wrap(child) {
                self.collect_children(element, candidates);
            }
        }
    }

    /// Appends an unlinked block and returns its id.
    pub fn push(&mut self, text: impl Into<String>, tag: BlockTag) -> BlockId {
        let id = BlockId(self.blocks.len());
        self.blocks.push(TextBlock {
            text: text.into(),
            tag,
            next_sibling: None,
        });
        id
    }

    /// Links `block` to `next` as its document-order sibling.
    pub fn link(&mut self, block: BlockId, next: BlockId) {
        self.blocks[block.0].next_sibling = Some(next);
    }

    pub fn text(&self, id: BlockId) -> &str {
        &self.blocks[id.0].text
    }

    pub fn tag(&self, id: BlockId) -> BlockTag {
        self.blocks[id.0].tag
    }

    pub fn next_sibling(&self, id: BlockId) -> Option<BlockId> {
        self.blocks[id.0].next_sibling
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}
