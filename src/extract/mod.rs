//! Boilerplate-aware text extraction.
//!
//! Three layers, bottom up:
//!
//! * [`blocks`]: flattens parsed HTML into a [`TextTree`] arena of
//!   classified text blocks with document-order sibling links.
//! * [`paragraphs`]: the seed + neighbor-expansion heuristic that separates
//!   real prose from boilerplate.
//! * [`fields`]: assembles titles, subtitles, and extracted paragraphs into
//!   a [`SiteDocument`](crate::types::SiteDocument).

pub mod blocks;
pub mod fields;
pub mod paragraphs;

pub use blocks::{BlockId, BlockTag, TextTree};
pub use fields::parse_site;
pub use paragraphs::{ExtractorConfig, extract_paragraphs, is_paragraph_length};
