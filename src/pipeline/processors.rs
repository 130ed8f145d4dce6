//! The built-in processor set.
//!
//! Text processors operate on [`FieldData`] and compose into the title and
//! paragraph pipelines; [`ExcludeBySource`] operates on whole documents and
//! guards the training loop and query path.

use std::sync::atomic::{AtomicUsize, Ordering};

use rustc_hash::FxHashSet;
use unicode_segmentation::UnicodeSegmentation;
use url::Url;

use super::data::FieldData;
use super::processor::{Abort, Processor};
use super::stopwords;
use crate::types::SiteDocument;

/// ASCII punctuation plus the typographic characters seen in crawled prose,
/// all replaced by spaces before whitespace tokenization.
const PUNCTUATION: &str = "!\"#$%&'()*+,-./:;<=>?@[\\]^_`{|}~\u{2014}\u{201d}\u{2019}";

fn is_punctuation(c: char) -> bool {
    PUNCTUATION.contains(c)
}

fn shape_abort(name: &str, expected: &str, got: &FieldData) -> Abort {
    Abort::new(format!("{name}: expected {expected}, got {}", got.shape()))
}

/// Splits one free-text string into lowercase word tokens.
///
/// Tokens are maximal alphabetic runs inside Unicode word boundaries, kept
/// when 2 to 15 characters long. Everything else (digits, punctuation,
/// one-letter fragments, over-long runs) is discarded.
pub fn tokenize_text(text: &str) -> Vec<String> {
    text.unicode_words()
        .flat_map(|word| word.split(|c: char| !c.is_alphabetic()))
        .filter(|part| !part.is_empty())
        .map(str::to_lowercase)
        .filter(|token| {
            let len = token.chars().count();
            (2..=15).contains(&len)
        })
        .collect()
}

/// `Texts -> TokenLists`: tokenizes each text, dropping texts that yield no
/// tokens. An empty input vector yields an empty list of token lists, not an
/// abort.
pub struct Tokenize {
    name: String,
}

impl Tokenize {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Processor<FieldData> for Tokenize {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, debug: bool) -> Result<FieldData, Abort> {
        let texts = match value {
            FieldData::Texts(texts) => texts,
            other => return Err(shape_abort(&self.name, "texts", &other)),
        };
        let lists: Vec<Vec<String>> = texts
            .iter()
            .map(|text| tokenize_text(text))
            .filter(|tokens| !tokens.is_empty())
            .collect();
        if debug {
            tracing::debug!(processor = %self.name, ?lists, "tokenized");
        }
        Ok(FieldData::TokenLists(lists))
    }
}

/// `TokenLists -> Tokens`: flattens nested token lists, preserving order.
/// Already-flat token sequences pass through unchanged.
pub struct Flatten {
    name: String,
}

impl Flatten {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Processor<FieldData> for Flatten {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, debug: bool) -> Result<FieldData, Abort> {
        let tokens = match value {
            FieldData::TokenLists(lists) => lists.into_iter().flatten().collect(),
            FieldData::Tokens(tokens) => tokens,
            other @ FieldData::Texts(_) => {
                return Err(shape_abort(&self.name, "token lists", &other));
            }
        };
        if debug {
            tracing::debug!(processor = %self.name, count = tokens.len(), "flattened");
        }
        Ok(FieldData::Tokens(tokens))
    }
}

/// Aborts when the flat token count is strictly below the configured floor.
///
/// This is the intended filter for documents whose extraction produced too
/// little content. Dropped documents are counted per instance.
pub struct WordCountFloor {
    name: String,
    floor: usize,
    drops: AtomicUsize,
}

impl WordCountFloor {
    pub fn new(name: impl Into<String>, floor: usize) -> Self {
        Self {
            name: name.into(),
            floor,
            drops: AtomicUsize::new(0),
        }
    }

    /// Number of documents this instance has dropped.
    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::Relaxed)
    }
}

impl Processor<FieldData> for WordCountFloor {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, debug: bool) -> Result<FieldData, Abort> {
        let tokens = match value {
            FieldData::Tokens(tokens) => tokens,
            other => return Err(shape_abort(&self.name, "tokens", &other)),
        };
        if tokens.len() < self.floor {
            self.drops.fetch_add(1, Ordering::Relaxed);
            return Err(Abort::new(format!(
                "word count {} is below the floor of {}",
                tokens.len(),
                self.floor
            )));
        }
        if debug {
            tracing::debug!(processor = %self.name, count = tokens.len(), "word count ok");
        }
        Ok(FieldData::Tokens(tokens))
    }
}

/// Trims surrounding whitespace from each entry.
pub struct StripWhitespace {
    name: String,
}

impl StripWhitespace {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Processor<FieldData> for StripWhitespace {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, _debug: bool) -> Result<FieldData, Abort> {
        let trim_all = |items: Vec<String>| {
            items
                .into_iter()
                .map(|item| item.trim().to_string())
                .collect::<Vec<_>>()
        };
        match value {
            FieldData::Texts(texts) => Ok(FieldData::Texts(trim_all(texts))),
            FieldData::Tokens(tokens) => Ok(FieldData::Tokens(trim_all(tokens))),
            other @ FieldData::TokenLists(_) => {
                Err(shape_abort(&self.name, "texts or tokens", &other))
            }
        }
    }
}

/// `Texts -> Texts`: splits each entry into sentences on `.`.
pub struct SentenceSplit {
    name: String,
}

impl SentenceSplit {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

impl Processor<FieldData> for SentenceSplit {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, debug: bool) -> Result<FieldData, Abort> {
        let texts = match value {
            FieldData::Texts(texts) => texts,
            other => return Err(shape_abort(&self.name, "texts", &other)),
        };
        let sentences: Vec<String> = texts
            .iter()
            .flat_map(|text| text.split('.'))
            .map(str::to_string)
            .collect();
        if debug {
            tracing::debug!(processor = %self.name, count = sentences.len(), "split sentences");
        }
        Ok(FieldData::Texts(sentences))
    }
}

/// Removes stopwords, producing flat lowercase tokens.
///
/// Raw texts are first cleaned of punctuation (replaced by spaces) and
/// whitespace-split; already-tokenized input is filtered in place.
pub struct StopwordFilter {
    name: String,
}

impl StopwordFilter {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    fn keep(token: &str) -> bool {
        !stopwords::english().contains(token)
    }
}

impl Processor<FieldData> for StopwordFilter {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, debug: bool) -> Result<FieldData, Abort> {
        let tokens: Vec<String> = match value {
            FieldData::Texts(texts) => texts
                .iter()
                .flat_map(|text| {
                    let cleaned: String = text
                        .chars()
                        .map(|c| if is_punctuation(c) { ' ' } else { c })
                        .collect();
                    cleaned
                        .split_whitespace()
                        .map(str::to_lowercase)
                        .collect::<Vec<_>>()
                })
                .filter(|token| Self::keep(token))
                .collect(),
            FieldData::Tokens(tokens) => tokens
                .into_iter()
                .map(|token| token.to_lowercase())
                .filter(|token| Self::keep(token))
                .collect(),
            other @ FieldData::TokenLists(_) => {
                return Err(shape_abort(&self.name, "texts or tokens", &other));
            }
        };
        if debug {
            tracing::debug!(processor = %self.name, count = tokens.len(), "filtered stopwords");
        }
        Ok(FieldData::Tokens(tokens))
    }
}

/// Aborts when any entry contains one of the configured needles
/// (case-insensitive substring match).
///
/// Useful for dropping bot-wall and interstitial pages whose titles survive
/// extraction ("Are you a robot?").
pub struct ExcludeByContent {
    name: String,
    needles: Vec<String>,
    drops: AtomicUsize,
}

impl ExcludeByContent {
    pub fn new(name: impl Into<String>, needles: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            needles: needles
                .into_iter()
                .map(|needle| needle.into().to_lowercase())
                .collect(),
            drops: AtomicUsize::new(0),
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::Relaxed)
    }

    fn matching_needle(&self, entries: &[String]) -> Option<&str> {
        entries.iter().find_map(|entry| {
            let lowered = entry.to_lowercase();
            self.needles
                .iter()
                .find(|needle| lowered.contains(needle.as_str()))
                .map(String::as_str)
        })
    }
}

impl Processor<FieldData> for ExcludeByContent {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, value: FieldData, _debug: bool) -> Result<FieldData, Abort> {
        let hit = match &value {
            FieldData::Texts(texts) => self.matching_needle(texts),
            FieldData::Tokens(tokens) => self.matching_needle(tokens),
            FieldData::TokenLists(lists) => {
                lists.iter().find_map(|list| self.matching_needle(list))
            }
        };
        if let Some(needle) = hit {
            self.drops.fetch_add(1, Ordering::Relaxed);
            return Err(Abort::new(format!("content matches excluded term {needle:?}")));
        }
        Ok(value)
    }
}

/// Aborts documents whose source host is in a configured exclusion set.
pub struct ExcludeBySource {
    name: String,
    excluded_hosts: FxHashSet<String>,
    drops: AtomicUsize,
}

impl ExcludeBySource {
    pub fn new(
        name: impl Into<String>,
        hosts: impl IntoIterator<Item = impl Into<String>>,
    ) -> Self {
        Self {
            name: name.into(),
            excluded_hosts: hosts
                .into_iter()
                .map(|host| host.into().to_lowercase())
                .collect(),
            drops: AtomicUsize::new(0),
        }
    }

    pub fn drops(&self) -> usize {
        self.drops.load(Ordering::Relaxed)
    }
}

impl Processor<SiteDocument> for ExcludeBySource {
    fn name(&self) -> &str {
        &self.name
    }

    fn transform(&self, doc: SiteDocument, debug: bool) -> Result<SiteDocument, Abort> {
        let host = Url::parse(&doc.href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_lowercase));
        if let Some(host) = host {
            if self.excluded_hosts.contains(&host) {
                self.drops.fetch_add(1, Ordering::Relaxed);
                return Err(Abort::new(format!("source {host} is excluded")));
            }
        }
        if debug {
            tracing::debug!(processor = %self.name, href = %doc.href, "source ok");
        }
        Ok(doc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TitleField;

    fn strings(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn tokenize_lowercases_and_bounds_token_length() {
        let tokens = tokenize_text("The Quick-Brown FOX jumped 42 times, e pluribus!");
        assert_eq!(
            tokens,
            strings(&["the", "quick", "brown", "fox", "jumped", "times", "pluribus"])
        );
    }

    #[test]
    fn tokenize_splits_contractions_on_non_alphabetic() {
        assert_eq!(tokenize_text("don't"), strings(&["don"]));
        assert_eq!(tokenize_text("supercalifragilisticexpialidocious"), Vec::<String>::new());
    }

    #[test]
    fn tokenize_processor_drops_empty_texts() {
        let processor = Tokenize::new("tokenize");
        let out = processor
            .transform(FieldData::Texts(strings(&["hello world", "", "42 7"])), false)
            .unwrap();
        assert_eq!(
            out,
            FieldData::TokenLists(vec![strings(&["hello", "world"])])
        );
    }

    #[test]
    fn tokenize_empty_input_yields_empty_lists_not_abort() {
        let processor = Tokenize::new("tokenize");
        let out = processor.transform(FieldData::Texts(vec![]), false).unwrap();
        assert_eq!(out, FieldData::TokenLists(vec![]));
    }

    #[test]
    fn tokenize_is_idempotent_over_its_own_output() {
        let processor = Tokenize::new("tokenize");
        let first = processor
            .transform(
                FieldData::Texts(strings(&["Ordered Pluggable Processor Chains"])),
                false,
            )
            .unwrap();
        let tokens = first.into_tokens();

        // Feed the flattened output back in as whitespace-separated text.
        let again = processor
            .transform(FieldData::Texts(vec![tokens.join(" ")]), false)
            .unwrap();
        assert_eq!(again.into_tokens(), tokens);
    }

    #[test]
    fn flatten_preserves_order() {
        let processor = Flatten::new("flatten");
        let out = processor
            .transform(
                FieldData::TokenLists(vec![strings(&["a", "b"]), strings(&["c"])]),
                false,
            )
            .unwrap();
        assert_eq!(out, FieldData::Tokens(strings(&["a", "b", "c"])));
    }

    #[test]
    fn flatten_rejects_raw_texts() {
        let processor = Flatten::new("flatten");
        let result = processor.transform(FieldData::Texts(strings(&["raw"])), false);
        assert!(result.is_err());
    }

    #[test]
    fn word_count_floor_is_strict_and_counts_drops() {
        let processor = WordCountFloor::new("floor", 3);
        assert!(
            processor
                .transform(FieldData::Tokens(strings(&["a", "b", "c"])), false)
                .is_ok(),
            "exactly at the floor must pass"
        );
        assert!(
            processor
                .transform(FieldData::Tokens(strings(&["a", "b"])), false)
                .is_err()
        );
        assert!(processor.transform(FieldData::Tokens(vec![]), false).is_err());
        assert_eq!(processor.drops(), 2);
    }

    #[test]
    fn strip_whitespace_trims_entries() {
        let processor = StripWhitespace::new("strip");
        let out = processor
            .transform(FieldData::Texts(strings(&["  padded  ", "clean"])), false)
            .unwrap();
        assert_eq!(out, FieldData::Texts(strings(&["padded", "clean"])));
    }

    #[test]
    fn sentence_split_breaks_on_periods() {
        let processor = SentenceSplit::new("sentences");
        let out = processor
            .transform(FieldData::Texts(strings(&["One. Two", "Three"])), false)
            .unwrap();
        assert_eq!(out, FieldData::Texts(strings(&["One", " Two", "Three"])));
    }

    #[test]
    fn stopword_filter_cleans_punctuation_and_stopwords() {
        let processor = StopwordFilter::new("stopwords");
        let out = processor
            .transform(
                FieldData::Texts(strings(&["The cat, and the \u{2014} hat!"])),
                false,
            )
            .unwrap();
        assert_eq!(out, FieldData::Tokens(strings(&["cat", "hat"])));
    }

    #[test]
    fn stopword_filter_handles_flat_tokens() {
        let processor = StopwordFilter::new("stopwords");
        let out = processor
            .transform(FieldData::Tokens(strings(&["The", "kernel"])), false)
            .unwrap();
        assert_eq!(out, FieldData::Tokens(strings(&["kernel"])));
    }

    #[test]
    fn exclude_by_content_aborts_on_needle() {
        let processor = ExcludeByContent::new("robot_wall", ["robot"]);
        let result = processor.transform(
            FieldData::Texts(strings(&["Are you a robot?"])),
            false,
        );
        assert!(result.is_err());
        assert_eq!(processor.drops(), 1);

        let clean = processor.transform(FieldData::Texts(strings(&["Plain title"])), false);
        assert!(clean.is_ok());
    }

    fn doc(href: &str) -> SiteDocument {
        SiteDocument {
            title: TitleField::from("Title"),
            subtitles: vec![],
            paragraphs: vec![],
            href: href.to_string(),
            src: None,
            fetched_at: None,
        }
    }

    #[test]
    fn exclude_by_source_matches_host_not_full_url() {
        let processor = ExcludeBySource::new("exclude_sites", ["www.ft.com"]);
        let excluded = processor.transform(doc("https://www.ft.com/content/abc"), false);
        assert!(excluded.is_err());
        assert_eq!(processor.drops(), 1);

        let allowed = processor.transform(doc("https://example.com/article"), false);
        assert!(allowed.is_ok());
    }

    #[test]
    fn exclude_by_source_passes_unparseable_hrefs() {
        let processor = ExcludeBySource::new("exclude_sites", ["www.ft.com"]);
        assert!(processor.transform(doc("not a url"), false).is_ok());
    }
}
