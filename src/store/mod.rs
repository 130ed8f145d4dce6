//! Document storage.
//!
//! The [`DocumentStore`] trait gives the crawler, trainer, and query service
//! one keyed-document interface; [`sqlite::SqliteDocumentStore`] is the
//! shipped backend.

pub mod sqlite;

use async_trait::async_trait;

use crate::types::{HnPost, RecError, SiteDocument};

pub use sqlite::SqliteDocumentStore;

/// A stored site document with its assigned id and cluster label.
#[derive(Clone, Debug)]
pub struct StoredSite {
    pub id: String,
    pub document: SiteDocument,
    pub label: Option<u32>,
}

/// One keyword-search hit: a site and how many of its paragraphs matched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeywordMatch {
    pub id: String,
    pub matches: u64,
}

/// Keyed document storage with keyword aggregation.
///
/// `find_by_keyword_match` counts, per site, the paragraphs containing any
/// of the given keywords (case-insensitive substring), ranked by descending
/// count. `all_sites` returns documents in insertion order.
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Inserts or refreshes a site document, keyed by `href`. Returns the
    /// site id.
    async fn upsert_site(&self, doc: &SiteDocument) -> Result<String, RecError>;

    /// Inserts or refreshes a front-page post, keyed by its source URL.
    /// Posts without a source URL are stored under their title.
    async fn upsert_post(&self, post: &HnPost) -> Result<(), RecError>;

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredSite>, RecError>;

    async fn find_by_href(&self, href: &str) -> Result<Option<StoredSite>, RecError>;

    async fn all_sites(&self) -> Result<Vec<StoredSite>, RecError>;

    async fn find_by_keyword_match(
        &self,
        keywords: &[String],
    ) -> Result<Vec<KeywordMatch>, RecError>;

    async fn set_label(&self, id: &str, label: u32) -> Result<(), RecError>;

    async fn count_sites(&self) -> Result<usize, RecError>;
}
