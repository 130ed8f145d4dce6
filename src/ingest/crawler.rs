//! The crawl loop: front pages in, posts and site documents out.

use std::sync::Arc;

use futures_util::{StreamExt, stream};
use url::Url;

use super::fetch::PageFetcher;
use super::hn::parse_front_page;
use crate::config::Config;
use crate::extract::parse_site;
use crate::store::DocumentStore;
use crate::types::RecError;

/// Counters reported after a crawl run.
#[derive(Clone, Debug, Default)]
pub struct CrawlSummary {
    pub pages: usize,
    pub posts: usize,
    pub sites: usize,
    pub failures: usize,
}

/// Walks Hacker News front pages, follows story links, and persists what it
/// finds.
///
/// Per-site failures (unreachable hosts, unparseable pages) are logged and
/// counted, never fatal to the crawl.
pub struct Crawler {
    fetcher: PageFetcher,
    store: Arc<dyn DocumentStore>,
    config: Config,
}

impl Crawler {
    pub fn new(fetcher: PageFetcher, store: Arc<dyn DocumentStore>, config: Config) -> Self {
        Self {
            fetcher,
            store,
            config,
        }
    }

    /// Crawls up to `page_depth_limit` front pages.
    pub async fn run(&self) -> Result<CrawlSummary, RecError> {
        let mut summary = CrawlSummary::default();
        let base = Url::parse(&self.config.start_url)?;
        let mut page_url = base.clone();

        for depth in 0..self.config.page_depth_limit {
            tracing::info!(%page_url, depth, "fetching front page");
            let page = self.fetcher.fetch_fresh(&page_url).await?;
            let front = parse_front_page(&page.html, &base);
            summary.pages += 1;

            for post in &front.posts {
                self.store.upsert_post(post).await?;
                summary.posts += 1;
            }

            let targets: Vec<Url> = front
                .posts
                .iter()
                .filter_map(|post| post.src_url.as_deref())
                .filter(|href| self.should_follow(href))
                .filter_map(|href| Url::parse(href).ok())
                .collect();

            let results = stream::iter(targets)
                .map(|url| self.process_site(url))
                .buffer_unordered(self.config.fetch_concurrency)
                .collect::<Vec<bool>>()
                .await;
            summary.sites += results.iter().filter(|ok| **ok).count();
            summary.failures += results.iter().filter(|ok| !**ok).count();

            match front.more {
                Some(href) => page_url = base.join(&href)?,
                None => break,
            }
        }

        tracing::info!(
            pages = summary.pages,
            posts = summary.posts,
            sites = summary.sites,
            failures = summary.failures,
            "crawl finished"
        );
        Ok(summary)
    }

    fn should_follow(&self, href: &str) -> bool {
        if !href.starts_with("http://") && !href.starts_with("https://") {
            return false;
        }
        if Url::parse(href)
            .ok()
            .and_then(|url| url.host_str().map(str::to_string))
            .is_some_and(|host| host == "news.ycombinator.com")
        {
            // Self-links (Ask HN, item pages) have no article to extract.
            return false;
        }
        !self
            .config
            .exclude_suffixes
            .iter()
            .any(|suffix| href.ends_with(suffix.as_str()))
    }

    /// Fetches, parses, and stores one article page. Returns whether the
    /// site made it into the store.
    async fn process_site(&self, url: Url) -> bool {
        let page = match self.fetcher.fetch(&url).await {
            Ok(page) => page,
            Err(err) => {
                tracing::warn!(%url, error = %err, "site fetch failed");
                return false;
            }
        };

        let doc = match parse_site(
            &page.html,
            &url,
            &self.config.extractor(),
            &self.config.list_hosts,
        ) {
            Ok(doc) => doc,
            Err(err) => {
                tracing::warn!(%url, error = %err, "site parse failed");
                return false;
            }
        };

        match self.store.upsert_site(&doc).await {
            Ok(id) => {
                tracing::debug!(%url, id, paragraphs = doc.paragraphs.len(), "stored site");
                true
            }
            Err(err) => {
                tracing::warn!(%url, error = %err, "site store failed");
                false
            }
        }
    }
}
