//! Crawl Hacker News front pages and linked articles into the store.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hnrec::Config;
use hnrec::ingest::{Crawler, PageCache, PageFetcher, build_client};
use hnrec::store::{DocumentStore, SqliteDocumentStore};
use hnrec::types::RecError;

#[tokio::main]
async fn main() -> Result<(), RecError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(SqliteDocumentStore::open(&config.db_path).await?);
    let cache = config.cache_dir.clone().map(PageCache::new);
    let fetcher = PageFetcher::new(build_client()?, cache);

    let crawler = Crawler::new(fetcher, store.clone(), config);
    let summary = crawler.run().await?;
    let total_stored = store.count_sites().await?;

    tracing::info!(
        pages = summary.pages,
        posts = summary.posts,
        sites = summary.sites,
        failures = summary.failures,
        total_stored,
        "done"
    );
    Ok(())
}
