//! Crawling: fetching front pages and articles into the document store.
//!
//! * [`fetch`]: HTTP client construction, page fetching, on-disk caching.
//! * [`hn`]: Hacker News front-page parsing.
//! * [`crawler`]: the crawl loop tying fetch, extraction, and storage
//!   together.

pub mod crawler;
pub mod fetch;
pub mod hn;

pub use crawler::{CrawlSummary, Crawler};
pub use fetch::{FetchedPage, PageCache, PageFetcher, build_client};
pub use hn::{FrontPage, parse_front_page};
