//! Fetching pages, with an optional on-disk cache.

use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::Client;
use tokio::fs;
use url::Url;

use crate::types::RecError;

const USER_AGENT: &str = concat!("hnrec/", env!("CARGO_PKG_VERSION"));

/// Builds the HTTP client used by the crawler.
pub fn build_client() -> Result<Client, RecError> {
    let client = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(Duration::from_secs(20))
        .build()?;
    Ok(client)
}

/// Filesystem cache mapping URLs to deterministic file names, so repeated
/// crawls reuse downloaded pages instead of refetching them.
#[derive(Clone, Debug)]
pub struct PageCache {
    root: PathBuf,
}

impl PageCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Cache file path for `url`: sanitized path segments joined with `_`,
    /// the query string appended, and an `.html` extension when none exists.
    pub fn path_for(&self, url: &Url) -> PathBuf {
        let mut segments: Vec<String> = std::iter::once(url.host_str().unwrap_or("page"))
            .chain(
                url.path()
                    .trim_start_matches('/')
                    .split('/')
                    .filter(|segment| !segment.is_empty()),
            )
            .map(sanitize_segment)
            .collect();
        if segments.len() == 1 {
            segments.push("index".to_string());
        }

        let mut file_name = segments.join("_");
        if let Some(query) = url.query() {
            file_name.push('_');
            file_name.push_str(&sanitize_segment(query));
        }
        if Path::new(&file_name).extension().is_none() {
            file_name.push_str(".html");
        }
        self.root.join(file_name)
    }
}

fn sanitize_segment(input: &str) -> String {
    input
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.') {
                c
            } else {
                '_'
            }
        })
        .collect()
}

/// A fetched page and where it came from.
#[derive(Clone, Debug)]
pub struct FetchedPage {
    pub url: Url,
    pub html: String,
    pub from_cache: bool,
}

/// Fetches pages, consulting the cache first when one is configured.
#[derive(Clone, Debug)]
pub struct PageFetcher {
    client: Client,
    cache: Option<PageCache>,
}

impl PageFetcher {
    pub fn new(client: Client, cache: Option<PageCache>) -> Self {
        Self { client, cache }
    }

    /// Fetches `url`, writing a cache entry on network hits.
    pub async fn fetch(&self, url: &Url) -> Result<FetchedPage, RecError> {
        if let Some(cache) = &self.cache {
            let path = cache.path_for(url);
            if path.exists() {
                let html = fs::read_to_string(&path).await?;
                return Ok(FetchedPage {
                    url: url.clone(),
                    html,
                    from_cache: true,
                });
            }

            let html = self.fetch_from_network(url).await?;
            if let Some(parent) = path.parent() {
                fs::create_dir_all(parent).await?;
            }
            fs::write(&path, &html).await?;
            return Ok(FetchedPage {
                url: url.clone(),
                html,
                from_cache: false,
            });
        }

        let html = self.fetch_from_network(url).await?;
        Ok(FetchedPage {
            url: url.clone(),
            html,
            from_cache: false,
        })
    }

    /// Fetches `url` unconditionally, bypassing the cache (front pages churn
    /// too fast to cache).
    pub async fn fetch_fresh(&self, url: &Url) -> Result<FetchedPage, RecError> {
        let html = self.fetch_from_network(url).await?;
        Ok(FetchedPage {
            url: url.clone(),
            html,
            from_cache: false,
        })
    }

    async fn fetch_from_network(&self, url: &Url) -> Result<String, RecError> {
        let response = self
            .client
            .get(url.clone())
            .send()
            .await?
            .error_for_status()?;
        Ok(response.text().await?)
    }
}
