//! Runtime configuration, sourced from the environment with coded defaults.

use std::path::PathBuf;
use std::str::FromStr;

use crate::types::RecError;

/// All tunables for crawling, transformation, modeling, and serving.
///
/// Every field can be overridden through an `HNREC_*` environment variable
/// (a `.env` file is honored). Defaults reproduce the reference deployment.
#[derive(Clone, Debug)]
pub struct Config {
    /// Front page to start crawling from.
    pub start_url: String,
    /// How many front pages to walk before stopping.
    pub page_depth_limit: usize,
    /// Word-count threshold for a block to count as a paragraph.
    pub paragraph_length_threshold: usize,
    /// Neighbor-expansion window for the paragraph extractor.
    pub paragraph_window: usize,
    /// Link suffixes never followed by the crawler.
    pub exclude_suffixes: Vec<String>,
    /// Hosts whose documents are excluded from training and queries.
    pub exclude_sites: Vec<String>,
    /// Hosts where list items are treated as paragraphs.
    pub list_hosts: Vec<String>,
    /// Title terms that drop a document (bot walls); empty disables the rule.
    pub exclude_title_content: Vec<String>,
    /// Minimum title-side token count.
    pub title_token_floor: usize,
    /// Minimum paragraph-side token count.
    pub paragraph_token_floor: usize,
    /// Embedding vector width.
    pub embedding_dimension: usize,
    /// Number of k-means clusters.
    pub clusters: usize,
    /// Seed for k-means initialization.
    pub kmeans_seed: u64,
    /// Concurrent site fetches during a crawl.
    pub fetch_concurrency: usize,
    /// SQLite database path.
    pub db_path: PathBuf,
    /// Optional on-disk cache for fetched pages.
    pub cache_dir: Option<PathBuf>,
    /// Where `train` writes and `serve` reads the model artifact.
    pub model_path: PathBuf,
    /// Query service bind address.
    pub bind_addr: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            start_url: "https://news.ycombinator.com/".to_string(),
            page_depth_limit: 10,
            paragraph_length_threshold: 30,
            paragraph_window: 5,
            exclude_suffixes: vec![".pdf".to_string(), "robots.txt".to_string()],
            exclude_sites: vec!["www.ft.com".to_string()],
            list_hosts: vec!["github.com".to_string()],
            exclude_title_content: vec![],
            title_token_floor: 3,
            paragraph_token_floor: 1000,
            embedding_dimension: 50,
            clusters: 30,
            kmeans_seed: 3,
            fetch_concurrency: 8,
            db_path: PathBuf::from("hnrec.db"),
            cache_dir: None,
            model_path: PathBuf::from("model.json"),
            bind_addr: "127.0.0.1:3000".to_string(),
        }
    }
}

impl Config {
    /// Loads configuration from the environment on top of the defaults.
    pub fn from_env() -> Result<Self, RecError> {
        dotenvy::dotenv().ok();
        let defaults = Config::default();
        Ok(Self {
            start_url: env_string("HNREC_START_URL", defaults.start_url),
            page_depth_limit: env_parse("HNREC_PAGE_DEPTH", defaults.page_depth_limit)?,
            paragraph_length_threshold: env_parse(
                "HNREC_PGRAPH_LEN_THRESHOLD",
                defaults.paragraph_length_threshold,
            )?,
            paragraph_window: env_parse("HNREC_PGRAPH_WINDOW", defaults.paragraph_window)?,
            exclude_suffixes: env_list("HNREC_EXCLUDE_SUFFIXES", defaults.exclude_suffixes),
            exclude_sites: env_list("HNREC_EXCLUDE_SITES", defaults.exclude_sites),
            list_hosts: env_list("HNREC_LIST_HOSTS", defaults.list_hosts),
            exclude_title_content: env_list(
                "HNREC_EXCLUDE_TITLE_CONTENT",
                defaults.exclude_title_content,
            ),
            title_token_floor: env_parse("HNREC_TITLE_TOKEN_FLOOR", defaults.title_token_floor)?,
            paragraph_token_floor: env_parse(
                "HNREC_PGRAPH_TOKEN_FLOOR",
                defaults.paragraph_token_floor,
            )?,
            embedding_dimension: env_parse("HNREC_EMBEDDING_DIM", defaults.embedding_dimension)?,
            clusters: env_parse("HNREC_CLUSTERS", defaults.clusters)?,
            kmeans_seed: env_parse("HNREC_KMEANS_SEED", defaults.kmeans_seed)?,
            fetch_concurrency: env_parse("HNREC_FETCH_CONCURRENCY", defaults.fetch_concurrency)?,
            db_path: env_string("HNREC_DB_PATH", defaults.db_path.display().to_string()).into(),
            cache_dir: std::env::var("HNREC_CACHE_DIR").ok().map(PathBuf::from),
            model_path: env_string("HNREC_MODEL_PATH", defaults.model_path.display().to_string())
                .into(),
            bind_addr: env_string("HNREC_BIND_ADDR", defaults.bind_addr),
        })
    }

    /// The extractor configuration this deployment uses for non-list hosts.
    pub fn extractor(&self) -> crate::extract::ExtractorConfig {
        crate::extract::ExtractorConfig {
            length_threshold: self.paragraph_length_threshold,
            window: self.paragraph_window,
            lists_as_paragraphs: false,
        }
    }
}

fn env_string(key: &str, default: String) -> String {
    std::env::var(key).unwrap_or(default)
}

fn env_list(key: &str, default: Vec<String>) -> Vec<String> {
    match std::env::var(key) {
        Ok(raw) => raw
            .split(',')
            .map(|item| item.trim().to_string())
            .filter(|item| !item.is_empty())
            .collect(),
        Err(_) => default,
    }
}

fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, RecError> {
    match std::env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| RecError::Config(format!("{key} has an unparseable value: {raw:?}"))),
        Err(_) => Ok(default),
    }
}
