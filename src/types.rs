//! Shared document records and the crate-wide error type.

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors surfaced by crawling, storage, model handling, and the query service.
#[derive(Debug, Error)]
pub enum RecError {
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("storage error: {0}")]
    Storage(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("model error: {0}")]
    Model(String),

    #[error("config error: {0}")]
    Config(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serde(#[from] serde_json::Error),
}

impl From<tokio_rusqlite::Error> for RecError {
    fn from(err: tokio_rusqlite::Error) -> Self {
        RecError::Storage(err.to_string())
    }
}

impl From<tokio_rusqlite::rusqlite::Error> for RecError {
    fn from(err: tokio_rusqlite::rusqlite::Error) -> Self {
        RecError::Storage(err.to_string())
    }
}

impl From<url::ParseError> for RecError {
    fn from(err: url::ParseError) -> Self {
        RecError::Parse(err.to_string())
    }
}

/// A document title: either a single string or the ordered list of title-like
/// texts collected from a page (`<title>` plus every `<h1>`).
///
/// Stored records may carry either shape; serde accepts both.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TitleField {
    One(String),
    Many(Vec<String>),
}

impl TitleField {
    /// All title texts, in order.
    pub fn to_vec(&self) -> Vec<String> {
        match self {
            TitleField::One(title) => vec![title.clone()],
            TitleField::Many(titles) => titles.clone(),
        }
    }

    /// The first non-empty title text, trimmed.
    pub fn primary(&self) -> Option<&str> {
        match self {
            TitleField::One(title) => {
                let trimmed = title.trim();
                (!trimmed.is_empty()).then_some(trimmed)
            }
            TitleField::Many(titles) => titles
                .iter()
                .map(|t| t.trim())
                .find(|t| !t.is_empty()),
        }
    }

    /// True when no title text carries any content.
    pub fn is_blank(&self) -> bool {
        self.primary().is_none()
    }
}

impl From<&str> for TitleField {
    fn from(title: &str) -> Self {
        TitleField::One(title.to_string())
    }
}

impl From<Vec<String>> for TitleField {
    fn from(titles: Vec<String>) -> Self {
        TitleField::Many(titles)
    }
}

/// A crawled article page with its extracted text fields.
///
/// `title` is required; a record without one is an upstream defect and fails
/// deserialization. The other text fields default to empty, which downstream
/// pipelines treat as "possibly droppable", never as an error.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SiteDocument {
    pub title: TitleField,
    #[serde(default)]
    pub subtitles: Vec<String>,
    #[serde(default)]
    pub paragraphs: Vec<String>,
    #[serde(deserialize_with = "deserialize_href")]
    pub href: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

/// Legacy records wrap `href` in a single-element list; accept both shapes.
fn deserialize_href<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Repr {
        One(String),
        Many(Vec<String>),
    }

    match Repr::deserialize(deserializer)? {
        Repr::One(href) => Ok(href),
        Repr::Many(hrefs) => hrefs
            .into_iter()
            .next()
            .ok_or_else(|| de::Error::custom("href list is empty")),
    }
}

/// A Hacker News front-page entry.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HnPost {
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub src: Option<String>,
    #[serde(default = "missing_score")]
    pub score: i64,
    #[serde(default)]
    pub author: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub age: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fetched_at: Option<DateTime<Utc>>,
}

fn missing_score() -> i64 {
    -1
}
