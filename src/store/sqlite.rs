//! SQLite-backed document store.
//!
//! Site documents are stored as JSON alongside a `site_paragraphs` side
//! table holding one row per paragraph, so keyword aggregation is a grouped
//! count over paragraph rows rather than a scan of serialized documents.

use std::path::Path;

use async_trait::async_trait;
use tokio_rusqlite::{Connection, OptionalExtension, rusqlite};
use uuid::Uuid;

use super::{DocumentStore, KeywordMatch, StoredSite};
use crate::types::{HnPost, RecError, SiteDocument};

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS sites (
    id          TEXT PRIMARY KEY,
    href        TEXT NOT NULL UNIQUE,
    document    TEXT NOT NULL,
    label       INTEGER,
    inserted_at TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE TABLE IF NOT EXISTS site_paragraphs (
    site_id TEXT NOT NULL,
    idx     INTEGER NOT NULL,
    content TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_site_paragraphs_site ON site_paragraphs(site_id);
CREATE TABLE IF NOT EXISTS posts (
    src_url     TEXT PRIMARY KEY,
    post        TEXT NOT NULL,
    inserted_at TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
";

/// Document store over a single SQLite database file.
#[derive(Clone)]
pub struct SqliteDocumentStore {
    conn: Connection,
}

impl SqliteDocumentStore {
    /// Opens (creating if needed) the database at `path` and ensures the
    /// schema exists.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, RecError> {
        let conn = Connection::open(path).await?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    /// In-memory database, used by tests and scratch runs.
    pub async fn open_in_memory() -> Result<Self, RecError> {
        let conn = Connection::open_in_memory().await?;
        conn.call(|conn| {
            conn.execute_batch(SCHEMA)?;
            Ok(())
        })
        .await?;
        Ok(Self { conn })
    }

    async fn fetch_site_row(
        &self,
        sql: &'static str,
        key: String,
    ) -> Result<Option<StoredSite>, RecError> {
        let row: Option<(String, String, Option<i64>)> = self
            .conn
            .call(move |conn| {
                let row = conn
                    .query_row(sql, [key], |row| {
                        Ok((row.get(0)?, row.get(1)?, row.get(2)?))
                    })
                    .optional()?;
                Ok(row)
            })
            .await?;
        row.map(|(id, document, label)| {
            let document: SiteDocument = serde_json::from_str(&document)?;
            Ok(StoredSite {
                id,
                document,
                label: label.map(|l| l as u32),
            })
        })
        .transpose()
    }
}

#[async_trait]
impl DocumentStore for SqliteDocumentStore {
    async fn upsert_site(&self, doc: &SiteDocument) -> Result<String, RecError> {
        let href = doc.href.clone();
        let document = serde_json::to_string(doc)?;
        let paragraphs = doc.paragraphs.clone();
        let fresh_id = Uuid::new_v4().to_string();
        let now = chrono::Utc::now().to_rfc3339();

        let id = self
            .conn
            .call(move |conn| {
                let tx = conn.transaction()?;
                let existing: Option<String> = tx
                    .query_row("SELECT id FROM sites WHERE href = ?1", [&href], |row| {
                        row.get(0)
                    })
                    .optional()?;

                let id = match existing {
                    Some(id) => {
                        tx.execute(
                            "UPDATE sites SET document = ?2, updated_at = ?3 WHERE id = ?1",
                            (&id, &document, &now),
                        )?;
                        tx.execute("DELETE FROM site_paragraphs WHERE site_id = ?1", [&id])?;
                        id
                    }
                    None => {
                        tx.execute(
                            "INSERT INTO sites (id, href, document, label, inserted_at, updated_at)
                             VALUES (?1, ?2, ?3, NULL, ?4, ?4)",
                            (&fresh_id, &href, &document, &now),
                        )?;
                        fresh_id
                    }
                };

                for (idx, content) in paragraphs.iter().enumerate() {
                    tx.execute(
                        "INSERT INTO site_paragraphs (site_id, idx, content) VALUES (?1, ?2, ?3)",
                        (&id, idx as i64, content),
                    )?;
                }
                tx.commit()?;
                Ok(id)
            })
            .await?;
        Ok(id)
    }

    async fn upsert_post(&self, post: &HnPost) -> Result<(), RecError> {
        let key = post
            .src_url
            .clone()
            .unwrap_or_else(|| post.title.clone());
        let serialized = serde_json::to_string(post)?;
        let now = chrono::Utc::now().to_rfc3339();

        self.conn
            .call(move |conn| {
                conn.execute(
                    "INSERT INTO posts (src_url, post, inserted_at, updated_at)
                     VALUES (?1, ?2, ?3, ?3)
                     ON CONFLICT(src_url) DO UPDATE SET
                         post = excluded.post,
                         updated_at = excluded.updated_at",
                    (&key, &serialized, &now),
                )?;
                Ok(())
            })
            .await?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> Result<Option<StoredSite>, RecError> {
        self.fetch_site_row(
            "SELECT id, document, label FROM sites WHERE id = ?1",
            id.to_string(),
        )
        .await
    }

    async fn find_by_href(&self, href: &str) -> Result<Option<StoredSite>, RecError> {
        self.fetch_site_row(
            "SELECT id, document, label FROM sites WHERE href = ?1",
            href.to_string(),
        )
        .await
    }

    async fn all_sites(&self) -> Result<Vec<StoredSite>, RecError> {
        let rows: Vec<(String, String, Option<i64>)> = self
            .conn
            .call(|conn| {
                let mut stmt = conn.prepare(
                    "SELECT id, document, label FROM sites ORDER BY rowid ASC",
                )?;
                let rows = stmt
                    .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(id, document, label)| {
                let document: SiteDocument = serde_json::from_str(&document)?;
                Ok(StoredSite {
                    id,
                    document,
                    label: label.map(|l| l as u32),
                })
            })
            .collect()
    }

    async fn find_by_keyword_match(
        &self,
        keywords: &[String],
    ) -> Result<Vec<KeywordMatch>, RecError> {
        if keywords.is_empty() {
            return Ok(vec![]);
        }
        let patterns: Vec<String> = keywords
            .iter()
            .map(|keyword| format!("%{}%", keyword.to_lowercase()))
            .collect();
        let clause = patterns
            .iter()
            .map(|_| "lower(content) LIKE ?")
            .collect::<Vec<_>>()
            .join(" OR ");
        let sql = format!(
            "SELECT site_id, COUNT(*) AS matches FROM site_paragraphs
             WHERE {clause}
             GROUP BY site_id
             ORDER BY matches DESC"
        );

        let matches = self
            .conn
            .call(move |conn| {
                let mut stmt = conn.prepare(&sql)?;
                let rows = stmt
                    .query_map(rusqlite::params_from_iter(patterns.iter()), |row| {
                        Ok(KeywordMatch {
                            id: row.get(0)?,
                            matches: row.get::<_, i64>(1)? as u64,
                        })
                    })?
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(rows)
            })
            .await?;
        Ok(matches)
    }

    async fn set_label(&self, id: &str, label: u32) -> Result<(), RecError> {
        let id = id.to_string();
        let changed = self
            .conn
            .call(move |conn| {
                let changed = conn.execute(
                    "UPDATE sites SET label = ?2 WHERE id = ?1",
                    (&id, label as i64),
                )?;
                Ok(changed)
            })
            .await?;
        if changed == 0 {
            return Err(RecError::Storage("set_label on unknown site id".into()));
        }
        Ok(())
    }

    async fn count_sites(&self) -> Result<usize, RecError> {
        let count: i64 = self
            .conn
            .call(|conn| {
                let count = conn.query_row("SELECT COUNT(*) FROM sites", [], |row| row.get(0))?;
                Ok(count)
            })
            .await?;
        Ok(count as usize)
    }
}
