//! Embedding, scaling, clustering, and the persisted model artifact.
//!
//! The trainer produces a single JSON [`ModelArtifacts`] file; the query
//! service loads it once at startup. Nothing here performs I/O except the
//! artifact save/load pair.

pub mod embedding;
pub mod kmeans;
pub mod neighbors;
pub mod scaler;

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::types::RecError;

pub use embedding::{DocumentEmbedder, HashEmbedder};
pub use kmeans::{KMeans, KMeansConfig};
pub use neighbors::{RankedNeighbor, rank_within_cluster};
pub use scaler::MinMaxScaler;

/// Everything the query service needs from a training run.
///
/// `doc_ids`, `vectors`, and `labels` are parallel arrays over the documents
/// that survived transformation; `vectors` are already scaled.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ModelArtifacts {
    pub dimension: usize,
    pub scaler: MinMaxScaler,
    pub kmeans: KMeans,
    pub doc_ids: Vec<String>,
    pub vectors: Vec<Vec<f32>>,
    pub labels: Vec<u32>,
}

impl ModelArtifacts {
    fn validate(&self) -> Result<(), RecError> {
        if self.doc_ids.len() != self.vectors.len() || self.doc_ids.len() != self.labels.len() {
            return Err(RecError::Model(format!(
                "artifact arrays disagree: {} ids, {} vectors, {} labels",
                self.doc_ids.len(),
                self.vectors.len(),
                self.labels.len()
            )));
        }
        Ok(())
    }

    /// Serializes the artifact to JSON at `path`.
    pub async fn save(&self, path: impl AsRef<Path>) -> Result<(), RecError> {
        self.validate()?;
        let serialized = serde_json::to_string(self)?;
        tokio::fs::write(path, serialized).await?;
        Ok(())
    }

    /// Loads and validates an artifact written by [`save`](Self::save).
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, RecError> {
        let raw = tokio::fs::read_to_string(path).await?;
        let artifacts: Self = serde_json::from_str(&raw)?;
        artifacts.validate()?;
        Ok(artifacts)
    }
}
