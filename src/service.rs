//! The recommendation service: keywords in, ranked similar documents out.

use std::sync::Arc;

use serde::Serialize;

use crate::model::{DocumentEmbedder, ModelArtifacts, rank_within_cluster};
use crate::pipeline::Pipeline;
use crate::store::DocumentStore;
use crate::transform::DocumentTransformer;
use crate::types::{RecError, SiteDocument};

/// One recommended document.
#[derive(Clone, Debug, Serialize)]
pub struct RankedSite {
    pub id: String,
    pub href: String,
    pub title: String,
    pub label: u32,
    pub distance: f32,
}

/// Everything the query path needs, constructed once at startup.
///
/// Holds the store handle, the embedder, the same transformer configuration
/// the trainer used, and the model artifacts from the last training run.
/// All state is read-only after construction.
pub struct RecommendService {
    store: Arc<dyn DocumentStore>,
    embedder: Arc<dyn DocumentEmbedder>,
    transformer: DocumentTransformer,
    source_filter: Pipeline<SiteDocument>,
    artifacts: ModelArtifacts,
}

impl RecommendService {
    pub fn new(
        store: Arc<dyn DocumentStore>,
        embedder: Arc<dyn DocumentEmbedder>,
        transformer: DocumentTransformer,
        source_filter: Pipeline<SiteDocument>,
        artifacts: ModelArtifacts,
    ) -> Result<Self, RecError> {
        if embedder.dimension() != artifacts.dimension {
            return Err(RecError::Model(format!(
                "embedder width {} does not match artifact width {}",
                embedder.dimension(),
                artifacts.dimension
            )));
        }
        Ok(Self {
            store,
            embedder,
            transformer,
            source_filter,
            artifacts,
        })
    }

    /// Recommends documents for a comma-separated keyword string.
    ///
    /// Every "nothing to recommend" case (no keywords, no keyword matches,
    /// the best match filtered or dropped by its pipelines) yields an empty
    /// list, never an error.
    pub async fn recommend(&self, keywords_csv: &str, debug: bool) -> Result<Vec<RankedSite>, RecError> {
        let keywords: Vec<String> = keywords_csv
            .split(',')
            .map(|keyword| keyword.trim().to_string())
            .filter(|keyword| !keyword.is_empty())
            .collect();
        if keywords.is_empty() {
            return Ok(vec![]);
        }

        let matches = self.store.find_by_keyword_match(&keywords).await?;
        let Some(best) = matches.first() else {
            tracing::debug!(?keywords, "no documents match the keywords");
            return Ok(vec![]);
        };
        let Some(stored) = self.store.find_by_id(&best.id).await? else {
            tracing::warn!(id = %best.id, "keyword match points at a missing document");
            return Ok(vec![]);
        };

        let Some(doc) = self
            .source_filter
            .transform(stored.document, debug)
            .into_value()
        else {
            return Ok(vec![]);
        };

        let transformed = self.transformer.transform_instance(&doc, debug);
        let Some(tokens) = transformed.training_tokens() else {
            tracing::debug!(href = %doc.href, "query document dropped by its pipelines");
            return Ok(vec![]);
        };

        let vector = self.embedder.infer_vector(&tokens);
        let scaled = self.artifacts.scaler.transform(&vector);
        let label = self.artifacts.kmeans.predict(&scaled);
        let neighbors =
            rank_within_cluster(&self.artifacts.vectors, &self.artifacts.labels, label, &scaled);

        let mut ranked = Vec::with_capacity(neighbors.len());
        for neighbor in neighbors {
            let id = &self.artifacts.doc_ids[neighbor.index];
            let Some(site) = self.store.find_by_id(id).await? else {
                tracing::warn!(id = %id, "model artifact references a missing document");
                continue;
            };
            ranked.push(RankedSite {
                id: site.id,
                href: site.document.href.clone(),
                title: site
                    .document
                    .title
                    .primary()
                    .unwrap_or(site.document.href.as_str())
                    .to_string(),
                label,
                distance: neighbor.distance,
            });
        }
        Ok(ranked)
    }

    pub fn artifacts(&self) -> &ModelArtifacts {
        &self.artifacts
    }
}
