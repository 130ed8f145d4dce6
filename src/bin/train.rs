//! Fit the clustering model over stored documents and write the artifact.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hnrec::Config;
use hnrec::model::{
    DocumentEmbedder, HashEmbedder, KMeans, KMeansConfig, MinMaxScaler, ModelArtifacts,
};
use hnrec::store::{DocumentStore, SqliteDocumentStore};
use hnrec::transform::{DocumentTransformer, source_filter};
use hnrec::types::RecError;

#[tokio::main]
async fn main() -> Result<(), RecError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store: Arc<dyn DocumentStore> =
        Arc::new(SqliteDocumentStore::open(&config.db_path).await?);

    let transformer = DocumentTransformer::standard(&config);
    let filter = source_filter(&config);
    let embedder = HashEmbedder::new(config.embedding_dimension);

    let sites = store.all_sites().await?;
    tracing::info!(total = sites.len(), "transforming documents");

    let mut kept_ids = Vec::new();
    let mut vectors = Vec::new();
    let mut dropped = 0usize;
    for site in sites {
        let Some(doc) = filter.transform(site.document, false).into_value() else {
            dropped += 1;
            continue;
        };
        let Some(tokens) = transformer.transform_instance(&doc, false).training_tokens() else {
            dropped += 1;
            continue;
        };
        vectors.push(embedder.infer_vector(&tokens));
        kept_ids.push(site.id);
    }
    tracing::info!(kept = kept_ids.len(), dropped, "transformation finished");

    if vectors.is_empty() {
        return Err(RecError::Model(
            "no documents survived transformation; crawl more data first".into(),
        ));
    }

    tracing::info!("scaling feature vectors");
    let (scaler, scaled) = MinMaxScaler::fit_transform(&vectors)?;

    tracing::info!(clusters = config.clusters, "fitting k-means");
    let (kmeans, labels) = KMeans::fit(
        &scaled,
        &KMeansConfig {
            clusters: config.clusters,
            max_iterations: 100,
            seed: config.kmeans_seed,
        },
    )?;

    tracing::info!("writing labels back to the store");
    for (id, &label) in kept_ids.iter().zip(&labels) {
        store.set_label(id, label).await?;
    }

    let artifacts = ModelArtifacts {
        dimension: config.embedding_dimension,
        scaler,
        kmeans,
        doc_ids: kept_ids,
        vectors: scaled,
        labels,
    };
    artifacts.save(&config.model_path).await?;
    tracing::info!(path = %config.model_path.display(), "model artifact saved");
    Ok(())
}
