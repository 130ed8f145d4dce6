//! Serve keyword-based recommendations over HTTP.

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use hnrec::model::{HashEmbedder, ModelArtifacts};
use hnrec::store::SqliteDocumentStore;
use hnrec::transform::{DocumentTransformer, source_filter};
use hnrec::types::RecError;
use hnrec::{Config, RecommendService, server};

#[tokio::main]
async fn main() -> Result<(), RecError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;
    let store = Arc::new(SqliteDocumentStore::open(&config.db_path).await?);
    let artifacts = ModelArtifacts::load(&config.model_path).await?;
    tracing::info!(
        documents = artifacts.doc_ids.len(),
        clusters = artifacts.kmeans.clusters(),
        "model artifact loaded"
    );

    let service = Arc::new(RecommendService::new(
        store,
        Arc::new(HashEmbedder::new(config.embedding_dimension)),
        DocumentTransformer::standard(&config),
        source_filter(&config),
        artifacts,
    )?);

    server::serve(service, &config.bind_addr).await
}
