//! The HTTP query endpoint.

use std::sync::Arc;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::get;
use axum::Router;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;

use crate::service::{RankedSite, RecommendService};
use crate::types::RecError;

#[derive(Serialize)]
struct ServiceInfo {
    name: &'static str,
    version: &'static str,
    documents: usize,
    clusters: usize,
}

#[derive(Deserialize)]
struct QueryParams {
    #[serde(default)]
    keywords: String,
}

async fn index(State(service): State<Arc<RecommendService>>) -> Json<ServiceInfo> {
    Json(ServiceInfo {
        name: env!("CARGO_PKG_NAME"),
        version: env!("CARGO_PKG_VERSION"),
        documents: service.artifacts().doc_ids.len(),
        clusters: service.artifacts().kmeans.clusters(),
    })
}

async fn query(
    State(service): State<Arc<RecommendService>>,
    Query(params): Query<QueryParams>,
) -> Result<Json<Vec<RankedSite>>, StatusCode> {
    match service.recommend(&params.keywords, false).await {
        Ok(ranked) => Ok(Json(ranked)),
        Err(err) => {
            tracing::error!(error = %err, "query failed");
            Err(StatusCode::INTERNAL_SERVER_ERROR)
        }
    }
}

/// Builds the service router: `GET /` for service info, `GET /query` for
/// recommendations.
pub fn router(service: Arc<RecommendService>) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/query", get(query))
        .with_state(service)
}

/// Binds `addr` and serves until shutdown (ctrl-c).
pub async fn serve(service: Arc<RecommendService>, addr: &str) -> Result<(), RecError> {
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "query service listening");
    axum::serve(listener, router(service))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
        })
        .await?;
    Ok(())
}
