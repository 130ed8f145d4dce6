//! End-to-end recommendation flow over an in-memory store.

use std::sync::Arc;

use hnrec::model::{
    DocumentEmbedder, HashEmbedder, KMeans, KMeansConfig, MinMaxScaler, ModelArtifacts,
};
use hnrec::store::{DocumentStore, SqliteDocumentStore};
use hnrec::transform::{DocumentTransformer, source_filter};
use hnrec::types::{SiteDocument, TitleField};
use hnrec::{Config, RecommendService};

const DIMENSION: usize = 16;

fn config() -> Config {
    Config {
        title_token_floor: 1,
        paragraph_token_floor: 3,
        embedding_dimension: DIMENSION,
        clusters: 2,
        ..Config::default()
    }
}

fn doc(href: &str, title: &str, paragraphs: &[&str]) -> SiteDocument {
    SiteDocument {
        title: TitleField::from(title),
        subtitles: vec![],
        paragraphs: paragraphs.iter().map(|s| s.to_string()).collect(),
        href: href.to_string(),
        src: None,
        fetched_at: None,
    }
}

fn corpus() -> Vec<SiteDocument> {
    vec![
        doc(
            "https://a.example/ferris",
            "Ferris the crab",
            &["ferris ownership borrowing lifetimes traits", "ferris compiles generics monomorphization"],
        ),
        doc(
            "https://a.example/borrowck",
            "Borrow checking",
            &["ownership borrowing lifetimes aliasing mutation"],
        ),
        doc(
            "https://a.example/gardening",
            "Tomato gardening",
            &["tomatoes watering sunlight pruning compost"],
        ),
        doc(
            "https://a.example/soil",
            "Soil preparation",
            &["compost mulching watering topsoil drainage"],
        ),
    ]
}

/// Mirrors the trainer: transform, embed, scale, cluster, and bundle.
async fn build_service(store: Arc<SqliteDocumentStore>) -> RecommendService {
    let cfg = config();
    let transformer = DocumentTransformer::standard(&cfg);
    let filter = source_filter(&cfg);
    let embedder = HashEmbedder::new(DIMENSION);

    let mut doc_ids = Vec::new();
    let mut vectors = Vec::new();
    for site in store.all_sites().await.unwrap() {
        let kept = filter.transform(site.document, false).into_value().unwrap();
        let tokens = transformer
            .transform_instance(&kept, false)
            .training_tokens()
            .unwrap();
        vectors.push(embedder.infer_vector(&tokens));
        doc_ids.push(site.id);
    }

    let (scaler, scaled) = MinMaxScaler::fit_transform(&vectors).unwrap();
    let (kmeans, labels) = KMeans::fit(
        &scaled,
        &KMeansConfig {
            clusters: 2,
            max_iterations: 50,
            seed: 3,
        },
    )
    .unwrap();

    let artifacts = ModelArtifacts {
        dimension: DIMENSION,
        scaler,
        kmeans,
        doc_ids,
        vectors: scaled,
        labels,
    };

    RecommendService::new(
        store,
        Arc::new(embedder),
        DocumentTransformer::standard(&config()),
        source_filter(&config()),
        artifacts,
    )
    .unwrap()
}

async fn seeded_store() -> Arc<SqliteDocumentStore> {
    let store = Arc::new(SqliteDocumentStore::open_in_memory().await.unwrap());
    for doc in corpus() {
        store.upsert_site(&doc).await.unwrap();
    }
    store
}

#[tokio::test]
async fn keywords_surface_the_matching_cluster() {
    let store = seeded_store().await;
    let service = build_service(store).await;

    let ranked = service.recommend("ferris", false).await.unwrap();
    assert!(!ranked.is_empty());
    // The best keyword match is the ferris document itself; its cluster
    // neighborhood must include it.
    assert!(ranked.iter().any(|site| site.href.ends_with("/ferris")));
    // Results come back nearest first.
    for pair in ranked.windows(2) {
        assert!(pair[0].distance <= pair[1].distance);
    }
}

#[tokio::test]
async fn empty_and_unmatched_keywords_yield_empty_results() {
    let store = seeded_store().await;
    let service = build_service(store).await;

    assert!(service.recommend("", false).await.unwrap().is_empty());
    assert!(service.recommend(" , ,", false).await.unwrap().is_empty());
    assert!(
        service
            .recommend("quasar pulsar", false)
            .await
            .unwrap()
            .is_empty()
    );
}

#[tokio::test]
async fn excluded_sources_produce_empty_results_not_errors() {
    let store = seeded_store().await;
    // A paywalled document that will be the only keyword match.
    store
        .upsert_site(&doc(
            "https://www.ft.com/content/abc",
            "Paywalled exclusive",
            &["zanzibar exclusive reporting details coverage"],
        ))
        .await
        .unwrap();

    let service = build_service_excluding_paywall(store).await;
    let ranked = service.recommend("zanzibar", false).await.unwrap();
    assert!(ranked.is_empty());
}

/// Like [`build_service`] but trains only on the non-excluded corpus, the way
/// the real trainer's source filter behaves.
async fn build_service_excluding_paywall(store: Arc<SqliteDocumentStore>) -> RecommendService {
    let cfg = config();
    let transformer = DocumentTransformer::standard(&cfg);
    let filter = source_filter(&cfg);
    let embedder = HashEmbedder::new(DIMENSION);

    let mut doc_ids = Vec::new();
    let mut vectors = Vec::new();
    for site in store.all_sites().await.unwrap() {
        let Some(kept) = filter.transform(site.document, false).into_value() else {
            continue;
        };
        let Some(tokens) = transformer
            .transform_instance(&kept, false)
            .training_tokens()
        else {
            continue;
        };
        vectors.push(embedder.infer_vector(&tokens));
        doc_ids.push(site.id);
    }

    let (scaler, scaled) = MinMaxScaler::fit_transform(&vectors).unwrap();
    let (kmeans, labels) = KMeans::fit(
        &scaled,
        &KMeansConfig {
            clusters: 2,
            max_iterations: 50,
            seed: 3,
        },
    )
    .unwrap();

    RecommendService::new(
        store,
        Arc::new(embedder),
        DocumentTransformer::standard(&config()),
        source_filter(&config()),
        ModelArtifacts {
            dimension: DIMENSION,
            scaler,
            kmeans,
            doc_ids,
            vectors: scaled,
            labels,
        },
    )
    .unwrap()
}
