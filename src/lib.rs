//! Hacker News crawler and personalized recommender.
//!
//! ```text
//! Front pages ──► ingest::hn ──► posts ─────────────► store (SQLite)
//!       │
//!       └─► story links ──► ingest::fetch ──► extract::blocks (TextTree)
//!                                                   │
//!                                  extract::paragraphs (seed + neighbors)
//!                                                   │
//!                              extract::fields ──► SiteDocument ──► store
//!
//! SiteDocument ──► transform (title / paragraph pipelines) ──► tokens
//!              tokens ──► model::embedding ──► scaler ──► kmeans
//!                                                   │
//! keywords ──► store keyword match ──► service ──► ranked neighbors ──► server (axum)
//! ```
//!
//! The extraction heuristic and the processor pipelines are the interesting
//! parts; everything else is glue around them. The same
//! [`transform::DocumentTransformer`] configuration runs at training time
//! and at query time so both see identical token sequences.

pub mod config;
pub mod extract;
pub mod ingest;
pub mod model;
pub mod pipeline;
pub mod server;
pub mod service;
pub mod store;
pub mod transform;
pub mod types;

pub use config::Config;
pub use service::{RankedSite, RecommendService};
pub use transform::{DocumentTransformer, TransformedDocument};
pub use types::{HnPost, RecError, SiteDocument, TitleField};
