//! Document transformation: stored documents to embedding-ready tokens.
//!
//! The same transformer runs at training time and at query time so both see
//! identical token sequences.

use crate::config::Config;
use crate::pipeline::processors::{ExcludeByContent, ExcludeBySource, Flatten, Tokenize, WordCountFloor};
use crate::pipeline::{FieldData, Pipeline};
use crate::types::SiteDocument;

/// Result of transforming one document's fields.
///
/// A `None` side means that field's pipeline dropped the document. Callers
/// must go through [`training_tokens`](Self::training_tokens), which refuses
/// to concatenate unless both sides survived.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TransformedDocument {
    pub title_tokens: Option<Vec<String>>,
    pub paragraph_tokens: Option<Vec<String>>,
}

impl TransformedDocument {
    /// True when either field pipeline dropped the document.
    pub fn is_dropped(&self) -> bool {
        self.title_tokens.is_none() || self.paragraph_tokens.is_none()
    }

    /// The full token sequence for embedding: title tokens followed by
    /// paragraph tokens, present only when both sides survived their
    /// pipelines.
    pub fn training_tokens(self) -> Option<Vec<String>> {
        match (self.title_tokens, self.paragraph_tokens) {
            (Some(mut tokens), Some(paragraph_tokens)) => {
                tokens.extend(paragraph_tokens);
                Some(tokens)
            }
            _ => None,
        }
    }
}

/// Runs a document's title and paragraph fields through their pipelines.
pub struct DocumentTransformer {
    title_pipeline: Pipeline<FieldData>,
    paragraph_pipeline: Pipeline<FieldData>,
}

impl DocumentTransformer {
    pub fn new(title_pipeline: Pipeline<FieldData>, paragraph_pipeline: Pipeline<FieldData>) -> Self {
        Self {
            title_pipeline,
            paragraph_pipeline,
        }
    }

    /// The standard two-pipeline configuration: tokenize at order 30, flatten
    /// at 60, token floor at 70, with an optional content exclusion up front.
    pub fn standard(config: &Config) -> Self {
        let mut title_pipeline = Pipeline::new("title");
        if !config.exclude_title_content.is_empty() {
            title_pipeline.register(
                ExcludeByContent::new("title_content_exclude", config.exclude_title_content.clone()),
                10,
            );
        }
        title_pipeline.register(Tokenize::new("title_tokenize"), 30);
        title_pipeline.register(Flatten::new("title_flatten"), 60);
        title_pipeline.register(
            WordCountFloor::new("title_word_floor", config.title_token_floor),
            70,
        );

        let mut paragraph_pipeline = Pipeline::new("paragraph");
        paragraph_pipeline.register(Tokenize::new("pgraph_tokenize"), 30);
        paragraph_pipeline.register(Flatten::new("pgraph_flatten"), 60);
        paragraph_pipeline.register(
            WordCountFloor::new("pgraph_word_floor", config.paragraph_token_floor),
            70,
        );

        Self::new(title_pipeline, paragraph_pipeline)
    }

    pub fn title_pipeline(&self) -> &Pipeline<FieldData> {
        &self.title_pipeline
    }

    pub fn paragraph_pipeline(&self) -> &Pipeline<FieldData> {
        &self.paragraph_pipeline
    }

    /// Transforms one document: title plus subtitles through the title
    /// pipeline, paragraphs through the paragraph pipeline. Either side may
    /// come back `None` when its pipeline aborted.
    pub fn transform_instance(&self, doc: &SiteDocument, debug: bool) -> TransformedDocument {
        tracing::debug!(href = %doc.href, "transforming document");

        let mut titles = doc.title.to_vec();
        titles.extend(doc.subtitles.iter().cloned());
        let title_outcome = self.title_pipeline.transform(FieldData::Texts(titles), debug);

        let paragraph_outcome = self
            .paragraph_pipeline
            .transform(FieldData::Texts(doc.paragraphs.clone()), debug);

        TransformedDocument {
            title_tokens: title_outcome.into_value().map(FieldData::into_tokens),
            paragraph_tokens: paragraph_outcome.into_value().map(FieldData::into_tokens),
        }
    }
}

/// The document-level filter applied before field transformation.
pub fn source_filter(config: &Config) -> Pipeline<SiteDocument> {
    let mut pipeline = Pipeline::new("source_filter");
    pipeline.register(
        ExcludeBySource::new("exclude_sites", config.exclude_sites.clone()),
        10,
    );
    pipeline
}
