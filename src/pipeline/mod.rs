//! Ordered, pluggable document-transformation pipelines.
//!
//! A [`Pipeline`] is a chain of [`Processor`]s assembled by priority-ordered
//! registration and executed sequentially. Any processor may signal
//! [`Abort`], which short-circuits the chain: the document is reported as
//! [`PipelineOutcome::Dropped`] and no later processor runs. Two text
//! pipelines (titles and body paragraphs) are configured identically for
//! training and query-time transformation; a document-level pipeline carries
//! source filtering.

pub mod data;
pub mod processor;
pub mod processors;
pub mod stopwords;

pub use data::FieldData;
pub use processor::{Abort, PipelineOutcome, Processor};

struct Entry<T> {
    processor: Box<dyn Processor<T>>,
    order: i32,
}

/// An ordered chain of processors applied to one field of a document.
///
/// Built once at process start and treated as read-only configuration
/// thereafter.
pub struct Pipeline<T> {
    name: String,
    entries: Vec<Entry<T>>,
}

impl<T> Pipeline<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: Vec::new(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Registers a processor at the given execution order (lower runs first).
    ///
    /// The new entry is inserted before the first existing entry whose order
    /// is strictly greater, so entries registered with an equal order run
    /// after the ones already present.
    pub fn register(&mut self, processor: impl Processor<T> + 'static, order: i32) -> &mut Self {
        let at = self
            .entries
            .iter()
            .position(|entry| entry.order > order)
            .unwrap_or(self.entries.len());
        self.entries.insert(
            at,
            Entry {
                processor: Box::new(processor),
                order,
            },
        );
        self
    }

    /// Runs every processor in order, short-circuiting on the first abort.
    pub fn transform(&self, value: T, debug: bool) -> PipelineOutcome<T> {
        let mut current = value;
        for entry in &self.entries {
            match entry.processor.transform(current, debug) {
                Ok(next) => current = next,
                Err(abort) => {
                    tracing::debug!(
                        pipeline = %self.name,
                        processor = entry.processor.name(),
                        reason = %abort.reason,
                        "dropping document"
                    );
                    return PipelineOutcome::Dropped {
                        processor: entry.processor.name().to_string(),
                        reason: abort.reason,
                    };
                }
            }
        }
        PipelineOutcome::Value(current)
    }

    /// Processor names in execution order.
    pub fn processor_names(&self) -> Vec<&str> {
        self.entries
            .iter()
            .map(|entry| entry.processor.name())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
