//! The value type flowing through text-field pipelines.

/// Data at some stage of a text pipeline.
///
/// Fields start as [`Texts`](FieldData::Texts) (raw strings from extraction),
/// become [`TokenLists`](FieldData::TokenLists) after tokenization (one list
/// per surviving text), and end as flat [`Tokens`](FieldData::Tokens).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum FieldData {
    Texts(Vec<String>),
    TokenLists(Vec<Vec<String>>),
    Tokens(Vec<String>),
}

impl FieldData {
    /// Flattens any shape into a single token sequence, preserving order.
    pub fn into_tokens(self) -> Vec<String> {
        match self {
            FieldData::Texts(texts) => texts,
            FieldData::TokenLists(lists) => lists.into_iter().flatten().collect(),
            FieldData::Tokens(tokens) => tokens,
        }
    }

    /// Number of top-level entries.
    pub fn len(&self) -> usize {
        match self {
            FieldData::Texts(texts) => texts.len(),
            FieldData::TokenLists(lists) => lists.len(),
            FieldData::Tokens(tokens) => tokens.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Human-readable shape label, used in abort reasons.
    pub fn shape(&self) -> &'static str {
        match self {
            FieldData::Texts(_) => "texts",
            FieldData::TokenLists(_) => "token lists",
            FieldData::Tokens(_) => "tokens",
        }
    }
}
