use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::hash::{Hash, Hasher};

pub mod error;
pub mod index;
pub mod rocchio;
pub mod stopwords;
pub mod tokenizer;

pub use error::{Error, Result};
pub use index::InvertedFileIndex;
pub use rocchio::{RocchioConfig, RocchioEngine};
pub use stopwords::StopWords;
pub use tokenizer::{Analyzer, CachedStemmer};

/// Raw term -> occurrence count of one document.
pub type TermFrequency = HashMap<String, u32>;

/// A judged search result. Identity is the `key` alone: two documents with the
/// same key are the same document, whatever their terms say.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub key: String,
    pub title: String,
    pub snippet: String,
    pub term_frequency: TermFrequency,
}

impl Document {
    pub fn new(key: impl Into<String>, title: impl Into<String>, snippet: impl Into<String>, term_frequency: TermFrequency) -> Self {
        Self { key: key.into(), title: title.into(), snippet: snippet.into(), term_frequency }
    }

    /// Document with only a key and term counts, handy when the text is irrelevant.
    pub fn from_terms<K, T, I>(key: K, terms: I) -> Self
    where
        K: Into<String>,
        T: Into<String>,
        I: IntoIterator<Item = (T, u32)>,
    {
        let term_frequency = terms.into_iter().map(|(t, c)| (t.into(), c)).collect();
        Self::new(key, "", "", term_frequency)
    }

    pub fn tf(&self, term: &str) -> u32 {
        self.term_frequency.get(term).copied().unwrap_or(0)
    }

    /// Checks the value contract the index relies on.
    pub fn validate(&self) -> Result<()> {
        if self.key.trim().is_empty() {
            return Err(Error::invalid_document(&self.key, "empty key"));
        }
        if self.term_frequency.keys().any(|t| t.is_empty()) {
            return Err(Error::invalid_document(&self.key, "empty term"));
        }
        Ok(())
    }
}

impl PartialEq for Document {
    fn eq(&self, other: &Self) -> bool { self.key == other.key }
}

impl Eq for Document {}

impl Hash for Document {
    fn hash<H: Hasher>(&self, state: &mut H) { self.key.hash(state) }
}
