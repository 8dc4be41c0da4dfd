use std::collections::HashSet;
use std::fs;
use std::path::Path;

/// Immutable set of function words whose idf the engine caps.
#[derive(Debug, Default, Clone)]
pub struct StopWords {
    words: HashSet<String>,
}

impl StopWords {
    pub fn empty() -> Self { Self::default() }

    pub fn from_words<I, S>(words: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let words = words
            .into_iter()
            .map(|w| w.as_ref().trim().to_lowercase())
            .filter(|w| !w.is_empty())
            .collect();
        Self { words }
    }

    /// Load one word per line. A missing or unreadable file yields an empty set.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Self {
        let path = path.as_ref();
        match fs::read_to_string(path) {
            Ok(text) => {
                let words = Self::from_words(text.lines());
                tracing::debug!(path = %path.display(), count = words.len(), "loaded stop words");
                words
            }
            Err(e) => {
                tracing::debug!(path = %path.display(), error = %e, "no stop words loaded");
                Self::empty()
            }
        }
    }

    pub fn contains(&self, term: &str) -> bool { self.words.contains(term) }

    pub fn len(&self) -> usize { self.words.len() }

    pub fn is_empty(&self) -> bool { self.words.is_empty() }
}
