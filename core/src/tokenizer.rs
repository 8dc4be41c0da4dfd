use crate::{Document, TermFrequency};
use lazy_static::lazy_static;
use parking_lot::Mutex;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use std::collections::HashMap;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref NON_WORD: Regex = Regex::new(r"[\W_]").expect("valid regex");
}

/// Stemmer with a memo of already stemmed words. The memo belongs to this
/// value, so each session gets its own.
pub struct CachedStemmer {
    stemmer: Stemmer,
    cache: Mutex<HashMap<String, String>>,
}

impl CachedStemmer {
    pub fn new(algorithm: Algorithm) -> Self {
        Self { stemmer: Stemmer::create(algorithm), cache: Mutex::new(HashMap::new()) }
    }

    pub fn english() -> Self { Self::new(Algorithm::English) }

    pub fn stem(&self, word: &str) -> String {
        if let Some(hit) = self.cache.lock().get(word) {
            return hit.clone();
        }
        let stem = self.stemmer.stem(word).into_owned();
        self.cache.lock().insert(word.to_string(), stem.clone());
        stem
    }

    pub fn cache_len(&self) -> usize { self.cache.lock().len() }
}

impl std::fmt::Debug for CachedStemmer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CachedStemmer").field("cached", &self.cache_len()).finish()
    }
}

/// Turns result text into normalized terms.
#[derive(Debug, Default)]
pub struct Analyzer {
    stemmer: Option<CachedStemmer>,
}

impl Analyzer {
    pub fn new() -> Self { Self::default() }

    pub fn with_stemmer(stemmer: CachedStemmer) -> Self { Self { stemmer: Some(stemmer) } }

    pub fn stemmer(&self) -> Option<&CachedStemmer> { self.stemmer.as_ref() }

    /// NFKC-normalize, split on whitespace, lowercase and strip every
    /// non-alphanumeric character. Stop words are kept.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let normalized = text.nfkc().collect::<String>();
        normalized
            .split_whitespace()
            .filter_map(|w| {
                let word = NON_WORD.replace_all(&w.to_lowercase(), "").into_owned();
                if word.is_empty() { return None; }
                Some(match &self.stemmer {
                    Some(s) => s.stem(&word),
                    None => word,
                })
            })
            .collect()
    }

    pub fn term_frequency<'a, I>(&self, texts: I) -> TermFrequency
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut tf = TermFrequency::new();
        for text in texts {
            for term in self.tokenize(text) {
                *tf.entry(term).or_insert(0) += 1;
            }
        }
        tf
    }

    /// Build a document whose terms cover the title, the snippet and, when
    /// scraped, the page body.
    pub fn document(&self, key: &str, title: &str, snippet: &str, body: Option<&str>) -> Document {
        let texts = [Some(title), Some(snippet), body];
        let tf = self.term_frequency(texts.into_iter().flatten());
        Document::new(key, title, snippet, tf)
    }
}
