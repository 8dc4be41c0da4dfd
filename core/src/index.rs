use crate::{Document, Result};
use std::collections::HashMap;
use std::sync::Arc;

/// Inverted file over one collection of documents.
///
/// Each term maps to the documents it occurs in together with the raw (not
/// normalized) occurrence count. Documents only ever accumulate.
#[derive(Debug, Default, Clone)]
pub struct InvertedFileIndex {
    documents: Vec<Arc<Document>>,
    postings: HashMap<String, HashMap<Arc<Document>, u32>>,
}

impl InvertedFileIndex {
    pub fn new() -> Self { Self::default() }

    /// Index `doc`. `None` is a no-op. Does not deduplicate: adding the same
    /// document twice counts it twice in `nr_docs`.
    pub fn add_document(&mut self, doc: impl Into<Option<Arc<Document>>>) -> Result<()> {
        let Some(doc) = doc.into() else { return Ok(()) };
        doc.validate()?;
        for (term, &count) in doc.term_frequency.iter() {
            // zero counts would break df(term) == |postings[term]|
            if count == 0 { continue; }
            self.postings.entry(term.clone()).or_default().insert(Arc::clone(&doc), count);
        }
        self.documents.push(doc);
        Ok(())
    }

    pub fn nr_docs(&self) -> usize { self.documents.len() }

    pub fn nr_words(&self) -> usize { self.postings.len() }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.postings.keys().map(String::as_str)
    }

    pub fn documents(&self) -> impl Iterator<Item = &Arc<Document>> + '_ {
        self.documents.iter()
    }

    /// Number of documents containing `term`.
    pub fn df(&self, term: &str) -> usize {
        self.postings.get(term).map_or(0, HashMap::len)
    }

    /// `log10(N / df)`, or 0.0 when either side is zero.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.nr_docs();
        if n == 0 { return 0.0; }
        let df = self.df(term);
        if df == 0 { return 0.0; }
        (n as f64 / df as f64).log10()
    }

    /// Copy of the document -> raw count mapping of `term`.
    pub fn tfs(&self, term: &str) -> HashMap<Arc<Document>, u32> {
        self.postings.get(term).cloned().unwrap_or_default()
    }

    /// Borrowed view of the postings of `term`, for hot loops that only read.
    pub(crate) fn postings(&self, term: &str) -> Option<&HashMap<Arc<Document>, u32>> {
        self.postings.get(term)
    }
}
