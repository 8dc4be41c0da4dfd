//! Rocchio relevance feedback.
//!
//! The engine accumulates every document the user has judged during a session
//! and, on each round, re-weights all terms of the relevant documents against
//! the full history to pick the next query terms.

use crate::{Document, InvertedFileIndex, Result, StopWords};
use std::cmp::Ordering;
use std::collections::HashSet;
use std::sync::Arc;

/// Weighting coefficients of the engine.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RocchioConfig {
    /// Weight of relevant-document evidence.
    pub alpha: f64,
    /// Weight of irrelevant-document evidence; 0 disables the adjustment.
    pub beta: f64,
    /// Upper bound of the idf of any stop word.
    pub stop_word_idf_cap: f64,
}

impl Default for RocchioConfig {
    fn default() -> Self {
        Self { alpha: 1.0, beta: 0.0, stop_word_idf_cap: 1e-4 }
    }
}

impl RocchioConfig {
    pub fn new(alpha: f64, beta: f64) -> Self { Self { alpha, beta, ..Self::default() } }

    pub fn with_alpha(mut self, alpha: f64) -> Self {
        self.alpha = alpha;
        self
    }

    pub fn with_beta(mut self, beta: f64) -> Self {
        self.beta = beta;
        self
    }

    pub fn with_stop_word_idf_cap(mut self, cap: f64) -> Self {
        self.stop_word_idf_cap = cap;
        self
    }
}

/// Documents of one judgment class: the keys seen so far and their index,
/// always updated together.
#[derive(Debug, Default)]
struct JudgedSet {
    keys: HashSet<String>,
    index: InvertedFileIndex,
}

impl JudgedSet {
    fn absorb(&mut self, docs: &[Document]) -> Result<usize> {
        let mut added = 0;
        for doc in docs {
            if self.keys.contains(&doc.key) { continue; }
            self.index.add_document(Arc::new(doc.clone()))?;
            self.keys.insert(doc.key.clone());
            added += 1;
        }
        debug_assert_eq!(self.keys.len(), self.index.nr_docs());
        Ok(added)
    }

    fn len(&self) -> usize { self.keys.len() }

    /// `Σ log10(1 + tf)` over the documents of this set containing `term`.
    fn damped_tf(&self, term: &str) -> f64 {
        self.index
            .postings(term)
            .map_or(0.0, |p| p.values().map(|&tf| (1.0 + tf as f64).log10()).sum())
    }
}

/// Session-scoped relevance feedback state.
#[derive(Debug)]
pub struct RocchioEngine {
    config: RocchioConfig,
    stop_words: StopWords,
    relevant: JudgedSet,
    irrelevant: JudgedSet,
}

impl Default for RocchioEngine {
    fn default() -> Self { Self::new(RocchioConfig::default(), StopWords::empty()) }
}

impl RocchioEngine {
    pub fn new(config: RocchioConfig, stop_words: StopWords) -> Self {
        Self { config, stop_words, relevant: JudgedSet::default(), irrelevant: JudgedSet::default() }
    }

    pub fn config(&self) -> &RocchioConfig { &self.config }

    pub fn stop_words(&self) -> &StopWords { &self.stop_words }

    pub fn relevant_count(&self) -> usize { self.relevant.len() }

    pub fn irrelevant_count(&self) -> usize { self.irrelevant.len() }

    pub fn relevant_index(&self) -> &InvertedFileIndex { &self.relevant.index }

    pub fn irrelevant_index(&self) -> &InvertedFileIndex { &self.irrelevant.index }

    /// Record new judgments, then return up to `k` new query terms ranked by
    /// weight. Terms in `blacklist` (the current query) are never proposed.
    ///
    /// Documents already judged in an earlier round (same key) are skipped.
    /// If any incoming document is invalid nothing is recorded.
    pub fn generate_query<S: AsRef<str>>(
        &mut self,
        relevant: &[Document],
        irrelevant: &[Document],
        blacklist: &[S],
        k: usize,
    ) -> Result<Vec<String>> {
        for doc in relevant.iter().chain(irrelevant) {
            doc.validate()?;
        }
        let new_rel = self.relevant.absorb(relevant)?;
        let new_irrel = self.irrelevant.absorb(irrelevant)?;
        tracing::debug!(
            new_rel,
            new_irrel,
            relevant = self.relevant_count(),
            irrelevant = self.irrelevant_count(),
            "absorbed judgments"
        );

        if k == 0 { return Ok(Vec::new()); }
        let ranked = self.ranked_terms(blacklist);
        Ok(ranked.into_iter().take(k).map(|(term, _)| term).collect())
    }

    /// idf over both judged collections together, capped for stop words.
    pub fn idf(&self, term: &str) -> f64 {
        let n = self.relevant_count() + self.irrelevant_count();
        let df = self.relevant.index.df(term) + self.irrelevant.index.df(term);
        let idf = if n > 0 && df > 0 { (n as f64 / df as f64).log10() } else { 0.0 };
        if self.stop_words.contains(term) {
            idf.min(self.config.stop_word_idf_cap)
        } else {
            idf
        }
    }

    /// Every candidate term with a positive weight, best first. Ties are broken
    /// by term so the ranking is deterministic. Does not change state.
    pub fn ranked_terms<S: AsRef<str>>(&self, blacklist: &[S]) -> Vec<(String, f64)> {
        let blacklist: HashSet<&str> = blacklist.iter().map(|s| s.as_ref()).collect();
        let mut weights: Vec<(String, f64)> = self
            .relevant
            .index
            .words()
            .filter(|term| !blacklist.contains(term))
            .map(|term| (term.to_string(), self.relevant_weight(term)))
            .collect();

        let RocchioConfig { alpha, beta, .. } = self.config;
        if beta > 0.0 && self.irrelevant_count() > 0 {
            let rel_n = self.relevant_count() as f64;
            let irrel_n = self.irrelevant_count() as f64;
            for (term, weight) in weights.iter_mut() {
                if *weight == 0.0 { continue; }
                let irrel = self.irrelevant_weight(term);
                // terms never seen in irrelevant documents keep their raw weight
                if irrel > 0.0 {
                    *weight = (alpha * *weight / rel_n - beta * irrel / irrel_n).max(0.0);
                }
            }
        }

        weights.retain(|(_, w)| *w > 0.0);
        weights.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(Ordering::Equal).then_with(|| a.0.cmp(&b.0)));
        tracing::debug!(candidates = weights.len(), top = ?weights.iter().take(5).collect::<Vec<_>>(), "ranked terms");
        weights
    }

    fn relevant_weight(&self, term: &str) -> f64 {
        let idf = self.idf(term);
        if idf == 0.0 { return 0.0; }
        idf * self.relevant.damped_tf(term)
    }

    fn irrelevant_weight(&self, term: &str) -> f64 {
        let idf = self.idf(term);
        if idf == 0.0 { return 0.0; }
        idf * self.irrelevant.damped_tf(term)
    }
}
