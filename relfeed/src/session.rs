//! The interactive feedback loop: search, let the user judge, expand, repeat.

use crate::history::{HistoryWriter, RoundRecord};
use crate::prompt::ask_relevance;
use anyhow::Result;
use rocchio::{Analyzer, Document, RocchioEngine};
use std::io::{BufRead, Write};
use websearch::{PageScraper, SearchClient, SearchItem};

#[derive(Debug, Clone, Copy)]
pub struct SessionConfig {
    /// Stop once a round reaches this precision, in (0, 1].
    pub target_precision: f64,
    /// New terms added per round.
    pub terms_per_round: usize,
    pub max_rounds: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self { target_precision: 0.9, terms_per_round: 2, max_rounds: 10 }
    }
}

/// Why a session ended.
#[derive(Debug, Clone, PartialEq)]
pub enum Outcome {
    Reached { round: usize, precision: f64 },
    NoResults { round: usize },
    NoRelevant { round: usize },
    NoNewTerms { round: usize, precision: f64 },
    RoundLimit { precision: f64 },
}

fn keys(docs: &[Document]) -> Vec<String> {
    docs.iter().map(|d| d.key.clone()).collect()
}

/// Judgments of one round.
#[derive(Debug, Default)]
pub struct Judgment {
    pub relevant: Vec<Document>,
    pub irrelevant: Vec<Document>,
}

impl Judgment {
    pub fn total(&self) -> usize { self.relevant.len() + self.irrelevant.len() }

    pub fn precision(&self) -> f64 {
        if self.total() == 0 { return 0.0; }
        self.relevant.len() as f64 / self.total() as f64
    }
}

pub struct Session {
    engine: RocchioEngine,
    analyzer: Analyzer,
    config: SessionConfig,
    history: Option<HistoryWriter>,
    query: Vec<String>,
    /// Query words as the analyzer sees them, so they match document terms.
    blacklist: Vec<String>,
    round: usize,
}

impl Session {
    pub fn new(engine: RocchioEngine, analyzer: Analyzer, config: SessionConfig, query: &str) -> Self {
        let blacklist = analyzer.tokenize(query);
        let query = query.split_whitespace().map(str::to_lowercase).collect();
        Self { engine, analyzer, config, history: None, query, blacklist, round: 0 }
    }

    pub fn with_history(mut self, history: HistoryWriter) -> Self {
        self.history = Some(history);
        self
    }

    pub fn query(&self) -> &[String] { &self.query }

    pub fn blacklist(&self) -> &[String] { &self.blacklist }

    pub fn round(&self) -> usize { self.round }

    pub fn engine(&self) -> &RocchioEngine { &self.engine }

    /// Ask the user about every item. `bodies`, when given, is the scraped text
    /// of each item in the same order.
    pub fn judge<R: BufRead, W: Write>(
        &self,
        items: &[SearchItem],
        bodies: Option<&[String]>,
        input: &mut R,
        out: &mut W,
    ) -> Result<Judgment> {
        let mut judgment = Judgment::default();
        for (i, item) in items.iter().enumerate() {
            let relevant = ask_relevance(input, out, i + 1, item)?;
            let body = bodies.and_then(|b| b.get(i)).map(String::as_str);
            let doc = item.to_document(&self.analyzer, body);
            if relevant {
                judgment.relevant.push(doc);
            } else {
                judgment.irrelevant.push(doc);
            }
        }
        Ok(judgment)
    }

    /// Close the current round. Returns the outcome when the session is over,
    /// otherwise extends the query with the engine's new terms.
    pub fn advance(&mut self, judgment: Judgment) -> Result<Option<Outcome>> {
        self.round += 1;
        let round = self.round;
        let precision = judgment.precision();
        let mut record = RoundRecord::new(round, &self.query, precision, keys(&judgment.relevant), keys(&judgment.irrelevant));
        tracing::info!(round, precision, query = %record.query, "round judged");

        let outcome = if judgment.total() == 0 {
            Some(Outcome::NoResults { round })
        } else if precision >= self.config.target_precision {
            Some(Outcome::Reached { round, precision })
        } else if judgment.relevant.is_empty() {
            Some(Outcome::NoRelevant { round })
        } else {
            let terms = self.engine.generate_query(
                &judgment.relevant,
                &judgment.irrelevant,
                &self.blacklist,
                self.config.terms_per_round,
            )?;
            if terms.is_empty() {
                Some(Outcome::NoNewTerms { round, precision })
            } else {
                tracing::info!(round, ?terms, "expanding query");
                record.expansion = terms.clone();
                self.blacklist.extend(terms.iter().cloned());
                self.query.extend(terms);
                if round >= self.config.max_rounds { Some(Outcome::RoundLimit { precision }) } else { None }
            }
        };

        if let Some(history) = self.history.as_mut() {
            history.append(&record)?;
        }
        Ok(outcome)
    }

    /// Drive rounds until an outcome is reached.
    pub async fn run<R: BufRead, W: Write>(
        &mut self,
        client: &SearchClient,
        scraper: Option<&PageScraper>,
        input: &mut R,
        out: &mut W,
    ) -> Result<Outcome> {
        loop {
            let query = self.query.join(" ");
            writeln!(out, "Parameters:")?;
            writeln!(out, "Query     = {query}")?;
            writeln!(out, "Precision = {}", self.config.target_precision)?;
            let items = client.search(&query).await?;
            writeln!(out, "Google Search Results:")?;
            writeln!(out, "======================")?;

            let bodies = match scraper {
                Some(s) => {
                    let urls: Vec<String> = items.iter().map(|i| i.link.clone()).collect();
                    Some(s.scrape_all(&urls).await)
                }
                None => None,
            };
            let judgment = self.judge(&items, bodies.as_deref(), input, out)?;
            writeln!(out, "======================")?;
            writeln!(out, "FEEDBACK SUMMARY")?;
            writeln!(out, "Query {query}")?;
            writeln!(out, "Precision {:.2}", judgment.precision())?;

            if let Some(outcome) = self.advance(judgment)? {
                return Ok(outcome);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(keys: &[&str], terms: &[(&str, u32)]) -> Vec<Document> {
        keys.iter().map(|k| Document::from_terms(*k, terms.iter().copied())).collect()
    }

    #[test]
    fn precision_of_a_round() {
        let j = Judgment { relevant: docs(&["a"], &[]), irrelevant: docs(&["b", "c", "d"], &[]) };
        assert_eq!(j.precision(), 0.25);
        assert_eq!(Judgment::default().precision(), 0.0);
    }

    #[test]
    fn stops_when_target_reached() {
        let config = SessionConfig { target_precision: 0.5, ..SessionConfig::default() };
        let mut s = Session::new(RocchioEngine::default(), Analyzer::new(), config, "jaguar");
        let j = Judgment { relevant: docs(&["a"], &[("cat", 1)]), irrelevant: docs(&["b"], &[("car", 1)]) };
        assert_eq!(s.advance(j).unwrap(), Some(Outcome::Reached { round: 1, precision: 0.5 }));
    }

    #[test]
    fn stops_without_relevant_results() {
        let mut s = Session::new(RocchioEngine::default(), Analyzer::new(), SessionConfig::default(), "jaguar");
        let j = Judgment { relevant: vec![], irrelevant: docs(&["b"], &[("car", 1)]) };
        assert_eq!(s.advance(j).unwrap(), Some(Outcome::NoRelevant { round: 1 }));
        assert_eq!(s.advance(Judgment::default()).unwrap(), Some(Outcome::NoResults { round: 2 }));
    }

    #[test]
    fn expands_the_query() {
        let mut s = Session::new(RocchioEngine::default(), Analyzer::new(), SessionConfig::default(), "Jaguar");
        let j = Judgment {
            relevant: vec![Document::from_terms("a", [("jaguar", 1), ("cat", 2)])],
            irrelevant: docs(&["b", "c", "d"], &[("jaguar", 1), ("car", 1)]),
        };
        assert_eq!(s.advance(j).unwrap(), None);
        assert_eq!(s.query(), ["jaguar", "cat"]);
        assert_eq!(s.engine().relevant_count(), 1);
    }
}
