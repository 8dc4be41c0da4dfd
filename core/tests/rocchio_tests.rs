use rocchio::{Document, Error, RocchioConfig, RocchioEngine, StopWords};

fn doc(key: &str, terms: &[(&str, u32)]) -> Document {
    Document::from_terms(key, terms.iter().copied())
}

const NONE: &[&str] = &[];

#[test]
fn resubmitted_documents_are_counted_once() {
    let mut engine = RocchioEngine::default();
    let a = doc("a", &[("cat", 2), ("dog", 1)]);
    engine.generate_query(&[a.clone()], &[], NONE, 2).unwrap();
    // same key, different payload: still the same document
    let a_again = doc("a", &[("cat", 50)]);
    engine.generate_query(&[a.clone(), a_again], &[], NONE, 2).unwrap();

    assert_eq!(engine.relevant_count(), 1);
    assert_eq!(engine.relevant_index().nr_docs(), 1);
    let tfs = engine.relevant_index().tfs("cat");
    assert_eq!(tfs.len(), 1);
    assert_eq!(tfs.values().copied().collect::<Vec<_>>(), vec![2]);
}

#[test]
fn blacklisted_terms_are_never_returned() {
    let mut engine = RocchioEngine::default();
    let rel = [doc("a", &[("jaguar", 3), ("cat", 2), ("wild", 1)]), doc("b", &[("jaguar", 1), ("cat", 1)])];
    let irrel = [doc("c", &[("car", 4)])];
    let terms = engine.generate_query(&rel, &irrel, &["jaguar"], 5).unwrap();
    assert!(!terms.contains(&"jaguar".to_string()));
    assert!(!terms.is_empty());
}

#[test]
fn result_is_sorted_and_bounded_by_positive_candidates() {
    let mut engine = RocchioEngine::default();
    let rel = [doc("a", &[("x", 5), ("y", 1), ("shared", 1)]), doc("b", &[("z", 2), ("shared", 1)])];
    let irrel = [doc("c", &[("shared", 1)])];
    let ranked = engine.ranked_terms(NONE);
    assert!(ranked.is_empty());

    let terms = engine.generate_query(&rel, &irrel, NONE, 10).unwrap();
    let ranked = engine.ranked_terms(NONE);
    // "shared" occurs in every document: idf 0, so only x, y, z are candidates
    assert_eq!(terms.len(), 3);
    assert_eq!(terms, ranked.iter().map(|(t, _)| t.clone()).collect::<Vec<_>>());
    assert!(ranked.windows(2).all(|w| w[0].1 > w[1].1));
    assert_eq!(terms[0], "x");
    assert_eq!(engine.generate_query(&[], &[], NONE, 2).unwrap().len(), 2);
}

#[test]
fn idf_is_non_increasing_in_df() {
    let mut engine = RocchioEngine::default();
    let rel: Vec<Document> = (0..8)
        .map(|i| {
            let terms: Vec<(String, u32)> = (0..=i).map(|t| (format!("t{t}"), 1)).collect();
            Document::from_terms(format!("d{i}"), terms)
        })
        .collect();
    engine.generate_query(&rel, &[], NONE, 1).unwrap();
    // t0 is in all 8 documents, t7 in one
    let idfs: Vec<f64> = (0..8).map(|t| engine.idf(&format!("t{t}"))).collect();
    assert!(idfs.windows(2).all(|w| w[0] <= w[1]));
    assert_eq!(idfs[0], 0.0);
    assert_eq!(engine.idf("unknown"), 0.0);
}

#[test]
fn beta_cancels_terms_equally_present_in_irrelevant_docs() {
    let mut engine = RocchioEngine::new(RocchioConfig::new(1.0, 1.0), StopWords::empty());
    let rel = [doc("r", &[("x", 5), ("y", 1)])];
    let irrel = [doc("i", &[("x", 5)])];
    let terms = engine.generate_query(&rel, &irrel, NONE, 2).unwrap();
    assert_eq!(terms, vec!["y"]);
}

#[test]
fn beta_pushes_irrelevant_terms_down() {
    let rel = [doc("r1", &[("jaguar", 1), ("cat", 2)]), doc("r2", &[("cat", 1), ("car", 1)]), doc("r3", &[("wild", 1)])];
    let irrel = [doc("i1", &[("car", 3)]), doc("i2", &[("engine", 2)]), doc("i3", &[("road", 1)])];

    let mut plain = RocchioEngine::default();
    let without = plain.generate_query(&rel, &irrel, NONE, 10).unwrap();
    let mut penalized = RocchioEngine::new(RocchioConfig::new(1.0, 1.0), StopWords::empty());
    let with = penalized.generate_query(&rel, &irrel, NONE, 10).unwrap();

    assert!(without.contains(&"car".to_string()));
    assert!(!with.contains(&"car".to_string()));
}

#[test]
fn invalid_document_leaves_state_untouched() {
    let mut engine = RocchioEngine::default();
    let good = doc("a", &[("cat", 1)]);
    let bad = doc("", &[("dog", 1)]);
    let err = engine.generate_query(&[good], &[bad], NONE, 2).unwrap_err();
    assert!(matches!(err, Error::InvalidDocument { .. }));
    assert_eq!(engine.relevant_count(), 0);
    assert_eq!(engine.irrelevant_count(), 0);
}

#[test]
fn stop_words_fall_behind_content_words() {
    let stops = StopWords::from_words(["the"]);
    let mut engine = RocchioEngine::new(RocchioConfig::default(), stops);
    let rel = [doc("a", &[("the", 9), ("jaguar", 1)]), doc("b", &[("the", 7), ("cat", 1)])];
    let irrel = [doc("c", &[("car", 1)])];
    let terms = engine.generate_query(&rel, &irrel, NONE, 2).unwrap();
    assert!(!terms.contains(&"the".to_string()));
}
