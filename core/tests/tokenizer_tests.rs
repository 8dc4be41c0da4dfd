use rocchio::{Analyzer, CachedStemmer};

#[test]
fn it_normalizes_and_strips_punctuation() {
    let a = Analyzer::new();
    let words = a.tokenize("Caf\u{e9}'s MENU: ﬁsh & chips_today");
    // NFKC folds the ligature, apostrophes and underscores are removed
    assert_eq!(words, vec!["cafés", "menu", "fish", "chipstoday"]);
}

#[test]
fn it_keeps_stopwords() {
    let words = Analyzer::new().tokenize("The quick brown fox and the lazy dog");
    assert_eq!(words.iter().filter(|w| *w == "the").count(), 2);
    assert!(words.contains(&"and".to_string()));
}

#[test]
fn it_stems_when_asked() {
    let a = Analyzer::with_stemmer(CachedStemmer::english());
    let words = a.tokenize("Running Runners RUN!");
    assert!(words.iter().all(|w| w.starts_with("run")));
}

#[test]
fn document_counts_title_snippet_and_body() {
    let a = Analyzer::new();
    let doc = a.document("https://ex.org/jaguar", "Jaguar cars", "The jaguar is a car.", Some("Cars, cars, cars"));
    assert_eq!(doc.key, "https://ex.org/jaguar");
    assert_eq!(doc.tf("jaguar"), 2);
    assert_eq!(doc.tf("cars"), 4);
    assert_eq!(doc.tf("car"), 1);
    assert_eq!(doc.tf("missing"), 0);
}
