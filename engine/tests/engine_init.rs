use engine::{EngineConfig, EngineError, SearchEngine};
use std::fs;
use std::path::Path;
use tempfile::tempdir;

fn write_corpus(root: &Path) {
    let tokens = root.join("tokens");
    let lemmas = root.join("lemmas");
    let content = root.join("content");
    fs::create_dir_all(&tokens).unwrap();
    fs::create_dir_all(&lemmas).unwrap();
    fs::create_dir_all(&content).unwrap();

    fs::write(tokens.join("tokens_1.txt"), "wolf\nforest\nwolf\n").unwrap();
    fs::write(tokens.join("tokens_2.txt"), "wolf\nhare\n").unwrap();
    fs::write(tokens.join("tokens_3.txt"), "forest\nhare\n").unwrap();

    fs::write(lemmas.join("lemmas_1.txt"), "wolf wolf wolves\nforest forest\n").unwrap();
    fs::write(lemmas.join("lemmas_2.txt"), "hare hare hares\n").unwrap();

    fs::write(content.join("page_1.txt"), "The Wolf\nA wolf walked in the forest.").unwrap();
    fs::write(content.join("page_2.txt"), "The Hare\nA wolf chased the hare.").unwrap();
    // no content for document 3 on purpose
}

fn open(root: &Path) -> SearchEngine {
    SearchEngine::open(EngineConfig::with_root(root)).unwrap()
}

#[test]
fn builds_queries_and_reports_in_one_init() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let engine = open(dir.path());

    assert_eq!(engine.evaluate_boolean("wolf AND forest").unwrap(), vec![1]);
    assert_eq!(engine.evaluate_boolean("NOT wolf").unwrap(), vec![3]);

    let hits = engine.ranked_search("wolf", None);
    assert!(!hits.is_empty());
    assert!(hits.len() <= 10);
    assert_eq!(hits[0].doc_id, 1); // doc1 mentions wolf twice
    let excerpt = hits[0].excerpt.as_deref().unwrap();
    assert!(excerpt.contains("<em>wolf</em>"));
    assert!(excerpt.contains("<em>Wolf</em>"));
    assert_eq!(hits[0].title.as_deref(), Some("The Wolf"));

    // doc 3 is indexed but has no content entry
    let report = engine.consistency_report();
    assert_eq!(report.missing_content, vec![3]);
    assert!(report.missing_index.is_empty());
}

#[test]
fn snapshot_makes_second_open_equivalent() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let first = open(dir.path());
    assert!(dir.path().join("snapshot/inverted_index.json").is_file());
    assert!(dir.path().join("snapshot/terms/tf_idf_terms_1.txt").is_file());
    assert!(dir.path().join("snapshot/lemmas/tf_idf_lemmas_1.txt").is_file());

    // second open loads the snapshot instead of rebuilding
    let second = open(dir.path());
    for query in ["wolf", "wolf OR hare", "NOT forest"] {
        assert_eq!(
            first.evaluate_boolean(query).unwrap(),
            second.evaluate_boolean(query).unwrap()
        );
    }
    let a = first.ranked_search("wolf forest", None);
    let b = second.ranked_search("wolf forest", None);
    assert_eq!(a.len(), b.len());
    for (x, y) in a.iter().zip(&b) {
        assert_eq!(x.doc_id, y.doc_id);
        // weights round-trip through %.6f text, so allow a small drift
        assert!((x.score - y.score).abs() < 1e-4);
    }
}

#[test]
fn partial_weight_snapshot_triggers_rebuild() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let first = open(dir.path());
    let baseline = first.ranked_search("wolf", None);
    assert!(!baseline.is_empty());

    // drop one document's weight file: the remaining tree no longer agrees
    // with the inverted index and must not be served
    fs::remove_file(dir.path().join("snapshot/terms/tf_idf_terms_1.txt")).unwrap();

    let engine = open(dir.path());
    assert_eq!(engine.vectors().num_docs(), engine.index().num_docs());
    let hits = engine.ranked_search("wolf", None);
    assert_eq!(hits.len(), baseline.len());
    for (hit, expected) in hits.iter().zip(&baseline) {
        assert_eq!(hit.doc_id, expected.doc_id);
        assert!((hit.score - expected.score).abs() < 1e-9);
    }
    // the rebuilt tree was saved back
    assert!(dir.path().join("snapshot/terms/tf_idf_terms_1.txt").is_file());
}

#[test]
fn corrupt_snapshot_triggers_rebuild() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let _ = open(dir.path());
    fs::write(dir.path().join("snapshot/inverted_index.json"), "garbage").unwrap();

    let engine = open(dir.path());
    assert_eq!(engine.evaluate_boolean("wolf").unwrap(), vec![1, 2]);
}

#[test]
fn lemma_expansion_reaches_queries() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    let tokens = dir.path().join("tokens");
    fs::write(tokens.join("tokens_4.txt"), "wolves\nden\n").unwrap();
    let engine = open(dir.path());

    // "wolf" expands to (wolf OR wolves) through the lemma table
    assert_eq!(engine.evaluate_boolean("wolf").unwrap(), vec![1, 2, 4]);
}

#[test]
fn missing_tokens_dir_is_fatal() {
    let dir = tempdir().unwrap();
    let err = SearchEngine::open(EngineConfig::with_root(dir.path())).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<EngineError>(),
        Some(EngineError::MissingCorpus(_))
    ));
}

#[test]
fn malformed_token_file_is_skipped_not_fatal() {
    let dir = tempdir().unwrap();
    write_corpus(dir.path());
    fs::write(dir.path().join("tokens/tokens_nonnumeric.txt"), "stray\n").unwrap();

    let engine = open(dir.path());
    assert_eq!(engine.index().num_docs(), 3);
    assert_eq!(engine.evaluate_boolean("stray").unwrap(), Vec::<engine::DocId>::new());
}
