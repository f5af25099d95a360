//! TF-IDF weight tables, at term level and lemma level.
//!
//! DF counts documents containing a key; IDF = ln(N / (DF + ε)) with a small
//! ε so a zero document frequency never divides by zero; TF is the raw
//! occurrence count over the document's token total. The lemma level treats
//! a document as containing a lemma when any of its surface terms occurs,
//! and aggregates the surface-term counts for TF.

use crate::index::{DocId, InvertedIndex};
use crate::lemma::LemmaTable;
use std::collections::{BTreeMap, BTreeSet, HashMap};

/// Smoothing constant guarding DF = 0 and keeping DF = N away from ln(1).
pub const IDF_SMOOTHING: f64 = 1e-10;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WeightEntry {
    pub idf: f64,
    pub tfidf: f64,
}

/// Per-document `(key, idf, tfidf)` entries, key-sorted within each
/// document and documents ascending by id. Frozen after build; the vector
/// space index and the weight snapshots are both derived from it.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WeightTable {
    per_doc: BTreeMap<DocId, BTreeMap<String, WeightEntry>>,
}

fn idf(total_docs: usize, doc_frequency: u32) -> f64 {
    (total_docs as f64 / (doc_frequency as f64 + IDF_SMOOTHING)).ln()
}

impl WeightTable {
    /// Term-level weights. DF comes from the inverted index built over the
    /// same token lists.
    pub fn build_terms(
        docs: &BTreeMap<DocId, Vec<String>>,
        index: &InvertedIndex,
    ) -> Self {
        let total_docs = docs.len();
        let mut per_doc = BTreeMap::new();
        for (&doc_id, tokens) in docs {
            let mut counts: HashMap<&str, u32> = HashMap::new();
            for token in tokens {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
            let doc_len = tokens.len().max(1) as f64;
            let mut entries = BTreeMap::new();
            for (term, count) in counts {
                let tf = count as f64 / doc_len;
                let idf = idf(total_docs, index.doc_frequency(term));
                entries.insert(
                    term.to_string(),
                    WeightEntry { idf, tfidf: tf * idf },
                );
            }
            per_doc.insert(doc_id, entries);
        }
        Self { per_doc }
    }

    /// Lemma-level weights. A lemma's DF is the size of the union of its
    /// surface terms' posting sets; only lemmas that actually occur in a
    /// document produce an entry for it.
    pub fn build_lemmas(
        docs: &BTreeMap<DocId, Vec<String>>,
        index: &InvertedIndex,
        lemmas: &LemmaTable,
    ) -> Self {
        let total_docs = docs.len();

        let mut lemma_idf: HashMap<&String, f64> = HashMap::new();
        for (lemma, terms) in lemmas.iter() {
            let mut containing: BTreeSet<DocId> = BTreeSet::new();
            for term in terms {
                if let Some(postings) = index.postings_for(term) {
                    containing.extend(postings.iter().copied());
                }
            }
            lemma_idf.insert(lemma, idf(total_docs, containing.len() as u32));
        }

        let mut per_doc = BTreeMap::new();
        for (&doc_id, tokens) in docs {
            let mut counts: HashMap<&str, u32> = HashMap::new();
            for token in tokens {
                *counts.entry(token.as_str()).or_insert(0) += 1;
            }
            let doc_len = tokens.len().max(1) as f64;
            let mut entries = BTreeMap::new();
            for (lemma, terms) in lemmas.iter() {
                let count: u32 = terms
                    .iter()
                    .filter_map(|term| counts.get(term.as_str()))
                    .sum();
                if count == 0 {
                    continue;
                }
                let tf = count as f64 / doc_len;
                let idf = lemma_idf[lemma];
                entries.insert(lemma.clone(), WeightEntry { idf, tfidf: tf * idf });
            }
            per_doc.insert(doc_id, entries);
        }
        Self { per_doc }
    }

    pub fn insert(&mut self, doc_id: DocId, key: String, entry: WeightEntry) {
        self.per_doc.entry(doc_id).or_default().insert(key, entry);
    }

    pub fn docs(&self) -> impl Iterator<Item = (&DocId, &BTreeMap<String, WeightEntry>)> {
        self.per_doc.iter()
    }

    pub fn doc_ids(&self) -> impl Iterator<Item = DocId> + '_ {
        self.per_doc.keys().copied()
    }

    pub fn entry(&self, doc_id: DocId, key: &str) -> Option<&WeightEntry> {
        self.per_doc.get(&doc_id).and_then(|entries| entries.get(key))
    }

    pub fn num_docs(&self) -> usize {
        self.per_doc.len()
    }

    pub fn is_empty(&self) -> bool {
        self.per_doc.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs(entries: &[(DocId, &[&str])]) -> BTreeMap<DocId, Vec<String>> {
        entries
            .iter()
            .map(|(id, toks)| (*id, toks.iter().map(|t| t.to_string()).collect()))
            .collect()
    }

    #[test]
    fn term_weights_match_formula() {
        let docs = docs(&[(1, &["wolf", "wolf", "hare", "fox"]), (2, &["hare"])]);
        let index = InvertedIndex::from_token_lists(&docs);
        let table = WeightTable::build_terms(&docs, &index);

        let wolf = table.entry(1, "wolf").unwrap();
        let expected_idf = (2.0f64 / (1.0 + IDF_SMOOTHING)).ln();
        assert!((wolf.idf - expected_idf).abs() < 1e-9);
        assert!((wolf.tfidf - 0.5 * expected_idf).abs() < 1e-9);

        // "hare" appears in every document: idf collapses to ~0.
        let hare = table.entry(2, "hare").unwrap();
        assert!(hare.idf.abs() < 1e-9);
    }

    #[test]
    fn lemma_weights_aggregate_surface_terms() {
        let docs = docs(&[(1, &["wolf", "wolves", "hare"]), (2, &["hare"])]);
        let index = InvertedIndex::from_token_lists(&docs);
        let mut lemmas = LemmaTable::new();
        lemmas.insert_record("wolf", vec!["wolf".into(), "wolves".into()]);
        let table = WeightTable::build_lemmas(&docs, &index, &lemmas);

        let entry = table.entry(1, "wolf").unwrap();
        let expected_idf = (2.0f64 / (1.0 + IDF_SMOOTHING)).ln();
        // two of three tokens belong to the lemma
        assert!((entry.tfidf - (2.0 / 3.0) * expected_idf).abs() < 1e-9);
        assert!(table.entry(2, "wolf").is_none());
    }
}
