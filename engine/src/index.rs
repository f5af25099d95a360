use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};

pub type DocId = u32;

/// Term -> sorted set of document ids, plus the ordered universe of ids.
///
/// Built once from per-document token lists, then read-only. The snapshot
/// serialization matches the on-disk record: both fields must be present on
/// load or the snapshot is treated as absent.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct InvertedIndex {
    #[serde(rename = "inverted_index")]
    postings: BTreeMap<String, BTreeSet<DocId>>,
    doc_ids: Vec<DocId>,
}

impl InvertedIndex {
    /// Build from per-document token lists in one pass.
    pub fn from_token_lists(docs: &BTreeMap<DocId, Vec<String>>) -> Self {
        let mut postings: BTreeMap<String, BTreeSet<DocId>> = BTreeMap::new();
        let mut doc_ids = Vec::with_capacity(docs.len());
        for (&doc_id, tokens) in docs {
            doc_ids.push(doc_id);
            for token in tokens {
                postings.entry(token.clone()).or_default().insert(doc_id);
            }
        }
        Self { postings, doc_ids }
    }

    /// Posting set for a term. `None` for an unknown term; callers treat
    /// that as the empty set, not an error.
    pub fn postings_for(&self, term: &str) -> Option<&BTreeSet<DocId>> {
        self.postings.get(term)
    }

    pub fn doc_frequency(&self, term: &str) -> u32 {
        self.postings.get(term).map_or(0, |set| set.len() as u32)
    }

    /// All document ids, ascending. This is the universe NOT complements
    /// against.
    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    pub fn universe(&self) -> BTreeSet<DocId> {
        self.doc_ids.iter().copied().collect()
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn num_terms(&self) -> usize {
        self.postings.len()
    }

    pub fn terms(&self) -> impl Iterator<Item = &String> {
        self.postings.keys()
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
    fn postings_are_sorted_and_deduplicated() {
        let index = InvertedIndex::from_token_lists(&docs(&[
            (2, &["wolf", "wolf", "hare"]),
            (1, &["wolf"]),
        ]));
        let wolf: Vec<DocId> = index.postings_for("wolf").unwrap().iter().copied().collect();
        assert_eq!(wolf, vec![1, 2]);
        assert_eq!(index.doc_frequency("hare"), 1);
        assert_eq!(index.doc_frequency("fox"), 0);
        assert_eq!(index.doc_ids(), &[1, 2]);
    }
}
