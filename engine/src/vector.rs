//! Vector-space index and cosine-ranked retrieval.
//!
//! Vocabulary is the lexicographically sorted set of terms in the weight
//! table; rows are documents ascending by id; each sparse row is
//! L2-normalized at build time, so cosine similarity reduces to a sparse
//! dot product against the normalized query vector.

use crate::index::DocId;
use crate::tfidf::WeightTable;
use crate::tokenizer;
use std::collections::HashMap;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScoredDoc {
    pub doc_id: DocId,
    pub score: f64,
}

#[derive(Debug, Default)]
pub struct VectorSpaceIndex {
    vocab: Vec<String>,
    term_cols: HashMap<String, usize>,
    doc_ids: Vec<DocId>,
    /// One sparse row per document: (column, normalized weight), columns
    /// ascending.
    rows: Vec<Vec<(usize, f64)>>,
    /// Mean of the stored per-document IDF for each column, used to weight
    /// query terms.
    mean_idf: Vec<f64>,
}

impl VectorSpaceIndex {
    pub fn build(weights: &WeightTable) -> Self {
        let mut vocab: Vec<String> = Vec::new();
        for (_, entries) in weights.docs() {
            vocab.extend(entries.keys().cloned());
        }
        vocab.sort();
        vocab.dedup();
        let term_cols: HashMap<String, usize> = vocab
            .iter()
            .enumerate()
            .map(|(col, term)| (term.clone(), col))
            .collect();

        let mut idf_sums = vec![(0.0f64, 0u32); vocab.len()];
        let mut doc_ids = Vec::with_capacity(weights.num_docs());
        let mut rows = Vec::with_capacity(weights.num_docs());
        for (&doc_id, entries) in weights.docs() {
            doc_ids.push(doc_id);
            let mut row: Vec<(usize, f64)> = Vec::with_capacity(entries.len());
            for (term, entry) in entries {
                let col = term_cols[term];
                row.push((col, entry.tfidf));
                let (sum, count) = &mut idf_sums[col];
                *sum += entry.idf;
                *count += 1;
            }
            // entries iterate in term order and vocab is sorted, so columns
            // already ascend
            let norm = row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
            if norm > 0.0 {
                for (_, w) in row.iter_mut() {
                    *w /= norm;
                }
            }
            rows.push(row);
        }

        let mean_idf = idf_sums
            .into_iter()
            .map(|(sum, count)| if count > 0 { sum / count as f64 } else { 0.0 })
            .collect();

        Self { vocab, term_cols, doc_ids, rows, mean_idf }
    }

    pub fn vocabulary(&self) -> &[String] {
        &self.vocab
    }

    pub fn contains_term(&self, term: &str) -> bool {
        self.term_cols.contains_key(term)
    }

    pub fn num_docs(&self) -> usize {
        self.doc_ids.len()
    }

    pub fn doc_ids(&self) -> &[DocId] {
        &self.doc_ids
    }

    /// L2 norm of each document row. Diagnostic: every non-empty row is 1
    /// after normalization.
    pub fn row_norms(&self) -> Vec<f64> {
        self.rows
            .iter()
            .map(|row| row.iter().map(|(_, w)| w * w).sum::<f64>().sqrt())
            .collect()
    }

    /// Tokenize a free-text query, drop stopwords and unknown terms, and
    /// return the surviving terms. Exposed so callers can highlight exactly
    /// the terms that were scored.
    pub fn query_terms(&self, query: &str) -> Vec<String> {
        tokenizer::query_tokens(query)
            .into_iter()
            .filter(|t| self.contains_term(t))
            .collect()
    }

    fn query_vector(&self, terms: &[String]) -> Vec<(usize, f64)> {
        let mut counts: HashMap<&str, u32> = HashMap::new();
        for term in terms {
            *counts.entry(term.as_str()).or_insert(0) += 1;
        }
        let query_len = terms.len().max(1) as f64;
        let mut vector: Vec<(usize, f64)> = counts
            .into_iter()
            .map(|(term, count)| {
                let col = self.term_cols[term];
                let tf = count as f64 / query_len;
                (col, tf * self.mean_idf[col])
            })
            .collect();
        vector.sort_by_key(|&(col, _)| col);
        let norm = vector.iter().map(|(_, w)| w * w).sum::<f64>().sqrt();
        if norm > 0.0 {
            for (_, w) in vector.iter_mut() {
                *w /= norm;
            }
        }
        vector
    }

    /// Rank documents by cosine similarity against the query, top `top_n`
    /// by descending score. The sort is stable, so ties keep ascending
    /// document-id order; zero-similarity documents are not reported.
    pub fn rank(&self, query: &str, top_n: usize) -> Vec<ScoredDoc> {
        self.rank_terms(&self.query_terms(query), top_n)
    }

    /// Rank against terms already filtered by [`Self::query_terms`], for
    /// callers that also need the term list (e.g. for highlighting) and
    /// should not tokenize twice.
    pub fn rank_terms(&self, terms: &[String], top_n: usize) -> Vec<ScoredDoc> {
        if terms.is_empty() {
            return Vec::new();
        }
        let query_vector = self.query_vector(terms);

        let mut scored: Vec<ScoredDoc> = self
            .rows
            .iter()
            .zip(&self.doc_ids)
            .map(|(row, &doc_id)| ScoredDoc { doc_id, score: sparse_dot(&query_vector, row) })
            .filter(|hit| hit.score > 0.0)
            .collect();
        scored.sort_by(|a, b| b.score.total_cmp(&a.score));
        scored.truncate(top_n);
        scored
    }
}

/// Dot product of two sparse vectors with ascending column order.
fn sparse_dot(a: &[(usize, f64)], b: &[(usize, f64)]) -> f64 {
    let mut sum = 0.0;
    let (mut i, mut j) = (0, 0);
    while i < a.len() && j < b.len() {
        match a[i].0.cmp(&b[j].0) {
            std::cmp::Ordering::Less => i += 1,
            std::cmp::Ordering::Greater => j += 1,
            std::cmp::Ordering::Equal => {
                sum += a[i].1 * b[j].1;
                i += 1;
                j += 1;
            }
        }
    }
    sum
}
