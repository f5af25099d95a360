//! The engine facade: build-or-load once at startup, then read-only.
//!
//! A [`SearchEngine`] is constructed during an explicit init step and handed
//! to query callers as a shared immutable reference; nothing mutates it
//! afterwards, so concurrent query execution needs no locking. Rebuilding
//! means constructing a fresh engine off to the side and atomically swapping
//! the shared reference.

use crate::boolean;
use crate::consistency::{self, ConsistencyReport};
use crate::content::{self, ContentStore};
use crate::corpus;
use crate::error::QueryError;
use crate::index::{DocId, InvertedIndex};
use crate::lemma::LemmaTable;
use crate::persist::{self, IndexPaths, LEMMA_WEIGHTS_PREFIX, TERM_WEIGHTS_PREFIX};
use crate::tfidf::WeightTable;
use crate::vector::VectorSpaceIndex;
use anyhow::Result;
use std::path::PathBuf;

pub const DEFAULT_TOP_N: usize = 10;

#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Directory of `tokens_<id>.txt` files. Required.
    pub tokens_dir: PathBuf,
    /// Directory of `lemmas_<id>.txt` files. Required.
    pub lemmas_dir: PathBuf,
    /// Directory of plain-text document content for titles and excerpts.
    pub content_dir: PathBuf,
    /// Where index and weight snapshots live.
    pub snapshot_dir: PathBuf,
    /// Default result count for ranked queries.
    pub top_n: usize,
}

impl EngineConfig {
    /// Conventional layout under one corpus root: `tokens/`, `lemmas/`,
    /// `content/`, `snapshot/`.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        let root = root.into();
        Self {
            tokens_dir: root.join("tokens"),
            lemmas_dir: root.join("lemmas"),
            content_dir: root.join("content"),
            snapshot_dir: root.join("snapshot"),
            top_n: DEFAULT_TOP_N,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RankedHit {
    pub doc_id: DocId,
    pub score: f64,
    pub title: Option<String>,
    pub excerpt: Option<String>,
}

#[derive(Debug)]
pub struct SearchEngine {
    config: EngineConfig,
    index: InvertedIndex,
    lemmas: LemmaTable,
    vectors: VectorSpaceIndex,
    content: ContentStore,
    report: ConsistencyReport,
}

impl SearchEngine {
    /// Build or load every index structure. Source corpus directories are
    /// required even when snapshots exist; a missing snapshot, or a corrupt
    /// one, triggers a rebuild from source and a re-save. After `open`
    /// returns, the engine is frozen.
    pub fn open(config: EngineConfig) -> Result<Self> {
        let tokens = corpus::load_tokens(&config.tokens_dir)?;
        let lemmas = LemmaTable::from_records(corpus::load_lemma_records(&config.lemmas_dir)?);
        tracing::info!(lemmas = lemmas.len(), "lemma table ready");

        let paths = IndexPaths::new(&config.snapshot_dir);
        let index = match persist::load_index(&paths) {
            Some(index) => {
                tracing::info!(
                    docs = index.num_docs(),
                    terms = index.num_terms(),
                    "loaded inverted-index snapshot"
                );
                index
            }
            None => {
                let index = InvertedIndex::from_token_lists(&tokens.docs);
                persist::save_index(&paths, &index)?;
                tracing::info!(
                    docs = index.num_docs(),
                    terms = index.num_terms(),
                    "built inverted index and saved snapshot"
                );
                index
            }
        };

        let term_weights = match persist::load_weights(&paths.term_weights_dir(), TERM_WEIGHTS_PREFIX)
        {
            Some(weights) if covers_index(&weights, &index) => weights,
            found => {
                if found.is_some() {
                    tracing::warn!(
                        "term-weight snapshot disagrees with the inverted index, rebuilding"
                    );
                }
                let weights = WeightTable::build_terms(&tokens.docs, &index);
                persist::save_weights(&paths.term_weights_dir(), TERM_WEIGHTS_PREFIX, &weights)?;
                weights
            }
        };
        if persist::load_weights(&paths.lemma_weights_dir(), LEMMA_WEIGHTS_PREFIX).is_none() {
            let lemma_weights = WeightTable::build_lemmas(&tokens.docs, &index, &lemmas);
            persist::save_weights(
                &paths.lemma_weights_dir(),
                LEMMA_WEIGHTS_PREFIX,
                &lemma_weights,
            )?;
        }

        let vectors = VectorSpaceIndex::build(&term_weights);
        tracing::info!(
            docs = vectors.num_docs(),
            vocabulary = vectors.vocabulary().len(),
            "vector space index ready"
        );

        let content = ContentStore::load(&config.content_dir);
        let report = consistency::check(&index.universe(), &content.doc_ids());
        report.log();

        Ok(Self { config, index, lemmas, vectors, content, report })
    }

    /// Exact boolean retrieval. Matched ids ascend; malformed queries fail
    /// without touching any index structure.
    pub fn evaluate_boolean(&self, query: &str) -> Result<Vec<DocId>, QueryError> {
        boolean::evaluate(query, &self.index, &self.lemmas)
    }

    /// Ranked free-text retrieval: top `top_n` (engine default when `None`)
    /// by cosine similarity, each hit carrying the document title and a
    /// highlighted excerpt when content is available.
    pub fn ranked_search(&self, query: &str, top_n: Option<usize>) -> Vec<RankedHit> {
        let top_n = top_n.unwrap_or(self.config.top_n);
        let terms = self.vectors.query_terms(query);
        self.vectors
            .rank_terms(&terms, top_n)
            .into_iter()
            .map(|hit| {
                let doc = self.content.get(hit.doc_id);
                RankedHit {
                    doc_id: hit.doc_id,
                    score: hit.score,
                    title: doc.map(|d| d.title.clone()),
                    excerpt: doc.map(|d| {
                        content::highlight_excerpt(&d.body, &terms, content::EXCERPT_BUDGET)
                    }),
                }
            })
            .collect()
    }

    pub fn consistency_report(&self) -> &ConsistencyReport {
        &self.report
    }

    pub fn index(&self) -> &InvertedIndex {
        &self.index
    }

    pub fn lemmas(&self) -> &LemmaTable {
        &self.lemmas
    }

    pub fn vectors(&self) -> &VectorSpaceIndex {
        &self.vectors
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }
}

/// A weight snapshot is only usable when it describes exactly the documents
/// the inverted index knows; a partial or stale tree would let boolean and
/// ranked retrieval disagree about which documents exist.
fn covers_index(weights: &WeightTable, index: &InvertedIndex) -> bool {
    weights.doc_ids().eq(index.doc_ids().iter().copied())
}
