//! Retrieval engine over a fixed, pre-tokenized corpus.
//!
//! Two query classes are supported: exact boolean queries (AND/OR/NOT with
//! parentheses) over a lemma-expanded vocabulary, and ranked free-text
//! queries scored with a TF-IDF vector-space model. Everything is built in
//! one batch pass and frozen; queries only read.

pub mod boolean;
pub mod consistency;
pub mod content;
pub mod corpus;
pub mod error;
pub mod index;
pub mod lemma;
pub mod persist;
pub mod search;
pub mod tfidf;
pub mod tokenizer;
pub mod vector;

pub use crate::error::{EngineError, QueryError};
pub use crate::index::{DocId, InvertedIndex};
pub use crate::lemma::LemmaTable;
pub use crate::search::{EngineConfig, RankedHit, SearchEngine};
pub use crate::vector::VectorSpaceIndex;
