//! Collaborator-supplied document content, used for titles and highlighted
//! excerpts. Content files are plain text, one per document (`<id>.txt` or
//! `page_<id>.txt`), title on the first non-empty line. A missing content
//! directory is not fatal; the consistency pass reports the gaps and ranked
//! hits simply carry no excerpt.

use crate::corpus::doc_id_in_name;
use crate::index::DocId;
use regex::RegexBuilder;
use std::collections::{BTreeMap, BTreeSet};
use std::fs;
use std::path::Path;

/// Character budget for a highlighted excerpt.
pub const EXCERPT_BUDGET: usize = 2000;

const TRUNCATION_MARKER: &str = "...";

#[derive(Debug, Clone)]
pub struct DocContent {
    pub title: String,
    pub body: String,
}

#[derive(Debug, Default)]
pub struct ContentStore {
    docs: BTreeMap<DocId, DocContent>,
}

impl ContentStore {
    pub fn load(dir: &Path) -> Self {
        let mut store = Self::default();
        let entries = match fs::read_dir(dir) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::warn!(dir = %dir.display(), %err, "content directory unavailable");
                return store;
            }
        };
        for entry in entries.flatten() {
            let name = entry.file_name().to_string_lossy().into_owned();
            if !name.ends_with(".txt") {
                continue;
            }
            let Some(doc_id) = doc_id_in_name(&name) else {
                tracing::warn!(file = %name, "content file has no numeric id, skipping");
                continue;
            };
            match fs::read_to_string(entry.path()) {
                Ok(body) => {
                    let title = body
                        .lines()
                        .map(str::trim)
                        .find(|line| !line.is_empty())
                        .unwrap_or("")
                        .to_string();
                    store.docs.insert(doc_id, DocContent { title, body });
                }
                Err(err) => {
                    tracing::warn!(file = %name, %err, "failed to read content file, skipping");
                }
            }
        }
        tracing::info!(docs = store.docs.len(), "loaded document content");
        store
    }

    pub fn get(&self, doc_id: DocId) -> Option<&DocContent> {
        self.docs.get(&doc_id)
    }

    pub fn doc_ids(&self) -> BTreeSet<DocId> {
        self.docs.keys().copied().collect()
    }

    pub fn len(&self) -> usize {
        self.docs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.docs.is_empty()
    }
}

/// Wrap every occurrence of each term in `<em>` markers, case-insensitively.
/// The body is truncated to the character budget first so a marker is never
/// split, with `...` appended when anything was cut.
pub fn highlight_excerpt(body: &str, terms: &[String], budget: usize) -> String {
    let cut = body.char_indices().nth(budget).map(|(idx, _)| idx);
    let (mut excerpt, truncated) = match cut {
        Some(idx) => (body[..idx].to_string(), true),
        None => (body.to_string(), false),
    };
    for term in terms {
        if term.trim().is_empty() {
            continue;
        }
        let pattern = RegexBuilder::new(&regex::escape(term))
            .case_insensitive(true)
            .build()
            .expect("escaped literal is a valid pattern");
        excerpt = pattern
            .replace_all(&excerpt, |caps: &regex::Captures| {
                format!("<em>{}</em>", &caps[0])
            })
            .into_owned();
    }
    if truncated {
        excerpt.push_str(TRUNCATION_MARKER);
    }
    excerpt
}
