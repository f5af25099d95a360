use crate::index::DocId;
use serde::Serialize;
use std::collections::BTreeSet;

/// Post-build diagnostic comparing the documents the index knows about with
/// the documents the content store holds. Discrepancies are reported, never
/// fatal: a document without content simply ranks without an excerpt.
#[derive(Debug, Default, Clone, Serialize)]
pub struct ConsistencyReport {
    pub indexed_docs: usize,
    pub content_docs: usize,
    /// In the index, but no content entry.
    pub missing_content: Vec<DocId>,
    /// Has content, but absent from the index.
    pub missing_index: Vec<DocId>,
}

impl ConsistencyReport {
    pub fn is_consistent(&self) -> bool {
        self.missing_content.is_empty() && self.missing_index.is_empty()
    }

    pub fn log(&self) {
        if self.is_consistent() {
            tracing::info!(
                indexed = self.indexed_docs,
                content = self.content_docs,
                "index and content store are consistent"
            );
            return;
        }
        if !self.missing_content.is_empty() {
            tracing::warn!(
                count = self.missing_content.len(),
                docs = ?self.missing_content,
                "indexed documents with no content entry"
            );
        }
        if !self.missing_index.is_empty() {
            tracing::warn!(
                count = self.missing_index.len(),
                docs = ?self.missing_index,
                "content entries absent from the index"
            );
        }
    }
}

pub fn check(indexed: &BTreeSet<DocId>, content: &BTreeSet<DocId>) -> ConsistencyReport {
    ConsistencyReport {
        indexed_docs: indexed.len(),
        content_docs: content.len(),
        missing_content: indexed.difference(content).copied().collect(),
        missing_index: content.difference(indexed).copied().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reports_both_directions() {
        let indexed: BTreeSet<DocId> = [1, 2, 3].into_iter().collect();
        let content: BTreeSet<DocId> = [2, 3, 4].into_iter().collect();
        let report = check(&indexed, &content);
        assert!(!report.is_consistent());
        assert_eq!(report.missing_content, vec![1]);
        assert_eq!(report.missing_index, vec![4]);
    }
}
