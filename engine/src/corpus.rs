//! Source-file loading for the pre-tokenized corpus.
//!
//! Token files (`tokens_<id>.txt`, one token per line) and lemma files
//! (`lemmas_<id>.txt`, lines `<lemma> <term> <term> ...`) live in flat
//! directories, one file per document, the numeric document id encoded in
//! the filename. An absent directory is fatal; an individual unreadable or
//! misnamed file is skipped with a warning and the build continues.

use crate::error::EngineError;
use crate::index::DocId;
use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

const TOKENS_PREFIX: &str = "tokens_";
const LEMMAS_PREFIX: &str = "lemmas_";

/// Token lists keyed by document id, plus the names of files that failed to
/// load and were skipped.
#[derive(Debug, Default)]
pub struct TokenLists {
    pub docs: BTreeMap<DocId, Vec<String>>,
    pub skipped: Vec<String>,
}

/// Extract the numeric document id from a filename like `tokens_17.txt`,
/// `page_17.txt` or `17.txt`: trailing digits of the stem, after the last
/// underscore if there is one.
pub(crate) fn doc_id_in_name(file_name: &str) -> Option<DocId> {
    let stem = file_name
        .rsplit_once('.')
        .map(|(stem, _ext)| stem)
        .unwrap_or(file_name);
    let digits = stem.rsplit('_').next().unwrap_or(stem);
    digits.parse().ok()
}

pub fn load_tokens(dir: &Path) -> Result<TokenLists, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::MissingCorpus(dir.to_path_buf()));
    }
    let mut lists = TokenLists::default();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(TOKENS_PREFIX) || !name.ends_with(".txt") {
            continue;
        }
        let Some(doc_id) = doc_id_in_name(&name) else {
            tracing::warn!(file = %name, "token file has no numeric id, skipping");
            lists.skipped.push(name);
            continue;
        };
        match fs::read_to_string(entry.path()) {
            Ok(text) => {
                let tokens: Vec<String> = text
                    .lines()
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect();
                lists.docs.insert(doc_id, tokens);
            }
            Err(err) => {
                tracing::warn!(file = %name, %err, "failed to read token file, skipping");
                lists.skipped.push(name);
            }
        }
    }
    tracing::info!(
        docs = lists.docs.len(),
        skipped = lists.skipped.len(),
        "loaded token lists"
    );
    Ok(lists)
}

/// Load every per-document lemma record, flattened; the caller unions them
/// into a corpus-wide [`crate::LemmaTable`]. Lines with fewer than two
/// fields carry no surface term and are ignored.
pub fn load_lemma_records(dir: &Path) -> Result<Vec<(String, Vec<String>)>, EngineError> {
    if !dir.is_dir() {
        return Err(EngineError::MissingCorpus(dir.to_path_buf()));
    }
    let mut records = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(LEMMAS_PREFIX) || !name.ends_with(".txt") {
            continue;
        }
        let text = match fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %name, %err, "failed to read lemma file, skipping");
                continue;
            }
        };
        for line in text.lines() {
            let mut parts = line.split_whitespace().map(str::to_string);
            let Some(lemma) = parts.next() else { continue };
            let terms: Vec<String> = parts.collect();
            if !terms.is_empty() {
                records.push((lemma, terms));
            }
        }
    }
    Ok(records)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_extraction() {
        assert_eq!(doc_id_in_name("tokens_17.txt"), Some(17));
        assert_eq!(doc_id_in_name("page_3.txt"), Some(3));
        assert_eq!(doc_id_in_name("42.txt"), Some(42));
        assert_eq!(doc_id_in_name("tokens_final.txt"), None);
    }
}
