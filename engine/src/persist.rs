//! Index and weight snapshots.
//!
//! The inverted index persists as one JSON record with an `inverted_index`
//! map and a `doc_ids` list; a snapshot that is missing, unreadable, or
//! structurally invalid is treated as absent and the caller rebuilds from
//! source files. Weight tables persist as two parallel per-document trees
//! (`terms/`, `lemmas/`), plain-text lines `<key> <idf> <tfidf>` sorted by
//! key with six-digit fixed precision.

use crate::corpus::doc_id_in_name;
use crate::index::InvertedIndex;
use crate::tfidf::{WeightEntry, WeightTable};
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::fmt::Write as _;
use std::fs::{self, create_dir_all, File};
use std::io::Write as _;
use std::path::{Path, PathBuf};

pub const SNAPSHOT_VERSION: u32 = 1;
pub const TERM_WEIGHTS_PREFIX: &str = "tf_idf_terms_";
pub const LEMMA_WEIGHTS_PREFIX: &str = "tf_idf_lemmas_";

#[derive(Debug, Serialize, Deserialize)]
pub struct MetaFile {
    pub num_docs: u32,
    pub created_at: String,
    pub version: u32,
}

pub struct IndexPaths {
    pub root: PathBuf,
}

impl IndexPaths {
    pub fn new<P: AsRef<Path>>(root: P) -> Self {
        Self { root: root.as_ref().to_path_buf() }
    }
    fn inverted_index(&self) -> PathBuf {
        self.root.join("inverted_index.json")
    }
    fn meta(&self) -> PathBuf {
        self.root.join("meta.json")
    }
    pub fn term_weights_dir(&self) -> PathBuf {
        self.root.join("terms")
    }
    pub fn lemma_weights_dir(&self) -> PathBuf {
        self.root.join("lemmas")
    }
}

pub fn save_index(paths: &IndexPaths, index: &InvertedIndex) -> Result<()> {
    create_dir_all(&paths.root)?;
    let mut f = File::create(paths.inverted_index())?;
    let json = serde_json::to_string_pretty(index)?;
    f.write_all(json.as_bytes())?;
    save_meta(paths, index.num_docs() as u32)?;
    Ok(())
}

/// Load the inverted-index snapshot. `None` means "no usable snapshot":
/// absent file, corrupt JSON, missing fields, or a stale version. All of
/// those trigger a rebuild from source, never a hard failure.
pub fn load_index(paths: &IndexPaths) -> Option<InvertedIndex> {
    let path = paths.inverted_index();
    let data = fs::read_to_string(&path).ok()?;
    let meta = match load_meta(paths) {
        Some(meta) if meta.version == SNAPSHOT_VERSION => meta,
        Some(meta) => {
            tracing::warn!(found = meta.version, expected = SNAPSHOT_VERSION,
                "index snapshot version mismatch, rebuilding");
            return None;
        }
        None => {
            tracing::warn!(path = %path.display(), "index snapshot has no meta file, rebuilding");
            return None;
        }
    };
    match serde_json::from_str::<InvertedIndex>(&data) {
        Ok(index) => {
            if index.num_docs() as u32 != meta.num_docs {
                tracing::warn!(
                    snapshot = index.num_docs(),
                    meta = meta.num_docs,
                    "index snapshot disagrees with its meta file, rebuilding"
                );
                return None;
            }
            Some(index)
        }
        Err(err) => {
            tracing::warn!(path = %path.display(), %err, "corrupt index snapshot, rebuilding");
            None
        }
    }
}

fn save_meta(paths: &IndexPaths, num_docs: u32) -> Result<()> {
    let created_at = time::OffsetDateTime::now_utc()
        .format(&time::format_description::well_known::Rfc3339)
        .unwrap_or_else(|_| String::new());
    let meta = MetaFile { num_docs, created_at, version: SNAPSHOT_VERSION };
    let mut f = File::create(paths.meta())?;
    let json = serde_json::to_string_pretty(&meta)?;
    f.write_all(json.as_bytes())?;
    Ok(())
}

pub fn load_meta(paths: &IndexPaths) -> Option<MetaFile> {
    let data = fs::read_to_string(paths.meta()).ok()?;
    serde_json::from_str(&data).ok()
}

/// Write one `<prefix><doc_id>.txt` file per document, key-sorted lines
/// `<key> <idf:%.6f> <tfidf:%.6f>`.
pub fn save_weights(dir: &Path, prefix: &str, table: &WeightTable) -> Result<()> {
    create_dir_all(dir)?;
    for (doc_id, entries) in table.docs() {
        let mut out = String::new();
        for (key, entry) in entries {
            writeln!(out, "{key} {:.6} {:.6}", entry.idf, entry.tfidf)?;
        }
        fs::write(dir.join(format!("{prefix}{doc_id}.txt")), out)?;
    }
    Ok(())
}

/// Load a weight-table snapshot tree. `None` when the directory is absent
/// or holds no weight files; malformed lines and misnamed files are skipped
/// with a warning.
pub fn load_weights(dir: &Path, prefix: &str) -> Option<WeightTable> {
    let entries = fs::read_dir(dir).ok()?;
    let mut table = WeightTable::default();
    for entry in entries.flatten() {
        let name = entry.file_name().to_string_lossy().into_owned();
        if !name.starts_with(prefix) || !name.ends_with(".txt") {
            continue;
        }
        let Some(doc_id) = doc_id_in_name(&name) else {
            tracing::warn!(file = %name, "weight file has no numeric id, skipping");
            continue;
        };
        let text = match fs::read_to_string(entry.path()) {
            Ok(text) => text,
            Err(err) => {
                tracing::warn!(file = %name, %err, "failed to read weight file, skipping");
                continue;
            }
        };
        for line in text.lines() {
            let parts: Vec<&str> = line.split_whitespace().collect();
            if parts.is_empty() {
                continue;
            }
            let &[key, idf, tfidf] = parts.as_slice() else {
                tracing::warn!(file = %name, line, "malformed weight line, skipping");
                continue;
            };
            let (Ok(idf), Ok(tfidf)) = (idf.parse::<f64>(), tfidf.parse::<f64>()) else {
                tracing::warn!(file = %name, line, "unparseable weight line, skipping");
                continue;
            };
            table.insert(doc_id, key.to_string(), WeightEntry { idf, tfidf });
        }
    }
    if table.is_empty() {
        None
    } else {
        Some(table)
    }
}
