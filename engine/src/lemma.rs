use serde::{Deserialize, Serialize};
use std::collections::{BTreeSet, HashMap};

/// Corpus-wide lemma -> set of surface terms, the union of every
/// per-document lemma record. Used only at query time for expansion and for
/// lemma-level TF-IDF; never mutated after build.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct LemmaTable {
    entries: HashMap<String, BTreeSet<String>>,
}

impl LemmaTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_records<I>(records: I) -> Self
    where
        I: IntoIterator<Item = (String, Vec<String>)>,
    {
        let mut table = Self::new();
        for (lemma, terms) in records {
            table.insert_record(&lemma, terms);
        }
        table
    }

    pub fn insert_record<I>(&mut self, lemma: &str, terms: I)
    where
        I: IntoIterator<Item = String>,
    {
        self.entries
            .entry(lemma.to_string())
            .or_default()
            .extend(terms);
    }

    pub fn surface_terms(&self, lemma: &str) -> Option<&BTreeSet<String>> {
        self.entries.get(lemma)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &BTreeSet<String>)> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn records_union_across_documents() {
        let mut table = LemmaTable::new();
        table.insert_record("wolf", vec!["wolf".into(), "wolves".into()]);
        table.insert_record("wolf", vec!["wolf".into(), "wolfs".into()]);
        let terms = table.surface_terms("wolf").unwrap();
        assert_eq!(terms.len(), 3);
        assert!(terms.contains("wolves"));
    }
}
