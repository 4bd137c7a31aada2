//! Per-keyword occurrence counts

use serde::{Deserialize, Serialize};

use crate::annotate::keywords::KeywordSet;

/// Count for one keyword
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordCount {
    pub keyword: String,
    pub count: usize,
}

/// Mapping from keyword to occurrence count
///
/// Entries keep first-seen input order. Every keyword of the set is present,
/// including those that never matched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CountTable {
    entries: Vec<KeywordCount>,
}

impl CountTable {
    /// One zero entry per keyword of the set
    pub fn seeded(keywords: &KeywordSet) -> Self {
        Self {
            entries: keywords
                .iter()
                .map(|keyword| KeywordCount {
                    keyword: keyword.as_str().to_string(),
                    count: 0,
                })
                .collect(),
        }
    }

    /// Add per-keyword increments indexed like the KeywordSet
    pub fn add_increments(&mut self, increments: &[usize]) {
        for (entry, increment) in self.entries.iter_mut().zip(increments) {
            entry.count += increment;
        }
    }

    /// Sum another table into this one, appending keywords not yet present
    pub fn merge(&mut self, other: &CountTable) {
        for entry in &other.entries {
            match self.entries.iter_mut().find(|e| e.keyword == entry.keyword) {
                Some(existing) => existing.count += entry.count,
                None => self.entries.push(entry.clone()),
            }
        }
    }

    pub fn get(&self, keyword: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.keyword == keyword)
            .map(|entry| entry.count)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts
    pub fn total(&self) -> usize {
        self.entries.iter().map(|entry| entry.count).sum()
    }

    /// Entries in input order
    pub fn iter(&self) -> impl Iterator<Item = &KeywordCount> {
        self.entries.iter()
    }

    /// Entries by descending count, ties in input order
    pub fn ranked(&self) -> Vec<&KeywordCount> {
        let mut ranked: Vec<&KeywordCount> = self.entries.iter().collect();
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(pairs: &[(&str, usize)]) -> CountTable {
        let keywords: Vec<&str> = pairs.iter().map(|(k, _)| *k).collect();
        let mut table = CountTable::seeded(&KeywordSet::new(&keywords).unwrap());
        let increments: Vec<usize> = pairs.iter().map(|(_, c)| *c).collect();
        table.add_increments(&increments);
        table
    }

    #[test]
    fn test_seeded_with_zeros() {
        let set = KeywordSet::new(&["cat", "dog", "cat"]).unwrap();
        let table = CountTable::seeded(&set);
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("cat"), Some(0));
        assert_eq!(table.get("dog"), Some(0));
        assert_eq!(table.get("bird"), None);
    }

    #[test]
    fn test_ranked_stable_ties() {
        let table = table(&[("a", 1), ("b", 3), ("c", 1), ("d", 0), ("e", 3)]);
        let order: Vec<&str> = table.ranked().iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(order, vec!["b", "e", "a", "c", "d"]);
        assert_eq!(table.total(), 8);
    }

    #[test]
    fn test_merge_sums_and_appends() {
        let mut left = table(&[("cat", 2), ("dog", 0)]);
        let right = table(&[("dog", 4), ("bird", 1)]);
        left.merge(&right);
        assert_eq!(left.get("cat"), Some(2));
        assert_eq!(left.get("dog"), Some(4));
        assert_eq!(left.get("bird"), Some(1));
        let keys: Vec<&str> = left.iter().map(|e| e.keyword.as_str()).collect();
        assert_eq!(keys, vec!["cat", "dog", "bird"]);
    }

    #[test]
    fn test_serializes_as_array() {
        let table = table(&[("cat", 2)]);
        let json = serde_json::to_string(&table).unwrap();
        assert_eq!(json, r#"[{"keyword":"cat","count":2}]"#);
    }
}
