//! Keyword normalization and priority order
//!
//! Blank entries are dropped and exact duplicates collapse to their first
//! occurrence. The priority order (longest first, input order on ties) and
//! the literal matchers are fixed once, when the set is built.

use regex::{Regex, RegexBuilder};
use std::cmp::Reverse;

use crate::annotate::AnnotateError;

/// Compiled program budget per keyword byte, above the regex default
const PATTERN_LIMIT_PER_BYTE: usize = 1024;

/// The regex crate's own default program size limit
const MIN_PATTERN_SIZE_LIMIT: usize = 10 * (1 << 20);

/// One keyword with its compiled literal matcher
#[derive(Debug, Clone)]
pub struct Keyword {
    text: String,
    chars: usize,
    pattern: Regex,
}

impl Keyword {
    fn new(text: &str) -> Result<Self, AnnotateError> {
        // Case folding grows the program with the keyword, so long keywords
        // get a proportionally larger limit
        let size_limit = text
            .len()
            .saturating_mul(PATTERN_LIMIT_PER_BYTE)
            .max(MIN_PATTERN_SIZE_LIMIT);

        let pattern = RegexBuilder::new(&regex::escape(text))
            .case_insensitive(true)
            .size_limit(size_limit)
            .build()
            .map_err(|source| AnnotateError::Pattern {
                keyword: text.to_string(),
                source,
            })?;

        Ok(Self {
            text: text.to_string(),
            chars: text.chars().count(),
            pattern,
        })
    }

    /// The keyword exactly as supplied
    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.chars
    }

    pub fn pattern(&self) -> &Regex {
        &self.pattern
    }
}

/// Normalized keyword list with a fixed matching priority
#[derive(Debug, Clone, Default)]
pub struct KeywordSet {
    keywords: Vec<Keyword>,
    priority: Vec<usize>,
}

impl KeywordSet {
    pub fn new<S: AsRef<str>>(keywords: &[S]) -> Result<Self, AnnotateError> {
        let mut normalized: Vec<Keyword> = Vec::new();

        for raw in keywords {
            let text = raw.as_ref();
            if text.trim().is_empty() {
                continue;
            }
            if normalized.iter().any(|k| k.text == text) {
                continue;
            }
            normalized.push(Keyword::new(text)?);
        }

        let mut priority: Vec<usize> = (0..normalized.len()).collect();
        // sort_by_key is stable, so equal lengths keep input order
        priority.sort_by_key(|&index| Reverse(normalized[index].chars));

        Ok(Self {
            keywords: normalized,
            priority,
        })
    }

    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Keyword> {
        self.keywords.get(index)
    }

    /// Keywords in first-seen input order
    pub fn iter(&self) -> impl Iterator<Item = &Keyword> {
        self.keywords.iter()
    }

    /// Keyword indices in matching priority order
    pub fn priority(&self) -> &[usize] {
        &self.priority
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(set: &KeywordSet) -> Vec<&str> {
        set.iter().map(Keyword::as_str).collect()
    }

    #[test]
    fn test_drops_blank_entries() {
        let set = KeywordSet::new(&["cat", "", "   ", "\t", "dog"]).unwrap();
        assert_eq!(texts(&set), vec!["cat", "dog"]);
    }

    #[test]
    fn test_dedupes_case_sensitively() {
        let set = KeywordSet::new(&["cat", "Cat", "cat"]).unwrap();
        assert_eq!(texts(&set), vec!["cat", "Cat"]);
    }

    #[test]
    fn test_priority_longest_first_stable() {
        let set = KeywordSet::new(&["cat", "category", "dog", "ca"]).unwrap();
        let order: Vec<&str> = set
            .priority()
            .iter()
            .map(|&i| set.get(i).unwrap().as_str())
            .collect();
        assert_eq!(order, vec!["category", "cat", "dog", "ca"]);
    }

    #[test]
    fn test_priority_counts_chars_not_bytes() {
        // "été" is 3 chars but 5 bytes
        let set = KeywordSet::new(&["été", "abcd"]).unwrap();
        assert_eq!(set.get(set.priority()[0]).unwrap().as_str(), "abcd");
        assert_eq!(set.get(0).unwrap().char_len(), 3);
    }

    #[test]
    fn test_pattern_is_literal_and_case_insensitive() {
        let set = KeywordSet::new(&["a.b", "C++"]).unwrap();
        let dot = set.get(0).unwrap().pattern();
        assert!(dot.is_match("A.B"));
        assert!(!dot.is_match("axb"));
        let cpp = set.get(1).unwrap().pattern();
        assert!(cpp.is_match("c++"));
        assert!(!cpp.is_match("cc"));
    }

    #[test]
    fn test_very_long_keyword_compiles() {
        let long = "Lorem ipsum ".repeat(20_000);
        let set = KeywordSet::new(&[long.as_str()]).unwrap();
        let keyword = set.get(0).unwrap();
        assert_eq!(keyword.char_len(), 240_000);
        assert!(!keyword.pattern().is_match("lorem ipsum"));
    }

    #[test]
    fn test_empty_input() {
        let empty: [&str; 0] = [];
        let set = KeywordSet::new(&empty).unwrap();
        assert!(set.is_empty());
        assert!(set.priority().is_empty());
    }
}
