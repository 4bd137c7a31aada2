//! Keyword matching within one text run
//!
//! Keywords are tried in priority order. Each keyword is only searched in
//! the gaps that higher-priority keywords left unclaimed, so accepted
//! occurrences never overlap and a shorter keyword still matches wherever a
//! longer one did not.

use serde::{Deserialize, Serialize};

use crate::annotate::keywords::KeywordSet;

/// One accepted match inside a text run
///
/// Offsets are half-open byte offsets into the run's original content and
/// always fall on `char` boundaries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Occurrence {
    /// Index of the keyword in the KeywordSet
    pub keyword: usize,
    pub start: usize,
    pub end: usize,
}

impl Occurrence {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Matches found in one run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunMatches {
    /// Accepted occurrences, sorted by start offset
    pub occurrences: Vec<Occurrence>,
    /// Count increment per keyword, indexed like the KeywordSet
    pub counts: Vec<usize>,
}

impl RunMatches {
    pub fn is_empty(&self) -> bool {
        self.occurrences.is_empty()
    }
}

/// Byte ranges of `len` not covered by any claimed occurrence
fn unclaimed_gaps(claimed: &[Occurrence], len: usize) -> Vec<(usize, usize)> {
    let mut gaps = Vec::with_capacity(claimed.len() + 1);
    let mut cursor = 0;
    for occurrence in claimed {
        if occurrence.start > cursor {
            gaps.push((cursor, occurrence.start));
        }
        cursor = cursor.max(occurrence.end);
    }
    if cursor < len {
        gaps.push((cursor, len));
    }
    gaps
}

/// Find every accepted keyword occurrence in `text`
pub fn match_run(text: &str, keywords: &KeywordSet) -> RunMatches {
    let mut claimed: Vec<Occurrence> = Vec::new();
    let mut counts = vec![0usize; keywords.len()];

    for &index in keywords.priority() {
        let Some(keyword) = keywords.get(index) else {
            continue;
        };

        let mut found = Vec::new();
        for (gap_start, gap_end) in unclaimed_gaps(&claimed, text.len()) {
            let segment = &text[gap_start..gap_end];
            for m in keyword.pattern().find_iter(segment) {
                if m.is_empty() {
                    continue;
                }
                found.push(Occurrence {
                    keyword: index,
                    start: gap_start + m.start(),
                    end: gap_start + m.end(),
                });
            }
        }

        if found.is_empty() {
            continue;
        }

        counts[index] += found.len();
        claimed.extend(found);
        claimed.sort_by_key(|occurrence| occurrence.start);
    }

    RunMatches {
        occurrences: claimed,
        counts,
    }
}
