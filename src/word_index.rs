//! Inverted index from word tokens to the lines they occur on.

use crate::tokenizer::{normalize, tokenize};
use std::collections::BTreeMap;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Token to posting list, where a posting list holds one line number per occurrence.
///
/// A word used twice on a line records that line twice. Lists stay in ascending order because
/// lines are indexed front to back and insertions shift every later entry together.
pub struct WordIndex {
    postings: BTreeMap<String, Vec<usize>>,
}

impl WordIndex {
    #[must_use]
    /// Wrap postings restored from disk without re-tokenising anything.
    pub fn from_postings(postings: BTreeMap<String, Vec<usize>>) -> Self {
        Self { postings }
    }

    #[must_use]
    /// Borrow the raw postings.
    pub fn postings(&self) -> &BTreeMap<String, Vec<usize>> {
        &self.postings
    }

    /// Record every token of `line` as occurring on `line_index`.
    pub fn index(&mut self, line: &str, line_index: usize) {
        for token in tokenize(line) {
            let list = self.postings.entry(token).or_default();
            let at = list.partition_point(|&l| l <= line_index);
            list.insert(at, line_index);
        }
    }

    /// Move every posting at or after `at_or_after` down by `delta` lines.
    ///
    /// This walks every list, which makes it the dominant cost of a line insertion.
    pub fn shift(&mut self, at_or_after: usize, delta: usize) {
        for line in self.postings.values_mut().flat_map(|list| list.iter_mut()) {
            if *line >= at_or_after {
                *line += delta;
            }
        }
    }

    #[must_use]
    /// Lines containing `word`, or an empty slice if it was never indexed.
    pub fn query(&self, word: &str) -> &[usize] {
        self.postings
            .get(&normalize(word))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    #[must_use]
    /// Number of distinct tokens.
    pub fn len(&self) -> usize {
        self.postings.len()
    }

    #[must_use]
    /// True when nothing has been indexed.
    pub fn is_empty(&self) -> bool {
        self.postings.is_empty()
    }
}

#[cfg(test)]
#[path = "tests/word_index.rs"]
mod tests;
