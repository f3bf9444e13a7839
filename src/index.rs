//! The structural index kept alongside the notes document.
//!
//! A `DocumentIndex` holds three views of the same lines: the flat heading list, the heading tree
//! derived from it, and the inverted word index. Once built, the only way to change it is
//! [`DocumentIndex::insert_line_at`], which must be called for every line the document gains so
//! that line numbers in all three views keep matching the buffer.

use crate::heading::Heading;
use crate::heading_tree::HeadingTree;
use crate::store::PersistedIndex;
use crate::word_index::WordIndex;
use chrono::{DateTime, Utc};
use std::time::Instant;
use tracing::debug;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
/// Headings, heading tree and word postings for one document state.
pub struct DocumentIndex {
    headings: Vec<Heading>,
    tree: HeadingTree,
    words: WordIndex,
}

impl DocumentIndex {
    #[must_use]
    /// Index every line of a document in one pass.
    ///
    /// Heading lines are indexed for words as well, so their titles are searchable.
    pub fn build_from_document<S: AsRef<str>>(lines: &[S]) -> Self {
        let started = Instant::now();
        let mut headings = Vec::new();
        let mut words = WordIndex::default();

        for (i, line) in lines.iter().enumerate() {
            let line = line.as_ref();
            if let Some(heading) = Heading::from_line(i, line) {
                headings.push(heading);
            }
            words.index(line, i);
        }

        let tree = HeadingTree::build(&headings);
        debug!(
            lines = lines.len(),
            headings = headings.len(),
            tokens = words.len(),
            elapsed_ms = started.elapsed().as_millis(),
            "indexed document"
        );
        Self {
            headings,
            tree,
            words,
        }
    }

    #[must_use]
    /// Rebuild an index from its persisted form without re-reading the document.
    pub fn restore_from_persisted(persisted: PersistedIndex) -> Self {
        let PersistedIndex {
            headings,
            word_index,
            ..
        } = persisted;
        let tree = HeadingTree::build(&headings);
        debug!(headings = headings.len(), "restored index from cache");
        Self {
            headings,
            tree,
            words: WordIndex::from_postings(word_index),
        }
    }

    #[must_use]
    /// Snapshot this index for the sidecar, stamped with the document's modification time.
    pub fn to_persisted(&self, file_timestamp: DateTime<Utc>) -> PersistedIndex {
        PersistedIndex {
            file_timestamp,
            headings: self.headings.clone(),
            word_index: self.words.postings().clone(),
        }
    }

    /// Account for `content` having been inserted into the document at `line_index`.
    ///
    /// Everything at or below the insertion point moves down one line before the new line is
    /// indexed in its final position. A new heading is slotted into the sorted list and the tree
    /// is rebuilt from scratch.
    pub fn insert_line_at(&mut self, line_index: usize, content: &str) {
        for heading in &mut self.headings {
            if heading.line_index >= line_index {
                heading.line_index += 1;
            }
        }
        self.words.shift(line_index, 1);
        self.words.index(content, line_index);

        if let Some(heading) = Heading::from_line(line_index, content) {
            let at = self
                .headings
                .partition_point(|h| h.line_index < heading.line_index);
            self.headings.insert(at, heading);
        }
        // Existing headings shifted, so the tree's copies are stale even without a new heading.
        self.tree = HeadingTree::build(&self.headings);
    }

    #[must_use]
    /// All headings in document order.
    pub fn headings(&self) -> &[Heading] {
        &self.headings
    }

    #[must_use]
    /// The heading tree derived from [`Self::headings`].
    pub fn tree(&self) -> &HeadingTree {
        &self.tree
    }

    #[must_use]
    /// The inverted word index.
    pub fn words(&self) -> &WordIndex {
        &self.words
    }

    #[must_use]
    /// The last heading in the document at exactly `level`.
    pub fn last_heading(&self, level: usize) -> Option<&Heading> {
        self.headings.iter().rev().find(|h| h.level == level)
    }

    #[must_use]
    /// The direct child of `parent` at `level` titled `title` (case-insensitive).
    ///
    /// Returns `None` when `parent` is stale, meaning it no longer matches a heading in the
    /// current index.
    pub fn find_child_heading(&self, parent: &Heading, title: &str, level: usize) -> Option<&Heading> {
        self.tree.first_child_matching(parent, title, level)
    }

    #[must_use]
    /// Lines on which `word` occurs, one entry per occurrence.
    pub fn lines_containing(&self, word: &str) -> &[usize] {
        self.words.query(word)
    }

    #[must_use]
    /// Where new content belonging to `anchor` goes in a document of `line_count` lines.
    ///
    /// That is the first later heading at the anchor's level or shallower, or the end of the
    /// document. New content therefore lands after the anchor's whole subtree, never between the
    /// anchor and its first child heading.
    pub fn insertion_point(&self, anchor: &Heading, line_count: usize) -> usize {
        let after = self
            .headings
            .partition_point(|h| h.line_index <= anchor.line_index);
        self.headings[after..]
            .iter()
            .find(|h| h.level <= anchor.level)
            .map_or(line_count, |h| h.line_index)
    }
}

#[cfg(test)]
#[path = "tests/index.rs"]
mod tests;
