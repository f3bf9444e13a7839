//! Heading recognition for the notes document.
//!
//! A heading is a line whose first non-indentation characters are a run of 2 to 6 `#` marks
//! followed by whitespace. Level 1 is the document title and is deliberately left out of the
//! index, so only levels 2..=6 are ever reported.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Shallowest level tracked by the index.
pub const MIN_LEVEL: usize = 2;
/// Deepest level markdown allows.
pub const MAX_LEVEL: usize = 6;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// A detected heading line and where it currently sits in the document.
///
/// `line_index` identifies the heading only for the current document state: every insertion at
/// or before it renumbers it.
pub struct Heading {
    /// Zero-based line number in the document buffer.
    pub line_index: usize,
    /// The heading line with surrounding whitespace trimmed.
    pub raw_text: String,
    /// Number of leading `#` marks, in `2..=6`.
    pub level: usize,
}

impl Heading {
    #[must_use]
    /// Build a heading from a document line, if the line is one.
    pub fn from_line(line_index: usize, line: &str) -> Option<Self> {
        detect_level(line).map(|level| Self {
            line_index,
            raw_text: line.trim().to_string(),
            level,
        })
    }

    #[must_use]
    /// Heading text without the `#` markup.
    pub fn title(&self) -> &str {
        self.raw_text.trim_start_matches('#').trim()
    }
}

#[must_use]
/// Return the heading level of `line`, or `None` if it is not a tracked heading.
pub fn detect_level(line: &str) -> Option<usize> {
    let content = line.trim_start_matches([' ', '\t']);
    let marks = content.bytes().take_while(|&b| b == b'#').count();
    if !(MIN_LEVEL..=MAX_LEVEL).contains(&marks) {
        return None;
    }
    content[marks..]
        .chars()
        .next()
        .filter(|c| c.is_whitespace())
        .map(|_| marks)
}

/// Render a heading line for `title` at `level`.
///
/// # Errors
///
/// Returns [`Error::InvalidHeadingLevel`] if `level` is not in `1..=6`.
pub fn format_heading(level: usize, title: &str) -> Result<String> {
    if !(1..=MAX_LEVEL).contains(&level) {
        return Err(Error::InvalidHeadingLevel(level));
    }
    Ok(format!("{} {}", "#".repeat(level), title.trim()))
}

#[cfg(test)]
#[path = "tests/heading.rs"]
mod tests;
