//! Word tokens for the inverted index.

use std::sync::LazyLock;

use regex::Regex;

static WORD: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\w+").expect("valid word regex"));

/// Tokens shorter than this many characters are not indexed.
pub const MIN_TOKEN_CHARS: usize = 3;

/// Split a line into lower-cased word tokens, skipping tokens shorter than three characters.
///
/// Repeated words are yielded once per occurrence.
pub fn tokenize(line: &str) -> impl Iterator<Item = String> + '_ {
    WORD.find_iter(line)
        .map(|m| m.as_str().to_lowercase())
        .filter(|token| token.chars().count() >= MIN_TOKEN_CHARS)
}

#[must_use]
/// Normalise a single query word the same way indexed tokens are.
pub fn normalize(word: &str) -> String {
    word.trim().to_lowercase()
}

#[cfg(test)]
#[path = "tests/tokenizer.rs"]
mod tests;
