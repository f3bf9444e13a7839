//! One editing session on the notes document.
//!
//! The session reads the whole file once, gets an index for it (from the sidecar when that is
//! still fresh, otherwise by indexing every line) and then applies insertions to the line buffer
//! and the index together. Every line the buffer gains goes through [`NotesDocument::insert_line`],
//! so the index never sees a buffer it does not describe. Saving rewrites the whole file and
//! restamps the sidecar with the new modification time.

use crate::error::{Error, Result};
use crate::heading::{format_heading, Heading};
use crate::index::DocumentIndex;
use crate::stats::NoteStatistics;
use crate::store;
use crate::template::DATE_FORMAT;
use chrono::NaiveDate;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Level of the per-day heading.
pub const DAY_LEVEL: usize = 2;
/// Level of the named sections under a day.
pub const SECTION_LEVEL: usize = 3;

/// Line terminators a notes file can use.
const CRLF: &str = "\r\n";
const LF: &str = "\n";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where the session's index came from.
pub enum IndexSource {
    /// A fresh sidecar was restored.
    Cache,
    /// The sidecar was missing, stale or corrupt, so every line was indexed.
    Rebuilt,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Where [`NotesDocument::add_entry`] put an entry.
pub enum EntryPlacement {
    /// At the end of today's section.
    TodaySection,
    /// At the end of an existing named section under today.
    NamedSection,
    /// Under a section heading that had to be created first.
    CreatedSection,
    /// There is no heading for today, so the entry went to the end of the file.
    EndOfDocument,
}

#[derive(Clone, Debug, PartialEq, Eq)]
/// A single note to add to the document.
pub struct Entry {
    /// The note text.
    pub text: String,
    /// Section under today's heading to file the note in.
    pub section: Option<String>,
    /// Write the note as an open task rather than a bullet.
    pub task: bool,
}

impl Entry {
    #[must_use]
    /// A plain bullet entry.
    pub fn bullet(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            section: None,
            task: false,
        }
    }

    #[must_use]
    /// The document text for this entry. Text spanning several lines keeps its line breaks, and
    /// only the first line carries the marker.
    pub fn line(&self) -> String {
        let text = self.text.trim();
        if self.task {
            format!("- [ ] {text}")
        } else {
            format!("* {text}")
        }
    }
}

/// The notes file, its line buffer and its index for the duration of one command.
pub struct NotesDocument {
    path: PathBuf,
    lines: Vec<String>,
    line_ending: &'static str,
    index: Option<DocumentIndex>,
    index_source: Option<IndexSource>,
}

impl NotesDocument {
    /// Read the document at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let (lines, line_ending) = read_lines(&path)?;
        Ok(Self {
            path,
            lines,
            line_ending,
            index: None,
            index_source: None,
        })
    }

    #[must_use]
    /// Path of the document.
    pub fn path(&self) -> &Path {
        &self.path
    }

    #[must_use]
    /// Current line buffer.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    #[must_use]
    /// How the index was obtained, once it has been.
    pub fn index_source(&self) -> Option<IndexSource> {
        self.index_source
    }

    /// The index for the current buffer, loading or building it on first use.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the document's modification time cannot be read.
    pub fn index(&mut self) -> Result<&DocumentIndex> {
        let index = match self.index.take() {
            Some(index) => index,
            None => self.obtain_index()?,
        };
        Ok(self.index.insert(index))
    }

    fn obtain_index(&mut self) -> Result<DocumentIndex> {
        let mtime = store::document_mtime(&self.path)?;
        let sidecar = store::sidecar_path(&self.path);

        if let Some(persisted) = store::load(&sidecar) {
            if store::is_fresh(&persisted, mtime) {
                self.index_source = Some(IndexSource::Cache);
                return Ok(DocumentIndex::restore_from_persisted(persisted));
            }
            debug!(cached = %persisted.file_timestamp, document = %mtime, "index is stale");
        }

        let index = DocumentIndex::build_from_document(&self.lines);
        store::save(&sidecar, &index.to_persisted(mtime));
        self.index_source = Some(IndexSource::Rebuilt);
        Ok(index)
    }

    /// Insert `content` at `line_index`, updating the index in the same step.
    ///
    /// Content with line breaks becomes one buffer line per physical line, each indexed where it
    /// lands. Positions past the end append. Returns how many lines were inserted.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the index has to be built and the document cannot be inspected.
    pub fn insert_line(&mut self, line_index: usize, content: &str) -> Result<usize> {
        self.index()?;
        let start = line_index.min(self.lines.len());
        let mut physical: Vec<&str> = content.lines().collect();
        if physical.is_empty() {
            physical.push("");
        }

        for (offset, line) in physical.iter().enumerate() {
            let at = start + offset;
            self.lines.insert(at, (*line).to_string());
            if let Some(index) = self.index.as_mut() {
                index.insert_line_at(at, line);
            }
        }
        Ok(physical.len())
    }

    /// Write the buffer back to disk and refresh the sidecar to match.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the document cannot be written.
    pub fn save(&mut self) -> Result<()> {
        let mut contents = self.lines.join(self.line_ending);
        if !self.lines.is_empty() {
            contents.push_str(self.line_ending);
        }
        fs::write(&self.path, contents).map_err(|e| Error::io(&self.path, e))?;

        if let Some(index) = &self.index {
            let mtime = store::document_mtime(&self.path)?;
            store::save(&store::sidecar_path(&self.path), &index.to_persisted(mtime));
        }
        Ok(())
    }

    /// Add `entry` under today's heading and save.
    ///
    /// Today's heading is the last level-2 heading, provided its title is `today` in
    /// `yyyy.MM.dd` form. Entries naming a section go to the end of that level-3 child, which is
    /// created at the end of today's section if missing. Without a heading for today the entry
    /// is appended to the end of the document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidSection`] if the section name spans several lines,
    /// [`Error::Io`] if the document cannot be indexed or written, or
    /// [`Error::InvalidHeadingLevel`] if a section heading cannot be formatted.
    pub fn add_entry(&mut self, entry: &Entry, today: NaiveDate) -> Result<EntryPlacement> {
        if let Some(section) = entry.section.as_deref() {
            if section.contains(['\n', '\r']) {
                return Err(Error::InvalidSection(section.to_string()));
            }
        }
        let day = today.format(DATE_FORMAT).to_string();
        let line = entry.line();
        let line_count = self.lines.len();

        let (at, placement, new_section) = {
            let index = self.index()?;
            match index.last_heading(DAY_LEVEL).filter(|h| h.title() == day) {
                None => (line_count, EntryPlacement::EndOfDocument, None),
                Some(anchor) => match entry.section.as_deref() {
                    None => (
                        index.insertion_point(anchor, line_count),
                        EntryPlacement::TodaySection,
                        None,
                    ),
                    Some(section) => match index.find_child_heading(anchor, section, SECTION_LEVEL) {
                        Some(child) => (
                            index.insertion_point(child, line_count),
                            EntryPlacement::NamedSection,
                            None,
                        ),
                        None => (
                            index.insertion_point(anchor, line_count),
                            EntryPlacement::CreatedSection,
                            Some(format_heading(SECTION_LEVEL, section)?),
                        ),
                    },
                },
            }
        };

        match new_section {
            Some(heading) => {
                let added = self.insert_line(at, &heading)?;
                self.insert_line(at + added, &line)?;
            }
            None => {
                self.insert_line(at, &line)?;
            }
        }

        self.save()?;
        Ok(placement)
    }

    /// Append raw `text` to the file, bypassing the index, and drop the index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be appended to or re-read.
    pub fn append_template(&mut self, text: &str) -> Result<()> {
        let needs_newline = fs::read(&self.path)
            .map_err(|e| Error::io(&self.path, e))?
            .last()
            .is_some_and(|&b| b != b'\n');

        let mut file = OpenOptions::new()
            .append(true)
            .open(&self.path)
            .map_err(|e| Error::io(&self.path, e))?;
        if needs_newline {
            file.write_all(self.line_ending.as_bytes())
                .map_err(|e| Error::io(&self.path, e))?;
        }
        let text = if self.line_ending == CRLF {
            text.replace(CRLF, LF).replace(LF, CRLF)
        } else {
            text.to_string()
        };
        file.write_all(text.as_bytes())
            .map_err(|e| Error::io(&self.path, e))?;

        self.invalidate();
        (self.lines, self.line_ending) = read_lines(&self.path)?;
        Ok(())
    }

    /// Forget the in-memory index and delete the sidecar so the next access rebuilds.
    pub fn invalidate(&mut self) {
        self.index = None;
        self.index_source = None;
        Self::forget_index(&self.path);
    }

    /// Delete the sidecar of `document`, for callers handing the file to something else.
    pub fn forget_index(document: &Path) {
        info!(document = %document.display(), "invalidating index");
        store::delete(&store::sidecar_path(document));
    }

    #[must_use]
    /// The final `count` lines.
    pub fn last_lines(&self, count: usize) -> &[String] {
        &self.lines[self.lines.len().saturating_sub(count)..]
    }

    /// Lines containing `word`, each reported once, as `(line_index, text)`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the index has to be built and the document cannot be inspected.
    pub fn search(&mut self, word: &str) -> Result<Vec<(usize, &str)>> {
        self.index()?;
        let Some(index) = &self.index else {
            return Ok(Vec::new());
        };
        let mut hits = index.lines_containing(word).to_vec();
        hits.dedup();
        Ok(hits
            .into_iter()
            .filter_map(|i| self.lines.get(i).map(|line| (i, line.as_str())))
            .collect())
    }

    /// Headings in document order, indexing the document if needed.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the index has to be built and the document cannot be inspected.
    pub fn headings(&mut self) -> Result<&[Heading]> {
        Ok(self.index()?.headings())
    }

    /// Size and activity counts of the file on disk relative to `today`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read.
    pub fn statistics(&self, today: NaiveDate) -> Result<NoteStatistics> {
        let contents = fs::read_to_string(&self.path).map_err(|e| Error::io(&self.path, e))?;
        Ok(NoteStatistics::collect(&contents, today))
    }
}

/// Lines of the file at `path` and the terminator it uses, CRLF if any line ends in one.
fn read_lines(path: &Path) -> Result<(Vec<String>, &'static str)> {
    let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
    let ending = if contents.contains(CRLF) { CRLF } else { LF };
    Ok((contents.lines().map(ToString::to_string).collect(), ending))
}

#[cfg(test)]
#[path = "tests/editor.rs"]
mod tests;
