use super::{Entry, EntryPlacement, IndexSource, NotesDocument};
use crate::error::Error;
use crate::heading::Heading;
use crate::index::DocumentIndex;
use crate::store::{self, document_mtime, sidecar_path, PersistedIndex};
use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;
use std::fs;
use std::path::PathBuf;
use tempfile::TempDir;

fn today() -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 1, 15).unwrap()
}

fn notes(contents: &str) -> (TempDir, PathBuf) {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("scrbl.md");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

fn assert_index_matches_buffer(doc: &mut NotesDocument) {
    let expected = DocumentIndex::build_from_document(doc.lines());
    assert_eq!(*doc.index().unwrap(), expected);
}

#[test]
fn test_first_access_rebuilds_and_writes_sidecar() {
    let (_dir, path) = notes("# My Notes\n## 2024.01.15\n");
    let mut doc = NotesDocument::open(&path).unwrap();
    assert_eq!(doc.index_source(), None);

    assert_eq!(doc.index().unwrap().headings().len(), 1);
    assert_eq!(doc.index_source(), Some(IndexSource::Rebuilt));
    assert!(sidecar_path(&path).exists());
}

#[test]
fn test_fresh_sidecar_is_used() {
    let (_dir, path) = notes("## 2024.01.15\n");
    let mtime = document_mtime(&path).unwrap();
    let cached = PersistedIndex {
        file_timestamp: mtime,
        headings: vec![Heading::from_line(0, "## Cached").unwrap()],
        word_index: BTreeMap::new(),
    };
    store::save(&sidecar_path(&path), &cached);

    let mut doc = NotesDocument::open(&path).unwrap();
    let headings = doc.headings().unwrap().to_vec();

    assert_eq!(doc.index_source(), Some(IndexSource::Cache));
    assert_eq!(headings[0].title(), "Cached");
}

#[test]
fn test_stale_sidecar_is_rebuilt() {
    let (_dir, path) = notes("## 2024.01.15\n");
    let mtime = document_mtime(&path).unwrap();
    let cached = PersistedIndex {
        file_timestamp: mtime - Duration::seconds(1),
        headings: vec![Heading::from_line(0, "## Cached").unwrap()],
        word_index: BTreeMap::new(),
    };
    store::save(&sidecar_path(&path), &cached);

    let mut doc = NotesDocument::open(&path).unwrap();
    let headings = doc.headings().unwrap().to_vec();

    assert_eq!(doc.index_source(), Some(IndexSource::Rebuilt));
    assert_eq!(headings[0].title(), "2024.01.15");

    let restamped = store::load(&sidecar_path(&path)).unwrap();
    assert_eq!(restamped.file_timestamp, mtime);
}

#[test]
fn test_corrupt_sidecar_is_rebuilt() {
    let (_dir, path) = notes("## 2024.01.15\n");
    fs::write(sidecar_path(&path), "garbage").unwrap();

    let mut doc = NotesDocument::open(&path).unwrap();
    doc.index().unwrap();

    assert_eq!(doc.index_source(), Some(IndexSource::Rebuilt));
    assert!(store::load(&sidecar_path(&path)).is_some());
}

#[test]
fn test_open_missing_file_fails() {
    let dir = TempDir::new().unwrap();
    let result = NotesDocument::open(dir.path().join("absent.md"));
    assert!(matches!(result, Err(Error::Io { .. })));
}

#[test]
fn test_add_entry_to_today() {
    let (_dir, path) = notes("# My Notes\n\n## 2024.01.15\n### Daily Summary\n\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    let placement = doc.add_entry(&Entry::bullet("did X"), today()).unwrap();

    assert_eq!(placement, EntryPlacement::TodaySection);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# My Notes\n\n## 2024.01.15\n### Daily Summary\n\n* did X\n"
    );
}

#[test]
fn test_add_entry_uses_last_day_heading() {
    let (_dir, path) = notes("## 2024.01.15\n* one\n## 2024.01.15\n* two\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.add_entry(&Entry::bullet("three"), today()).unwrap();

    assert_eq!(
        doc.lines(),
        ["## 2024.01.15", "* one", "## 2024.01.15", "* two", "* three"]
    );
}

#[test]
fn test_add_entry_to_existing_section() {
    let (_dir, path) = notes("## 2024.01.15\n### Daily Summary\n* first\n### Ideas\n* idea\n");
    let mut doc = NotesDocument::open(&path).unwrap();
    let entry = Entry {
        text: "second".to_string(),
        section: Some("daily summary".to_string()),
        task: false,
    };

    let placement = doc.add_entry(&entry, today()).unwrap();

    assert_eq!(placement, EntryPlacement::NamedSection);
    assert_eq!(
        doc.lines(),
        [
            "## 2024.01.15",
            "### Daily Summary",
            "* first",
            "* second",
            "### Ideas",
            "* idea"
        ]
    );
    assert_index_matches_buffer(&mut doc);
}

#[test]
fn test_add_entry_creates_missing_section() {
    let (_dir, path) = notes("## 2024.01.15\n### Daily Summary\n");
    let mut doc = NotesDocument::open(&path).unwrap();
    let entry = Entry {
        text: "call back".to_string(),
        section: Some("Todo".to_string()),
        task: true,
    };

    let placement = doc.add_entry(&entry, today()).unwrap();

    assert_eq!(placement, EntryPlacement::CreatedSection);
    assert_eq!(
        doc.lines(),
        ["## 2024.01.15", "### Daily Summary", "### Todo", "- [ ] call back"]
    );

    let day = doc.headings().unwrap()[0].clone();
    let index = doc.index().unwrap();
    let todo = index.find_child_heading(&day, "todo", 3).unwrap();
    assert_eq!(todo.line_index, 2);
}

#[test]
fn test_add_entry_without_today_goes_to_end() {
    let (_dir, path) = notes("## 2024.01.14\n* yesterday\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    let placement = doc.add_entry(&Entry::bullet("orphan"), today()).unwrap();

    assert_eq!(placement, EntryPlacement::EndOfDocument);
    assert_eq!(doc.lines(), ["## 2024.01.14", "* yesterday", "* orphan"]);
}

#[test]
fn test_today_must_be_the_last_day() {
    let (_dir, path) = notes("## 2024.01.15\n## 2024.01.16\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    let placement = doc.add_entry(&Entry::bullet("late"), today()).unwrap();

    assert_eq!(placement, EntryPlacement::EndOfDocument);
}

#[test]
fn test_saved_entry_leaves_fresh_cache() {
    let (_dir, path) = notes("## 2024.01.15\n### Daily Summary\n");
    let mut doc = NotesDocument::open(&path).unwrap();
    doc.add_entry(&Entry::bullet("cached"), today()).unwrap();

    let mut reopened = NotesDocument::open(&path).unwrap();
    assert_index_matches_buffer(&mut reopened);
    assert_eq!(reopened.index_source(), Some(IndexSource::Cache));
    assert_eq!(reopened.search("cached").unwrap(), [(2, "* cached")]);
}

#[test]
fn test_insert_line_keeps_index_in_step() {
    let (_dir, path) = notes("## A\ntext\n### B\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.insert_line(0, "intro").unwrap();
    doc.insert_line(99, "## Z").unwrap();
    doc.insert_line(3, "### Between").unwrap();

    assert_eq!(doc.lines(), ["intro", "## A", "text", "### Between", "### B", "## Z"]);
    assert_index_matches_buffer(&mut doc);
}

#[test]
fn test_append_template_invalidates_index() {
    let (_dir, path) = notes("# My Notes");
    let mut doc = NotesDocument::open(&path).unwrap();
    doc.index().unwrap();
    assert!(sidecar_path(&path).exists());

    doc.append_template("## 2024.01.15\n### Daily Summary\n\n").unwrap();

    assert!(!sidecar_path(&path).exists());
    assert_eq!(doc.index_source(), None);
    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# My Notes\n## 2024.01.15\n### Daily Summary\n\n"
    );

    assert_eq!(doc.headings().unwrap().len(), 2);
    assert_eq!(doc.index_source(), Some(IndexSource::Rebuilt));
}

#[test]
fn test_search_reports_each_line_once() {
    let (_dir, path) = notes("## 2024.01.15\n* rust and more rust\n* other\n* Rust again\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    let hits = doc.search("RUST").unwrap();

    assert_eq!(hits, [(1, "* rust and more rust"), (3, "* Rust again")]);
    assert!(doc.search("absent").unwrap().is_empty());
}

#[test]
fn test_last_lines() {
    let (_dir, path) = notes("a\nb\nc\n");
    let doc = NotesDocument::open(&path).unwrap();

    assert_eq!(doc.last_lines(2), ["b", "c"]);
    assert_eq!(doc.last_lines(10), ["a", "b", "c"]);
    assert!(doc.last_lines(0).is_empty());
}

#[test]
fn test_entry_lines() {
    assert_eq!(Entry::bullet("  padded ").line(), "* padded");
    let task = Entry {
        text: "ship it".to_string(),
        section: None,
        task: true,
    };
    assert_eq!(task.line(), "- [ ] ship it");
}

#[test]
fn test_multiline_entry_becomes_separate_lines() {
    let (_dir, path) = notes("## 2024.01.15\n### Daily Summary\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.add_entry(&Entry::bullet("first\nsecond"), today()).unwrap();
    assert_eq!(
        doc.lines(),
        ["## 2024.01.15", "### Daily Summary", "* first", "second"]
    );

    let mut reopened = NotesDocument::open(&path).unwrap();
    assert_index_matches_buffer(&mut reopened);
    assert_eq!(reopened.index_source(), Some(IndexSource::Cache));
    assert_eq!(reopened.index().unwrap().lines_containing("second"), &[3]);
}

#[test]
fn test_heading_inside_entry_text_is_indexed() {
    let (_dir, path) = notes("## 2024.01.15\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.add_entry(&Entry::bullet("note\r\n### Later"), today()).unwrap();

    let headings = doc.headings().unwrap().to_vec();
    assert_eq!(headings.len(), 2);
    assert_eq!(headings[1].line_index, 2);
    assert_eq!(headings[1].title(), "Later");
    assert_index_matches_buffer(&mut doc);
}

#[test]
fn test_insert_line_reports_physical_lines() {
    let (_dir, path) = notes("a\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    assert_eq!(doc.insert_line(1, "b\nc").unwrap(), 2);
    assert_eq!(doc.insert_line(0, "").unwrap(), 1);
    assert_eq!(doc.lines(), ["", "a", "b", "c"]);
    assert_index_matches_buffer(&mut doc);
}

#[test]
fn test_multiline_section_name_is_rejected() {
    let contents = "## 2024.01.15\n";
    let (_dir, path) = notes(contents);
    let mut doc = NotesDocument::open(&path).unwrap();
    let entry = Entry {
        text: "text".to_string(),
        section: Some("Two\nLines".to_string()),
        task: false,
    };

    let result = doc.add_entry(&entry, today());

    assert!(matches!(result, Err(Error::InvalidSection(_))));
    assert_eq!(fs::read_to_string(&path).unwrap(), contents);
}

#[test]
fn test_crlf_endings_are_kept() {
    let (_dir, path) = notes("## 2024.01.15\r\n### Daily Summary\r\n");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.add_entry(&Entry::bullet("windows"), today()).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "## 2024.01.15\r\n### Daily Summary\r\n* windows\r\n"
    );
}

#[test]
fn test_template_follows_crlf_endings() {
    let (_dir, path) = notes("# My Notes\r\nintro");
    let mut doc = NotesDocument::open(&path).unwrap();

    doc.append_template("## 2024.01.15\n### Daily Summary\n\n").unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "# My Notes\r\nintro\r\n## 2024.01.15\r\n### Daily Summary\r\n\r\n"
    );
    assert_eq!(doc.lines().len(), 5);
}

#[test]
fn test_statistics_count_file_characters() {
    let (_dir, path) = notes("## 2024.01.15\r\n* one\r\n");
    let doc = NotesDocument::open(&path).unwrap();

    let stats = doc.statistics(today()).unwrap();

    assert_eq!(stats.total_characters, 22);
    assert_eq!(stats.total_lines, 2);
    assert_eq!(stats.notes_today, 1);
}
