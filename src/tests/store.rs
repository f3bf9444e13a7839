use super::{
    cleanup_stale_sidecars, delete, document_mtime, is_fresh, load, save, sidecar_path,
    PersistedIndex,
};
use crate::heading::Heading;
use chrono::Duration;
use std::collections::BTreeMap;
use std::fs::{self, File};
use std::path::Path;
use std::time::{Duration as StdDuration, SystemTime};
use tempfile::TempDir;

fn sample(document: &Path) -> PersistedIndex {
    let headings = vec![
        Heading::from_line(0, "## 2024.01.01").unwrap(),
        Heading::from_line(1, "### Daily Summary").unwrap(),
    ];
    let mut word_index = BTreeMap::new();
    word_index.insert("daily".to_string(), vec![1]);
    word_index.insert("summary".to_string(), vec![1]);
    word_index.insert("2024".to_string(), vec![0]);
    PersistedIndex {
        file_timestamp: document_mtime(document).unwrap(),
        headings,
        word_index,
    }
}

fn backdate(path: &Path, age: StdDuration) {
    let file = File::options().write(true).open(path).unwrap();
    file.set_modified(SystemTime::now() - age).unwrap();
}

#[test]
fn test_sidecar_sits_next_to_document() {
    assert_eq!(
        sidecar_path(Path::new("/notes/scrbl.md")),
        Path::new("/notes/scrbl.md.scrbl-index")
    );
}

#[test]
fn test_save_then_load() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("scrbl.md");
    fs::write(&document, "## 2024.01.01\n### Daily Summary\n").unwrap();
    let persisted = sample(&document);
    let sidecar = sidecar_path(&document);

    save(&sidecar, &persisted);

    assert!(sidecar.exists());
    assert_eq!(load(&sidecar), Some(persisted));
}

#[test]
fn test_missing_sidecar_loads_nothing() {
    let dir = TempDir::new().unwrap();
    assert_eq!(load(&dir.path().join("absent.md.scrbl-index")), None);
}

#[test]
fn test_corrupt_sidecar_is_deleted() {
    let dir = TempDir::new().unwrap();
    let sidecar = dir.path().join("scrbl.md.scrbl-index");
    fs::write(&sidecar, "{ not json").unwrap();

    assert_eq!(load(&sidecar), None);
    assert!(!sidecar.exists());
}

#[test]
fn test_delete_tolerates_missing_file() {
    let dir = TempDir::new().unwrap();
    let sidecar = dir.path().join("scrbl.md.scrbl-index");
    delete(&sidecar);

    fs::write(&sidecar, "{}").unwrap();
    delete(&sidecar);
    assert!(!sidecar.exists());
}

#[test]
fn test_save_into_missing_directory_is_not_fatal() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("scrbl.md");
    fs::write(&document, "text\n").unwrap();
    let sidecar = dir.path().join("missing").join("scrbl.md.scrbl-index");

    save(&sidecar, &sample(&document));
    assert!(!sidecar.exists());
}

#[test]
fn test_freshness_compares_against_document_mtime() {
    let dir = TempDir::new().unwrap();
    let document = dir.path().join("scrbl.md");
    fs::write(&document, "text\n").unwrap();
    let mtime = document_mtime(&document).unwrap();
    let mut persisted = sample(&document);

    persisted.file_timestamp = mtime;
    assert!(is_fresh(&persisted, mtime));

    persisted.file_timestamp = mtime + Duration::seconds(5);
    assert!(is_fresh(&persisted, mtime));

    persisted.file_timestamp = mtime - Duration::seconds(1);
    assert!(!is_fresh(&persisted, mtime));
}

#[test]
fn test_document_mtime_of_missing_file_is_an_error() {
    let dir = TempDir::new().unwrap();
    assert!(document_mtime(&dir.path().join("absent.md")).is_err());
}

#[test]
fn test_cleanup_removes_only_old_sidecars() {
    let dir = TempDir::new().unwrap();
    let old = dir.path().join("old.md.scrbl-index");
    let recent = dir.path().join("recent.md.scrbl-index");
    let old_document = dir.path().join("old.md");
    for path in [&old, &recent, &old_document] {
        fs::write(path, "{}").unwrap();
    }
    let eight_days = StdDuration::from_secs(8 * 24 * 60 * 60);
    backdate(&old, eight_days);
    backdate(&old_document, eight_days);

    let removed = cleanup_stale_sidecars(dir.path(), Duration::days(7));

    assert_eq!(removed, 1);
    assert!(!old.exists());
    assert!(recent.exists());
    assert!(old_document.exists(), "only sidecars are cleaned up");
}

#[test]
fn test_cleanup_of_missing_directory() {
    let dir = TempDir::new().unwrap();
    assert_eq!(
        cleanup_stale_sidecars(&dir.path().join("nowhere"), Duration::days(7)),
        0
    );
}
