//! The sidecar cache that lets a run skip re-indexing an unchanged document.
//!
//! The index is written next to the notes file as pretty-printed JSON, stamped with the document's
//! modification time at the moment it was saved. A later run trusts it only while that stamp is
//! not older than the document on disk. The sidecar is never a source of truth: unreadable files
//! are deleted and rebuilt, and failed writes only cost the next run a rebuild.

use crate::error::{Error, Result};
use crate::heading::Heading;
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Appended to the document path to name its sidecar.
pub const SIDECAR_SUFFIX: &str = ".scrbl-index";

/// Sidecars untouched for longer than this are removed by [`cleanup_stale_sidecars`].
pub const DEFAULT_MAX_AGE_DAYS: i64 = 7;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
/// On-disk form of a document index.
pub struct PersistedIndex {
    /// Document modification time the index was built against.
    pub file_timestamp: DateTime<Utc>,
    /// Flat heading list sorted by line.
    pub headings: Vec<Heading>,
    /// Token to posting list.
    pub word_index: BTreeMap<String, Vec<usize>>,
}

#[must_use]
/// Path of the sidecar belonging to `document`.
pub fn sidecar_path(document: &Path) -> PathBuf {
    let mut name = OsString::from(document.as_os_str());
    name.push(SIDECAR_SUFFIX);
    PathBuf::from(name)
}

#[must_use]
/// Read a sidecar, deleting it if it cannot be parsed.
pub fn load(index_path: &Path) -> Option<PersistedIndex> {
    let contents = fs::read_to_string(index_path).ok()?;
    match serde_json::from_str(&contents) {
        Ok(persisted) => Some(persisted),
        Err(e) => {
            warn!(path = %index_path.display(), error = %e, "discarding corrupt index");
            delete(index_path);
            None
        }
    }
}

/// Write a sidecar. Failures are logged and otherwise ignored.
pub fn save(index_path: &Path, persisted: &PersistedIndex) {
    let written = serde_json::to_string_pretty(persisted)
        .map_err(|e| e.to_string())
        .and_then(|json| fs::write(index_path, json).map_err(|e| e.to_string()));
    match written {
        Ok(()) => debug!(path = %index_path.display(), "saved index"),
        Err(e) => warn!(path = %index_path.display(), error = %e, "could not save index file"),
    }
}

/// Remove a sidecar if present.
pub fn delete(index_path: &Path) {
    match fs::remove_file(index_path) {
        Ok(()) => info!(path = %index_path.display(), "removed index"),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
        Err(e) => warn!(path = %index_path.display(), error = %e, "could not remove index"),
    }
}

#[must_use]
/// Whether `persisted` still describes a document last modified at `document_mtime`.
pub fn is_fresh(persisted: &PersistedIndex, document_mtime: DateTime<Utc>) -> bool {
    persisted.file_timestamp >= document_mtime
}

/// Last modification time of `path`.
///
/// # Errors
///
/// Returns [`Error::Io`] if the file's metadata cannot be read.
pub fn document_mtime(path: &Path) -> Result<DateTime<Utc>> {
    fs::metadata(path)
        .and_then(|m| m.modified())
        .map(DateTime::<Utc>::from)
        .map_err(|e| Error::io(path, e))
}

/// Delete sidecars in `dir` not modified within `max_age`, returning how many were removed.
///
/// Best effort: unreadable entries are skipped.
pub fn cleanup_stale_sidecars(dir: &Path, max_age: Duration) -> usize {
    let Ok(entries) = fs::read_dir(dir) else {
        return 0;
    };
    let cutoff = Utc::now() - max_age;
    let mut removed = 0;

    for path in entries.filter_map(|e| e.ok().map(|e| e.path())) {
        let is_sidecar = path
            .file_name()
            .and_then(|n| n.to_str())
            .is_some_and(|n| n.ends_with(SIDECAR_SUFFIX));
        if !is_sidecar {
            continue;
        }
        let Ok(modified) = document_mtime(&path) else {
            continue;
        };
        if modified < cutoff {
            match fs::remove_file(&path) {
                Ok(()) => {
                    info!(path = %path.display(), "cleaned up old index");
                    removed += 1;
                }
                Err(e) => warn!(path = %path.display(), error = %e, "could not delete old index"),
            }
        }
    }

    removed
}

#[cfg(test)]
#[path = "tests/store.rs"]
mod tests;
