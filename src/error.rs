//! Failures that abort an operation on the notes document.
//!
//! Only conditions the caller must report live here. Missing headings and sections are ordinary
//! outcomes and come back as `Option` or placement enums, and the sidecar index never produces an
//! error at all: it is rebuilt or skipped instead.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
/// Everything that can stop a document operation.
pub enum Error {
    /// Reading or writing a file failed.
    #[error("{}: {source}", .path.display())]
    Io {
        /// File the operation was touching.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: io::Error,
    },
    /// A heading was requested at a level markdown cannot express.
    #[error("heading level {0} is outside 1..=6")]
    InvalidHeadingLevel(usize),
    /// A section name that would not fit on one heading line.
    #[error("section name {0:?} must be a single line")]
    InvalidSection(String),
    /// No template is registered under this name.
    #[error("template '{0}' not found")]
    UnknownTemplate(String),
    /// No notes file was configured or passed on the command line.
    #[error("no notes file configured, run 'scrbl setup <path>' first")]
    NotConfigured,
    /// The configuration file or setup target is unusable.
    #[error("config: {0}")]
    Config(String),
}

impl Error {
    #[must_use]
    /// Attach the path an I/O failure happened on.
    pub fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, Error>;
