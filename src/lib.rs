//! scrbl: daily notes in a single markdown file.
//!
//! Notes live in one document organised by day headings (`## yyyy.MM.dd`) with named sections
//! beneath them. To place new entries without rescanning the file on every run, scrbl keeps a
//! heading tree and an inverted word index for the document, updates them line by line as entries
//! are inserted, and caches them in a sidecar file next to the notes.
#![allow(clippy::multiple_crate_versions)]

pub mod config;
pub mod editor;
pub mod error;
pub mod heading;
pub mod heading_tree;
pub mod index;
pub mod stats;
pub mod store;
pub mod template;
pub mod tokenizer;
pub mod ui;
pub mod word_index;

pub use editor::{Entry, EntryPlacement, IndexSource, NotesDocument};
pub use error::{Error, Result};
pub use index::DocumentIndex;
