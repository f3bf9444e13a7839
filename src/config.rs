//! Configuration to acknowledge user preferences as well as set defaults.
//!
//! We look for a scrbl.toml (named by `$SCRBL_CONFIG`, or in the platform config directory), and
//! if present we load settings from there. This provides the notes file location, the editor to
//! launch and rendering preferences.

use crate::error::{Error, Result};
use facet::Facet;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// Environment variable naming an explicit config file.
pub const CONFIG_ENV: &str = "SCRBL_CONFIG";

/// File created by `scrbl setup` inside the notes directory.
pub const NOTES_FILE_NAME: &str = "scrbl.md";

const INITIAL_NOTES: &str =
    "# My Notes\n\nWelcome to your notes! Use `scrbl add` to add new entries.\n\n";

#[derive(Facet, Clone)]
/// User preferences loaded from scrbl.toml or falling back to defaults.
pub struct Config {
    #[facet(default = String::new())]
    /// Path of the notes document; empty until `scrbl setup` runs.
    pub notes_file: String,
    #[facet(default = "nvim".to_string())]
    /// Editor command used by `scrbl edit`.
    pub editor: String,
    #[facet(default = 10)]
    /// Lines shown by `scrbl show` when `--lines` is not given.
    pub show_lines: usize,
    #[facet(default = 100)]
    /// Width of rendered panels and tables.
    pub render_width: u16,
}

impl Config {
    #[must_use]
    /// Load configuration from the config file if present.
    ///
    /// # Panics
    ///
    /// Panics if the default configuration cannot be parsed.
    pub fn load() -> Self {
        if let Some(path) = Self::path() {
            if let Ok(config) = Self::load_from(&path) {
                return config;
            }
        }
        facet_toml::from_str::<Self>("").unwrap()
    }

    /// Parse the configuration file at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Io`] if the file cannot be read, or [`Error::Config`] if it is not a
    /// valid configuration.
    pub fn load_from(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path).map_err(|e| Error::io(path, e))?;
        facet_toml::from_str::<Self>(&contents).map_err(|e| Error::Config(e.to_string()))
    }

    #[must_use]
    /// Where the config file lives: `$SCRBL_CONFIG`, else `scrbl/scrbl.toml` in the user's
    /// config directory.
    pub fn path() -> Option<PathBuf> {
        if let Some(explicit) = env::var_os(CONFIG_ENV) {
            return Some(PathBuf::from(explicit));
        }
        let base = env::var_os("XDG_CONFIG_HOME")
            .map(PathBuf::from)
            .or_else(|| env::var_os("HOME").map(|home| Path::new(&home).join(".config")))
            .or_else(|| env::var_os("APPDATA").map(PathBuf::from))?;
        Some(base.join("scrbl").join("scrbl.toml"))
    }

    /// The configured notes document.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotConfigured`] if no notes file has been set up.
    pub fn notes_path(&self) -> Result<PathBuf> {
        if self.notes_file.trim().is_empty() {
            Err(Error::NotConfigured)
        } else {
            Ok(PathBuf::from(&self.notes_file))
        }
    }
}

/// Create the notes directory and document, then record it in the config file at `config_path`.
///
/// Returns the path of the notes document. An existing document is left untouched, and other
/// settings already in the config file are kept.
///
/// # Errors
///
/// Returns [`Error::Config`] if the path cannot be stored in TOML, or [`Error::Io`] if any
/// directory or file cannot be written.
pub fn setup(notes_dir: &Path, config_path: &Path) -> Result<PathBuf> {
    fs::create_dir_all(notes_dir).map_err(|e| Error::io(notes_dir, e))?;
    let notes_dir = fs::canonicalize(notes_dir).map_err(|e| Error::io(notes_dir, e))?;
    let notes_file = notes_dir.join(NOTES_FILE_NAME);

    let literal = notes_file
        .to_str()
        .filter(|s| !s.contains(['\'', '\n', '\r']))
        .ok_or_else(|| {
            Error::Config(format!(
                "cannot store notes path {} in scrbl.toml",
                notes_file.display()
            ))
        })?;

    if !notes_file.exists() {
        fs::write(&notes_file, INITIAL_NOTES).map_err(|e| Error::io(&notes_file, e))?;
    }

    if let Some(parent) = config_path.parent() {
        fs::create_dir_all(parent).map_err(|e| Error::io(parent, e))?;
    }
    let mut contents = format!("notes_file = '{literal}'\n");
    if let Ok(existing) = fs::read_to_string(config_path) {
        for line in existing
            .lines()
            .filter(|l| !l.trim_start().starts_with("notes_file"))
        {
            contents.push_str(line);
            contents.push('\n');
        }
    }
    fs::write(config_path, contents).map_err(|e| Error::io(config_path, e))?;

    Ok(notes_file)
}

#[cfg(test)]
#[path = "tests/config.rs"]
mod tests;
