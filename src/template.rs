//! Built-in blocks of headings that `scrbl create` appends to the notes file.

use crate::error::{Error, Result};
use chrono::NaiveDate;

/// Placeholder replaced with the date in `yyyy.MM.dd` form.
pub const DATE_PLACEHOLDER: &str = "{date:yyyy.MM.dd}";

/// Date format used in day headings.
pub const DATE_FORMAT: &str = "%Y.%m.%d";

#[derive(Clone, Debug, PartialEq, Eq)]
/// A heading with the section headings that start under it.
pub struct Template {
    /// Registry key, also accepted by `--template`.
    pub name: &'static str,
    /// Short description for listings.
    pub description: &'static str,
    /// Top heading; may contain [`DATE_PLACEHOLDER`].
    pub header: &'static str,
    /// Section headings placed under the header.
    pub sections: &'static [&'static str],
}

const TEMPLATES: &[Template] = &[Template {
    name: "daily",
    description: "Daily planning template",
    header: "## {date:yyyy.MM.dd}",
    sections: &["### Daily Summary"],
}];

impl Template {
    /// Look up a template by name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::UnknownTemplate`] if no template has that name.
    pub fn named(name: &str) -> Result<&'static Self> {
        TEMPLATES
            .iter()
            .find(|t| t.name.eq_ignore_ascii_case(name))
            .ok_or_else(|| Error::UnknownTemplate(name.to_string()))
    }

    #[must_use]
    /// Every registered template.
    pub fn all() -> &'static [Self] {
        TEMPLATES
    }

    #[must_use]
    /// The template text for `date`: header, sections, then one blank line, newline-terminated.
    pub fn render(&self, date: NaiveDate) -> String {
        let day = date.format(DATE_FORMAT).to_string();
        let mut lines = vec![self.header.replace(DATE_PLACEHOLDER, &day)];
        lines.extend(self.sections.iter().map(ToString::to_string));
        lines.push(String::new());
        lines.join("\n") + "\n"
    }
}

#[cfg(test)]
#[path = "tests/template.rs"]
mod tests;
