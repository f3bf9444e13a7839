//! Counts shown by `scrbl status`.

use crate::template::DATE_FORMAT;
use chrono::{Datelike, Days, NaiveDate};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
/// Size of the notes file and how many day headings fall in recent periods.
pub struct NoteStatistics {
    /// Lines in the document.
    pub total_lines: usize,
    /// Whitespace-separated words.
    pub total_words: usize,
    /// Characters in the file, line terminators included.
    pub total_characters: usize,
    /// Day headings dated `today`.
    pub notes_today: usize,
    /// Day headings since the most recent Sunday.
    pub notes_this_week: usize,
    /// Day headings since the first of the month.
    pub notes_this_month: usize,
}

impl NoteStatistics {
    #[must_use]
    /// Compute statistics over the document text `contents` relative to `today`.
    pub fn collect(contents: &str, today: NaiveDate) -> Self {
        let start_of_week = today
            .checked_sub_days(Days::new(u64::from(today.weekday().num_days_from_sunday())))
            .unwrap_or(today);
        let start_of_month = today.with_day(1).unwrap_or(today);

        let mut stats = Self {
            total_words: contents.split_whitespace().count(),
            total_characters: contents.chars().count(),
            ..Self::default()
        };

        for line in contents.lines() {
            stats.total_lines += 1;

            let Some(date) = day_heading(line) else {
                continue;
            };
            if date == today {
                stats.notes_today += 1;
            }
            if date >= start_of_week && date <= today {
                stats.notes_this_week += 1;
            }
            if date >= start_of_month && date <= today {
                stats.notes_this_month += 1;
            }
        }

        stats
    }
}

/// Date of a `## yyyy.MM.dd` line.
fn day_heading(line: &str) -> Option<NaiveDate> {
    let rest = line.strip_prefix("## ")?;
    NaiveDate::parse_from_str(rest.trim(), DATE_FORMAT).ok()
}

#[cfg(test)]
#[path = "tests/stats.rs"]
mod tests;
