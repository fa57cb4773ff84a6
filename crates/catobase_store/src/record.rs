//! Registry record format
//!
//! A record is one line of the registry:
//!
//! ```text
//! /path/to/file|Books,Movies|2024-05-01T12:00:00Z
//! ```
//!
//! Fields are separated by `|` (callers of [`format`] may choose another
//! separator, but the registry is always read back with `|`). Categories are
//! comma-joined and the last field is an RFC 3339 instant taken at format time.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use serde::Serialize;
use std::collections::HashSet;

/// Separator used when none is given, and the only one the registry reader accepts.
pub const DEFAULT_SEPARATOR: &str = "|";

/// Separator between categories inside the category field.
pub const CATEGORY_SEPARATOR: &str = ",";

/// Serialize a registration into a single line (without the trailing newline).
///
/// An empty `separator` falls back to [`DEFAULT_SEPARATOR`].
pub fn format<S: AsRef<str>>(path: &str, categories: &[S], separator: &str) -> String {
    let separator = if separator.is_empty() {
        DEFAULT_SEPARATOR
    } else {
        separator
    };

    let joined = categories
        .iter()
        .map(|c| c.as_ref())
        .collect::<Vec<_>>()
        .join(CATEGORY_SEPARATOR);

    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true);

    format!("{path}{separator}{joined}{separator}{timestamp}")
}

/// A parsed registry line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Record {
    pub subject_path: String,
    pub categories: Vec<String>,
    /// Raw timestamp field as written
    pub timestamp: String,
}

impl Record {
    /// Parse a registry line.
    ///
    /// Returns `None` for lines with fewer than three `|`-separated fields.
    /// Fields after the third are ignored. An empty category field yields no
    /// categories.
    pub fn parse(line: &str) -> Option<Self> {
        let mut fields = line.split(DEFAULT_SEPARATOR);
        let subject_path = fields.next()?;
        let categories = fields.next()?;
        let timestamp = fields.next()?;

        let categories = if categories.is_empty() {
            Vec::new()
        } else {
            categories
                .split(CATEGORY_SEPARATOR)
                .map(str::to_string)
                .collect()
        };

        Some(Record {
            subject_path: subject_path.to_string(),
            categories,
            timestamp: timestamp.to_string(),
        })
    }

    /// True if every `required` category is on this record (exact match).
    pub fn contains_all<S: AsRef<str>>(&self, required: &[S]) -> bool {
        let present: HashSet<&str> = self.categories.iter().map(String::as_str).collect();
        required.iter().all(|c| present.contains(c.as_ref()))
    }

    /// The registration instant, if the timestamp field is valid RFC 3339.
    pub fn registered_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.timestamp).ok()
    }
}
