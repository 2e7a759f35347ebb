use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::feed::Entry;

/// Limit and date filters applied before rendering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct EntryFilter {
    /// Keep at most this many entries from the start; a limit at or above the
    /// entry count leaves the list untouched.
    pub limit: Option<usize>,
    /// Keep only entries published on this calendar day.
    pub date: Option<NaiveDate>,
}

impl EntryFilter {
    /// Applies the limit first, then the date filter.
    ///
    /// With a date filter active, entries without a parseable date are
    /// dropped.
    pub fn apply<'a>(&self, entries: &'a [Entry]) -> Vec<&'a Entry> {
        let take = match self.limit {
            Some(limit) if limit > 0 && limit < entries.len() => limit,
            _ => entries.len(),
        };

        entries[..take]
            .iter()
            .filter(|entry| match self.date {
                None => true,
                Some(wanted) => entry
                    .date
                    .as_deref()
                    .and_then(entry_date)
                    .is_some_and(|date| date == wanted),
            })
            .collect()
    }
}

/// Parses the `--date` argument: `YYYYMMDD` or `YYYY-MM-DD`.
pub fn parse_date_arg(s: &str) -> Result<NaiveDate, String> {
    let s = s.trim();
    NaiveDate::parse_from_str(s, "%Y%m%d")
        .or_else(|_| NaiveDate::parse_from_str(s, "%Y-%m-%d"))
        .map_err(|_| format!("invalid date '{s}', expected YYYYMMDD or YYYY-MM-DD"))
}

const NAIVE_DATETIME_FORMATS: [&str; 2] = ["%Y-%m-%d %H:%M:%S", "%Y-%m-%dT%H:%M:%S"];

/// Calendar date of an entry's raw date text, in the entry's own offset.
///
/// Tries RFC 2822 (what RSS `pubDate` uses), then RFC 3339, then an
/// offset-less `YYYY-MM-DD HH:MM:SS` (space or `T` separated), then a bare
/// `YYYY-MM-DD`.
pub fn entry_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.date_naive());
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.date_naive());
    }
    for format in NAIVE_DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt.date());
        }
    }
    match NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        Ok(date) => Some(date),
        Err(_) => {
            tracing::debug!(date = %raw, "Unrecognized entry date format");
            None
        }
    }
}
