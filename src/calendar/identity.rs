//! Id assignment, title validation and date normalization.

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};

use super::error::{CalendarError, CalendarResult};
use super::event::{CalendarEvent, EventId};

const DATE_FORMATS: [&str; 2] = ["%Y-%m-%d", "%Y/%m/%d"];

const DATETIME_FORMATS: [&str; 6] = [
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
];

/// Hands out time-derived ids that never collide with the loaded collection.
///
/// Ids are epoch milliseconds. Two creates in the same millisecond, or a
/// stored id from a clock that ran ahead, push the next id forward by one.
#[derive(Debug, Default)]
pub struct IdGenerator {
    last: u64,
}

impl IdGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&mut self, existing: &[CalendarEvent]) -> EventId {
        let now = u64::try_from(Utc::now().timestamp_millis()).unwrap_or(0);
        self.next_at(now, existing)
    }

    pub fn next_at(&mut self, now_ms: u64, existing: &[CalendarEvent]) -> EventId {
        let taken: HashSet<u64> = existing.iter().map(|e| e.id.0).collect();
        let mut candidate = now_ms.max(self.last.saturating_add(1));
        while taken.contains(&candidate) {
            candidate += 1;
        }
        self.last = candidate;
        EventId(candidate)
    }
}

/// Title must contain something other than whitespace. Returns the trimmed title.
pub fn validate_title(text: &str) -> CalendarResult<String> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(CalendarError::validation("title", "Please enter a title for your event"));
    }
    Ok(trimmed.to_string())
}

/// Reduce a textual date or timestamp to its calendar day.
///
/// Timestamps with an offset keep the day as written in that offset, so
/// `2024-03-15T23:30:00-05:00` is still the 15th.
pub fn normalize_date(input: &str) -> CalendarResult<NaiveDate> {
    let input = input.trim();

    for fmt in DATE_FORMATS {
        if let Ok(date) = NaiveDate::parse_from_str(input, fmt) {
            return Ok(date);
        }
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(input) {
        return Ok(dt.date_naive());
    }

    for fmt in DATETIME_FORMATS {
        if let Ok(dt) = NaiveDateTime::parse_from_str(input, fmt) {
            return Ok(dt.date());
        }
    }

    Err(CalendarError::validation(
        "date",
        format!("'{}' is not a date (expected YYYY-MM-DD)", input),
    ))
}

/// Format a calendar day in its stored form.
pub fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
