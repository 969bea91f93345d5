use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Opaque event identifier, derived from the creation timestamp in milliseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(pub u64);

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single calendar entry. The only entity that is persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEvent {
    pub id: EventId,
    pub title: String,
    /// Pure calendar day, stored as `YYYY-MM-DD`.
    pub date: NaiveDate,
    /// Free-text time of day such as `14:30`. `None` means all day.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl CalendarEvent {
    pub fn is_all_day(&self) -> bool {
        self.time.is_none()
    }

    pub fn time_display(&self) -> &str {
        self.time.as_deref().unwrap_or("All day")
    }

    /// Key used for agenda ordering: missing times sort before any time.
    pub fn time_key(&self) -> &str {
        self.time.as_deref().unwrap_or("")
    }
}

/// Fields captured by the add form, before an id is assigned.
///
/// `date` is raw input and is normalized on create.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NewEvent {
    pub title: String,
    pub date: String,
    pub time: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl NewEvent {
    pub fn new(title: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            date: date.into(),
            ..Self::default()
        }
    }

    pub fn with_time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

/// Partial update. `None` keeps the stored value; `Some("")` clears an
/// optional field.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventPatch {
    pub title: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    pub description: Option<String>,
    pub notes: Option<String>,
}

impl EventPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn date(mut self, date: impl Into<String>) -> Self {
        self.date = Some(date.into());
        self
    }

    pub fn time(mut self, time: impl Into<String>) -> Self {
        self.time = Some(time.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.date.is_none()
            && self.time.is_none()
            && self.description.is_none()
            && self.notes.is_none()
    }
}

/// Trim optional free text; blank input means the field is absent.
pub fn optional_text(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> CalendarEvent {
        CalendarEvent {
            id: EventId(1710460800000),
            title: "Doctor".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: None,
            description: None,
            notes: None,
        }
    }

    #[test]
    fn serializes_in_storage_shape() {
        let json = serde_json::to_string(&sample()).unwrap();
        assert_eq!(
            json,
            r#"{"id":1710460800000,"title":"Doctor","date":"2024-03-15"}"#
        );
    }

    #[test]
    fn reads_records_with_extra_and_missing_fields() {
        let json = r#"{"id":7,"title":"Lunch","date":"2024-03-15","time":"12:00","color":"blue"}"#;
        let event: CalendarEvent = serde_json::from_str(json).unwrap();
        assert_eq!(event.id, EventId(7));
        assert_eq!(event.time.as_deref(), Some("12:00"));
        assert!(event.description.is_none());
    }

    #[test]
    fn all_day_events_sort_first() {
        let all_day = sample();
        assert!(all_day.is_all_day());
        assert_eq!(all_day.time_display(), "All day");
        assert!(all_day.time_key() < "00:00");
    }

    #[test]
    fn blank_optional_text_is_absent() {
        assert_eq!(optional_text(Some("   ")), None);
        assert_eq!(optional_text(Some(" note ")), Some("note".to_string()));
        assert_eq!(optional_text(None), None);
    }

    #[test]
    fn empty_patch() {
        assert!(EventPatch::default().is_empty());
        assert!(!EventPatch::default().title("x").is_empty());
    }
}
