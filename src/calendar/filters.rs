//! Derived views over the event list. Recomputed on every render.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};

use super::event::CalendarEvent;
use super::grid::{week_end_of, week_start_of, MonthRef};

/// Day agenda order: by time string, all-day events first. Stable for ties.
pub fn sort_agenda(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| a.time_key().cmp(b.time_key()));
}

/// Chronological order across days.
pub fn sort_chronological(events: &mut [CalendarEvent]) {
    events.sort_by(|a, b| (a.date, a.time_key()).cmp(&(b.date, b.time_key())));
}

pub fn events_on(events: &[CalendarEvent], date: NaiveDate) -> Vec<CalendarEvent> {
    let mut day: Vec<CalendarEvent> = events.iter().filter(|e| e.date == date).cloned().collect();
    sort_agenda(&mut day);
    day
}

pub fn events_today(events: &[CalendarEvent]) -> Vec<CalendarEvent> {
    events_on(events, Local::now().date_naive())
}

pub fn events_in_month(events: &[CalendarEvent], month: MonthRef) -> Vec<CalendarEvent> {
    let mut found: Vec<CalendarEvent> = events
        .iter()
        .filter(|e| month.contains(e.date))
        .cloned()
        .collect();
    sort_chronological(&mut found);
    found
}

/// Events in the Sunday-to-Saturday week containing `date`.
pub fn events_in_week(events: &[CalendarEvent], date: NaiveDate) -> Vec<CalendarEvent> {
    let start = week_start_of(date);
    let end = week_end_of(date);
    let mut found: Vec<CalendarEvent> = events
        .iter()
        .filter(|e| e.date >= start && e.date <= end)
        .cloned()
        .collect();
    sort_chronological(&mut found);
    found
}

/// Case-insensitive title substring search on the term as typed.
/// A blank or whitespace-only term matches nothing.
pub fn search(events: &[CalendarEvent], term: &str) -> Vec<CalendarEvent> {
    if term.trim().is_empty() {
        return Vec::new();
    }
    let needle = term.to_lowercase();

    let mut found: Vec<CalendarEvent> = events
        .iter()
        .filter(|e| e.title.to_lowercase().contains(&needle))
        .cloned()
        .collect();
    sort_chronological(&mut found);
    found
}

pub fn counts_by_date(events: &[CalendarEvent]) -> HashMap<NaiveDate, usize> {
    let mut counts = HashMap::new();
    for event in events {
        *counts.entry(event.date).or_insert(0) += 1;
    }
    counts
}
