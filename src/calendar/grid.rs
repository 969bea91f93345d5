//! Month grid generation.
//!
//! Weeks always start on Sunday, independent of locale, so the grid for a
//! given month is the same on every render.

use std::fmt;

use chrono::{Datelike, Days, Months, NaiveDate, Weekday};

use super::event::CalendarEvent;
use super::filters::counts_by_date;

pub const WEEK_START: Weekday = Weekday::Sun;

/// A displayed month, held as its first day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthRef(NaiveDate);

impl MonthRef {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, 1).map(MonthRef)
    }

    pub fn of(date: NaiveDate) -> Self {
        MonthRef::new(date.year(), date.month()).unwrap_or(MonthRef(date))
    }

    pub fn year(&self) -> i32 {
        self.0.year()
    }

    pub fn month(&self) -> u32 {
        self.0.month()
    }

    pub fn first_day(&self) -> NaiveDate {
        self.0
    }

    pub fn last_day(&self) -> NaiveDate {
        let mut day = self.0;
        while let Some(next) = day.succ_opt() {
            if next.month() != day.month() {
                break;
            }
            day = next;
        }
        day
    }

    pub fn days_in_month(&self) -> u32 {
        self.last_day().day()
    }

    pub fn succ(&self) -> Self {
        self.0
            .checked_add_months(Months::new(1))
            .map(MonthRef)
            .unwrap_or(*self)
    }

    pub fn pred(&self) -> Self {
        self.0
            .checked_sub_months(Months::new(1))
            .map(MonthRef)
            .unwrap_or(*self)
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year() && date.month() == self.month()
    }

    /// The same day-of-month in this month, clamped to its length.
    pub fn clamp_day(&self, day: u32) -> NaiveDate {
        let day = day.clamp(1, self.days_in_month());
        self.0.with_day(day).unwrap_or(self.0)
    }
}

impl fmt::Display for MonthRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%B %Y"))
    }
}

/// One day slot in the month grid. Derived on every render, never stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CalendarCell {
    pub date: NaiveDate,
    pub is_current_month: bool,
    pub is_today: bool,
    pub event_count: usize,
}

/// The `WEEK_START` day on or before `date`.
pub fn week_start_of(date: NaiveDate) -> NaiveDate {
    let back = (date.weekday().num_days_from_monday() + 7
        - WEEK_START.num_days_from_monday())
        % 7;
    date.checked_sub_days(Days::new(u64::from(back)))
        .unwrap_or(date)
}

/// Last day of the week containing `date`.
pub fn week_end_of(date: NaiveDate) -> NaiveDate {
    week_start_of(date)
        .checked_add_days(Days::new(6))
        .unwrap_or(date)
}

/// The seven days of the week containing `date`.
pub fn week_of(date: NaiveDate) -> Vec<NaiveDate> {
    week_start_of(date).iter_days().take(7).collect()
}

/// Cells from the Sunday before the 1st through the Saturday after the last
/// day, so the length is always a whole number of weeks.
pub fn generate_grid(month: MonthRef, today: NaiveDate) -> Vec<CalendarCell> {
    let start = week_start_of(month.first_day());
    let end = week_end_of(month.last_day());

    start
        .iter_days()
        .take_while(|d| *d <= end)
        .map(|date| CalendarCell {
            date,
            is_current_month: month.contains(date),
            is_today: date == today,
            event_count: 0,
        })
        .collect()
}

/// Fill in per-day event counts.
pub fn annotate(cells: &mut [CalendarCell], events: &[CalendarEvent]) {
    let counts = counts_by_date(events);
    for cell in cells.iter_mut() {
        cell.event_count = counts.get(&cell.date).copied().unwrap_or(0);
    }
}

pub fn month_grid(month: MonthRef, today: NaiveDate, events: &[CalendarEvent]) -> Vec<CalendarCell> {
    let mut cells = generate_grid(month, today);
    annotate(&mut cells, events);
    cells
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::event::EventId;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn event(id: u64, date: NaiveDate) -> CalendarEvent {
        CalendarEvent {
            id: EventId(id),
            title: format!("event {id}"),
            date,
            time: None,
            description: None,
            notes: None,
        }
    }

    fn assert_grid_shape(month: MonthRef) {
        let cells = generate_grid(month, day(2000, 1, 1));

        assert_eq!(cells.len() % 7, 0, "{month}");
        assert_eq!(cells[0].date.weekday(), WEEK_START, "{month}");
        assert_eq!(cells[cells.len() - 1].date.weekday(), Weekday::Sat, "{month}");

        for d in 1..=month.days_in_month() {
            let date = month.clamp_day(d);
            let hits = cells.iter().filter(|c| c.date == date).count();
            assert_eq!(hits, 1, "{date} in {month}");
        }

        let in_month = cells.iter().filter(|c| c.is_current_month).count();
        assert_eq!(in_month as u32, month.days_in_month());
        assert!(cells.windows(2).all(|w| w[0].date.succ_opt() == Some(w[1].date)));
    }

    #[test]
    fn grid_shape_holds_for_every_month_of_several_years() {
        for year in [2015, 2023, 2024, 2100] {
            for m in 1..=12 {
                assert_grid_shape(MonthRef::new(year, m).unwrap());
            }
        }
    }

    #[test]
    fn february_starting_on_sunday_is_four_weeks() {
        // 2015-02-01 is a Sunday and the month has 28 days.
        let cells = generate_grid(MonthRef::new(2015, 2).unwrap(), day(2015, 2, 10));
        assert_eq!(cells.len(), 28);
        assert!(cells.iter().all(|c| c.is_current_month));
    }

    #[test]
    fn month_starting_on_saturday_is_padded() {
        // 2024-06-01 is a Saturday.
        let cells = generate_grid(MonthRef::new(2024, 6).unwrap(), day(2024, 6, 1));
        assert_eq!(cells.len(), 42);
        assert_eq!(cells[0].date, day(2024, 5, 26));
        assert!(!cells[0].is_current_month);
        assert_eq!(cells[6].date, day(2024, 6, 1));
        assert_eq!(cells.last().unwrap().date, day(2024, 7, 6));
    }

    #[test]
    fn marks_today_once() {
        let cells = generate_grid(MonthRef::new(2024, 3).unwrap(), day(2024, 3, 15));
        let today: Vec<_> = cells.iter().filter(|c| c.is_today).collect();
        assert_eq!(today.len(), 1);
        assert_eq!(today[0].date, day(2024, 3, 15));
    }

    #[test]
    fn counts_events_per_cell_including_overflow_days() {
        let events = vec![
            event(1, day(2024, 3, 15)),
            event(2, day(2024, 3, 15)),
            event(3, day(2024, 2, 26)),
            event(4, day(2023, 3, 15)),
        ];
        let cells = month_grid(MonthRef::new(2024, 3).unwrap(), day(2024, 3, 1), &events);

        let count = |date: NaiveDate| cells.iter().find(|c| c.date == date).unwrap().event_count;
        assert_eq!(count(day(2024, 3, 15)), 2);
        assert_eq!(count(day(2024, 2, 26)), 1);
        assert_eq!(count(day(2024, 3, 16)), 0);
        assert_eq!(cells.iter().map(|c| c.event_count).sum::<usize>(), 3);
    }

    #[test]
    fn month_navigation_wraps_years() {
        let dec = MonthRef::new(2024, 12).unwrap();
        assert_eq!(dec.succ(), MonthRef::new(2025, 1).unwrap());
        assert_eq!(MonthRef::new(2025, 1).unwrap().pred(), dec);
        assert_eq!(dec.to_string(), "December 2024");
        assert_eq!(MonthRef::of(day(2024, 2, 29)).last_day(), day(2024, 2, 29));
        assert_eq!(MonthRef::new(2023, 2).unwrap().clamp_day(31), day(2023, 2, 28));
    }

    #[test]
    fn week_of_runs_sunday_to_saturday() {
        let week = week_of(day(2024, 3, 13));
        assert_eq!(week.len(), 7);
        assert_eq!(week[0], day(2024, 3, 10));
        assert_eq!(week[6], day(2024, 3, 16));
        assert_eq!(week_start_of(day(2024, 3, 10)), day(2024, 3, 10));
        assert_eq!(week_end_of(day(2024, 3, 16)), day(2024, 3, 16));
    }

    #[test]
    fn every_weekday_maps_back_to_week_start() {
        for date in day(2024, 3, 1).iter_days().take(14) {
            let start = week_start_of(date);
            assert_eq!(start.weekday(), WEEK_START, "{date}");
            assert!(start <= date && (date - start).num_days() < 7, "{date}");
        }
    }

    #[test]
    fn month_of_any_day_is_its_first() {
        assert_eq!(MonthRef::of(day(2024, 3, 31)).first_day(), day(2024, 3, 1));
        assert_eq!(MonthRef::of(day(2024, 3, 1)), MonthRef::new(2024, 3).unwrap());
    }
}
