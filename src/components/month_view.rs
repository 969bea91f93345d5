use chrono::{Datelike, NaiveDate};
use ratatui::{
    layout::{Constraint, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::calendar::grid::{CalendarCell, MonthRef};
use crate::theme;

const DAY_NAMES: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

pub struct MonthView;

impl MonthView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        month: MonthRef,
        cells: &[CalendarCell],
        selected_date: NaiveDate,
        month_event_count: usize,
    ) {
        let count_str = match month_event_count {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(format!(" {} ", month))
            .title_style(theme::HEADER_STYLE)
            .title_bottom(Line::from(Span::styled(count_str, theme::DIM_STYLE)))
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);

        let inner = block.inner(area);
        frame.render_widget(block, area);

        // Header row
        let header_cells: Vec<Span> = DAY_NAMES
            .iter()
            .map(|d| Span::styled(format!("{:^5}", d), theme::HEADER_STYLE))
            .collect();
        let header = Line::from(header_cells);

        let weeks: Vec<Line> = cells
            .chunks(7)
            .map(|week| {
                Line::from(
                    week.iter()
                        .flat_map(|c| cell_spans(c, selected_date))
                        .collect::<Vec<_>>(),
                )
            })
            .collect();

        // Layout: header + weeks
        let mut constraints = vec![Constraint::Length(1)];
        for _ in &weeks {
            constraints.push(Constraint::Length(1));
        }
        constraints.push(Constraint::Min(0));

        let rows = Layout::vertical(constraints).split(inner);

        frame.render_widget(Paragraph::new(header), rows[0]);
        for (i, week) in weeks.into_iter().enumerate() {
            frame.render_widget(Paragraph::new(week), rows[i + 1]);
        }
    }
}

fn cell_spans(cell: &CalendarCell, selected_date: NaiveDate) -> [Span<'static>; 2] {
    let style = theme::day_style(
        cell.date == selected_date,
        cell.is_today,
        cell.is_current_month,
    );
    // Highlighted cells keep one background across the whole cell
    let mark_style = if style == theme::day_style(false, false, true) {
        theme::EVENT_MARK_STYLE
    } else {
        style
    };
    [
        Span::styled(format!(" {:>2}", cell.date.day()), style),
        Span::styled(count_marker(cell.event_count), mark_style),
    ]
}

/// Two columns after the day number: blank, `•N`, or `•+` past nine.
fn count_marker(count: usize) -> String {
    match count {
        0 => "  ".to_string(),
        1..=9 => format!("\u{2022}{}", count),
        _ => "\u{2022}+".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn markers_stay_two_columns_wide() {
        for n in [0, 1, 9, 10, 250] {
            assert_eq!(count_marker(n).chars().count(), 2, "count {n}");
        }
        assert_eq!(count_marker(3), "\u{2022}3");
    }
}
