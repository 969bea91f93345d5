use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem},
    Frame,
};

use crate::calendar::grid::week_of;
use crate::calendar::CalendarEvent;
use crate::theme;

pub struct WeekView;

impl WeekView {
    /// Seven day sections, Sunday first. `events` must already be limited
    /// to this week and in chronological order.
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        selected_date: NaiveDate,
        today: NaiveDate,
        events: &[CalendarEvent],
        cursor: usize,
    ) {
        let days = week_of(selected_date);
        let title = match days.first() {
            Some(start) => format!(" Week of {} ", start.format("%b %-d, %Y")),
            None => " Week ".to_string(),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);

        let mut items: Vec<ListItem> = Vec::new();
        let mut cursor_row = 0;
        let mut index = 0;

        for date in days {
            let label = format!("{}", date.format("%a %b %-d"));
            let style = theme::day_style(date == selected_date, date == today, true);
            let header_style = if style == Style::new() {
                theme::SECTION_STYLE
            } else {
                style
            };
            items.push(ListItem::new(Line::from(Span::styled(label, header_style))));

            let mut any = false;
            for ev in events.iter().filter(|e| e.date == date) {
                if index == cursor {
                    cursor_row = items.len();
                }
                let selected = index == cursor;
                let row_style = if selected {
                    theme::SELECTED_STYLE
                } else {
                    Style::default()
                };
                items.push(ListItem::new(Line::from(vec![
                    Span::styled(format!("  {:<8}", ev.time_display()), theme::DIM_STYLE),
                    Span::styled(ev.title.clone(), row_style),
                ])));
                index += 1;
                any = true;
            }
            if !any {
                items.push(ListItem::new(Line::from(Span::styled("  -", theme::DIM_STYLE))));
            }
        }

        let visible_rows = area.height.saturating_sub(2) as usize;
        let skip = (cursor_row + 1).saturating_sub(visible_rows.max(1));
        let visible_items: Vec<ListItem> = items.into_iter().skip(skip).collect();

        frame.render_widget(List::new(visible_items).block(block), area);
    }
}
