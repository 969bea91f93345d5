use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

use crate::calendar::CalendarEvent;
use crate::theme;

pub struct SearchView;

impl SearchView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        term: &str,
        results: &[CalendarEvent],
        cursor: usize,
        editing: bool,
    ) {
        let layout = Layout::vertical([Constraint::Length(3), Constraint::Min(1)]).split(area);

        let input_block = Block::default()
            .title(" Search ")
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(if editing {
                theme::FOCUS_BORDER_STYLE
            } else {
                theme::BORDER_STYLE
            });
        let caret = if editing { "_" } else { "" };
        frame.render_widget(
            Paragraph::new(format!("{}{}", term, caret)).block(input_block),
            layout[0],
        );

        // Nothing to show until something is typed
        if term.trim().is_empty() {
            return;
        }

        let w = layout[1].width as usize;
        let title = if w >= 25 {
            format!(" Results ({}) ", results.len())
        } else {
            " Results ".to_string()
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::HEADER_STYLE)
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);

        if results.is_empty() {
            let inner = block.inner(layout[1]);
            frame.render_widget(block, layout[1]);
            frame.render_widget(Paragraph::new("No matching events").style(theme::DIM_STYLE), inner);
            return;
        }

        let inner_w = layout[1].width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = results
            .iter()
            .enumerate()
            .map(|(i, ev)| {
                let is_selected = i == cursor && !editing;
                let date = format!(" {} {:<8}", ev.date.format("%Y-%m-%d"), ev.time_display());
                let room = inner_w.saturating_sub(date.chars().count() + 1);
                ListItem::new(Line::from(vec![
                    Span::styled(date, theme::DIM_STYLE),
                    Span::styled(
                        truncate(&ev.title, room),
                        if is_selected {
                            theme::SELECTED_STYLE
                        } else {
                            Style::default()
                        },
                    ),
                ]))
            })
            .collect();

        let visible_rows = layout[1].height.saturating_sub(2) as usize;
        let skip = (cursor + 1).saturating_sub(visible_rows.max(1));
        let visible_items: Vec<ListItem> = items.into_iter().skip(skip).collect();

        frame.render_widget(List::new(visible_items).block(block), layout[1]);
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else if max > 3 {
        let head: String = s.chars().take(max - 3).collect();
        format!("{}...", head)
    } else {
        s.chars().take(max).collect()
    }
}
