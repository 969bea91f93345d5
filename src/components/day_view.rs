use chrono::NaiveDate;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap},
    Frame,
};

use crate::app::Detail;
use crate::calendar::CalendarEvent;
use crate::theme;

pub struct DayView;

impl DayView {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        date: NaiveDate,
        events: &[CalendarEvent],
        cursor: usize,
    ) {
        let w = area.width as usize;

        let title = if w >= 30 {
            format!(" {} ", date.format("%A, %B %-d, %Y"))
        } else if w >= 18 {
            format!(" {} ", date.format("%b %d, %Y"))
        } else {
            format!(" {} ", date.format("%m/%d"))
        };

        let count_str = match events.len() {
            0 => String::new(),
            1 => " 1 event ".to_string(),
            n => format!(" {} events ", n),
        };

        let block = Block::default()
            .title(title)
            .title_style(theme::HEADER_STYLE)
            .title_bottom(Line::from(Span::styled(count_str, theme::DIM_STYLE)))
            .borders(Borders::ALL)
            .border_style(theme::BORDER_STYLE);

        if events.is_empty() {
            let inner = block.inner(area);
            frame.render_widget(block, area);
            let msg = Paragraph::new("No events scheduled\n\nPress n to add one")
                .style(theme::DIM_STYLE);
            frame.render_widget(msg, inner);
            return;
        }

        let inner_w = area.width.saturating_sub(2) as usize;

        let items: Vec<ListItem> = events
            .iter()
            .enumerate()
            .map(|(i, ev)| format_event(ev, inner_w, i == cursor))
            .collect();

        // Keep the cursor row on screen
        let visible_rows = area.height.saturating_sub(2) as usize;
        let skip = (cursor + 1).saturating_sub(visible_rows.max(1));
        let visible_items: Vec<ListItem> = items.into_iter().skip(skip).collect();

        let list = List::new(visible_items).block(block);
        frame.render_widget(list, area);
    }
}

fn format_event(ev: &CalendarEvent, max_width: usize, selected: bool) -> ListItem<'static> {
    let time_str = format!(" {:<8}", ev.time_display());
    let time_style = if selected {
        theme::SELECTED_STYLE
    } else if ev.is_all_day() {
        theme::EVENT_MARK_STYLE
    } else {
        Style::default().add_modifier(Modifier::DIM)
    };
    let title_style = if selected {
        theme::SELECTED_STYLE
    } else {
        Style::default()
    };

    let mut spans = vec![
        Span::styled(time_str.clone(), time_style),
        Span::styled(ev.title.clone(), title_style),
    ];

    // Only show description if there's room
    let used = time_str.len() + ev.title.len();
    if let Some(ref desc) = ev.description {
        let first_line = desc.lines().next().unwrap_or_default();
        if used + 3 + first_line.len() <= max_width {
            spans.push(Span::styled(format!(" - {}", first_line), theme::DIM_STYLE));
        }
    }

    ListItem::new(Line::from(spans))
}

fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let w = area.width.min(width);
    let h = area.height.min(height);
    let x = area.x + (area.width.saturating_sub(w)) / 2;
    let y = area.y + (area.height.saturating_sub(h)) / 2;
    Rect::new(x, y, w, h)
}

/// Render the event detail popup overlay.
pub fn render_detail_popup(frame: &mut Frame, area: Rect, detail: &Detail) {
    let popup_area = centered(area, 60.max(area.width / 2), 16);
    frame.render_widget(Clear, popup_area);

    match detail {
        Detail::Found(ev) => render_event_detail(frame, popup_area, ev),
        Detail::Missing(id) => {
            let block = Block::default()
                .title(" Not found ")
                .title_style(theme::ERROR_STYLE.add_modifier(Modifier::BOLD))
                .borders(Borders::ALL)
                .border_style(theme::ERROR_STYLE);
            let inner = block.inner(popup_area);
            frame.render_widget(block, popup_area);
            let lines = vec![
                Line::from(format!("Event {} no longer exists.", id)),
                Line::from(""),
                Line::from(Span::styled("Press Esc to go back", theme::DIM_STYLE)),
            ];
            frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
        }
    }
}

fn render_event_detail(frame: &mut Frame, area: Rect, ev: &CalendarEvent) {
    let block = Block::default()
        .title(format!(" {} ", ev.title))
        .title_style(Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();

    lines.push(Line::from(vec![
        Span::styled("Date: ", theme::DIM_STYLE),
        Span::raw(ev.date.format("%A, %B %-d, %Y").to_string()),
    ]));
    lines.push(Line::from(vec![
        Span::styled("Time: ", theme::DIM_STYLE),
        Span::raw(ev.time_display().to_string()),
    ]));

    if let Some(ref desc) = ev.description {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Description:", theme::DIM_STYLE)));
        for line in desc.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    if let Some(ref notes) = ev.notes {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled("Notes:", theme::DIM_STYLE)));
        for line in notes.lines() {
            lines.push(Line::from(line.to_string()));
        }
    }

    // Footer hint
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "e:Edit  d:Delete  Esc:Close",
        theme::DIM_STYLE,
    )));

    let para = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(para, inner);
}

/// Delete confirmation dialog.
pub fn render_confirm_delete(frame: &mut Frame, area: Rect, title: &str) {
    let popup_area = centered(area, 44, 7);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Delete Event ")
        .title_style(theme::ERROR_STYLE.add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(theme::ERROR_STYLE);
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = vec![
        Line::from("Are you sure you want to delete"),
        Line::from(Span::styled(
            format!("\"{}\"?", title),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("y", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Delete  ", theme::DIM_STYLE),
            Span::styled("n/Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::DIM_STYLE),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
