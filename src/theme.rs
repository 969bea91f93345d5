use ratatui::style::{Color, Modifier, Style};

pub const HEADER_STYLE: Style = Style::new()
    .fg(Color::White)
    .add_modifier(Modifier::BOLD);
pub const DIM_STYLE: Style = Style::new().fg(Color::DarkGray);
pub const BORDER_STYLE: Style = Style::new().fg(Color::Gray);
pub const FOCUS_BORDER_STYLE: Style = Style::new().fg(Color::Cyan);
pub const STATUS_STYLE: Style = Style::new().fg(Color::White).bg(Color::DarkGray);
pub const SELECTED_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Cyan);
pub const TODAY_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);
pub const TODAY_SELECTED_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::Yellow)
    .add_modifier(Modifier::BOLD);
pub const EVENT_MARK_STYLE: Style = Style::new().fg(Color::Green);
pub const ERROR_STYLE: Style = Style::new().fg(Color::Red);
pub const SECTION_STYLE: Style = Style::new().add_modifier(Modifier::BOLD.union(Modifier::UNDERLINED));

/// Style for a day number: selection wins over today, today over overflow dimming.
pub fn day_style(is_selected: bool, is_today: bool, in_month: bool) -> Style {
    match (is_selected, is_today) {
        (true, true) => TODAY_SELECTED_STYLE,
        (true, false) => SELECTED_STYLE,
        (false, true) => TODAY_STYLE,
        _ if !in_month => DIM_STYLE,
        _ => Style::new(),
    }
}
