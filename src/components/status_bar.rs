use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::app::{InputMode, ViewMode};
use crate::theme;

pub struct StatusBar;

impl StatusBar {
    pub fn render(
        frame: &mut Frame,
        area: Rect,
        mode: ViewMode,
        input: InputMode,
        today_count: usize,
        notice: Option<&str>,
    ) {
        let w = area.width as usize;

        let mode_str = match mode {
            ViewMode::Month => "[1]Month",
            ViewMode::Week => "[2]Week",
            ViewMode::Day => "[3]Day",
            ViewMode::Search => "[/]Search",
        };

        let focus_indicator = match input {
            InputMode::Form => " [Editing]",
            InputMode::ConfirmDelete => " [Delete?]",
            InputMode::Search => " [Typing]",
            InputMode::Normal => "",
        };

        let today_str = match today_count {
            0 => String::new(),
            1 => " 1 today".to_string(),
            n => format!(" {} today", n),
        };

        // Show the notice if present, otherwise context-aware hints
        let right_text = if let Some(msg) = notice {
            format!(" {} ", msg)
        } else {
            hints(mode, w).to_string()
        };

        let left = format!(" {}{}{} ", mode_str, focus_indicator, today_str);
        let padding = " ".repeat(w.saturating_sub(left.chars().count() + right_text.chars().count()));

        let line = Line::from(vec![
            Span::styled(left, theme::STATUS_STYLE),
            Span::styled(padding, theme::STATUS_STYLE),
            Span::styled(right_text, theme::STATUS_STYLE),
        ]);

        frame.render_widget(Paragraph::new(line).style(theme::STATUS_STYLE), area);
    }
}

fn hints(mode: ViewMode, w: usize) -> &'static str {
    match mode {
        ViewMode::Day | ViewMode::Month if w >= 80 => {
            " hl:Day jk:Select [/]:Mon t:Today Enter:Detail n:New e:Edit d:Del ?:Help q:Quit "
        }
        ViewMode::Day | ViewMode::Month if w >= 50 => " jk:Select Enter:Detail n:New q:Quit ",
        ViewMode::Week if w >= 70 => " hl:Week jk:Select t:Today n:New ?:Help q:Quit ",
        ViewMode::Search if w >= 60 => " type to search  Enter:Results  Esc:Back ",
        _ => " ?:Help q:Quit ",
    }
}
