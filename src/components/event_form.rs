use chrono::NaiveDate;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame,
};

use crate::calendar::event::{CalendarEvent, EventId, EventPatch, NewEvent};
use crate::calendar::identity::format_date;
use crate::theme;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormField {
    Title,
    Date,
    Time,
    Description,
    Notes,
}

impl FormField {
    pub fn next(&self) -> Self {
        match self {
            FormField::Title => FormField::Date,
            FormField::Date => FormField::Time,
            FormField::Time => FormField::Description,
            FormField::Description => FormField::Notes,
            FormField::Notes => FormField::Title,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            FormField::Title => FormField::Notes,
            FormField::Date => FormField::Title,
            FormField::Time => FormField::Date,
            FormField::Description => FormField::Time,
            FormField::Notes => FormField::Description,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FormMode {
    Add,
    Edit(EventId),
}

/// Text typed into the add/edit popup. Everything stays a string until save.
#[derive(Debug, Clone)]
pub struct EventFormState {
    pub mode: FormMode,
    pub title: String,
    pub date: String,
    pub time: String,
    pub description: String,
    pub notes: String,
    pub active_field: FormField,
    pub error: Option<String>,
    original: Option<CalendarEvent>,
}

impl EventFormState {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            mode: FormMode::Add,
            title: String::new(),
            date: format_date(date),
            time: String::new(),
            description: String::new(),
            notes: String::new(),
            active_field: FormField::Title,
            error: None,
            original: None,
        }
    }

    pub fn edit(event: &CalendarEvent) -> Self {
        Self {
            mode: FormMode::Edit(event.id),
            title: event.title.clone(),
            date: format_date(event.date),
            time: event.time.clone().unwrap_or_default(),
            description: event.description.clone().unwrap_or_default(),
            notes: event.notes.clone().unwrap_or_default(),
            active_field: FormField::Title,
            error: None,
            original: Some(event.clone()),
        }
    }

    pub fn heading(&self) -> &'static str {
        match self.mode {
            FormMode::Add => " New Event ",
            FormMode::Edit(_) => " Edit Event ",
        }
    }

    pub fn input_char(&mut self, c: char) {
        self.error = None;
        match self.active_field {
            FormField::Title => self.title.push(c),
            FormField::Date => self.date.push(c),
            FormField::Time => self.time.push(c),
            FormField::Description => self.description.push(c),
            FormField::Notes => self.notes.push(c),
        }
    }

    pub fn backspace(&mut self) {
        self.error = None;
        let field = match self.active_field {
            FormField::Title => &mut self.title,
            FormField::Date => &mut self.date,
            FormField::Time => &mut self.time,
            FormField::Description => &mut self.description,
            FormField::Notes => &mut self.notes,
        };
        field.pop();
    }

    /// Save is offered only once a title has been typed.
    pub fn can_save(&self) -> bool {
        !self.title.trim().is_empty()
    }

    pub fn to_new_event(&self) -> NewEvent {
        NewEvent::new(&self.title, &self.date)
            .with_time(&self.time)
            .with_description(&self.description)
            .with_notes(&self.notes)
    }

    /// Only fields that differ from the event being edited.
    pub fn to_patch(&self) -> EventPatch {
        let Some(original) = self.original.as_ref() else {
            return EventPatch::default()
                .title(&self.title)
                .date(&self.date)
                .time(&self.time)
                .description(&self.description)
                .notes(&self.notes);
        };

        fn changed(typed: &str, stored: Option<&str>) -> Option<String> {
            (typed.trim() != stored.unwrap_or("")).then(|| typed.to_string())
        }

        let stored_date = format_date(original.date);
        EventPatch {
            title: changed(&self.title, Some(original.title.as_str())),
            date: changed(&self.date, Some(stored_date.as_str())),
            time: changed(&self.time, original.time.as_deref()),
            description: changed(&self.description, original.description.as_deref()),
            notes: changed(&self.notes, original.notes.as_deref()),
        }
    }
}

pub struct EventForm;

impl EventForm {
    pub fn render(frame: &mut Frame, area: Rect, state: &EventFormState) {
        // Center the form popup
        let form_w = area.width.min(56).max(30);
        let form_h = area.height.min(13).max(11);
        let x = area.x + (area.width.saturating_sub(form_w)) / 2;
        let y = area.y + (area.height.saturating_sub(form_h)) / 2;
        let form_area = Rect::new(x, y, form_w, form_h);

        // Clear background
        frame.render_widget(Clear, form_area);

        let block = Block::default()
            .title(state.heading())
            .title_style(Style::default().fg(Color::Green).add_modifier(Modifier::BOLD))
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::Green));

        let inner = block.inner(form_area);
        frame.render_widget(block, form_area);

        let rows = Layout::vertical([
            Constraint::Length(1), // title
            Constraint::Length(1), // date
            Constraint::Length(1), // time
            Constraint::Length(1), // description
            Constraint::Length(1), // notes
            Constraint::Length(1), // spacer
            Constraint::Length(1), // error
            Constraint::Length(1), // help
            Constraint::Min(0),
        ])
        .split(inner);

        let active = state.active_field;
        render_field(frame, rows[0], "Title*", &state.title, active == FormField::Title);
        render_field(frame, rows[1], "Date", &state.date, active == FormField::Date);
        render_field(frame, rows[2], "Time", &state.time, active == FormField::Time);
        render_field(frame, rows[3], "Desc", &state.description, active == FormField::Description);
        render_field(frame, rows[4], "Notes", &state.notes, active == FormField::Notes);

        if let Some(ref err) = state.error {
            frame.render_widget(
                Paragraph::new(Span::styled(err.clone(), theme::ERROR_STYLE)),
                rows[6],
            );
        } else if active == FormField::Time && state.time.is_empty() {
            frame.render_widget(
                Paragraph::new(Span::styled("HH:MM, blank for all day", theme::DIM_STYLE)),
                rows[6],
            );
        }

        let save_style = if state.can_save() {
            Style::default().add_modifier(Modifier::BOLD)
        } else {
            theme::DIM_STYLE
        };
        let help = Line::from(vec![
            Span::styled("Tab", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Next ", theme::DIM_STYLE),
            Span::styled("Enter", save_style),
            Span::styled(":Save ", theme::DIM_STYLE),
            Span::styled("Esc", Style::default().add_modifier(Modifier::BOLD)),
            Span::styled(":Cancel", theme::DIM_STYLE),
        ]);
        frame.render_widget(Paragraph::new(help), rows[7]);
    }
}

fn render_field(frame: &mut Frame, area: Rect, label: &str, value: &str, active: bool) {
    let cursor = if active { "_" } else { "" };

    let style = if active {
        Style::default().fg(Color::Cyan)
    } else {
        Style::default()
    };

    let spans = vec![
        Span::styled(format!("{:<8}", label), theme::DIM_STYLE),
        Span::styled(format!("{}{}", value, cursor), style),
    ];

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stored() -> CalendarEvent {
        CalendarEvent {
            id: EventId(5),
            title: "Doctor".to_string(),
            date: NaiveDate::from_ymd_opt(2024, 3, 15).unwrap(),
            time: Some("10:00".to_string()),
            description: None,
            notes: Some("bring card".to_string()),
        }
    }

    #[test]
    fn new_form_prefills_selected_day() {
        let form = EventFormState::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        assert_eq!(form.date, "2024-03-05");
        assert_eq!(form.mode, FormMode::Add);
        assert!(!form.can_save());
    }

    #[test]
    fn untouched_edit_form_is_an_empty_patch() {
        let form = EventFormState::edit(&stored());
        assert!(form.to_patch().is_empty());
    }

    #[test]
    fn edit_patch_carries_only_changes() {
        let mut form = EventFormState::edit(&stored());
        form.active_field = FormField::Time;
        for _ in 0..5 {
            form.backspace();
        }
        form.active_field = FormField::Description;
        for c in "yearly".chars() {
            form.input_char(c);
        }

        let patch = form.to_patch();
        assert_eq!(patch.title, None);
        assert_eq!(patch.date, None);
        assert_eq!(patch.time.as_deref(), Some(""));
        assert_eq!(patch.description.as_deref(), Some("yearly"));
        assert_eq!(patch.notes, None);
    }

    #[test]
    fn add_form_hands_over_every_field() {
        let mut form = EventFormState::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        form.title = "Doctor".to_string();
        form.time = "09:30".to_string();

        let new = form.to_new_event();
        assert_eq!(new.title, "Doctor");
        assert_eq!(new.date, "2024-03-05");
        assert_eq!(new.time.as_deref(), Some("09:30"));
        assert_eq!(new.description.as_deref(), Some(""));
        assert_eq!(new.notes.as_deref(), Some(""));
    }

    #[test]
    fn typing_clears_previous_error() {
        let mut form = EventFormState::new(NaiveDate::from_ymd_opt(2024, 3, 5).unwrap());
        form.error = Some("title: Please enter a title for your event".to_string());
        form.input_char('x');
        assert!(form.error.is_none());
    }

    #[test]
    fn field_cycle_wraps_both_ways() {
        let mut field = FormField::Title;
        for _ in 0..5 {
            field = field.next();
        }
        assert_eq!(field, FormField::Title);
        assert_eq!(FormField::Title.prev(), FormField::Notes);
    }
}
