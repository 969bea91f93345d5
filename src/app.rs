use std::sync::Arc;

use chrono::{Datelike, Local, NaiveDate};

use crate::calendar::filters::{events_in_month, events_in_week, events_on, events_today, search};
use crate::calendar::grid::{month_grid, CalendarCell, MonthRef};
use crate::calendar::{CalendarError, CalendarEvent, EventGateway, EventId, Repository};
use crate::components::event_form::{EventFormState, FormMode};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ViewMode {
    Month,
    Week,
    Day,
    Search,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    Normal,
    Form,
    Search,
    ConfirmDelete,
}

/// Contents of the detail popup.
#[derive(Debug, Clone, PartialEq)]
pub enum Detail {
    Found(CalendarEvent),
    Missing(EventId),
}

pub struct App<G> {
    pub running: bool,
    pub view_mode: ViewMode,
    pub input_mode: InputMode,
    pub selected_date: NaiveDate,
    pub today: NaiveDate,
    pub events: Vec<CalendarEvent>,
    pub grid: Vec<CalendarCell>,
    pub month_event_count: usize,
    pub day_events: Vec<CalendarEvent>,
    pub week_events: Vec<CalendarEvent>,
    pub today_events: Vec<CalendarEvent>,
    pub search_term: String,
    pub search_results: Vec<CalendarEvent>,
    pub cursor: usize,
    pub form_state: Option<EventFormState>,
    pub detail: Option<Detail>,
    pub pending_delete: Option<EventId>,
    pub status_message: Option<String>,
    pub show_help: bool,
    repo: Arc<Repository<G>>,
}

impl<G: EventGateway> App<G> {
    pub fn new(repo: Arc<Repository<G>>) -> Self {
        let today = Local::now().date_naive();
        let mut app = Self {
            running: true,
            view_mode: ViewMode::Month,
            input_mode: InputMode::Normal,
            selected_date: today,
            today,
            events: Vec::new(),
            grid: Vec::new(),
            month_event_count: 0,
            day_events: Vec::new(),
            week_events: Vec::new(),
            today_events: Vec::new(),
            search_term: String::new(),
            search_results: Vec::new(),
            cursor: 0,
            form_state: None,
            detail: None,
            pending_delete: None,
            status_message: None,
            show_help: false,
            repo,
        };
        app.recompute();
        app
    }

    pub fn month(&self) -> MonthRef {
        MonthRef::of(self.selected_date)
    }

    /// Re-read the collection and rebuild every derived view.
    pub async fn refresh(&mut self) {
        self.today = Local::now().date_naive();
        self.events = self.repo.load_all().await;
        self.recompute();
    }

    /// Rebuild from the list the repository last wrote, without reloading.
    async fn sync_committed(&mut self) {
        self.events = self.repo.snapshot().await;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.grid = month_grid(self.month(), self.today, &self.events);
        self.month_event_count = events_in_month(&self.events, self.month()).len();
        self.day_events = events_on(&self.events, self.selected_date);
        self.week_events = events_in_week(&self.events, self.selected_date);
        self.today_events = events_today(&self.events);
        self.search_results = search(&self.events, &self.search_term);

        let len = self.visible_events().len();
        if self.cursor >= len {
            self.cursor = len.saturating_sub(1);
        }
    }

    /// The list the cursor moves over in the current view.
    pub fn visible_events(&self) -> &[CalendarEvent] {
        match self.view_mode {
            ViewMode::Month | ViewMode::Day => &self.day_events,
            ViewMode::Week => &self.week_events,
            ViewMode::Search => &self.search_results,
        }
    }

    pub fn selected_event(&self) -> Option<&CalendarEvent> {
        self.visible_events().get(self.cursor)
    }

    /// Switching screens re-reads storage so no view shows a stale list.
    pub async fn set_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
        self.cursor = 0;
        self.input_mode = if mode == ViewMode::Search {
            InputMode::Search
        } else {
            InputMode::Normal
        };
        self.refresh().await;
    }

    fn select_date(&mut self, date: NaiveDate) {
        if date != self.selected_date {
            self.selected_date = date;
            self.cursor = 0;
        }
        self.recompute();
    }

    pub fn next_day(&mut self) {
        self.select_date(self.selected_date.succ_opt().unwrap_or(self.selected_date));
    }

    pub fn prev_day(&mut self) {
        self.select_date(self.selected_date.pred_opt().unwrap_or(self.selected_date));
    }

    pub fn next_week(&mut self) {
        self.select_date(self.selected_date + chrono::Duration::weeks(1));
    }

    pub fn prev_week(&mut self) {
        self.select_date(self.selected_date - chrono::Duration::weeks(1));
    }

    pub fn next_month(&mut self) {
        let day = self.selected_date.day();
        self.select_date(self.month().succ().clamp_day(day));
    }

    pub fn prev_month(&mut self) {
        let day = self.selected_date.day();
        self.select_date(self.month().pred().clamp_day(day));
    }

    pub fn go_to_today(&mut self) {
        self.today = Local::now().date_naive();
        self.select_date(self.today);
    }

    pub fn cursor_down(&mut self) {
        if self.cursor + 1 < self.visible_events().len() {
            self.cursor += 1;
        }
    }

    pub fn cursor_up(&mut self) {
        self.cursor = self.cursor.saturating_sub(1);
    }

    // ── Add / edit ──

    pub fn open_add_form(&mut self) {
        self.form_state = Some(EventFormState::new(self.selected_date));
        self.input_mode = InputMode::Form;
    }

    pub fn open_edit_form(&mut self) {
        let Some(event) = self.selected_event().cloned() else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        self.form_state = Some(EventFormState::edit(&event));
        self.input_mode = InputMode::Form;
    }

    pub fn close_form(&mut self) {
        self.form_state = None;
        self.input_mode = self.idle_input_mode();
    }

    pub fn form_tab(&mut self) {
        if let Some(form) = self.form_state.as_mut() {
            form.active_field = form.active_field.next();
        }
    }

    pub fn form_backtab(&mut self) {
        if let Some(form) = self.form_state.as_mut() {
            form.active_field = form.active_field.prev();
        }
    }

    pub fn form_input_char(&mut self, c: char) {
        if let Some(form) = self.form_state.as_mut() {
            form.input_char(c);
        }
    }

    pub fn form_backspace(&mut self) {
        if let Some(form) = self.form_state.as_mut() {
            form.backspace();
        }
    }

    /// Save the open form. Validation errors keep the form open with the
    /// message inline; storage errors keep it open and raise a notice.
    pub async fn submit_form(&mut self) {
        let Some(form) = self.form_state.as_ref() else {
            return;
        };

        let (mode, new_event, patch) = (form.mode, form.to_new_event(), form.to_patch());

        let result = match mode {
            FormMode::Add => self.repo.create(new_event).await,
            FormMode::Edit(id) => {
                if patch.is_empty() {
                    self.close_form();
                    return;
                }
                self.repo.update(id, patch).await
            }
        };

        match result {
            Ok(event) => {
                self.close_form();
                self.status_message = Some(format!("Saved \"{}\"", event.title));
                self.sync_committed().await;
                self.select_date(event.date);
                if let Some(pos) = self.visible_events().iter().position(|e| e.id == event.id) {
                    self.cursor = pos;
                }
            }
            Err(e @ CalendarError::Validation { .. }) => {
                if let Some(form) = self.form_state.as_mut() {
                    form.error = Some(e.to_string());
                }
            }
            Err(CalendarError::NotFound(_)) => {
                self.close_form();
                self.status_message = Some("Event no longer exists".to_string());
                self.refresh().await;
            }
            Err(CalendarError::Storage(_)) => {
                self.status_message = Some("Failed to save event".to_string());
            }
        }
    }

    // ── Detail ──

    pub async fn show_detail(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id) else {
            return;
        };
        self.open_detail(id).await;
    }

    pub async fn open_detail(&mut self, id: EventId) {
        match self.repo.find(id).await {
            Ok(event) => self.detail = Some(Detail::Found(event)),
            Err(CalendarError::NotFound(_)) => self.detail = Some(Detail::Missing(id)),
            Err(_) => self.status_message = Some("Failed to load event".to_string()),
        }
    }

    pub fn close_detail(&mut self) {
        self.detail = None;
    }

    pub fn edit_from_detail(&mut self) {
        if let Some(Detail::Found(event)) = self.detail.take() {
            self.form_state = Some(EventFormState::edit(&event));
            self.input_mode = InputMode::Form;
        }
    }

    pub fn delete_from_detail(&mut self) {
        if let Some(Detail::Found(event)) = &self.detail {
            self.pending_delete = Some(event.id);
            self.input_mode = InputMode::ConfirmDelete;
        }
    }

    /// Title of the event awaiting delete confirmation.
    pub fn pending_delete_title(&self) -> Option<&str> {
        let id = self.pending_delete?;
        self.events
            .iter()
            .find(|e| e.id == id)
            .map(|e| e.title.as_str())
    }

    // ── Delete ──

    pub fn request_delete(&mut self) {
        let Some(id) = self.selected_event().map(|e| e.id) else {
            self.status_message = Some("No event selected".to_string());
            return;
        };
        self.pending_delete = Some(id);
        self.input_mode = InputMode::ConfirmDelete;
    }

    pub fn cancel_delete(&mut self) {
        self.pending_delete = None;
        self.input_mode = self.idle_input_mode();
    }

    pub async fn confirm_delete(&mut self) {
        let Some(id) = self.pending_delete.take() else {
            return;
        };
        self.input_mode = self.idle_input_mode();

        match self.repo.delete(id).await {
            Ok(()) => {
                self.status_message = Some("Event deleted".to_string());
                if matches!(&self.detail, Some(Detail::Found(e)) if e.id == id) {
                    self.detail = None;
                }
                self.sync_committed().await;
            }
            Err(_) => {
                self.status_message = Some("Failed to delete event".to_string());
                self.refresh().await;
            }
        }
    }

    // ── Search ──

    pub fn search_input_char(&mut self, c: char) {
        self.search_term.push(c);
        self.cursor = 0;
        self.recompute();
    }

    pub fn search_backspace(&mut self) {
        self.search_term.pop();
        self.cursor = 0;
        self.recompute();
    }

    /// Leave the search box but stay on the results list.
    pub fn search_done(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    fn idle_input_mode(&self) -> InputMode {
        if self.view_mode == ViewMode::Search && self.search_term.is_empty() {
            InputMode::Search
        } else {
            InputMode::Normal
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::calendar::gateway::MemoryGateway;
    use crate::calendar::event::NewEvent;
    use crate::components::event_form::FormField;

    fn day(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    async fn app_on(date: NaiveDate) -> App<MemoryGateway> {
        let repo = Arc::new(Repository::new(MemoryGateway::new()));
        let mut app = App::new(repo);
        app.refresh().await;
        app.select_date(date);
        app
    }

    fn type_text(app: &mut App<MemoryGateway>, text: &str) {
        for c in text.chars() {
            app.form_input_char(c);
        }
    }

    fn clear_field(app: &mut App<MemoryGateway>) {
        for _ in 0..64 {
            app.form_backspace();
        }
    }

    #[tokio::test]
    async fn add_form_creates_event_on_selected_day() {
        let mut app = app_on(day(2024, 3, 15)).await;

        app.open_add_form();
        assert_eq!(app.input_mode, InputMode::Form);
        type_text(&mut app, "Doctor");
        app.submit_form().await;

        assert!(app.form_state.is_none());
        assert_eq!(app.input_mode, InputMode::Normal);
        assert_eq!(app.day_events.len(), 1);
        assert_eq!(app.day_events[0].title, "Doctor");
        assert_eq!(app.day_events[0].date, day(2024, 3, 15));
        let cell = app.grid.iter().find(|c| c.date == day(2024, 3, 15)).unwrap();
        assert_eq!(cell.event_count, 1);
    }

    #[tokio::test]
    async fn blank_title_keeps_form_open_with_error() {
        let mut app = app_on(day(2024, 3, 15)).await;

        app.open_add_form();
        type_text(&mut app, "   ");
        app.submit_form().await;

        let form = app.form_state.as_ref().unwrap();
        assert!(form.error.as_deref().unwrap().contains("title"));
        assert!(app.events.is_empty());
    }

    #[tokio::test]
    async fn storage_failure_raises_notice_and_keeps_form() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo.gateway().set_failing(true);

        app.open_add_form();
        type_text(&mut app, "Doctor");
        app.submit_form().await;

        assert!(app.form_state.is_some());
        assert_eq!(app.status_message.as_deref(), Some("Failed to save event"));
    }

    #[tokio::test]
    async fn edit_form_changes_only_touched_fields() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo
            .create(NewEvent::new("Doctor", "2024-03-15").with_description("checkup"))
            .await
            .unwrap();
        app.refresh().await;

        app.open_edit_form();
        clear_field(&mut app);
        type_text(&mut app, "Dentist");
        app.submit_form().await;

        assert_eq!(app.day_events.len(), 1);
        assert_eq!(app.day_events[0].title, "Dentist");
        assert_eq!(app.day_events[0].description.as_deref(), Some("checkup"));
    }

    #[tokio::test]
    async fn editing_the_date_follows_the_event() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo
            .create(NewEvent::new("Doctor", "2024-03-15"))
            .await
            .unwrap();
        app.refresh().await;

        app.open_edit_form();
        app.form_tab();
        assert_eq!(app.form_state.as_ref().unwrap().active_field, FormField::Date);
        clear_field(&mut app);
        type_text(&mut app, "2024-04-02");
        app.submit_form().await;

        assert_eq!(app.selected_date, day(2024, 4, 2));
        assert_eq!(app.day_events[0].title, "Doctor");
        assert_eq!(app.month(), MonthRef::new(2024, 4).unwrap());
    }

    #[tokio::test]
    async fn delete_requires_confirmation() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo
            .create(NewEvent::new("Doctor", "2024-03-15"))
            .await
            .unwrap();
        app.refresh().await;

        app.request_delete();
        assert_eq!(app.input_mode, InputMode::ConfirmDelete);
        app.cancel_delete();
        assert_eq!(app.day_events.len(), 1);

        app.request_delete();
        app.confirm_delete().await;
        assert!(app.day_events.is_empty());
        assert_eq!(app.status_message.as_deref(), Some("Event deleted"));
    }

    #[tokio::test]
    async fn detail_for_removed_event_shows_missing() {
        let mut app = app_on(day(2024, 3, 15)).await;
        let event = app
            .repo
            .create(NewEvent::new("Doctor", "2024-03-15").with_notes("fasting"))
            .await
            .unwrap();
        app.refresh().await;

        app.show_detail().await;
        assert_eq!(app.detail, Some(Detail::Found(event.clone())));

        app.repo.delete(event.id).await.unwrap();
        app.open_detail(event.id).await;
        assert_eq!(app.detail, Some(Detail::Missing(event.id)));
    }

    #[tokio::test]
    async fn detail_read_failure_raises_notice() {
        let mut app = app_on(day(2024, 3, 15)).await;
        let event = app
            .repo
            .create(NewEvent::new("Doctor", "2024-03-15"))
            .await
            .unwrap();
        app.refresh().await;
        app.repo.gateway().set_failing(true);

        app.open_detail(event.id).await;

        assert!(app.detail.is_none());
        assert_eq!(app.status_message.as_deref(), Some("Failed to load event"));
    }

    #[tokio::test]
    async fn delete_from_detail_closes_popup() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo
            .create(NewEvent::new("Doctor", "2024-03-15"))
            .await
            .unwrap();
        app.refresh().await;

        app.show_detail().await;
        app.delete_from_detail();
        assert_eq!(app.pending_delete_title(), Some("Doctor"));
        app.confirm_delete().await;

        assert!(app.detail.is_none());
        assert!(app.events.is_empty());
    }

    #[tokio::test]
    async fn other_writers_show_up_after_focus_change() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo
            .create(NewEvent::new("Written elsewhere", "2024-03-15"))
            .await
            .unwrap();
        assert!(app.day_events.is_empty());

        app.set_view(ViewMode::Day).await;
        assert_eq!(app.day_events.len(), 1);
    }

    #[tokio::test]
    async fn search_updates_as_you_type() {
        let mut app = app_on(day(2024, 3, 15)).await;
        app.repo.create(NewEvent::new("Dentist", "2024-03-15")).await.unwrap();
        app.repo.create(NewEvent::new("Gym", "2024-03-20")).await.unwrap();

        app.set_view(ViewMode::Search).await;
        assert_eq!(app.input_mode, InputMode::Search);
        assert!(app.search_results.is_empty());

        app.search_input_char('D');
        assert_eq!(app.search_results.len(), 1);
        assert_eq!(app.search_results[0].title, "Dentist");

        app.search_backspace();
        assert!(app.search_results.is_empty());
    }

    #[tokio::test]
    async fn month_navigation_clamps_day_and_rebuilds_grid() {
        let mut app = app_on(day(2024, 1, 31)).await;

        app.next_month();
        assert_eq!(app.selected_date, day(2024, 2, 29));
        assert!(app
            .grid
            .iter()
            .filter(|c| c.is_current_month)
            .all(|c| c.date.month() == 2));

        app.prev_month();
        assert_eq!(app.selected_date, day(2024, 1, 29));
    }

    #[tokio::test]
    async fn week_view_lists_the_selected_week() {
        let mut app = app_on(day(2024, 3, 13)).await;
        app.repo.create(NewEvent::new("Sunday", "2024-03-10")).await.unwrap();
        app.repo.create(NewEvent::new("Next week", "2024-03-17")).await.unwrap();

        app.set_view(ViewMode::Week).await;
        let titles: Vec<&str> = app.week_events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Sunday"]);
    }
}
