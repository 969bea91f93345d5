mod app;
mod calendar;
mod cli;
mod components;
mod config;
mod event;
mod logging;
mod theme;
mod tui;

use std::sync::Arc;
use std::time::Duration;

use app::{App, InputMode, ViewMode};
use calendar::{JsonFileGateway, Repository};
use clap::Parser;
use color_eyre::Result;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use ratatui::layout::{Constraint, Layout, Rect};

type Calendar = App<JsonFileGateway>;

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    color_eyre::install()?;
    let cli = cli::Cli::parse();

    let mut config = config::Config::load(cli.config.as_deref())?;
    if let Some(dir) = cli.data_dir {
        config.storage.dir = Some(dir);
    }
    logging::init(cli.verbose, &config.log.level, &config.log_file())?;

    let gateway = JsonFileGateway::new(config.data_dir(), &config.storage.key);
    tracing::info!(path = %gateway.path().display(), "starting datebook");

    let repo = Arc::new(Repository::new(gateway));
    let mut app = App::new(repo);
    app.refresh().await;

    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = tui::restore();
        original_hook(panic_info);
    }));

    let mut terminal = tui::init()?;
    let result = run(&mut terminal, &mut app).await;
    tui::restore()?;
    tracing::info!("exiting");
    result
}

async fn run(terminal: &mut tui::Tui, app: &mut Calendar) -> Result<()> {
    while app.running {
        terminal.draw(|frame| {
            let area = frame.area();
            let w = area.width;

            // Main layout: content + status bar
            let layout = Layout::vertical([Constraint::Min(1), Constraint::Length(1)]).split(area);
            let content_area = layout[0];

            match app.view_mode {
                ViewMode::Month => render_month_layout(frame, content_area, app, w),
                ViewMode::Week => components::WeekView::render(
                    frame,
                    content_area,
                    app.selected_date,
                    app.today,
                    &app.week_events,
                    app.cursor,
                ),
                ViewMode::Day => components::DayView::render(
                    frame,
                    content_area,
                    app.selected_date,
                    &app.day_events,
                    app.cursor,
                ),
                ViewMode::Search => components::SearchView::render(
                    frame,
                    content_area,
                    &app.search_term,
                    &app.search_results,
                    app.cursor,
                    app.input_mode == InputMode::Search,
                ),
            }

            if let Some(ref detail) = app.detail {
                components::day_view::render_detail_popup(frame, area, detail);
            }

            if let Some(ref form) = app.form_state {
                components::EventForm::render(frame, area, form);
            }

            if app.input_mode == InputMode::ConfirmDelete {
                let title = app.pending_delete_title().unwrap_or("this event");
                components::day_view::render_confirm_delete(frame, area, title);
            }

            if app.show_help {
                render_help(frame, area);
            }

            components::StatusBar::render(
                frame,
                layout[1],
                app.view_mode,
                app.input_mode,
                app.today_events.len(),
                app.status_message.as_deref(),
            );
        })?;

        if let Some(key) = event::next_key_event(Duration::from_millis(100))? {
            // Clear status message on any key
            app.status_message = None;

            if app.show_help {
                if key.code == KeyCode::Esc || key.code == KeyCode::Char('?') {
                    app.show_help = false;
                }
                continue;
            }

            match app.input_mode {
                InputMode::Form => handle_form_input(app, key).await,
                InputMode::ConfirmDelete => handle_confirm_input(app, key).await,
                InputMode::Search => handle_search_input(app, key).await,
                InputMode::Normal if app.detail.is_some() => handle_detail_input(app, key),
                InputMode::Normal => handle_normal_input(app, key).await,
            }
        }
    }

    Ok(())
}

async fn handle_normal_input(app: &mut Calendar, key: KeyEvent) {
    let by_week = app.view_mode == ViewMode::Week;
    match (key.code, key.modifiers) {
        (KeyCode::Char('q'), _) | (KeyCode::Char('c'), KeyModifiers::CONTROL) => {
            app.running = false;
        }
        (KeyCode::Esc, _) if app.view_mode == ViewMode::Search => {
            app.set_view(ViewMode::Month).await
        }
        (KeyCode::Char('1'), _) => app.set_view(ViewMode::Month).await,
        (KeyCode::Char('2'), _) => app.set_view(ViewMode::Week).await,
        (KeyCode::Char('3'), _) => app.set_view(ViewMode::Day).await,
        (KeyCode::Char('/'), _) => app.set_view(ViewMode::Search).await,
        (KeyCode::Char('t'), _) => app.go_to_today(),
        (KeyCode::Char('n'), _) => app.open_add_form(),
        (KeyCode::Char('e'), _) => app.open_edit_form(),
        (KeyCode::Char('d'), _) => app.request_delete(),
        (KeyCode::Enter, _) => app.show_detail().await,
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) if by_week => app.prev_week(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) if by_week => app.next_week(),
        (KeyCode::Left, _) | (KeyCode::Char('h'), _) => app.prev_day(),
        (KeyCode::Right, _) | (KeyCode::Char('l'), _) => app.next_day(),
        (KeyCode::Up, _) | (KeyCode::Char('k'), _) => app.cursor_up(),
        (KeyCode::Down, _) | (KeyCode::Char('j'), _) => app.cursor_down(),
        (KeyCode::Char('['), _) => app.prev_month(),
        (KeyCode::Char(']'), _) => app.next_month(),
        (KeyCode::Char('?'), _) => app.show_help = true,
        _ => {}
    }
}

fn handle_detail_input(app: &mut Calendar, key: KeyEvent) {
    match key.code {
        KeyCode::Esc | KeyCode::Enter | KeyCode::Char('q') => app.close_detail(),
        KeyCode::Char('e') => app.edit_from_detail(),
        KeyCode::Char('d') => app.delete_from_detail(),
        _ => {}
    }
}

async fn handle_form_input(app: &mut Calendar, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => app.close_form(),
        KeyCode::Enter => app.submit_form().await,
        KeyCode::Tab => app.form_tab(),
        KeyCode::BackTab => app.form_backtab(),
        KeyCode::Backspace => app.form_backspace(),
        KeyCode::Char(c) => app.form_input_char(c),
        _ => {}
    }
}

async fn handle_confirm_input(app: &mut Calendar, key: KeyEvent) {
    match key.code {
        KeyCode::Char('y') | KeyCode::Char('Y') => app.confirm_delete().await,
        KeyCode::Char('n') | KeyCode::Char('N') | KeyCode::Esc => app.cancel_delete(),
        _ => {}
    }
}

async fn handle_search_input(app: &mut Calendar, key: KeyEvent) {
    match (key.code, key.modifiers) {
        (KeyCode::Char('c'), KeyModifiers::CONTROL) => app.running = false,
        (KeyCode::Esc, _) => app.set_view(ViewMode::Month).await,
        (KeyCode::Enter, _) => app.search_done(),
        (KeyCode::Backspace, _) => app.search_backspace(),
        (KeyCode::Char(c), _) => app.search_input_char(c),
        _ => {}
    }
}

fn render_month_layout(frame: &mut ratatui::Frame, area: Rect, app: &Calendar, total_width: u16) {
    if total_width < 60 {
        components::MonthView::render(
            frame,
            area,
            app.month(),
            &app.grid,
            app.selected_date,
            app.month_event_count,
        );
    } else {
        let month_w = if total_width >= 100 { 44 } else { 37 };
        let content = Layout::horizontal([Constraint::Length(month_w), Constraint::Min(20)]).split(area);

        components::MonthView::render(
            frame,
            content[0],
            app.month(),
            &app.grid,
            app.selected_date,
            app.month_event_count,
        );
        components::DayView::render(
            frame,
            content[1],
            app.selected_date,
            &app.day_events,
            app.cursor,
        );
    }
}

fn render_help(frame: &mut ratatui::Frame, area: Rect) {
    use ratatui::style::{Color, Modifier, Style};
    use ratatui::text::{Line, Span};
    use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

    let popup_w = area.width.clamp(30, 52);
    let popup_h = area.height.clamp(12, 26);
    let x = area.x + (area.width.saturating_sub(popup_w)) / 2;
    let y = area.y + (area.height.saturating_sub(popup_h)) / 2;
    let popup_area = Rect::new(x, y, popup_w.min(area.width), popup_h.min(area.height));

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Keybindings ")
        .title_style(theme::HEADER_STYLE)
        .borders(Borders::ALL)
        .border_style(theme::FOCUS_BORDER_STYLE);

    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key_style = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let entry = |keys: &'static str, desc: &'static str| {
        Line::from(vec![Span::styled(format!("  {:<10}", keys), key_style), Span::raw(desc)])
    };

    let lines = vec![
        Line::from(Span::styled("Navigation", theme::SECTION_STYLE)),
        entry("h/l", "Previous/next day (week in week view)"),
        entry("j/k", "Move through the event list"),
        entry("[/]", "Previous/next month"),
        entry("t", "Jump to today"),
        Line::from(""),
        Line::from(Span::styled("Views", theme::SECTION_STYLE)),
        entry("1/2/3", "Month / Week / Day view"),
        entry("/", "Search titles"),
        Line::from(""),
        Line::from(Span::styled("Actions", theme::SECTION_STYLE)),
        entry("Enter", "Event details"),
        entry("n", "New event on the selected day"),
        entry("e", "Edit selected event"),
        entry("d", "Delete selected event"),
        entry("Tab", "Next field in the form"),
        Line::from(""),
        entry("q / Esc", "Quit / close popup"),
    ];

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}
