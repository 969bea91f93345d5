use std::time::Duration;

use crossterm::event::{self, Event, KeyEvent, KeyEventKind};

/// Wait up to `timeout` for the next key press.
///
/// Resize, mouse and key-release events are swallowed; the next draw picks
/// up any size change on its own.
pub fn next_key_event(timeout: Duration) -> color_eyre::Result<Option<KeyEvent>> {
    while event::poll(timeout)? {
        match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => return Ok(Some(key)),
            _ => continue,
        }
    }
    Ok(None)
}
