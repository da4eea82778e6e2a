use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::app::App;
use crate::data::Bound;
use crate::dispatch::TriggerSource;
use crate::export::CSV_FILENAME;

/// Poll for events with a timeout
pub fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout)? {
        Ok(Some(event::read()?))
    } else {
        Ok(None)
    }
}

/// Handle a key event
pub fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    // If help is shown, any key closes it
    if app.show_help {
        app.show_help = false;
        return;
    }

    if app.range_input.is_some() {
        handle_range_input(app, key);
        return;
    }

    match key.code {
        KeyCode::Char('q') => app.quit(),
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => app.quit(),

        KeyCode::Char('p') | KeyCode::Char(' ') => app.toggle_pause(),

        KeyCode::Char('r') => {
            app.trigger(TriggerSource::Manual);
            app.set_status_message("Reloading...".to_string());
        }

        KeyCode::Char('[') => app.start_range_input(Bound::Start),
        KeyCode::Char(']') => app.start_range_input(Bound::End),
        KeyCode::Char('c') => app.clear_range(),

        KeyCode::Char('e') => {
            let export_path = PathBuf::from(CSV_FILENAME);
            match app.export_csv(&export_path) {
                Ok(rows) => {
                    app.set_status_message(format!(
                        "Exported {} samples to {}",
                        rows,
                        export_path.display()
                    ));
                }
                Err(e) => {
                    app.set_status_message(format!("Export failed: {}", e));
                }
            }
        }

        KeyCode::Char('?') => app.toggle_help(),

        _ => {}
    }
}

/// Handle key input while a range bound is being typed
fn handle_range_input(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Enter => app.commit_range_input(),
        KeyCode::Esc => app.cancel_range_input(),
        KeyCode::Backspace => app.range_input_pop(),
        KeyCode::Char(c) => app.range_input_push(c),
        _ => {}
    }
}
