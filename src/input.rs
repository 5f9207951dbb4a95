use crate::app::App;
use crate::types::DialogKind;
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

pub fn handle_key(app: &mut App, key: KeyEvent) {
    // Ctrl+C always quits
    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    // If a dialog is open, route input there
    if app.dialog.is_some() {
        handle_dialog_key(app, key);
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) {
        match key.code {
            KeyCode::Char('u') => app.clear_question(),
            KeyCode::Char('y') => app.copy_answers(),
            _ => {}
        }
        return;
    }

    match key.code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::F(1) => app.open_help(),
        KeyCode::Enter => app.submit_question(),
        KeyCode::Backspace => app.pop_char(),
        KeyCode::Char(c) => app.push_char(c),
        KeyCode::Up => app.scroll_answers_up(1),
        KeyCode::Down => app.scroll_answers_down(1),
        KeyCode::PageUp => app.page_answers_up(),
        KeyCode::PageDown => app.page_answers_down(),
        KeyCode::Home => app.scroll_answers_home(),
        KeyCode::End => app.scroll_answers_end(),
        _ => {}
    }
}

fn handle_dialog_key(app: &mut App, key: KeyEvent) {
    match &app.dialog {
        Some(DialogKind::Notice { .. }) | Some(DialogKind::Error { .. }) => match key.code {
            KeyCode::Enter | KeyCode::Esc | KeyCode::Char(' ') => app.close_dialog(),
            _ => {}
        },
        Some(DialogKind::Help) => {
            app.close_dialog();
        }
        None => {}
    }
}
