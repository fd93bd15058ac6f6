use ratatui::crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use skiptrace_core::{AppViewModel, Msg, Screen};

use super::constants::PAGE_ROWS;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Dispatch(Msg),
    /// Move the table selection by this many rows.
    Scroll(isize),
    Ignore,
}

pub fn map_key(key: KeyEvent, view: &AppViewModel) -> KeyAction {
    let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
    if ctrl && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('q')) {
        return KeyAction::Quit;
    }

    // The error dialog is modal.
    if view.error.is_some() {
        return match key.code {
            KeyCode::Esc | KeyCode::Enter => KeyAction::Dispatch(Msg::ErrorDismissed),
            _ => KeyAction::Ignore,
        };
    }

    match view.screen {
        Screen::Upload => upload_key(key, ctrl, view),
        // Leaves a job whose results could not be loaded.
        Screen::Progress if ctrl && key.code == KeyCode::Char('n') => {
            KeyAction::Dispatch(Msg::ResetRequested)
        }
        Screen::Progress => KeyAction::Ignore,
        Screen::Results => results_key(key, ctrl, view),
    }
}

/// Bracketed paste: a dropped file on Upload, search text on Results.
pub fn map_paste(text: String, view: &AppViewModel) -> Option<Msg> {
    if view.error.is_some() {
        return None;
    }
    match view.screen {
        Screen::Upload if !view.uploading => Some(Msg::FileDropped(text)),
        Screen::Results => {
            let pasted = text.lines().next().unwrap_or_default();
            Some(Msg::SearchChanged(format!("{}{}", view.query, pasted)))
        }
        _ => None,
    }
}

fn upload_key(key: KeyEvent, ctrl: bool, view: &AppViewModel) -> KeyAction {
    if view.uploading {
        return KeyAction::Ignore;
    }
    match key.code {
        KeyCode::Char('u') if ctrl => KeyAction::Dispatch(Msg::UploadClicked),
        KeyCode::Enter => KeyAction::Dispatch(Msg::PathSubmitted),
        code => match edit_text(&view.path_input, code, key.modifiers) {
            Some(text) => KeyAction::Dispatch(Msg::PathInputChanged(text)),
            None => KeyAction::Ignore,
        },
    }
}

fn results_key(key: KeyEvent, ctrl: bool, view: &AppViewModel) -> KeyAction {
    match key.code {
        KeyCode::Char('n') if ctrl => KeyAction::Dispatch(Msg::ResetRequested),
        KeyCode::Char('d') if ctrl => KeyAction::Dispatch(Msg::DownloadClicked),
        KeyCode::Char('e') if ctrl => KeyAction::Dispatch(Msg::ExportFilteredClicked),
        KeyCode::Up => KeyAction::Scroll(-1),
        KeyCode::Down => KeyAction::Scroll(1),
        KeyCode::PageUp => KeyAction::Scroll(-PAGE_ROWS),
        KeyCode::PageDown => KeyAction::Scroll(PAGE_ROWS),
        KeyCode::Esc if !view.query.is_empty() => {
            KeyAction::Dispatch(Msg::SearchChanged(String::new()))
        }
        code => match edit_text(&view.query, code, key.modifiers) {
            Some(text) => KeyAction::Dispatch(Msg::SearchChanged(text)),
            None => KeyAction::Ignore,
        },
    }
}

fn edit_text(current: &str, code: KeyCode, modifiers: KeyModifiers) -> Option<String> {
    match code {
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            let mut text = current.to_string();
            text.push(c);
            Some(text)
        }
        KeyCode::Backspace if !current.is_empty() => {
            let mut text = current.to_string();
            text.pop();
            Some(text)
        }
        _ => None,
    }
}
