use crate::app::{App, AppEvent, Dialog, DialogInput, Focus};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Handle keyboard input and return corresponding events
/// Does not mutate app state directly - returns events to be processed
pub fn handle_input_event(key: KeyEvent, app: &App) -> Vec<AppEvent> {
    if is_ctrl(key, 'c') {
        return vec![AppEvent::Quit];
    }

    if let Some(dialog) = &app.dialog {
        return handle_dialog_mode(key, dialog)
            .map(|input| vec![AppEvent::Dialog(input)])
            .unwrap_or_default();
    }

    if let Some(event) = global_binding(key) {
        return vec![event];
    }

    match app.focus {
        Focus::Editor => handle_editor_mode(key),
        Focus::Table => handle_table_mode(key),
    }
}

fn is_ctrl(key: KeyEvent, c: char) -> bool {
    key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char(c)
}

/// Bindings that work regardless of focus.
fn global_binding(key: KeyEvent) -> Option<AppEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        let event = match key.code {
            KeyCode::Char('q') => AppEvent::Quit,
            KeyCode::Char('r') => AppEvent::RunQuery,
            KeyCode::Char('s') => AppEvent::OpenSaveDialog,
            KeyCode::Char('l') => AppEvent::OpenLoadDialog,
            KeyCode::Char('h') => AppEvent::OpenHistoryDialog,
            KeyCode::Char('k') => AppEvent::ClearQuery,
            KeyCode::Char('o') => AppEvent::OpenColumnsDialog,
            KeyCode::Char('d') => AppEvent::ToggleDetails,
            KeyCode::Char('e') => AppEvent::Export,
            KeyCode::Char('f') => AppEvent::OpenSearchDialog,
            KeyCode::Char('t') => AppEvent::CycleTimeRange,
            _ => return None,
        };
        return Some(event);
    }

    match key.code {
        KeyCode::F(1) => Some(AppEvent::ShowHelp),
        // Many terminals send Ctrl+H as Backspace
        KeyCode::F(3) => Some(AppEvent::OpenHistoryDialog),
        KeyCode::Tab | KeyCode::BackTab => Some(AppEvent::ToggleFocus),
        _ => None,
    }
}

/// Handle keyboard input while the query editor has focus
fn handle_editor_mode(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Char(c) => vec![AppEvent::EditorChar(c)],
        KeyCode::Enter => vec![AppEvent::EditorNewline],
        KeyCode::Backspace => vec![AppEvent::EditorBackspace],
        KeyCode::Delete => vec![AppEvent::EditorDelete],
        KeyCode::Left => vec![AppEvent::EditorLeft],
        KeyCode::Right => vec![AppEvent::EditorRight],
        KeyCode::Up => vec![AppEvent::EditorUp],
        KeyCode::Down => vec![AppEvent::EditorDown],
        KeyCode::Home => vec![AppEvent::EditorHome],
        KeyCode::End => vec![AppEvent::EditorEnd],
        KeyCode::Esc => vec![AppEvent::ClearQuery],
        _ => vec![],
    }
}

/// Handle keyboard input while the log table has focus
fn handle_table_mode(key: KeyEvent) -> Vec<AppEvent> {
    match key.code {
        KeyCode::Down | KeyCode::Char('j') => vec![AppEvent::SelectionDown],
        KeyCode::Up | KeyCode::Char('k') => vec![AppEvent::SelectionUp],
        // Page size will be set by caller based on terminal size
        KeyCode::PageDown | KeyCode::PageUp => vec![],
        KeyCode::Home | KeyCode::Char('g') => vec![AppEvent::JumpToStart],
        KeyCode::End | KeyCode::Char('G') => vec![AppEvent::JumpToEnd],
        KeyCode::Char(']') => vec![AppEvent::GrowDetails],
        KeyCode::Char('[') => vec![AppEvent::ShrinkDetails],
        KeyCode::Char('/') => vec![AppEvent::OpenSearchDialog],
        KeyCode::Char('n') => vec![AppEvent::NextMatch],
        KeyCode::Char('N') => vec![AppEvent::PrevMatch],
        KeyCode::Char('?') => vec![AppEvent::ShowHelp],
        _ => vec![],
    }
}

/// Translate a key for the open dialog. `None` means the key is ignored.
fn handle_dialog_mode(key: KeyEvent, dialog: &Dialog) -> Option<DialogInput> {
    let input = match dialog {
        // Any key closes help
        Dialog::Help => DialogInput::Cancel,

        Dialog::SaveQuery { .. } | Dialog::Search { .. } => {
            if matches!(dialog, Dialog::Search { .. }) && is_ctrl(key, 'k') {
                return Some(DialogInput::Clear);
            }
            match key.code {
                KeyCode::Char(c) if !key.modifiers.contains(KeyModifiers::CONTROL) => {
                    DialogInput::Char(c)
                }
                KeyCode::Backspace => DialogInput::Backspace,
                KeyCode::Delete => DialogInput::Delete,
                KeyCode::Left => DialogInput::Left,
                KeyCode::Right => DialogInput::Right,
                KeyCode::Home => DialogInput::Home,
                KeyCode::End => DialogInput::End,
                KeyCode::Enter => DialogInput::Submit,
                KeyCode::Esc => DialogInput::Cancel,
                _ => return None,
            }
        }

        Dialog::LoadQuery { .. } | Dialog::History { .. } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => DialogInput::Up,
            KeyCode::Down | KeyCode::Char('j') => DialogInput::Down,
            KeyCode::Home => DialogInput::Home,
            KeyCode::End => DialogInput::End,
            KeyCode::Enter => DialogInput::Submit,
            KeyCode::Delete | KeyCode::Char('d') => DialogInput::Delete,
            KeyCode::Char('c') if matches!(dialog, Dialog::History { .. }) => {
                DialogInput::ClearAll
            }
            KeyCode::Esc | KeyCode::Char('q') => DialogInput::Cancel,
            _ => return None,
        },

        Dialog::Columns { .. } => match key.code {
            KeyCode::Up | KeyCode::Char('k') => DialogInput::Up,
            KeyCode::Down | KeyCode::Char('j') => DialogInput::Down,
            KeyCode::Home => DialogInput::Home,
            KeyCode::End => DialogInput::End,
            KeyCode::Char(' ') => DialogInput::Toggle,
            KeyCode::Enter => DialogInput::Submit,
            KeyCode::Esc | KeyCode::Char('q') => DialogInput::Cancel,
            _ => return None,
        },
    };
    Some(input)
}
