//! Modal dialogs as plain state machines.
//!
//! A dialog consumes [`DialogInput`]s and, once the user commits to
//! something, yields a [`DialogOutcome`]. It never touches the stores
//! itself: the app applies the outcome and decides whether the dialog
//! closes.

use crate::app::input::InputBuffer;
use crate::error::ValidationError;
use crate::history::HistoryEntry;
use crate::record::Column;
use crate::saved_queries::SavedQuery;

/// Keys as seen by a dialog, after the key handler has translated them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DialogInput {
    Char(char),
    Backspace,
    Left,
    Right,
    Home,
    End,
    Up,
    Down,
    Toggle,
    Submit,
    Delete,
    ClearAll,
    Clear,
    Cancel,
}

/// What the user asked for when leaving (or acting inside) a dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogOutcome {
    Cancelled,
    Saved { name: String, query: String },
    LoadSaved { name: String },
    DeleteSaved { name: String },
    LoadHistory { index: usize },
    DeleteHistory { index: usize },
    ClearHistory,
    ApplyColumns(Vec<Column>),
    Search(String),
    ClearSearch,
    /// The action was refused; the dialog stays open.
    Invalid(ValidationError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    Help,
    SaveQuery {
        name: InputBuffer,
        query: String,
    },
    LoadQuery {
        queries: Vec<SavedQuery>,
        selected: usize,
    },
    History {
        entries: Vec<HistoryEntry>,
        selected: usize,
    },
    Columns {
        items: Vec<(Column, bool)>,
        cursor: usize,
    },
    Search {
        term: InputBuffer,
    },
}

impl Dialog {
    pub fn save_query(query: String) -> Self {
        Dialog::SaveQuery {
            name: InputBuffer::new(),
            query,
        }
    }

    pub fn load_query(queries: &[SavedQuery]) -> Self {
        Dialog::LoadQuery {
            queries: queries.to_vec(),
            selected: 0,
        }
    }

    pub fn history(entries: &[HistoryEntry]) -> Self {
        Dialog::History {
            entries: entries.to_vec(),
            selected: 0,
        }
    }

    /// Visible columns first in their current order (checked), then every
    /// other column alphabetically (unchecked).
    pub fn columns(visible: &[Column]) -> Self {
        let mut hidden: Vec<Column> = Column::ALL
            .iter()
            .copied()
            .filter(|c| !visible.contains(c))
            .collect();
        hidden.sort_by_key(|c| c.title());

        let items = visible
            .iter()
            .map(|&c| (c, true))
            .chain(hidden.into_iter().map(|c| (c, false)))
            .collect();
        Dialog::Columns { items, cursor: 0 }
    }

    /// Pre-filled with the active term, if any.
    pub fn search(current_term: &str) -> Self {
        Dialog::Search {
            term: InputBuffer::with_text(current_term),
        }
    }

    pub fn title(&self) -> &'static str {
        match self {
            Dialog::Help => "Help",
            Dialog::SaveQuery { .. } => "Save Query",
            Dialog::LoadQuery { .. } => "Load Query",
            Dialog::History { .. } => "Query History",
            Dialog::Columns { .. } => "Select Columns",
            Dialog::Search { .. } => "Search",
        }
    }

    /// Feed one input. `None` means the dialog consumed it and stays as is.
    pub fn handle(&mut self, input: DialogInput) -> Option<DialogOutcome> {
        if input == DialogInput::Cancel {
            return Some(DialogOutcome::Cancelled);
        }

        match self {
            Dialog::Help => match input {
                DialogInput::Submit | DialogInput::Char('q') | DialogInput::Char('?') => {
                    Some(DialogOutcome::Cancelled)
                }
                _ => None,
            },

            Dialog::SaveQuery { name, query } => match input {
                DialogInput::Submit => {
                    let name = name.text().trim();
                    if name.is_empty() {
                        Some(DialogOutcome::Invalid(ValidationError::EmptyQueryName))
                    } else {
                        Some(DialogOutcome::Saved {
                            name: name.to_string(),
                            query: query.clone(),
                        })
                    }
                }
                other => {
                    edit_line(name, other);
                    None
                }
            },

            Dialog::LoadQuery { queries, selected } => {
                move_in_list(selected, queries.len(), input);
                let name = queries.get(*selected).map(|q| q.name.clone());
                match (input, name) {
                    (DialogInput::Submit, Some(name)) => Some(DialogOutcome::LoadSaved { name }),
                    (DialogInput::Delete, Some(name)) => {
                        Some(DialogOutcome::DeleteSaved { name })
                    }
                    (DialogInput::Submit | DialogInput::Delete, None) => {
                        Some(DialogOutcome::Invalid(ValidationError::NothingSelected))
                    }
                    _ => None,
                }
            }

            Dialog::History { entries, selected } => {
                move_in_list(selected, entries.len(), input);
                let index = (*selected < entries.len()).then_some(*selected);
                match (input, index) {
                    (DialogInput::Submit, Some(index)) => {
                        Some(DialogOutcome::LoadHistory { index })
                    }
                    (DialogInput::Delete, Some(index)) => {
                        Some(DialogOutcome::DeleteHistory { index })
                    }
                    (DialogInput::Submit | DialogInput::Delete, None) => {
                        Some(DialogOutcome::Invalid(ValidationError::NothingSelected))
                    }
                    (DialogInput::ClearAll, _) => Some(DialogOutcome::ClearHistory),
                    _ => None,
                }
            }

            Dialog::Columns { items, cursor } => {
                move_in_list(cursor, items.len(), input);
                match input {
                    DialogInput::Toggle | DialogInput::Char(' ') => {
                        if let Some(item) = items.get_mut(*cursor) {
                            item.1 = !item.1;
                        }
                        None
                    }
                    DialogInput::Submit => Some(DialogOutcome::ApplyColumns(
                        items
                            .iter()
                            .filter(|(_, checked)| *checked)
                            .map(|(c, _)| *c)
                            .collect(),
                    )),
                    _ => None,
                }
            }

            Dialog::Search { term } => match input {
                DialogInput::Submit => Some(DialogOutcome::Search(term.text().trim().to_string())),
                DialogInput::Clear => Some(DialogOutcome::ClearSearch),
                other => {
                    edit_line(term, other);
                    None
                }
            },
        }
    }
}

fn edit_line(buffer: &mut InputBuffer, input: DialogInput) {
    match input {
        DialogInput::Char(c) => buffer.insert_char(c),
        DialogInput::Backspace => buffer.backspace(),
        DialogInput::Delete => buffer.delete(),
        DialogInput::Left => buffer.left(),
        DialogInput::Right => buffer.right(),
        DialogInput::Home => buffer.home(),
        DialogInput::End => buffer.end(),
        _ => {}
    }
}

fn move_in_list(selected: &mut usize, len: usize, input: DialogInput) {
    match input {
        DialogInput::Up => *selected = selected.saturating_sub(1),
        DialogInput::Down if *selected + 1 < len => *selected += 1,
        DialogInput::Home => *selected = 0,
        DialogInput::End => *selected = len.saturating_sub(1),
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn saved(name: &str) -> SavedQuery {
        SavedQuery {
            name: name.into(),
            query: "fetch logs".into(),
            created_at: Utc::now(),
        }
    }

    fn type_text(dialog: &mut Dialog, text: &str) {
        for c in text.chars() {
            assert_eq!(dialog.handle(DialogInput::Char(c)), None);
        }
    }

    #[test]
    fn test_cancel_from_any_dialog() {
        for mut dialog in [
            Dialog::Help,
            Dialog::save_query("q".into()),
            Dialog::load_query(&[]),
            Dialog::history(&[]),
            Dialog::columns(&Column::DEFAULT_VISIBLE),
            Dialog::search(""),
        ] {
            assert_eq!(
                dialog.handle(DialogInput::Cancel),
                Some(DialogOutcome::Cancelled)
            );
        }
    }

    #[test]
    fn test_save_requires_trimmed_name() {
        let mut dialog = Dialog::save_query("fetch logs".into());
        type_text(&mut dialog, "   ");
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::Invalid(ValidationError::EmptyQueryName))
        );

        type_text(&mut dialog, "errors ");
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::Saved {
                name: "errors".into(),
                query: "fetch logs".into()
            })
        );
    }

    #[test]
    fn test_load_dialog_selection() {
        let mut dialog = Dialog::load_query(&[saved("a"), saved("b")]);
        assert_eq!(dialog.handle(DialogInput::Down), None);
        assert_eq!(dialog.handle(DialogInput::Down), None);
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::LoadSaved { name: "b".into() })
        );
        dialog.handle(DialogInput::Up);
        assert_eq!(
            dialog.handle(DialogInput::Delete),
            Some(DialogOutcome::DeleteSaved { name: "a".into() })
        );
    }

    #[test]
    fn test_empty_lists_refuse_actions() {
        let mut dialog = Dialog::load_query(&[]);
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::Invalid(ValidationError::NothingSelected))
        );

        let mut dialog = Dialog::history(&[]);
        assert_eq!(
            dialog.handle(DialogInput::Delete),
            Some(DialogOutcome::Invalid(ValidationError::NothingSelected))
        );
        assert_eq!(
            dialog.handle(DialogInput::ClearAll),
            Some(DialogOutcome::ClearHistory)
        );
    }

    #[test]
    fn test_history_dialog_outcomes() {
        let entries = vec![
            HistoryEntry::new("a".into()),
            HistoryEntry::new("b".into()),
        ];
        let mut dialog = Dialog::history(&entries);
        dialog.handle(DialogInput::End);
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::LoadHistory { index: 1 })
        );
        assert_eq!(
            dialog.handle(DialogInput::Delete),
            Some(DialogOutcome::DeleteHistory { index: 1 })
        );
    }

    #[test]
    fn test_column_dialog_ordering() {
        let visible = [Column::Message, Column::Timestamp];
        let Dialog::Columns { items, cursor } = Dialog::columns(&visible) else {
            panic!("expected columns dialog");
        };
        assert_eq!(cursor, 0);
        assert_eq!(items.len(), Column::ALL.len());
        assert_eq!(items[0], (Column::Message, true));
        assert_eq!(items[1], (Column::Timestamp, true));
        assert!(items[2..].iter().all(|(_, checked)| !checked));

        let hidden_titles: Vec<&str> = items[2..].iter().map(|(c, _)| c.title()).collect();
        let mut sorted = hidden_titles.clone();
        sorted.sort();
        assert_eq!(hidden_titles, sorted);
    }

    #[test]
    fn test_column_toggle_and_apply() {
        let mut dialog = Dialog::columns(&[Column::Timestamp, Column::Level]);
        dialog.handle(DialogInput::Toggle);
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::ApplyColumns(vec![Column::Level]))
        );

        dialog.handle(DialogInput::Down);
        dialog.handle(DialogInput::Toggle);
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::ApplyColumns(vec![]))
        );
    }

    #[test]
    fn test_search_dialog() {
        let mut dialog = Dialog::search("pay");
        type_text(&mut dialog, "ment ");
        assert_eq!(
            dialog.handle(DialogInput::Submit),
            Some(DialogOutcome::Search("payment".into()))
        );
        assert_eq!(
            dialog.handle(DialogInput::Clear),
            Some(DialogOutcome::ClearSearch)
        );
    }
}
