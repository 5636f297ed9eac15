use crate::app::{Dialog, InputBuffer};
use crate::history::HistoryEntry;
use crate::record::Column;
use crate::saved_queries::SavedQuery;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthStr;

const POPUP_BG: Color = Color::Black;
const LIST_HIGHLIGHT: Style = Style::new()
    .bg(Color::DarkGray)
    .add_modifier(Modifier::BOLD);

/// Centered popup of `width` x `height`, clamped to `area`.
fn popup_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

fn popup_block(title: &str) -> Block<'_> {
    Block::default()
        .borders(Borders::ALL)
        .title(format!(" {} ", title))
        .style(Style::default().bg(POPUP_BG))
}

fn hint(text: &str) -> Line<'_> {
    Line::from(Span::styled(text, Style::default().fg(Color::DarkGray)))
}

/// Render the open dialog (other than help) over `area`.
pub(super) fn render_dialog(f: &mut Frame, area: Rect, dialog: &Dialog) {
    match dialog {
        Dialog::Help => {}
        Dialog::SaveQuery { name, query } => render_save(f, area, dialog.title(), name, query),
        Dialog::LoadQuery { queries, selected } => {
            render_saved_list(f, area, dialog.title(), queries, *selected)
        }
        Dialog::History { entries, selected } => {
            render_history(f, area, dialog.title(), entries, *selected)
        }
        Dialog::Columns { items, cursor } => {
            render_columns(f, area, dialog.title(), items, *cursor)
        }
        Dialog::Search { term } => render_search(f, area, dialog.title(), term),
    }
}

/// Single-line text field with the cursor placed after the label.
fn render_input_line(f: &mut Frame, area: Rect, label: &str, input: &InputBuffer) {
    let field = Paragraph::new(Line::from(vec![
        Span::styled(label, Style::default().fg(Color::Cyan)),
        Span::raw(input.text()),
    ]));
    f.render_widget(field, area);

    let x = area.x + label.width() as u16 + input.text()[..input.cursor()].width() as u16;
    if x < area.right() {
        f.set_cursor_position((x, area.y));
    }
}

fn render_save(f: &mut Frame, area: Rect, title: &str, name: &InputBuffer, query: &str) {
    let popup = popup_rect(area, 64, 10);
    f.render_widget(Clear, popup);
    let block = popup_block(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(inner);

    render_input_line(f, chunks[0], "Name: ", name);
    f.render_widget(
        Paragraph::new(query.to_string())
            .style(Style::default().fg(Color::DarkGray))
            .wrap(Wrap { trim: false }),
        chunks[2],
    );
    f.render_widget(Paragraph::new(hint("Enter: save | Esc: cancel")), chunks[3]);
}

fn render_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: Vec<ListItem>,
    selected: usize,
    empty_text: &str,
    hints: &str,
) {
    let popup = popup_rect(area, 80, 20);
    f.render_widget(Clear, popup);
    let block = popup_block(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(1)])
        .split(inner);

    if items.is_empty() {
        f.render_widget(Paragraph::new(hint(empty_text)), chunks[0]);
    } else {
        let list = List::new(items)
            .highlight_style(LIST_HIGHLIGHT)
            .highlight_symbol("> ");
        let mut state = ListState::default().with_selected(Some(selected));
        f.render_stateful_widget(list, chunks[0], &mut state);
    }
    f.render_widget(Paragraph::new(hint(hints)), chunks[1]);
}

fn render_saved_list(
    f: &mut Frame,
    area: Rect,
    title: &str,
    queries: &[SavedQuery],
    selected: usize,
) {
    let items = queries
        .iter()
        .map(|q| ListItem::new(q.display_line()))
        .collect();
    render_list(
        f,
        area,
        title,
        items,
        selected,
        "No saved queries",
        "Enter: load | d/Del: delete | Esc: cancel",
    );
}

fn render_history(
    f: &mut Frame,
    area: Rect,
    title: &str,
    entries: &[HistoryEntry],
    selected: usize,
) {
    let items = entries
        .iter()
        .map(|e| ListItem::new(e.display_line()))
        .collect();
    render_list(
        f,
        area,
        title,
        items,
        selected,
        "No query history",
        "Enter: load | d/Del: delete | c: clear all | Esc: cancel",
    );
}

fn render_columns(
    f: &mut Frame,
    area: Rect,
    title: &str,
    items: &[(Column, bool)],
    cursor: usize,
) {
    let list_items = items
        .iter()
        .map(|(column, checked)| {
            let mark = if *checked { "[x]" } else { "[ ]" };
            let style = if *checked {
                Style::default().fg(Color::Green)
            } else {
                Style::default()
            };
            ListItem::new(Line::from(vec![
                Span::styled(mark, style),
                Span::raw(" "),
                Span::raw(column.title()),
            ]))
        })
        .collect();
    render_list(
        f,
        area,
        title,
        list_items,
        cursor,
        "",
        "Space: toggle | Enter: apply | Esc: cancel",
    );
}

fn render_search(f: &mut Frame, area: Rect, title: &str, term: &InputBuffer) {
    let popup = popup_rect(area, 60, 5);
    f.render_widget(Clear, popup);
    let block = popup_block(title);
    let inner = block.inner(popup);
    f.render_widget(block, popup);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(1), Constraint::Length(1), Constraint::Min(0)])
        .split(inner);

    render_input_line(f, chunks[0], "Search: ", term);
    f.render_widget(
        Paragraph::new(hint("Enter: search | Ctrl+K: clear | Esc: cancel")),
        chunks[2],
    );
}
