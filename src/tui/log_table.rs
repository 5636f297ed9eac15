use crate::app::{App, Focus};
use crate::record::{Column, LogRecord, Severity};
use crate::search::{highlight_ranges, SearchEngine};
use ratatui::{
    layout::{Constraint, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

const SELECTED_BG: Color = Color::DarkGray;
const MATCH_STYLE: Style = Style::new().fg(Color::Black).bg(Color::Yellow);
const CURRENT_MATCH_STYLE: Style = Style::new()
    .fg(Color::Black)
    .bg(Color::LightRed)
    .add_modifier(Modifier::BOLD);

/// Badge style for the Level column.
pub(super) fn level_style(severity: Severity) -> Style {
    match severity {
        Severity::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        Severity::Warn => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        Severity::Info => Style::default().fg(Color::Blue).add_modifier(Modifier::BOLD),
        Severity::Debug => Style::default().add_modifier(Modifier::DIM),
        Severity::Other => Style::default(),
    }
}

fn column_width(column: Column) -> Constraint {
    match column {
        Column::Timestamp => Constraint::Length(19),
        Column::Level => Constraint::Length(7),
        Column::Service => Constraint::Length(20),
        Column::Message => Constraint::Fill(3),
        Column::Content => Constraint::Fill(2),
        Column::StackTrace | Column::DatabaseQuery | Column::UserAgent => Constraint::Fill(1),
        _ => Constraint::Length(14),
    }
}

/// Split `text` into plain and highlighted spans. Falls back to styling the
/// whole cell when the term can't be located in the displayed text (for
/// example when the hit lies in the truncated tail).
fn highlighted_cell(text: String, term: &str, style: Style) -> Line<'static> {
    let ranges = match highlight_ranges(&text, term) {
        Some(ranges) if !ranges.is_empty() => ranges,
        _ => return Line::from(Span::styled(text, style)),
    };

    let mut spans = Vec::with_capacity(ranges.len() * 2 + 1);
    let mut pos = 0;
    for (start, end) in ranges {
        if start > pos {
            spans.push(Span::raw(text[pos..start].to_string()));
        }
        spans.push(Span::styled(text[start..end].to_string(), style));
        pos = end;
    }
    if pos < text.len() {
        spans.push(Span::raw(text[pos..].to_string()));
    }
    Line::from(spans)
}

fn build_cell(
    record: &LogRecord,
    column: Column,
    row: usize,
    col: usize,
    search: &SearchEngine,
) -> Cell<'static> {
    let text = column.display_text(record);
    if column == Column::Level {
        return Cell::from(text).style(level_style(record.severity()));
    }
    if search.is_current(row, col) {
        Cell::from(highlighted_cell(text, search.term(), CURRENT_MATCH_STYLE))
    } else if search.is_match(row, col) {
        Cell::from(highlighted_cell(text, search.term(), MATCH_STYLE))
    } else {
        Cell::from(text)
    }
}

pub(super) fn render_log_table(f: &mut Frame, area: Rect, app: &App) {
    let columns = app.view.visible_columns();
    let records = app.records.current();
    let visible_height = area.height.saturating_sub(3) as usize; // borders + header

    // Only build rows that can be on screen
    let selected = app.view.selected();
    let offset = selected
        .map(|s| s.saturating_sub(visible_height.saturating_sub(1)))
        .unwrap_or(0);
    let end = (offset + visible_height).min(records.len());

    let rows: Vec<Row> = records[offset.min(end)..end]
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let row = offset + i;
            Row::new(
                columns
                    .iter()
                    .enumerate()
                    .map(|(col, &column)| build_cell(record, column, row, col, &app.search)),
            )
        })
        .collect();

    let header = Row::new(columns.iter().map(|c| {
        Cell::from(c.title()).style(Style::default().add_modifier(Modifier::BOLD))
    }))
    .style(Style::default().fg(Color::Cyan));

    let mut title = format!(" Logs ({}) ", records.len());
    if app.is_loading() {
        title = " Logs (loading...) ".to_string();
    }
    let border_style = if app.focus == Focus::Table && app.dialog.is_none() {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let table = Table::new(rows, columns.iter().map(|&c| column_width(c)))
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title),
        )
        .row_highlight_style(Style::default().bg(SELECTED_BG).add_modifier(Modifier::BOLD))
        .column_spacing(1);

    let mut state = TableState::default().with_selected(selected.map(|s| s - offset));
    f.render_stateful_widget(table, area, &mut state);
}
