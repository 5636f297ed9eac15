use crate::app::{App, Focus};
use crate::query::COMMENT_MARKER;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

/// Rows the editor grows to before it scrolls.
pub(super) const MAX_EDITOR_LINES: u16 = 8;

/// Height of the query panel including borders.
pub(super) fn panel_height(app: &App) -> u16 {
    (app.editor.line_count() as u16).clamp(3, MAX_EDITOR_LINES) + 2
}

pub(super) fn render_query_panel(f: &mut Frame, area: Rect, app: &App) {
    let focused = app.focus == Focus::Editor && app.dialog.is_none();
    let inner_height = area.height.saturating_sub(2) as usize;
    let (cursor_line, cursor_col) = app.editor.cursor_line_col();
    let scroll = (cursor_line + 1).saturating_sub(inner_height);

    let lines: Vec<Line> = app
        .editor
        .text()
        .split('\n')
        .map(|line| {
            if line.trim_start().starts_with(COMMENT_MARKER) {
                Line::styled(line, Style::default().fg(Color::DarkGray))
            } else {
                Line::raw(line)
            }
        })
        .collect();

    let title = format!(
        " Query ({}) | Ctrl+R to run | Ctrl+T: {} ",
        if app.is_offline() { "offline" } else { "DQL" },
        app.time_range.label()
    );
    let border_style = if focused {
        Style::default().fg(Color::Yellow)
    } else {
        Style::default()
    };

    let editor = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border_style)
                .title(title)
                .title_style(Style::default().add_modifier(Modifier::BOLD)),
        )
        .scroll((scroll as u16, 0));

    f.render_widget(editor, area);

    if focused {
        // Wide characters take two cells
        let prefix_width = app
            .editor
            .text()
            .split('\n')
            .nth(cursor_line)
            .map(|line| {
                let end = line
                    .char_indices()
                    .nth(cursor_col)
                    .map_or(line.len(), |(i, _)| i);
                line[..end].width()
            })
            .unwrap_or(0);
        let x = area.x + 1 + prefix_width as u16;
        let y = area.y + 1 + (cursor_line - scroll) as u16;
        if x < area.right().saturating_sub(1) && y < area.bottom().saturating_sub(1) {
            f.set_cursor_position((x, y));
        }
    }
}
