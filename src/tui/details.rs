use super::log_table::level_style;
use crate::app::App;
use crate::record::format_details;
use ratatui::{
    layout::Rect,
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub(super) fn render_details(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Log Details ");

    let Some(record) = app.selected_record() else {
        let empty = Paragraph::new(Span::styled(
            "Select a log entry to view details",
            Style::default().fg(Color::DarkGray),
        ))
        .block(block);
        f.render_widget(empty, area);
        return;
    };

    let details = format_details(record);
    let lines: Vec<Line> = details
        .lines()
        .map(|line| match line.strip_prefix("Level: ") {
            Some(level) => Line::from(vec![
                Span::raw("Level: "),
                Span::styled(level.to_string(), level_style(record.severity())),
            ]),
            None => Line::raw(line.to_string()),
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: false });
    f.render_widget(paragraph, area);
}
