use crate::app::{App, Focus};
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};

pub(super) fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let mut status_text = format!(
        " {} | Range: {}",
        app.count_label(),
        app.time_range.label()
    );
    if let Some(label) = app.search.position_label() {
        status_text.push_str(&format!(" | Match {} '{}'", label, app.search.term()));
    } else if app.search.is_active() {
        status_text.push_str(&format!(" | No matches '{}'", app.search.term()));
    }

    let mut first_line = vec![Span::styled(
        status_text,
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if app.is_loading() {
        first_line.push(Span::styled(
            " | Loading...",
            Style::default().fg(Color::Yellow),
        ));
    }

    let bottom_line = if let Some(msg) = app.notification() {
        Line::from(vec![Span::styled(
            format!(" {}", msg),
            Style::default().fg(Color::Green),
        )])
    } else {
        let help_text = match app.focus {
            Focus::Editor => " Ctrl+R - Run | Tab - Table | Ctrl+S/L - Save/Load | F1 - Help",
            Focus::Table => " j/k - Navigate | / - Search | n/N - Match | [ ] - Details | ? - Help",
        };
        Line::from(vec![Span::styled(
            help_text,
            Style::default().fg(Color::DarkGray),
        )])
    };

    let paragraph = Paragraph::new(vec![Line::from(first_line), bottom_line])
        .block(Block::default().borders(Borders::ALL).title("Status"));

    f.render_widget(paragraph, area);
}
