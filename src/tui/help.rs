use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

// Help overlay dimensions (as percentage of screen)
const HELP_POPUP_WIDTH_PERCENT: f32 = 0.6;
const HELP_POPUP_HEIGHT_PERCENT: f32 = 0.8;

fn section(title: &str) -> Line<'_> {
    Line::from(vec![Span::styled(
        title,
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
    )])
}

pub(super) fn render_help_overlay(f: &mut Frame, area: Rect) {
    // Calculate centered popup area
    let popup_width = (area.width as f32 * HELP_POPUP_WIDTH_PERCENT) as u16;
    let popup_height = (area.height as f32 * HELP_POPUP_HEIGHT_PERCENT) as u16;
    let popup_area = Rect {
        x: area.x + (area.width.saturating_sub(popup_width)) / 2,
        y: area.y + (area.height.saturating_sub(popup_height)) / 2,
        width: popup_width,
        height: popup_height,
    };

    let help_lines = vec![
        Line::from(vec![Span::styled(
            "dynatail - Quick Reference",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )]),
        Line::from(""),
        section("Queries"),
        Line::from("  Ctrl+R        Run current query"),
        Line::from("  Ctrl+K, Esc   Clear query (Esc in editor)"),
        Line::from("  Ctrl+S        Save current query"),
        Line::from("  Ctrl+L        Load saved query"),
        Line::from("  Ctrl+H, F3    Browse query history"),
        Line::from("  Ctrl+T        Cycle time range"),
        Line::from(""),
        section("Table"),
        Line::from("  Tab           Switch editor / table focus"),
        Line::from("  j/k, ↑/↓      Move selection"),
        Line::from("  g / G         Jump to start / end"),
        Line::from("  PageUp/Down   Move by page"),
        Line::from("  Ctrl+O        Select columns"),
        Line::from(""),
        section("Search"),
        Line::from("  /, Ctrl+F     Search visible columns"),
        Line::from("  n / N         Next / previous match"),
        Line::from(""),
        section("Details"),
        Line::from("  ] / [         Grow / shrink details pane"),
        Line::from("  Ctrl+D        Toggle details pane"),
        Line::from(""),
        Line::from("  Ctrl+E        Export results to CSV"),
        Line::from("  F1, ?         Show this help"),
        Line::from("  Ctrl+Q        Quit"),
        Line::from(""),
        section("Query examples (offline mode)"),
        Line::from("  ERROR         Show only error logs"),
        Line::from("  payment       Logs mentioning payment"),
        Line::from("  user-service  Logs from user-service"),
        Line::from(""),
        Line::from(vec![Span::styled(
            "Press any key to close",
            Style::default()
                .fg(Color::DarkGray)
                .add_modifier(Modifier::ITALIC),
        )]),
    ];

    let help_paragraph = Paragraph::new(help_lines)
        .block(Block::default().borders(Borders::ALL).title(" Help "))
        .wrap(Wrap { trim: false });

    // Clear the area first to remove background content
    f.render_widget(Clear, popup_area);
    f.render_widget(help_paragraph, popup_area);
}
