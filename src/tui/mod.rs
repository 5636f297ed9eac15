mod details;
mod dialogs;
mod help;
mod log_table;
mod query_panel;
mod status_bar;

use crate::app::{App, Dialog};
use ratatui::{
    layout::{Constraint, Direction, Layout},
    Frame,
};

/// Status bar height (2 lines + borders)
const STATUS_BAR_HEIGHT: u16 = 4;

pub fn render(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(query_panel::panel_height(app)),
            Constraint::Min(3), // Log table
            Constraint::Length(app.view.details.height()),
            Constraint::Length(STATUS_BAR_HEIGHT),
        ])
        .split(f.area());

    query_panel::render_query_panel(f, chunks[0], app);
    log_table::render_log_table(f, chunks[1], app);
    if app.view.details.is_visible() {
        details::render_details(f, chunks[2], app);
    }
    status_bar::render_status_bar(f, chunks[3], app);

    match &app.dialog {
        Some(Dialog::Help) => help::render_help_overlay(f, f.area()),
        Some(dialog) => dialogs::render_dialog(f, f.area(), dialog),
        None => {}
    }
}

/// Rows the table moves on PageUp/PageDown for a terminal of `height` rows.
pub fn page_size(app: &App, height: u16) -> usize {
    // Table borders and header row
    let chrome =
        query_panel::panel_height(app) + app.view.details.height() + STATUS_BAR_HEIGHT + 3;
    height.saturating_sub(chrome).max(1) as usize
}
