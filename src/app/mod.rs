pub mod dialog;
pub mod event;
pub mod input;

pub use dialog::{Dialog, DialogInput, DialogOutcome};
pub use event::AppEvent;
pub use input::InputBuffer;

use crate::api::{QueryBackend, QueryOrchestrator, QueryOutcome, QueryRequest, DEFAULT_MAX_RECORDS};
use crate::error::ValidationError;
use crate::export;
use crate::history::HistoryStore;
use crate::query::{self, DEFAULT_LIVE_QUERY};
use crate::record::{Column, LogRecord};
use crate::saved_queries::SavedQueryStore;
use crate::search::SearchEngine;
use crate::store::RecordStore;
use crate::timerange::TimeRange;
use crate::view::{DetailsChange, HeightStep, ViewState};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How long a notification stays in the status bar.
pub const NOTIFICATION_TTL: Duration = Duration::from_secs(3);

/// Where records come from.
pub enum DataSource {
    /// Fixture records filtered locally by substring.
    Offline(Vec<LogRecord>),
    /// Remote queries through a backend.
    Live(Arc<dyn QueryBackend>),
}

/// Everything the app needs from the outside, built by `main` (or by a
/// test) and handed over at construction.
pub struct AppContext {
    pub source: DataSource,
    pub saved_queries: SavedQueryStore,
    pub history: HistoryStore,
    pub time_range: TimeRange,
    pub max_records: usize,
    pub columns: Vec<Column>,
    /// Directory CSV exports are written to
    pub export_dir: PathBuf,
}

impl AppContext {
    /// In-memory stores and defaults around `source`.
    pub fn new(source: DataSource) -> Self {
        Self {
            source,
            saved_queries: SavedQueryStore::default(),
            history: HistoryStore::default(),
            time_range: TimeRange::default(),
            max_records: DEFAULT_MAX_RECORDS,
            columns: Column::DEFAULT_VISIBLE.to_vec(),
            export_dir: PathBuf::from("."),
        }
    }
}

/// Which pane receives plain keys.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Editor,
    Table,
}

#[derive(Debug, Clone)]
pub struct Notification {
    pub message: String,
    pub at: Instant,
}

/// Main application state
pub struct App {
    pub records: RecordStore,
    pub search: SearchEngine,
    pub view: ViewState,
    pub editor: InputBuffer,
    pub focus: Focus,
    pub dialog: Option<Dialog>,
    pub time_range: TimeRange,
    pub saved_queries: SavedQueryStore,
    pub history: HistoryStore,
    pub should_quit: bool,

    /// `None` in offline mode
    orchestrator: Option<QueryOrchestrator>,
    /// Sequence number of an outstanding default-query reload; its result
    /// replaces the baseline set as well as the current one.
    reload_seq: Option<u64>,
    max_records: usize,
    export_dir: PathBuf,
    notification: Option<Notification>,
}

impl App {
    /// Build the app. Offline mode shows the fixture records right away;
    /// live mode starts loading recent logs in the background.
    pub fn new(ctx: AppContext) -> Self {
        let offline = matches!(ctx.source, DataSource::Offline(_));
        let (records, orchestrator) = match ctx.source {
            DataSource::Offline(records) => (RecordStore::new(records), None),
            DataSource::Live(backend) => (
                RecordStore::default(),
                Some(QueryOrchestrator::new(backend)),
            ),
        };

        let mut app = Self {
            records,
            search: SearchEngine::new(),
            view: ViewState::with_columns(ctx.columns),
            editor: InputBuffer::with_text(query::editor_preamble(offline)),
            focus: Focus::Editor,
            dialog: None,
            time_range: ctx.time_range,
            saved_queries: ctx.saved_queries,
            history: ctx.history,
            should_quit: false,
            orchestrator,
            reload_seq: None,
            max_records: ctx.max_records,
            export_dir: ctx.export_dir,
            notification: None,
        };

        if offline {
            app.view.reset_selection(app.records.len());
            app.notify("Development mode: Using dummy data for testing");
        } else {
            app.submit(DEFAULT_LIVE_QUERY.to_string());
            app.notify("Loading recent logs from Dynatrace...");
        }
        app
    }

    pub fn is_offline(&self) -> bool {
        self.orchestrator.is_none()
    }

    pub fn is_loading(&self) -> bool {
        self.orchestrator.as_ref().is_some_and(|o| o.is_loading())
    }

    /// Apply an event to the application state
    /// This is the central event handler that modifies app state based on events
    pub fn apply_event(&mut self, event: AppEvent) {
        match event {
            AppEvent::SelectionUp => self.move_selection(-1),
            AppEvent::SelectionDown => self.move_selection(1),
            AppEvent::PageUp(page) => self.move_selection(-(page as isize)),
            AppEvent::PageDown(page) => self.move_selection(page as isize),
            AppEvent::JumpToStart => {
                self.view.select_record(0, self.records.len());
            }
            AppEvent::JumpToEnd => {
                let len = self.records.len();
                self.view.select_record(len.saturating_sub(1), len);
            }

            AppEvent::EditorChar(c) => self.editor.insert_char(c),
            AppEvent::EditorNewline => self.editor.newline(),
            AppEvent::EditorBackspace => self.editor.backspace(),
            AppEvent::EditorDelete => self.editor.delete(),
            AppEvent::EditorLeft => self.editor.left(),
            AppEvent::EditorRight => self.editor.right(),
            AppEvent::EditorUp => self.editor.up(),
            AppEvent::EditorDown => self.editor.down(),
            AppEvent::EditorHome => self.editor.home(),
            AppEvent::EditorEnd => self.editor.end(),

            AppEvent::RunQuery => self.run_query(),
            AppEvent::ClearQuery => self.clear_query(),
            AppEvent::CycleTimeRange => {
                self.time_range = self.time_range.cycle();
                self.notify(format!("Time range: {}", self.time_range.label()));
            }

            AppEvent::OpenSaveDialog => self.open_save_dialog(),
            AppEvent::OpenLoadDialog => {
                self.dialog = Some(Dialog::load_query(self.saved_queries.list()));
            }
            AppEvent::OpenHistoryDialog => {
                self.dialog = Some(Dialog::history(self.history.recent()));
            }
            AppEvent::OpenColumnsDialog => {
                self.dialog = Some(Dialog::columns(self.view.visible_columns()));
            }
            AppEvent::OpenSearchDialog => {
                self.dialog = Some(Dialog::search(self.search.term()));
            }
            AppEvent::ShowHelp => self.dialog = Some(Dialog::Help),
            AppEvent::Dialog(input) => self.dialog_input(input),

            AppEvent::NextMatch => {
                let found = self.search.next();
                self.step_match(found.map(|m| m.row));
            }
            AppEvent::PrevMatch => {
                let found = self.search.prev();
                self.step_match(found.map(|m| m.row));
            }

            AppEvent::GrowDetails => {
                let change = self.view.details.step(HeightStep::Grow);
                self.notify_details(change);
            }
            AppEvent::ShrinkDetails => {
                let change = self.view.details.step(HeightStep::Shrink);
                self.notify_details(change);
            }
            AppEvent::ToggleDetails => {
                let change = self.view.details.toggle();
                self.notify_details(change);
            }

            AppEvent::Export => self.export(),
            AppEvent::ToggleFocus => {
                self.focus = match self.focus {
                    Focus::Editor => Focus::Table,
                    Focus::Table => Focus::Editor,
                };
            }
            AppEvent::Quit => self.should_quit = true,
        }
    }

    /// Run the editor's query.
    ///
    /// Offline, the normalized text filters the fixture set. Live, it is
    /// sent to the backend; with no actual query the default query reloads
    /// recent logs. Real queries are recorded in history either way.
    pub fn run_query(&mut self) {
        let normalized = query::normalize(self.editor.text());
        if !normalized.is_empty() {
            self.history.add(&normalized);
        }

        if self.orchestrator.is_none() {
            self.records.run_offline(&normalized);
            self.data_changed();
            if normalized.is_empty() {
                self.notify(format!("Showing all {} records", self.records.len()));
            } else {
                self.notify("Development mode: Filtering dummy data");
            }
            return;
        }

        if normalized.is_empty() {
            self.submit(DEFAULT_LIVE_QUERY.to_string());
            self.notify("Reloading recent logs...");
        } else {
            self.submit(normalized);
            self.notify("Executing query...");
        }
    }

    fn submit(&mut self, text: String) {
        let Some(orchestrator) = self.orchestrator.as_mut() else {
            return;
        };
        let is_reload = text == DEFAULT_LIVE_QUERY;
        let request = QueryRequest::new(text, self.time_range, self.max_records);
        let seq = orchestrator.submit(request);
        self.reload_seq = is_reload.then_some(seq);
    }

    /// Empty the editor and go back to the baseline set. An outstanding
    /// query is abandoned.
    pub fn clear_query(&mut self) {
        self.editor.clear();
        if let Some(orchestrator) = self.orchestrator.as_mut() {
            orchestrator.invalidate();
        }
        self.reload_seq = None;
        self.records.reset();
        self.data_changed();
    }

    /// Apply a finished query, if one arrived. Returns true when the
    /// state changed.
    pub fn poll_queries(&mut self) -> bool {
        let Some(outcome) = self.orchestrator.as_mut().and_then(|o| o.try_recv()) else {
            return false;
        };
        self.apply_query_outcome(outcome);
        true
    }

    fn apply_query_outcome(&mut self, outcome: QueryOutcome) {
        let is_reload = self.reload_seq.take() == Some(outcome.seq);
        match outcome.result {
            Ok(records) => {
                let count = records.len();
                info!(seq = outcome.seq, count, "Query completed");
                if is_reload {
                    self.records.load_full(records);
                    self.notify(format!("Loaded {} recent logs from Dynatrace", count));
                } else {
                    self.records.replace_current(records);
                    self.notify(format!("Query completed - {} records", count));
                }
            }
            Err(e) => {
                warn!(seq = outcome.seq, error = %e, "Query failed");
                self.records.clear_current();
                self.notify(format!("Query failed: {}", e));
            }
        }
        self.data_changed();
    }

    /// The current set was replaced: matches and selection are stale.
    fn data_changed(&mut self) {
        self.search
            .refresh(self.records.current(), self.view.visible_columns());
        self.view.reset_selection(self.records.len());
        let row = self.search.current().map(|m| m.row);
        self.follow_match(row);
    }

    fn move_selection(&mut self, delta: isize) {
        self.view.move_selection(delta, self.records.len());
    }

    fn step_match(&mut self, row: Option<usize>) {
        match row {
            Some(_) => {
                self.follow_match(row);
                if let Some(label) = self.search.position_label() {
                    self.notify(format!("Match {}", label));
                }
            }
            None => self.notify(ValidationError::NoActiveSearch.to_string()),
        }
    }

    /// Keep the table selection on the current match.
    fn follow_match(&mut self, row: Option<usize>) {
        if let Some(row) = row {
            self.view.select_record(row, self.records.len());
        }
    }

    fn open_save_dialog(&mut self) {
        let normalized = query::normalize(self.editor.text());
        if normalized.is_empty() {
            self.notify(ValidationError::EmptyQuery.to_string());
            return;
        }
        self.dialog = Some(Dialog::save_query(normalized));
    }

    fn dialog_input(&mut self, input: DialogInput) {
        let Some(dialog) = self.dialog.as_mut() else {
            return;
        };
        if let Some(outcome) = dialog.handle(input) {
            self.apply_dialog_outcome(outcome);
        }
    }

    /// Act on what a dialog produced. Successful actions close the dialog;
    /// refused ones leave it open with a notification. Deletions reopen the
    /// list so it reflects the change.
    pub fn apply_dialog_outcome(&mut self, outcome: DialogOutcome) {
        debug!(?outcome, "Dialog outcome");
        match outcome {
            DialogOutcome::Cancelled => self.dialog = None,
            DialogOutcome::Invalid(e) => self.notify(e.to_string()),

            DialogOutcome::Saved { name, query } => {
                match self.saved_queries.add(&name, &query) {
                    Ok(()) => {
                        self.dialog = None;
                        self.notify(format!("Query '{}' saved successfully", name));
                    }
                    Err(e) => self.notify(e.to_string()),
                }
            }
            DialogOutcome::LoadSaved { name } => {
                if let Some(saved) = self.saved_queries.get(&name) {
                    self.editor.set_text(saved.query.clone());
                    self.dialog = None;
                    self.focus = Focus::Editor;
                    self.notify(format!("Loaded query '{}'", name));
                }
            }
            DialogOutcome::DeleteSaved { name } => {
                self.saved_queries.delete(&name);
                self.dialog = Some(Dialog::load_query(self.saved_queries.list()));
                self.notify(format!("Query '{}' deleted successfully", name));
            }

            DialogOutcome::LoadHistory { index } => match self.history.get(index) {
                Some(entry) => {
                    self.editor.set_text(entry.query.clone());
                    self.dialog = None;
                    self.focus = Focus::Editor;
                    self.notify("Loaded query from history");
                }
                None => self.notify(
                    ValidationError::HistoryIndexOutOfRange {
                        index,
                        len: self.history.len(),
                    }
                    .to_string(),
                ),
            },
            DialogOutcome::DeleteHistory { index } => match self.history.delete_at(index) {
                Ok(_) => {
                    self.dialog = Some(Dialog::history(self.history.recent()));
                    self.notify("Query deleted from history");
                }
                Err(e) => self.notify(e.to_string()),
            },
            DialogOutcome::ClearHistory => {
                self.history.clear_all();
                self.dialog = Some(Dialog::history(self.history.recent()));
                self.notify("All query history cleared");
            }

            DialogOutcome::ApplyColumns(columns) => {
                let titles: Vec<&str> = columns.iter().map(|c| c.title()).collect();
                let message = format!("Updated columns: {}", titles.join(", "));
                match self.view.set_visible_columns(columns) {
                    Ok(()) => {
                        self.dialog = None;
                        self.data_changed();
                        self.notify(message);
                    }
                    Err(e) => self.notify(e.to_string()),
                }
            }

            DialogOutcome::Search(term) => {
                self.dialog = None;
                self.apply_search(&term);
            }
            DialogOutcome::ClearSearch => {
                self.dialog = None;
                self.search.clear();
                self.notify("Search cleared");
            }
        }
    }

    fn apply_search(&mut self, term: &str) {
        let count = self
            .search
            .search(self.records.current(), self.view.visible_columns(), term);
        if term.is_empty() {
            self.notify("Search cleared");
        } else if count == 0 {
            self.notify(format!("No matches found for '{}'", term));
        } else {
            let row = self.search.current().map(|m| m.row);
            self.follow_match(row);
            self.focus = Focus::Table;
            self.notify(format!("Found {} matches for '{}'", count, term));
        }
    }

    fn notify_details(&mut self, change: DetailsChange) {
        match change {
            DetailsChange::Resized(height) => {
                self.notify(format!("Log details height: {} lines", height))
            }
            DetailsChange::Shown(height) => {
                self.notify(format!("Log details shown: {} lines", height))
            }
            DetailsChange::Hidden => self.notify("Log details hidden"),
            DetailsChange::Unchanged => {}
        }
    }

    fn export(&mut self) {
        let count = self.records.len();
        match export::export_to_dir(&self.export_dir, self.records.current()) {
            Ok(path) => {
                let name = path
                    .file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string());
                info!(path = %path.display(), count, "Exported records");
                self.notify(format!("Exported {} logs to {}", count, name));
            }
            Err(e) => {
                warn!(error = %e, "Export failed");
                self.notify(format!("Export failed: {:#}", e));
            }
        }
    }

    pub fn notify(&mut self, message: impl Into<String>) {
        self.notification = Some(Notification {
            message: message.into(),
            at: Instant::now(),
        });
    }

    /// The latest notification while it is still fresh.
    pub fn notification(&self) -> Option<&str> {
        self.notification
            .as_ref()
            .filter(|n| n.at.elapsed() < NOTIFICATION_TTL)
            .map(|n| n.message.as_str())
    }

    /// Record count line for the status bar.
    pub fn count_label(&self) -> String {
        if self.is_offline() {
            format!(
                "Showing: {} / {} (dummy data)",
                self.records.len(),
                self.records.full().len()
            )
        } else {
            format!("Showing: {} logs from Dynatrace", self.records.len())
        }
    }

    pub fn selected_record(&self) -> Option<&LogRecord> {
        self.view.selected_record(self.records.current())
    }
}
