use anyhow::{Context, Result};
use chrono::Utc;
use clap::Parser;
use crossterm::{
    event::{self as crossterm_event, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use dynatail::api::{DynatraceClient, QueryBackend};
use dynatail::app::{App, AppContext, AppEvent, DataSource, Focus};
use dynatail::cli::{Args, Commands, ConfigAction};
use dynatail::config::{self, Config, ConfigError};
use dynatail::history::HistoryStore;
use dynatail::saved_queries::SavedQueryStore;
use dynatail::storage::{HISTORY_FILE, SAVED_QUERIES_FILE};
use dynatail::timerange::TimeRange;
use dynatail::{cmd, fixtures, handlers, logging, signal, tui};
use ratatui::{backend::CrosstermBackend, Terminal};
use std::io;
use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing::{info, warn};

const INPUT_POLL_DURATION_MS: u64 = 100;

fn main() -> Result<()> {
    let args = Args::parse();

    if let Some(Commands::Config { action }) = args.command {
        let result = match action {
            ConfigAction::Validate => cmd::config::validate(args.config.as_deref()),
            ConfigAction::Show => cmd::config::show(args.config.as_deref()),
        };
        if let Err(code) = result {
            std::process::exit(code);
        }
        return Ok(());
    }

    let cfg = match load_config(args.config.as_deref()) {
        Ok(cfg) => cfg,
        Err(e) => {
            cmd::config::report(&e);
            std::process::exit(1);
        }
    };

    if let Some(path) = logging::init(cfg.data_dir.as_deref(), args.verbose)? {
        if args.verbose {
            eprintln!("Logging to {}", path.display());
        }
    }
    info!(
        source = ?cfg.source,
        development = args.development,
        max_records = cfg.max_records,
        "Starting dynatail"
    );

    let time_range = match &args.time_range {
        Some(token) => {
            if !TimeRange::is_known_token(token) {
                eprintln!(
                    "warning: unknown time range '{}', using '{}'",
                    token,
                    TimeRange::default().token()
                );
            }
            TimeRange::from_token(token)
        }
        None => cfg.time_range,
    };

    // Resolve the data source before touching the terminal so credential
    // errors print normally.
    let source = if args.development {
        DataSource::Offline(fixtures::sample_records(
            Utc::now(),
            fixtures::GENERATED_COUNT,
        ))
    } else {
        let credentials = match config::resolve_credentials(&cfg, |var| std::env::var(var).ok()) {
            Ok(credentials) => credentials,
            Err(e) => {
                cmd::config::report(&e);
                std::process::exit(1);
            }
        };
        let client = DynatraceClient::new(&credentials.base_url, &credentials.token)
            .context("Failed to create Dynatrace client")?;
        info!(base_url = %client.base_url(), "Live mode");
        let backend: Arc<dyn QueryBackend> = Arc::new(client);
        DataSource::Live(backend)
    };

    let data_file = |name: &str| cfg.data_dir.as_ref().map(|dir| dir.join(name));
    let ctx = AppContext {
        source,
        saved_queries: SavedQueryStore::open(data_file(SAVED_QUERIES_FILE)),
        history: HistoryStore::open(data_file(HISTORY_FILE)),
        time_range,
        max_records: cfg.max_records,
        columns: cfg.columns.clone(),
        export_dir: PathBuf::from("."),
    };

    let shutdown = signal::setup_shutdown_handlers().context("Failed to set up signal handlers")?;
    let mut app = App::new(ctx);

    // Setup terminal
    enable_raw_mode().context("Failed to enable raw mode")?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen).context("Failed to enter alternate screen")?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend).context("Failed to create terminal")?;

    // Main loop
    let res = run_app(&mut terminal, &mut app, &shutdown);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        eprintln!("Error: {:?}", err);
        std::process::exit(1);
    }

    Ok(())
}

/// `--config` wins over discovery.
fn load_config(explicit: Option<&std::path::Path>) -> Result<Config, ConfigError> {
    match explicit {
        Some(path) => config::load_file(path),
        None => config::load(&config::discover()),
    }
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
    shutdown: &AtomicBool,
) -> Result<()> {
    loop {
        terminal.draw(|f| tui::render(f, app))?;

        let mut events = Vec::new();

        if crossterm_event::poll(Duration::from_millis(INPUT_POLL_DURATION_MS))? {
            if let Event::Key(key) = crossterm_event::read()? {
                if key.kind == KeyEventKind::Press {
                    events.extend(handlers::input::handle_input_event(key, app));

                    // Page size depends on the terminal height
                    let paging = app.focus == Focus::Table && app.dialog.is_none();
                    if paging && matches!(key.code, KeyCode::PageDown | KeyCode::PageUp) {
                        let page = tui::page_size(app, terminal.size()?.height);
                        events.push(if key.code == KeyCode::PageDown {
                            AppEvent::PageDown(page)
                        } else {
                            AppEvent::PageUp(page)
                        });
                    }
                }
            }
        }

        for event in events {
            app.apply_event(event);
        }

        // Drain every finished query; stale outcomes are dropped inside
        while app.poll_queries() {}

        if shutdown.load(Ordering::SeqCst) {
            warn!("Termination signal received");
            break;
        }
        if app.should_quit {
            break;
        }
    }

    Ok(())
}
