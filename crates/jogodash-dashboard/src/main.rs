//! jogodash
//!
//! Terminal dashboard over the `jogos` catalog: pick a genre, set a minimum
//! rating, and browse the matching games, their average rating and the
//! genre mix of the result.

mod app;
mod ui;

use anyhow::{Context, Result};
use crossterm::{
    event::{self, Event, KeyEventKind},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{Terminal, backend::CrosstermBackend};
use std::fs::OpenOptions;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing::{error, info};

use app::App;
use jogodash_config::{DashboardConfig, LoggingConfig};
use jogodash_library::{CatalogCache, GameDatabase};
use ui::draw_ui;

/// Log to a file; the terminal belongs to the dashboard
fn setup_logging(config: &LoggingConfig) -> Result<()> {
    use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(&config.file)
        .with_context(|| format!("Failed to open log file {}", config.file))?;

    tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_target(false)
                .with_ansi(false)
                .with_writer(Mutex::new(file)),
        )
        .init();

    Ok(())
}

fn load_config() -> Result<DashboardConfig> {
    match std::env::args_os().nth(1).map(PathBuf::from) {
        Some(path) => DashboardConfig::load(&path)
            .with_context(|| format!("Failed to load config {}", path.display())),
        None => DashboardConfig::load_default().context("Failed to load config"),
    }
}

fn run<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App<GameDatabase>,
) -> Result<()> {
    let tick_rate = Duration::from_millis(100);
    let mut last_tick = Instant::now();

    loop {
        terminal.draw(|f| draw_ui(f, app))?;

        let timeout = tick_rate
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_secs(0));

        if event::poll(timeout)? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    app.handle_input(key.code);
                }
            }
        }

        if last_tick.elapsed() >= tick_rate {
            last_tick = Instant::now();
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn main() -> Result<()> {
    let config = load_config()?;
    setup_logging(&config.logging)?;

    info!("jogodash starting...");

    // Fatal load errors surface before the terminal is taken over
    let database = GameDatabase::from_config(&config).context("Failed to open catalog")?;
    let mut app = App::new(CatalogCache::new(database), &config.dashboard)
        .context("Failed to load catalog")?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(e) = &result {
        error!("Dashboard failed: {:#}", e);
    }
    info!("jogodash exiting");
    result
}
