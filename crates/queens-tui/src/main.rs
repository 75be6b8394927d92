mod app;
mod headless;
mod render;
mod settings;
mod theme;

use app::App;
use clap::{Parser, Subcommand};
use crossterm::{
    event::{self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use queens_core::{Speed, DEFAULT_BOARD_SIZE};
use settings::Settings;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

/// Watch a backtracking search place N queens on an N×N board
#[derive(Parser)]
#[command(name = "queens", version, about)]
struct Cli {
    /// Board size (overrides the saved setting)
    #[arg(short, long)]
    size: Option<usize>,

    /// Animation speed: slow, medium or fast
    #[arg(long)]
    speed: Option<Speed>,

    /// Find further solutions in search order instead of by random restarts
    #[arg(long)]
    canonical_next: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Solve without the interactive board and print the result.
    Solve {
        /// Board size
        #[arg(short, long, default_value_t = DEFAULT_BOARD_SIZE)]
        size: usize,

        /// Enumerate every solution
        #[arg(long)]
        all: bool,

        /// Print at most this many solutions with --all
        #[arg(long)]
        limit: Option<usize>,
    },
}

fn main() -> io::Result<()> {
    let cli = Cli::parse();

    if let Some(Command::Solve { size, all, limit }) = cli.command {
        init_logging(false);
        let stdout = io::stdout();
        return headless::solve(&mut stdout.lock(), size, all, limit);
    }

    init_logging(true);
    let mut settings = Settings::load();
    if let Some(size) = cli.size {
        settings.size = size;
    }
    if let Some(speed) = cli.speed {
        settings.speed = speed;
    }
    if cli.canonical_next {
        settings.canonical_next = true;
    }
    let mut app = App::new(settings)
        .map_err(|e| io::Error::new(io::ErrorKind::InvalidInput, e))?;

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;

    // Run the app
    let result = run_app(&mut stdout, &mut app);
    app.shutdown();

    // Restore terminal
    disable_raw_mode()?;
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;

    if let Err(e) = result {
        eprintln!("Error: {}", e);
    }

    Ok(())
}

/// Log to `queens.log` under the data dir while the alternate screen is up,
/// to stderr otherwise. `QUEENS_LOG` takes an env-filter directive.
fn init_logging(to_file: bool) {
    let filter =
        EnvFilter::try_from_env("QUEENS_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt()
        .with_target(false)
        .with_env_filter(filter);

    if !to_file {
        let _ = builder.with_writer(io::stderr).try_init();
        return;
    }

    let path = settings::data_dir().join("queens.log");
    if let Ok(file) = OpenOptions::new().create(true).append(true).open(path) {
        let _ = builder
            .with_ansi(false)
            .with_writer(Mutex::new(file))
            .try_init();
    }
}

fn run_app(stdout: &mut io::Stdout, app: &mut App) -> io::Result<()> {
    let mut last_tick = Instant::now();

    loop {
        let tick_rate = app.get_tick_rate();

        // Render
        render::render(stdout, app)?;
        stdout.flush()?;

        // Handle input with timeout so search steps keep flowing
        let timeout = tick_rate.saturating_sub(last_tick.elapsed());
        if event::poll(timeout.min(Duration::from_millis(33)))? {
            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    match app.handle_key(key) {
                        app::AppAction::Continue => {}
                        app::AppAction::Quit => break,
                    }
                }
            }
        }

        // Drain search events and message timer
        if last_tick.elapsed() >= tick_rate {
            app.tick();
            last_tick = Instant::now();
        }
    }

    Ok(())
}
