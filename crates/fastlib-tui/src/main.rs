use std::io;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use ratatui::Terminal;
use ratatui::crossterm::event;
use ratatui::crossterm::execute;
use ratatui::crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::prelude::CrosstermBackend;
use tokio::sync::mpsc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fastlib_client::{HttpApi, LibraryApi};

mod action;
mod app;
mod backend;
mod config_file;
mod input;
mod model;
mod theme;
mod tui_event;
mod view;

#[cfg(feature = "mimalloc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use app::App;
use config_file::Overrides;

/// FastLibrarian TUI: browse authors, books and series and edit the
/// server configuration from the terminal.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Base URL of the FastLibrarian API
    #[arg(long, env = "FASTLIB_API_URL")]
    api_url: Option<String>,

    /// Request timeout in seconds
    #[arg(long, env = "FASTLIB_TIMEOUT")]
    timeout: Option<u64>,

    /// Color theme: hacker (default) or modern
    #[arg(long)]
    theme: Option<String>,

    /// Write logs here instead of the default cache location
    #[arg(long)]
    log_file: Option<PathBuf>,
}

/// Log to a file: the terminal belongs to the UI.
fn init_logging(path: PathBuf) -> anyhow::Result<tracing_appender::non_blocking::WorkerGuard> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    let file = std::fs::OpenOptions::new()
        .create(true)
        .append(true)
        .open(&path)?;
    let (writer, guard) = tracing_appender::non_blocking(file);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fastlib_tui=info,fastlib_client=info".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(writer)
                .with_ansi(false),
        )
        .init();
    Ok(guard)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let log_path = args.log_file.clone().unwrap_or_else(config_file::default_log_path);
    let _log_guard = init_logging(log_path)?;

    // CLI flags / env vars > settings file > defaults
    let file_settings = config_file::load_settings();
    let settings = config_file::resolve(
        Overrides {
            api_url: args.api_url,
            timeout_secs: args.timeout,
            theme: args.theme,
        },
        &file_settings,
    );
    tracing::info!(api_url = %settings.api_url, timeout_secs = settings.timeout_secs, "starting");

    let api: Arc<dyn LibraryApi> = Arc::new(HttpApi::new(
        settings.api_url.clone(),
        Duration::from_secs(settings.timeout_secs),
    )?);
    let theme = theme::Theme::named(&settings.theme);

    // Initialize terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    // Install panic hook that restores terminal before printing panic
    let original_hook = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);
        original_hook(panic_info);
    }));

    let backend_terminal = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend_terminal)?;

    // Drain any stray input events (e.g. Enter keypress from launching the command)
    while event::poll(Duration::from_millis(50)).unwrap_or(false) {
        let _ = event::read();
    }

    let mut app = App::new(theme, settings.api_url);
    let session = app.session_token();

    let (event_tx, mut event_rx) = mpsc::unbounded_channel();
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    app.api_tx = Some(cmd_tx);

    tokio::spawn(backend::run(api, cmd_rx, event_tx, session.clone()));

    // Also handle Ctrl+C at the OS level for clean shutdown
    let session_for_signal = session.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            session_for_signal.cancel();
        }
    });

    // Main event loop
    let tick_rate = Duration::from_millis(100);

    loop {
        terminal.draw(|f| app.view(f))?;

        tokio::select! {
            maybe_event = event_rx.recv() => {
                if let Some(api_event) = maybe_event {
                    app.handle_api_event(api_event);
                    // Drain any additional queued responses
                    while let Ok(evt) = event_rx.try_recv() {
                        app.handle_api_event(evt);
                    }
                }
            }
            _ = async {
                if event::poll(tick_rate).unwrap_or(false)
                    && let Ok(evt) = event::read()
                {
                    let action = input::map_event(&evt, &app.input_mode);
                    app.update(action);
                }
            } => {}
        }

        app.update(action::Action::Tick);

        if app.should_quit || session.is_cancelled() {
            session.cancel();
            break;
        }
    }

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    tracing::info!("stopped");

    Ok(())
}
